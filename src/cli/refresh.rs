//! Refresh command implementation

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::build::{self_dir, Compiler, RefreshOutcome, ShaderBuildStep};
use crate::config::loader::{
    load_config, merge_cli_overrides, shader_paths, validate_config, CliOverrides,
};

/// Options collected from the command line.
#[derive(Debug, Default, Clone)]
pub struct RefreshArgs {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Resources directory override
    pub resources: Option<PathBuf>,
    /// Shader base name override
    pub shader: Option<String>,
    /// Compile without comparing timestamps
    pub force: bool,
    /// Exit nonzero when a compile fails
    pub strict: bool,
    /// Keep watching the source
    pub watch: bool,
}

/// Run the refresh
pub fn run_refresh(args: &RefreshArgs) -> ExitCode {
    let self_dir = match self_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (mut config, root) = match load_config(args.config.as_deref(), &self_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Paths given on the command line are relative to the working directory
    let cwd = std::env::current_dir().unwrap_or_default();
    let overrides = CliOverrides {
        resources: args.resources.as_ref().map(|p| cwd.join(p)),
        name: args.shader.clone(),
        force: args.force.then_some(true),
        strict: args.strict.then_some(true),
    };
    merge_cli_overrides(&mut config, &overrides);
    if let Err(e) = validate_config(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    let paths = shader_paths(&config, &root, &self_dir);
    log::debug!("source: {}", paths.source.display());
    log::debug!("binary: {}", paths.binary.display());
    log::debug!("disassembly: {}", paths.disassembly.display());

    let compiler = match Compiler::from_env(&config.compiler.env, &config.compiler.exe) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut step = ShaderBuildStep::new(paths, compiler).with_force(config.build.force);
    log::debug!("compiler: {}", step.compiler().exe().display());

    if args.watch {
        return run_watch(&mut step, &config.watch);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match step.run(&mut out) {
        Ok(outcome) => {
            let _ = out.flush();
            ExitCode::from(exit_status(&outcome, config.build.strict))
        }
        Err(e) => {
            let _ = out.flush();
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Map an outcome to the process exit status.
///
/// Compiler failures only count when `strict` is set.
fn exit_status(outcome: &RefreshOutcome, strict: bool) -> u8 {
    if strict && outcome.has_failures() {
        log::debug!("strict mode: {}", outcome.summary());
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}

#[cfg(feature = "watch")]
fn run_watch(step: &mut ShaderBuildStep, config: &crate::config::WatchConfig) -> ExitCode {
    eprintln!("Starting watch mode...");
    eprintln!("Press Ctrl+C to stop");
    eprintln!();

    match crate::watch::watch_and_refresh(step, config) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Watch error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(not(feature = "watch"))]
fn run_watch(_step: &mut ShaderBuildStep, _config: &crate::config::WatchConfig) -> ExitCode {
    eprintln!("Error: watch mode requires the `watch` feature");
    ExitCode::from(EXIT_ERROR)
}
