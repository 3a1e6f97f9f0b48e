//! Command-line interface implementation
//!
//! This module provides the CLI entry point. With no arguments the tool
//! refreshes the default shader next to the executable; flags only adjust
//! where it looks and how failures are reported.

mod refresh;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

pub use refresh::{run_refresh, RefreshArgs};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;

/// shader-refresh - Recompile a clspv shader when its source is newer than its binary
#[derive(Parser, Debug)]
#[command(name = "shader-refresh")]
#[command(
    about = "Recompile a clspv shader (.cl -> .spv/.spvasm) when its source is newer than its binary"
)]
#[command(version)]
pub struct Cli {
    /// Config file (default: shader-refresh.toml next to the executable, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the shader files (default: <exe dir>/../resources)
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Shader base name shared by source, binary and disassembly (default: SimpleCopy)
    #[arg(long)]
    pub shader: Option<String>,

    /// Compile even if the binary is up to date
    #[arg(long)]
    pub force: bool,

    /// Exit with an error status if either compile fails
    #[arg(long)]
    pub strict: bool,

    /// Keep running and refresh whenever the source changes
    #[arg(long)]
    pub watch: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Initialise `env_logger`.
///
/// `RUST_LOG` takes precedence over the level chosen by `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let args = RefreshArgs {
        config: cli.config,
        resources: cli.resources,
        shader: cli.shader,
        force: cli.force,
        strict: cli.strict,
        watch: cli.watch,
    };
    run_refresh(&args)
}
