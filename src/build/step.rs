//! The staleness-checked shader build step.
//!
//! # How It Works
//!
//! 1. Read the mtimes of the shader source and its SPIR-V binary
//! 2. If the source is strictly newer, run the compiler for the binary
//! 3. Run the compiler again for the disassembly, whatever step 2 returned
//! 4. Otherwise report that the binary is up to date
//!
//! Status lines go to the supplied writer. A compiler failure is reported
//! there and in the returned [`RefreshOutcome`], never as an `Err`.
//!
//! # Example
//!
//! ```ignore
//! use shader_refresh::build::{Compiler, ShaderBuildStep, ShaderPaths};
//!
//! let paths = ShaderPaths::new(&resources, "SimpleCopy");
//! let compiler = Compiler::from_env("CLSPV_EXE_PATH", "clspv")?;
//! let outcome = ShaderBuildStep::new(paths, compiler).run(&mut std::io::stdout())?;
//! ```

use std::io::Write;

use crate::build::{
    check_shader_modified, file_mtime, CompileStatus, Compiler, ProcessRunner, RefreshError,
    RefreshOutcome, ShaderPaths, SystemRunner,
};

/// Status line printed when the source is newer than the binary.
pub const MSG_MODIFIED: &str = "Shader src was modified.";
/// Status line printed when a rebuild is forced.
pub const MSG_FORCED: &str = "Shader rebuild forced.";
/// Status line printed when nothing needs to be done.
pub const MSG_UP_TO_DATE: &str = "Shader binary is upto date.";

/// One shader's refresh: paths, compiler and the runner used to invoke it.
pub struct ShaderBuildStep<R: ProcessRunner = SystemRunner> {
    paths: ShaderPaths,
    compiler: Compiler,
    runner: R,
    /// Compile even if the binary is up to date
    force: bool,
}

impl ShaderBuildStep<SystemRunner> {
    /// Create a build step that spawns real processes.
    pub fn new(paths: ShaderPaths, compiler: Compiler) -> Self {
        Self::with_runner(paths, compiler, SystemRunner)
    }
}

impl<R: ProcessRunner> ShaderBuildStep<R> {
    /// Create a build step with a custom process runner.
    pub fn with_runner(paths: ShaderPaths, compiler: Compiler, runner: R) -> Self {
        Self { paths, compiler, runner, force: false }
    }

    /// Set force mode (compile without comparing timestamps).
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// The paths this step works on.
    pub fn paths(&self) -> &ShaderPaths {
        &self.paths
    }

    /// The compiler this step invokes.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Get a reference to the process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Check if the binary needs to be rebuilt.
    ///
    /// In force mode only the source has to exist.
    pub fn needs_rebuild(&self) -> Result<bool, RefreshError> {
        if self.force {
            file_mtime(&self.paths.source)?;
            return Ok(true);
        }
        check_shader_modified(&self.paths.source, &self.paths.binary)
    }

    /// Run the step once, writing status lines to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RefreshOutcome, RefreshError> {
        if !self.needs_rebuild()? {
            writeln!(out, "{}", MSG_UP_TO_DATE)?;
            return Ok(RefreshOutcome::UpToDate);
        }

        writeln!(out, "{}", if self.force { MSG_FORCED } else { MSG_MODIFIED })?;

        let ShaderPaths { source, binary, disassembly } = &self.paths;

        let binary_status = self.compiler.compile_binary(&mut self.runner, source, binary);
        write_status(out, binary, binary_status)?;

        let disassembly_status =
            self.compiler.compile_disassembly(&mut self.runner, source, disassembly);
        write_status(out, disassembly, disassembly_status)?;

        Ok(RefreshOutcome::Rebuilt { binary: binary_status, disassembly: disassembly_status })
    }
}

fn write_status<W: Write>(
    out: &mut W,
    target: &std::path::Path,
    status: CompileStatus,
) -> std::io::Result<()> {
    writeln!(out, "Generating {} : {}!", target.display(), status)
}
