//! shader-refresh - Rebuild a clspv SPIR-V binary when its OpenCL C source is newer

use std::process::ExitCode;

use shader_refresh::cli;

fn main() -> ExitCode {
    cli::run()
}
