//! External shader compiler invocation.
//!
//! The compiler is located through an environment variable that names the
//! directory holding the executable. Each invocation's outcome is decided by
//! the exit code alone.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::build::{CompileStatus, RefreshError};

/// Environment variable naming the directory that contains the compiler.
pub const DEFAULT_COMPILER_ENV: &str = "CLSPV_EXE_PATH";
/// Compiler executable stem; the platform executable suffix is appended.
pub const DEFAULT_COMPILER_EXE: &str = "clspv";

/// Something that can run a program to completion and report its exit code.
///
/// `Ok(None)` means the process ended without an exit code (killed by a signal).
pub trait ProcessRunner {
    /// Run `program` with `args`, blocking until it exits.
    fn run(&mut self, program: &Path, args: &[OsString]) -> std::io::Result<Option<i32>>;
}

/// Runs programs with [`std::process::Command`], inheriting stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, program: &Path, args: &[OsString]) -> std::io::Result<Option<i32>> {
        let status = Command::new(program).args(args).status()?;
        Ok(status.code())
    }
}

/// A located compiler executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    exe: PathBuf,
}

impl Compiler {
    /// Use the executable at `exe`.
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// Locate the compiler as `$<var>/<exe_stem><EXE_SUFFIX>`.
    ///
    /// Fails only if `var` is unset; the value is used as an OS path, so it
    /// need not be unicode. The executable itself is not checked for
    /// existence here; a missing compiler shows up as a failed invocation.
    pub fn from_env(var: &str, exe_stem: &str) -> Result<Self, RefreshError> {
        let dir = std::env::var_os(var)
            .map(PathBuf::from)
            .ok_or_else(|| RefreshError::MissingEnv { var: var.to_string() })?;
        Ok(Self::in_dir(&dir, exe_stem))
    }

    /// Locate the compiler as `<dir>/<exe_stem><EXE_SUFFIX>`.
    pub fn in_dir(dir: &Path, exe_stem: &str) -> Self {
        Self::new(dir.join(exe_file_name(exe_stem)))
    }

    /// Path of the compiler executable.
    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Arguments for compiling `src` to a SPIR-V binary at `out`.
    pub fn binary_args(src: &Path, out: &Path) -> Vec<OsString> {
        vec![src.into(), "-o".into(), out.into()]
    }

    /// Arguments for emitting the SPIR-V disassembly of `src` to `out`.
    pub fn disassembly_args(src: &Path, out: &Path) -> Vec<OsString> {
        vec!["-S".into(), src.into(), "-o".into(), out.into()]
    }

    /// Compile `src` to `out`.
    pub fn compile_binary<R: ProcessRunner>(
        &self,
        runner: &mut R,
        src: &Path,
        out: &Path,
    ) -> CompileStatus {
        self.invoke(runner, &Self::binary_args(src, out))
    }

    /// Disassemble `src` to `out`.
    pub fn compile_disassembly<R: ProcessRunner>(
        &self,
        runner: &mut R,
        src: &Path,
        out: &Path,
    ) -> CompileStatus {
        self.invoke(runner, &Self::disassembly_args(src, out))
    }

    fn invoke<R: ProcessRunner>(&self, runner: &mut R, args: &[OsString]) -> CompileStatus {
        log::debug!("running {} {}", self.exe.display(), display_args(args));
        match runner.run(&self.exe, args) {
            Ok(Some(0)) => CompileStatus::Success,
            Ok(code) => {
                log::debug!("{} exited with {:?}", self.exe.display(), code);
                CompileStatus::Failed
            }
            Err(e) => {
                log::warn!("could not run {}: {}", self.exe.display(), e);
                CompileStatus::Failed
            }
        }
    }
}

fn exe_file_name(stem: &str) -> OsString {
    let mut name = OsString::from(stem);
    if !std::env::consts::EXE_SUFFIX.is_empty()
        && !stem.ends_with(std::env::consts::EXE_SUFFIX)
    {
        name.push(std::env::consts::EXE_SUFFIX);
    }
    name
}

fn display_args(args: &[OsString]) -> String {
    args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
}

/// Turn a list of string-like values into owned `OsString`s.
pub fn os_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Runner that replays a fixed list of results.
    struct Scripted(Vec<std::io::Result<Option<i32>>>);

    impl ProcessRunner for Scripted {
        fn run(&mut self, _program: &Path, _args: &[OsString]) -> std::io::Result<Option<i32>> {
            self.0.remove(0)
        }
    }

    #[test]
    fn test_binary_args_shape() {
        let args = Compiler::binary_args(Path::new("a.cl"), Path::new("a.spv"));
        assert_eq!(args, os_args(["a.cl", "-o", "a.spv"]));
    }

    #[test]
    fn test_disassembly_args_shape() {
        let args = Compiler::disassembly_args(Path::new("a.cl"), Path::new("a.spvasm"));
        assert_eq!(args, os_args(["-S", "a.cl", "-o", "a.spvasm"]));
    }

    #[test]
    fn test_exit_codes_map_to_status() {
        let compiler = Compiler::new("/bin/clspv");
        let mut runner = Scripted(vec![
            Ok(Some(0)),
            Ok(Some(1)),
            Ok(None),
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found")),
        ]);
        let src = Path::new("a.cl");
        let out = Path::new("a.spv");
        assert_eq!(compiler.compile_binary(&mut runner, src, out), CompileStatus::Success);
        assert_eq!(compiler.compile_binary(&mut runner, src, out), CompileStatus::Failed);
        assert_eq!(compiler.compile_disassembly(&mut runner, src, out), CompileStatus::Failed);
        assert_eq!(compiler.compile_disassembly(&mut runner, src, out), CompileStatus::Failed);
    }

    #[test]
    fn test_in_dir_appends_platform_suffix() {
        let compiler = Compiler::in_dir(Path::new("/sdk/bin"), "clspv");
        let expected = format!("clspv{}", std::env::consts::EXE_SUFFIX);
        assert_eq!(compiler.exe(), Path::new("/sdk/bin").join(expected));
    }

    #[test]
    fn test_in_dir_keeps_existing_suffix() {
        let stem = format!("clspv{}", std::env::consts::EXE_SUFFIX);
        let compiler = Compiler::in_dir(Path::new("/sdk/bin"), &stem);
        assert_eq!(compiler.exe(), Path::new("/sdk/bin").join(&stem));
    }

    #[test]
    #[serial]
    fn test_from_env_missing_variable() {
        std::env::remove_var("SHADER_REFRESH_TEST_MISSING");
        let result = Compiler::from_env("SHADER_REFRESH_TEST_MISSING", "clspv");
        match result {
            Err(RefreshError::MissingEnv { var, .. }) => {
                assert_eq!(var, "SHADER_REFRESH_TEST_MISSING")
            }
            other => panic!("expected MissingEnv, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_joins_directory() {
        std::env::set_var("SHADER_REFRESH_TEST_DIR", "/opt/clspv/bin");
        let compiler = Compiler::from_env("SHADER_REFRESH_TEST_DIR", "clspv")
            .expect("variable is set");
        std::env::remove_var("SHADER_REFRESH_TEST_DIR");
        assert!(compiler.exe().starts_with("/opt/clspv/bin"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_from_env_accepts_non_unicode_directory() {
        use std::os::unix::ffi::OsStrExt;

        let dir = OsStr::from_bytes(b"/opt/cl\xffspv");
        std::env::set_var("SHADER_REFRESH_TEST_RAW_DIR", dir);
        let result = Compiler::from_env("SHADER_REFRESH_TEST_RAW_DIR", "clspv");
        std::env::remove_var("SHADER_REFRESH_TEST_RAW_DIR");

        let compiler = result.expect("a non-unicode directory is still a valid path");
        assert!(compiler.exe().starts_with(Path::new(dir)));
        assert_eq!(compiler.exe().parent(), Some(Path::new(dir)));
    }

    #[test]
    #[serial]
    fn test_from_env_empty_value_is_set() {
        std::env::set_var("SHADER_REFRESH_TEST_EMPTY", "");
        let result = Compiler::from_env("SHADER_REFRESH_TEST_EMPTY", "clspv");
        std::env::remove_var("SHADER_REFRESH_TEST_EMPTY");
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let mut runner = SystemRunner;
        let code = runner
            .run(Path::new("/bin/sh"), &os_args(["-c", "exit 3"]))
            .expect("sh should be runnable");
        assert_eq!(code, Some(3));
    }
}
