//! Watch mode for automatic refreshes on source changes
//!
//! Provides file system watching with debouncing for `shader-refresh --watch`.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::build::{ProcessRunner, RefreshOutcome, ShaderBuildStep};
use crate::config::WatchConfig;

/// Error during watch mode
#[derive(Debug)]
pub enum WatchError {
    /// Failed to initialize file watcher
    WatcherInit(notify::Error),
    /// Failed to add watch path
    WatchPath(notify::Error),
    /// Channel receive error
    ChannelError(String),
    /// Directory of the shader source not found
    SourceDirNotFound(PathBuf),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::WatcherInit(e) => write!(f, "Failed to initialize file watcher: {}", e),
            WatchError::WatchPath(e) => write!(f, "Failed to watch path: {}", e),
            WatchError::ChannelError(msg) => write!(f, "Watch channel error: {}", msg),
            WatchError::SourceDirNotFound(path) => {
                write!(f, "Shader directory not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for WatchError {}

/// Get current timestamp for logging
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400; // seconds since midnight
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Whether an event path refers to the watched source file.
///
/// Only the source's own directory is watched, so the file name is enough.
pub fn is_source_event(event_path: &Path, source: &Path) -> bool {
    match (event_path.file_name(), source.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Run the step once and print any error instead of returning it.
///
/// Returns the outcome when the step completed.
pub fn refresh_once<R: ProcessRunner, W: Write>(
    step: &mut ShaderBuildStep<R>,
    out: &mut W,
) -> Option<RefreshOutcome> {
    match step.run(out) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            eprintln!("[{}] Error: {}", timestamp(), e);
            None
        }
    }
}

/// React to one debounced batch of events.
///
/// Re-runs the step when any event touches the source. Status lines go to
/// `out`; watch progress lines go to `progress`. Returns whether the step ran.
pub fn handle_events<R: ProcessRunner, W: Write, L: Write>(
    step: &mut ShaderBuildStep<R>,
    events: &[DebouncedEvent],
    out: &mut W,
    progress: &mut L,
) -> bool {
    let source = step.paths().source.clone();
    let changed = events
        .iter()
        .any(|e| matches!(e.kind, DebouncedEventKind::Any) && is_source_event(&e.path, &source));
    if !changed {
        return false;
    }

    log::debug!("source change detected: {}", source.display());
    let _ = writeln!(progress, "[{}] Changed: {}", timestamp(), source.display());
    refresh_once(step, out);
    let _ = out.flush();
    let _ = writeln!(progress, "[{}] Watching {} for changes...", timestamp(), source.display());
    true
}

/// Watch the shader source and refresh on every change.
///
/// Runs the step once up front. Blocks until the watcher channel closes.
/// Only the step's status lines are written to stdout.
pub fn watch_and_refresh<R: ProcessRunner>(
    step: &mut ShaderBuildStep<R>,
    config: &WatchConfig,
) -> Result<(), WatchError> {
    let source = step.paths().source.clone();
    let watch_dir = source.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    if !watch_dir.is_dir() {
        return Err(WatchError::SourceDirNotFound(watch_dir));
    }

    let (tx, rx) = channel();
    let debounce_duration = Duration::from_millis(config.debounce_ms as u64);
    let mut debouncer = new_debouncer(debounce_duration, tx).map_err(WatchError::WatcherInit)?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(WatchError::WatchPath)?;

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    refresh_once(step, &mut stdout);
    let _ = stdout.flush();
    eprintln!("[{}] Watching {} for changes...", timestamp(), source.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                handle_events(step, &events, &mut stdout, &mut stderr);
            }
            Ok(Err(error)) => {
                // Watch error (non-fatal) - log but continue watching
                eprintln!("[{}] Watch error: {:?}", timestamp(), error);
            }
            Err(e) => {
                return Err(WatchError::ChannelError(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Compiler, ShaderPaths, MSG_MODIFIED};
    use std::ffi::OsString;
    use std::fs::{self, File};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    struct NeverRun;

    impl ProcessRunner for NeverRun {
        fn run(&mut self, program: &Path, _args: &[OsString]) -> std::io::Result<Option<i32>> {
            panic!("unexpected invocation of {}", program.display());
        }
    }

    /// Records invocations and writes the `-o` output like clspv.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Vec<OsString>>,
    }

    impl ProcessRunner for Recorder {
        fn run(&mut self, _program: &Path, args: &[OsString]) -> std::io::Result<Option<i32>> {
            self.calls.push(args.to_vec());
            if let Some(pos) = args.iter().position(|a| a == "-o") {
                fs::write(&args[pos + 1], b"compiled")?;
            }
            Ok(Some(0))
        }
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).expect("should open file");
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).expect("should set mtime");
    }

    /// A stale `SimpleCopy` shader in a temp resources dir.
    fn stale_step(temp: &TempDir) -> ShaderBuildStep<Recorder> {
        let paths = ShaderPaths::new(temp.path(), "SimpleCopy");
        fs::write(&paths.source, "kernel void copy() {}").expect("should write source");
        fs::write(&paths.binary, b"old").expect("should write binary");
        set_mtime(&paths.source, 2_000_000);
        set_mtime(&paths.binary, 1_000_000);
        ShaderBuildStep::with_runner(paths, Compiler::new("/sdk/clspv"), Recorder::default())
    }

    fn event(path: &Path) -> DebouncedEvent {
        DebouncedEvent { path: path.to_path_buf(), kind: DebouncedEventKind::Any }
    }

    #[test]
    fn test_is_source_event_matches_file_name() {
        let source = Path::new("/proj/bin/../resources/SimpleCopy.cl");
        assert!(is_source_event(Path::new("/proj/resources/SimpleCopy.cl"), source));
        assert!(!is_source_event(Path::new("/proj/resources/SimpleCopy.spv"), source));
        assert!(!is_source_event(Path::new("/"), source));
    }

    #[test]
    fn test_refresh_once_swallows_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let paths = ShaderPaths::new(temp.path(), "Missing");
        let mut step = ShaderBuildStep::with_runner(paths, Compiler::new("/sdk/clspv"), NeverRun);
        let mut out = Vec::new();
        assert!(refresh_once(&mut step, &mut out).is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn test_source_event_reruns_step() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut step = stale_step(&temp);
        let source = step.paths().source.clone();
        let (mut out, mut progress) = (Vec::new(), Vec::new());

        assert!(handle_events(&mut step, &[event(&source)], &mut out, &mut progress));

        assert_eq!(step.runner().calls.len(), 2);
        let text = String::from_utf8(out).expect("status output is utf-8");
        assert_eq!(text.lines().next(), Some(MSG_MODIFIED));
        assert_eq!(text.matches("Success!").count(), 2);

        let progress = String::from_utf8(progress).expect("progress output is utf-8");
        assert!(progress.contains("Changed: "));
        assert!(progress.contains("Watching "));
    }

    #[test]
    fn test_output_events_are_ignored() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut step = stale_step(&temp);
        let paths = step.paths().clone();
        let events = [event(&paths.binary), event(&paths.disassembly)];
        let (mut out, mut progress) = (Vec::new(), Vec::new());

        assert!(!handle_events(&mut step, &events, &mut out, &mut progress));
        assert!(step.runner().calls.is_empty());
        assert!(out.is_empty() && progress.is_empty());
    }

    #[test]
    fn test_continuous_events_are_ignored() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut step = stale_step(&temp);
        let source = step.paths().source.clone();
        let events =
            [DebouncedEvent { path: source, kind: DebouncedEventKind::AnyContinuous }];
        let (mut out, mut progress) = (Vec::new(), Vec::new());

        assert!(!handle_events(&mut step, &events, &mut out, &mut progress));
        assert!(step.runner().calls.is_empty());
    }

    #[test]
    fn test_error_does_not_stop_later_refreshes() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut step = stale_step(&temp);
        let paths = step.paths().clone();
        fs::remove_file(&paths.binary).expect("should remove binary");
        let (mut out, mut progress) = (Vec::new(), Vec::new());

        // Missing binary: the step errors and nothing is compiled
        assert!(handle_events(&mut step, &[event(&paths.source)], &mut out, &mut progress));
        assert!(step.runner().calls.is_empty());
        assert!(out.is_empty());

        fs::write(&paths.binary, b"old").expect("should restore binary");
        set_mtime(&paths.binary, 1_000_000);

        assert!(handle_events(&mut step, &[event(&paths.source)], &mut out, &mut progress));
        assert_eq!(step.runner().calls.len(), 2);
        assert!(paths.disassembly.exists());
    }

    #[test]
    fn test_watch_missing_directory() {
        let temp = TempDir::new().expect("should create temp dir");
        let paths = ShaderPaths::new(&temp.path().join("gone"), "SimpleCopy");
        let mut step = ShaderBuildStep::with_runner(paths, Compiler::new("/sdk/clspv"), NeverRun);
        let result = watch_and_refresh(&mut step, &WatchConfig::default());
        assert!(matches!(result, Err(WatchError::SourceDirNotFound(_))));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[5], b':');
    }
}
