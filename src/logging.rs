//! Tracing configuration and log routing.
//!
//! Console output is compact and unprefixed by target. The HTTP server writes it to stdout; the
//! MCP binary owns stdout for protocol frames and writes to stderr instead. Both servers also
//! append to a log file: `RUSTY_LINK_LOG_FILE` when set, else `logs/rusty-link.log`. The admin
//! CLI only reports warnings and errors on stderr and never touches the log file.
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "RUSTY_LINK_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "logs/rusty-link.log";
const SERVER_DEFAULT_LEVEL: &str = "info";
const CLI_DEFAULT_LEVEL: &str = "warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where console output should go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output (HTTP server).
    Stdout,
    /// Standard error (stdio transports that reserve stdout).
    Stderr,
}

/// Install tracing with console output on stdout.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`; invalid directives fall back).
/// - Keeps the non‑blocking file writer alive through a process-wide guard.
pub fn init_tracing() {
    init_tracing_with(ConsoleTarget::Stdout);
}

/// Same as [`init_tracing`] but with an explicit console target.
pub fn init_tracing_with(console: ConsoleTarget) {
    install(console, SERVER_DEFAULT_LEVEL, true);
}

/// Tracing for one-shot commands: stderr only, `warn` unless `RUST_LOG` says otherwise.
pub fn init_cli_tracing() {
    install(ConsoleTarget::Stderr, CLI_DEFAULT_LEVEL, false);
}

fn install(console: ConsoleTarget, default_level: &str, with_file: bool) {
    let env_filter = build_filter(std::env::var("RUST_LOG").ok(), default_level);
    let console_layer = match console {
        ConsoleTarget::Stdout => fmt::layer().with_target(false).compact().boxed(),
        ConsoleTarget::Stderr => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(false)
            .compact()
            .boxed(),
    };
    let file_writer = if with_file {
        open_log_file(&log_file_path())
    } else {
        None
    };
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if let Err(err) = installed {
        eprintln!("Tracing already initialized: {err}");
    }
}

fn build_filter(configured: Option<String>, default_level: &str) -> EnvFilter {
    configured
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

fn log_file_path() -> PathBuf {
    resolve_log_file(std::env::var(LOG_FILE_ENV).ok())
}

fn resolve_log_file(configured: Option<String>) -> PathBuf {
    configured
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Open `path` for appending behind a non‑blocking writer.
///
/// Returns `None` (console logging only) when the file or its directory cannot be created.
fn open_log_file(path: &Path) -> Option<NonBlocking> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {err}", parent.display());
            return None;
        }
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_falls_back_to_profile_level() {
        assert_eq!(build_filter(None, CLI_DEFAULT_LEVEL).to_string(), "warn");
        assert_eq!(build_filter(None, SERVER_DEFAULT_LEVEL).to_string(), "info");
        assert_eq!(
            build_filter(Some("debug".into()), CLI_DEFAULT_LEVEL).to_string(),
            "debug"
        );
    }

    #[test]
    fn log_file_defaults_when_unset_or_blank() {
        assert_eq!(resolve_log_file(None), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(
            resolve_log_file(Some("  ".into())),
            PathBuf::from(DEFAULT_LOG_FILE)
        );
        assert_eq!(
            resolve_log_file(Some("/var/log/links.log".into())),
            PathBuf::from("/var/log/links.log")
        );
    }

    #[test]
    fn open_log_file_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("links.log");
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }
}
