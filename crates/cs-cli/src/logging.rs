use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use cs_core::CallScriptError;
use tracing::Level;

use crate::map_log_file;

/// Unparseable levels fall back to `warn`.
pub(crate) fn parse_level(raw: &str) -> Level {
    raw.trim().parse::<Level>().unwrap_or(Level::WARN)
}

/// Logs to stderr so stdout stays reserved for command output.
pub(crate) fn init_stderr_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Logs to `path`, used while the full-screen UI owns the terminal.
pub(crate) fn init_file_logging(level: &str, path: &Path) -> Result<(), CallScriptError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(map_log_file)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(map_log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod logging_tests {
    use super::*;

    #[test]
    fn parse_level_accepts_names_and_falls_back() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" INFO "), Level::INFO);
        assert_eq!(parse_level("loud"), Level::WARN);
        assert_eq!(parse_level(""), Level::WARN);
    }
}
