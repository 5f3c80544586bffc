//! Runtime configuration.
//!
//! Precedence, highest first:
//! 1. command-line flags
//! 2. config file (`callscript.json` or `--config`)
//! 3. defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cs_core::{CallScriptError, DEFAULT_CALLER_NAME};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{map_config_invalid, map_config_read};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "callscript.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CliConfig {
    /// Value of `[YN]` for new sessions.
    #[serde(default = "default_caller_name")]
    pub(crate) caller_name: String,

    #[serde(default = "default_state_dir")]
    pub(crate) state_dir: PathBuf,

    /// JSON-lines file receiving saved call notes. Lives under `stateDir` when unset.
    #[serde(default)]
    pub(crate) activity_log: Option<PathBuf>,

    #[serde(default = "default_ring_delay_ms")]
    pub(crate) ring_delay_ms: u64,

    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,

    /// Replacement for the embedded sales script.
    #[serde(default)]
    pub(crate) script_file: Option<PathBuf>,
}

fn default_caller_name() -> String {
    DEFAULT_CALLER_NAME.to_string()
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".callscript")
}

fn default_ring_delay_ms() -> u64 {
    cs_runtime::DIAL_RING_DELAY.as_millis() as u64
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            caller_name: default_caller_name(),
            state_dir: default_state_dir(),
            activity_log: None,
            ring_delay_ms: default_ring_delay_ms(),
            log_level: default_log_level(),
            script_file: None,
        }
    }
}

impl CliConfig {
    /// Reads the config file.
    ///
    /// An explicit path must exist. The default file is optional and its
    /// absence yields the defaults.
    pub(crate) fn load(explicit: Option<&str>) -> Result<Self, CallScriptError> {
        let path = match explicit {
            Some(path) => PathBuf::from(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        if !path.exists() {
            return Err(CallScriptError::new(
                "CONFIG_NOT_FOUND",
                format!("Config file does not exist: {}", path.display()),
            ));
        }
        Self::load_from(&path)
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self, CallScriptError> {
        let raw = fs::read_to_string(path).map_err(map_config_read)?;
        let config: CliConfig = serde_json::from_str(&raw).map_err(map_config_invalid)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub(crate) fn with_log_level(mut self, level: Option<&str>) -> Self {
        if let Some(level) = level {
            self.log_level = level.to_string();
        }
        self
    }

    pub(crate) fn activity_log_path(&self) -> PathBuf {
        self.activity_log
            .clone()
            .unwrap_or_else(|| self.state_dir.join("activities.jsonl"))
    }

    pub(crate) fn default_state_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }

    pub(crate) fn log_file(&self) -> PathBuf {
        self.state_dir.join("cs-cli.log")
    }

    pub(crate) fn ring_delay(&self) -> Duration {
        Duration::from_millis(self.ring_delay_ms)
    }

    /// Custom script JSON, or `None` for the embedded script.
    pub(crate) fn script_json(&self) -> Result<Option<String>, CallScriptError> {
        let Some(path) = &self.script_file else {
            return Ok(None);
        };
        fs::read_to_string(path).map(Some).map_err(|error| {
            CallScriptError::new(
                "SCRIPT_READ",
                format!("Failed to read call script \"{}\": {}", path.display(), error),
            )
        })
    }
}
