use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

const SETTINGS_VAR: &str = "GDBGUI_SETTINGS";
const STARTUP_TIMEOUT_VAR: &str = "GDBGUI_STARTUP_TIMEOUT_MS";
const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("GDBGUI_STARTUP_TIMEOUT_MS must be a number of milliseconds, got \"{0}\"")]
    StartupTimeout(String),
}

/// Process-level options read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) settings_path: PathBuf,
    pub(crate) startup_timeout: Duration,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let startup_timeout = match non_empty(&lookup, STARTUP_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) => Duration::from_millis(millis),
                Err(_) => return Err(ConfigError::StartupTimeout(raw)),
            },
            None => DEFAULT_STARTUP_TIMEOUT,
        };

        Ok(Self {
            settings_path: settings_path(&lookup),
            startup_timeout,
        })
    }
}

fn settings_path(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = non_empty(lookup, SETTINGS_VAR) {
        return PathBuf::from(path);
    }

    if let Some(config_home) = non_empty(lookup, "XDG_CONFIG_HOME") {
        return Path::new(&config_home)
            .join("gdbgui")
            .join("settings.json");
    }

    if let Some(home) = non_empty(lookup, "HOME") {
        return Path::new(&home)
            .join(".config")
            .join("gdbgui")
            .join("settings.json");
    }

    std::env::temp_dir().join("gdbgui").join("settings.json")
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}
