//! Runtime configuration read once from `OBESCAN_*` environment variables.

use std::path::PathBuf;

const ARTIFACT_DIR_ENV: &str = "OBESCAN_ARTIFACT_DIR";
const REQUIRE_MANIFEST_ENV: &str = "OBESCAN_REQUIRE_MANIFEST";
const HISTORY_LIMIT_ENV: &str = "OBESCAN_HISTORY_LIMIT";
const LOG_MODE_ENV: &str = "OBESCAN_LOG_MODE";
const LOG_FILE_ENV: &str = "OBESCAN_LOG_FILE";

const DEFAULT_ARTIFACT_DIR: &str = "models";
const DEFAULT_HISTORY_LIMIT: usize = 50;
const DEFAULT_LOG_FILE: &str = "obescan.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "file" => Some(Self::File),
            "stdout" => Some(Self::Stdout),
            _ => None,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn uses_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub require_manifest: bool,
    /// Number of recent predictions shown in the history view.
    pub history_limit: usize,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Ignored settings, kept until the subscriber exists to report them.
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            require_manifest: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            warnings: Vec::new(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or
    /// unparsable values fall back to defaults; each unparsable value adds
    /// an entry to `warnings`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let history_limit = match lookup(HISTORY_LIMIT_ENV) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warnings.push(format!(
                        "Ignoring {HISTORY_LIMIT_ENV}={raw:?}; using {DEFAULT_HISTORY_LIMIT}"
                    ));
                    DEFAULT_HISTORY_LIMIT
                }
            },
            None => defaults.history_limit,
        };

        let log_mode = match lookup(LOG_MODE_ENV) {
            Some(raw) => LogMode::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!("Ignoring {LOG_MODE_ENV}={raw:?}; using auto"));
                LogMode::Auto
            }),
            None => defaults.log_mode,
        };

        Self {
            artifact_dir: lookup(ARTIFACT_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.artifact_dir, PathBuf::from),
            require_manifest: lookup(REQUIRE_MANIFEST_ENV).is_some_and(|v| parse_bool(&v)),
            history_limit,
            log_mode,
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.log_file, PathBuf::from),
            warnings,
        }
    }
}
