//! Bootstrap logging settings with env-var and command-line overrides.
//!
//! Layered sources, increasing precedence: `appsettings.json` (required),
//! the `BESTMAN_LOG_LEVEL` variable, then `--log-level` on the command line.
//! The file is the only fatal one: the logger cannot start without it.

use std::{env, fs, path::Path};

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::{error::AppError, identity::flag_value, logger};

/// Environment variable overriding the configured console level.
pub const LOG_LEVEL_VAR: &str = "BESTMAN_LOG_LEVEL";

/// Command-line flag overriding both the file and the variable.
pub const LOG_LEVEL_FLAG: &str = "--log-level";

/// Resolved logger settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Minimum console severity; seeds the shared level switch.
    pub min_level: LevelFilter,
}

/// Raw `appsettings.json` shape.
#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Deserialize)]
struct RawLogging {
    #[serde(rename = "minLevel", default = "default_min_level")]
    min_level: String,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            min_level: default_min_level(),
        }
    }
}

fn default_min_level() -> String {
    "info".to_string()
}

/// Load settings from `path`, then apply env-var and argument overrides.
pub fn load(path: &Path, args: &[String]) -> Result<LogSettings, AppError> {
    let env_override = env::var(LOG_LEVEL_VAR).ok();
    load_from(path, args, env_override.as_deref())
}

/// Internal loader. Tests pass the env override directly instead of
/// mutating process state.
pub fn load_from(
    path: &Path,
    args: &[String],
    env_override: Option<&str>,
) -> Result<LogSettings, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawSettings = serde_json::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let level = flag_value(args, LOG_LEVEL_FLAG)
        .or_else(|| env_override.map(str::to_string))
        .unwrap_or(parsed.logging.min_level);

    Ok(LogSettings {
        min_level: logger::parse_level(&level)?,
    })
}
