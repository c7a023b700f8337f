//! CLI command implementations.

pub mod config;
pub mod describe;
pub mod eval;
pub mod list;

pub use config::ConfigArgs;
pub use describe::DescribeArgs;
pub use eval::EvalArgs;
pub use list::ListArgs;

use std::path::{Path, PathBuf};

use anyhow::Result;
use fincalc_config::EngineConfig;
use fincalc_core::RawValue;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Parses a `key=value` input. Numbers and `true`/`false` are typed; anything
/// else is passed through as text for the engine to interpret.
pub fn parse_input(s: &str) -> CliResult<(String, RawValue)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| CliError::InvalidInput(s.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidInput(s.to_string()));
    }

    let value = value.trim();
    let raw = match value {
        "true" => RawValue::Bool(true),
        "false" => RawValue::Bool(false),
        _ => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or_else(|| RawValue::from(value), RawValue::Number),
    };
    Ok((key.to_string(), raw))
}

/// The default configuration file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("fincalc").join("config.toml"))
}

/// Loads the engine configuration and fixes the reference year.
///
/// An explicit path must exist. Without one, the default location is used if
/// present, otherwise built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    let config = match explicit {
        Some(path) => EngineConfig::load(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        },
    };
    let config = config.resolve_current_year();
    debug!(current_year = ?config.current_year(), "engine configuration loaded");
    Ok(config)
}
