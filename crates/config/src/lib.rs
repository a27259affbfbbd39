pub mod schema;
pub mod watcher;

pub use schema::{
    BarsSection, GraphSection, IndicatorConfig, IndicatorsConfig, MeterConfig, PanelConfig,
    Position,
};
pub use watcher::ConfigWatcher;

use meter_core::{MeterError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MeterConfig::default()` if
/// the file doesn't exist so the panel always has sensible defaults.
///
/// Deprecated keys are dropped with a warning. Palette entries in the file
/// extend the built-in palette rather than replacing it.
pub fn load(path: impl AsRef<Path>) -> Result<MeterConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MeterConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MeterError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse a config document (see [`load`]).
pub fn parse(raw: &str) -> Result<MeterConfig> {
    let mut config: MeterConfig =
        toml::from_str(raw).map_err(|e| MeterError::Config(format!("TOML parse error: {e}")))?;

    config.migrate();

    let mut palette = schema::default_palette();
    palette.append(&mut config.palette);
    config.palette = palette;

    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vuemeter").join("vuemeter.toml")
}
