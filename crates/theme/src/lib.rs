pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::{ColorCache, StyleLookup};

use meter_config::MeterConfig;
use std::collections::HashMap;

/// Compiled theme derived from [`MeterConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible: invalid color strings are
/// skipped (or fall back to safe defaults) with a warning.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub opacity:    f32,
    palette:        HashMap<String, Color>,
}

impl Theme {
    /// Build a [`Theme`] from the settings file.
    pub fn from_config(cfg: &MeterConfig) -> Self {
        let palette = cfg
            .palette
            .iter()
            .filter_map(|(name, hex)| match Color::from_hex(hex) {
                Some(color) => Some((name.clone(), color)),
                None => {
                    tracing::warn!("Ignoring invalid palette color {name} = '{hex}'");
                    None
                }
            })
            .collect();

        Self {
            background: Color::from_hex(&cfg.panel.background).unwrap_or(Color::DARK),
            opacity:    cfg.panel.opacity.clamp(0.0, 1.0),
            palette,
        }
    }
}

impl StyleLookup for Theme {
    fn lookup_color(&self, name: &str) -> Option<Color> {
        self.palette.get(name).copied()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&MeterConfig::default())
    }
}
