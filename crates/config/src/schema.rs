use meter_core::Settings;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure parsed from `vuemeter.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MeterConfig {
    /// Mirror log output into `<cache-dir>/vuemeter/debug.log`.
    pub debug_mode: bool,
    /// Draw the tracked maxima as lines in the network graph.
    pub show_max_lines: bool,
    /// Show the memory graph in stacked (used / buffer / cache) format.
    pub mem_stack: bool,
    /// Network rates in bits per second (`false` = bytes per second).
    pub bits_per_second: bool,

    pub panel: PanelConfig,
    pub indicators: IndicatorsConfig,
    pub graph: GraphSection,
    pub bars: BarsSection,
    /// Named colors (class name → hex), e.g. `"cpu-sys-color" = "#ff1414"`.
    pub palette: BTreeMap<String, String>,

    // ── Deprecated keys ───────────────────────────────────────────────────────
    // Still accepted so old files parse; `migrate()` drops them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_menu_gpu: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_menu_gpu_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_height: Option<toml::Value>,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            debug_mode:      false,
            show_max_lines:  false,
            mem_stack:       false,
            bits_per_second: true,
            panel:           PanelConfig::default(),
            indicators:      IndicatorsConfig::default(),
            graph:           GraphSection::default(),
            bars:            BarsSection::default(),
            palette:         default_palette(),
            processor_menu_gpu:       None,
            processor_menu_gpu_color: None,
            headers_height:           None,
        }
    }
}

impl MeterConfig {
    /// Settings snapshot handed to the indicators.
    pub fn settings(&self) -> Settings {
        Settings {
            debug_mode:      self.debug_mode,
            show_max_lines:  self.show_max_lines,
            mem_stack:       self.mem_stack,
            bits_per_second: self.bits_per_second,
        }
    }

    /// Drop deprecated keys. Returns the names of the keys that were present.
    pub fn migrate(&mut self) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        if self.processor_menu_gpu.take().is_some() {
            dropped.push("processor-menu-gpu");
        }
        if self.processor_menu_gpu_color.take().is_some() {
            dropped.push("processor-menu-gpu-color");
        }
        if self.headers_height.take().is_some() {
            dropped.push("headers-height");
        }
        for key in &dropped {
            tracing::warn!("Ignoring deprecated setting '{key}'");
        }
        dropped
    }
}

/// Panel surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PanelConfig {
    /// Panel height in logical pixels.
    pub height: u32,
    /// Whether the panel sits at the top or the bottom.
    pub position: Position,
    /// Reserve an exclusive zone so windows don't overlap the panel.
    pub exclusive_zone: bool,
    /// Background opacity (0.0 – 1.0).
    pub opacity: f32,
    /// Display scale factor applied to bar geometry.
    pub scale_factor: f32,
    /// Background color (hex).
    pub background: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            height:         28,
            position:       Position::Top,
            exclusive_zone: true,
            opacity:        0.95,
            scale_factor:   1.0,
            background:     "#1e1e2e".to_string(),
        }
    }
}

/// Panel position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

/// Per-indicator switches and sampling intervals.
///
/// Each table may be partial; missing keys keep that indicator's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorsConfig {
    #[serde(deserialize_with = "cpu_indicator")]
    pub cpu:     IndicatorConfig,
    #[serde(deserialize_with = "memory_indicator")]
    pub memory:  IndicatorConfig,
    #[serde(deserialize_with = "swap_indicator")]
    pub swap:    IndicatorConfig,
    #[serde(deserialize_with = "network_indicator")]
    pub network: IndicatorConfig,
}

const CPU_INTERVAL_MS: u64 = 250;
const MEMORY_INTERVAL_MS: u64 = 1_000;
const SWAP_INTERVAL_MS: u64 = 2_000;
const NETWORK_INTERVAL_MS: u64 = 250;

impl Default for IndicatorsConfig {
    fn default() -> Self {
        Self {
            cpu:     IndicatorConfig::every(CPU_INTERVAL_MS),
            memory:  IndicatorConfig::every(MEMORY_INTERVAL_MS),
            swap:    IndicatorConfig::every(SWAP_INTERVAL_MS),
            network: IndicatorConfig::every(NETWORK_INTERVAL_MS),
        }
    }
}

/// The keys a user may set in one `[indicators.*]` table.
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct IndicatorOverrides {
    enabled:     Option<bool>,
    interval_ms: Option<u64>,
}

impl IndicatorOverrides {
    fn over(self, base: IndicatorConfig) -> IndicatorConfig {
        IndicatorConfig {
            enabled:     self.enabled.unwrap_or(base.enabled),
            interval_ms: self.interval_ms.unwrap_or(base.interval_ms),
        }
    }
}

fn indicator_with<'de, D>(de: D, interval_ms: u64) -> Result<IndicatorConfig, D::Error>
where
    D: Deserializer<'de>,
{
    IndicatorOverrides::deserialize(de).map(|o| o.over(IndicatorConfig::every(interval_ms)))
}

fn cpu_indicator<'de, D: Deserializer<'de>>(de: D) -> Result<IndicatorConfig, D::Error> {
    indicator_with(de, CPU_INTERVAL_MS)
}

fn memory_indicator<'de, D: Deserializer<'de>>(de: D) -> Result<IndicatorConfig, D::Error> {
    indicator_with(de, MEMORY_INTERVAL_MS)
}

fn swap_indicator<'de, D: Deserializer<'de>>(de: D) -> Result<IndicatorConfig, D::Error> {
    indicator_with(de, SWAP_INTERVAL_MS)
}

fn network_indicator<'de, D: Deserializer<'de>>(de: D) -> Result<IndicatorConfig, D::Error> {
    indicator_with(de, NETWORK_INTERVAL_MS)
}

impl IndicatorsConfig {
    /// Settings of the indicator with the given id, if any.
    pub fn get(&self, id: &str) -> Option<&IndicatorConfig> {
        match id {
            "cpu" => Some(&self.cpu),
            "memory" => Some(&self.memory),
            "swap" => Some(&self.swap),
            "network" => Some(&self.network),
            _ => None,
        }
    }

    /// Which indicators are switched on, in panel order.
    pub fn enabled_set(&self) -> [bool; 4] {
        [self.cpu.enabled, self.memory.enabled, self.swap.enabled, self.network.enabled]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndicatorConfig {
    pub enabled: bool,
    /// Sampling period in milliseconds.
    pub interval_ms: u64,
}

impl IndicatorConfig {
    pub const fn every(interval_ms: u64) -> Self {
        Self {
            enabled: true,
            interval_ms,
        }
    }
}

/// Strip chart dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    pub width:  u32,
    pub height: u32,
}

impl Default for GraphSection {
    fn default() -> Self {
        Self { width: 120, height: 24 }
    }
}

/// Bar indicator geometry, in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarsSection {
    pub width:   f32,
    pub padding: f32,
}

impl Default for BarsSection {
    fn default() -> Self {
        Self { width: 6.0, padding: 1.0 }
    }
}

/// Built-in color classes.
pub fn default_palette() -> BTreeMap<String, String> {
    [
        ("grid-color",           "#57575799"),
        ("label-color",          "#cdd6f4"),
        ("cpu-user-color",       "#0ad80a"),
        ("cpu-sys-color",        "#ff1414"),
        ("cpu-total-color",      "#003e9a"),
        ("mem-used-color",       "#00bcf0"),
        ("mem-buffer-color",     "#f0c000"),
        ("mem-cached-color",     "#8a8a8a"),
        ("swap-used-color",      "#00bcf0"),
        ("swap-used-warn-color", "#f0a000"),
        ("swap-used-bad-color",  "#ff1414"),
        ("network-ok-color",     "#0ad80a"),
        ("network-bad-color",    "#ff1414"),
        ("network-in-color",     "#0ad80a"),
        ("network-out-color",    "#ff1414"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
