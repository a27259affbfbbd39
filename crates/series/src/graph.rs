use crate::named::{NamedSeries, SeriesSet};
use crate::scale::Autoscaler;
use meter_core::Result;
use std::time::Duration;

/// Which series get a translucent fill under their line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Only the first registered series.
    #[default]
    FirstOnly,
    /// Every series (stacked memory graph).
    All,
}

/// Graph settings, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub update_interval: Duration,
    pub autoscale:       bool,
    /// Divisor when `autoscale` is off.
    pub fixed_max:       f64,
    pub units:           String,
    pub show_max_label:  bool,
    pub fill_policy:     FillPolicy,
    pub width_px:        u32,
    pub height_px:       u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(250),
            autoscale:       true,
            fixed_max:       0.0,
            units:           String::new(),
            show_max_label:  true,
            fill_policy:     FillPolicy::FirstOnly,
            width_px:        120,
            height_px:       24,
        }
    }
}

/// Horizontal marker drawn across a graph, in raw (unscaled) units.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub color: String,
}

/// Data behind one scrolling strip chart: named series sharing one scale.
#[derive(Debug, Clone)]
pub struct Graph {
    config:          GraphConfig,
    series:          SeriesSet<NamedSeries>,
    scale:           Autoscaler,
    reference_lines: Vec<ReferenceLine>,
    ready:           bool,
}

impl Graph {
    pub fn new(config: GraphConfig) -> Self {
        let scale = if config.autoscale {
            Autoscaler::autoscale(config.units.clone(), config.show_max_label)
        } else {
            Autoscaler::fixed(config.fixed_max, config.units.clone(), config.show_max_label)
        };

        Self {
            config,
            series: SeriesSet::new(),
            scale,
            reference_lines: Vec::new(),
            ready: true,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// One more sample than pixels, so the line spans the full width.
    pub fn capacity(&self) -> usize {
        self.config.width_px as usize + 1
    }

    /// Register a series. `color` is a palette class name.
    pub fn add_data_set(&mut self, name: &str, color: &str) -> Result<()> {
        let capacity = self.capacity();
        self.series.register(name, NamedSeries::new(name, color, capacity))
    }

    /// Append a raw value and refresh the shared scale.
    pub fn add_data_point(&mut self, name: &str, value: f64) -> Result<()> {
        self.series.get_mut(name)?.push(value);
        let maxima: Vec<f64> = self.series.iter().map(NamedSeries::running_max).collect();
        self.scale.observe(maxima);
        Ok(())
    }

    pub fn series(&self) -> &SeriesSet<NamedSeries> {
        &self.series
    }

    pub fn series_mut(&mut self, name: &str) -> Result<&mut NamedSeries> {
        self.series.get_mut(name)
    }

    pub fn scale(&self) -> &Autoscaler {
        &self.scale
    }

    /// Switch to a constant divisor.
    pub fn set_fixed_max(&mut self, max: f64) {
        self.config.autoscale = false;
        self.config.fixed_max = max;
        self.scale.set_fixed(max);
    }

    /// Formatted maximum for the overlay label.
    pub fn max_label(&self) -> Option<&str> {
        self.scale.label()
    }

    /// Window of `name` divided by the shared maximum.
    pub fn scaled(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.series.get(name)?.scaled(self.scale.shared_max()))
    }

    pub fn reference_lines(&self) -> &[ReferenceLine] {
        &self.reference_lines
    }

    pub fn set_reference_lines(&mut self, lines: Vec<ReferenceLine>) {
        self.reference_lines = lines;
    }

    /// Resize every window to a new pixel width.
    pub fn set_width(&mut self, width_px: u32) {
        self.config.width_px = width_px;
        let capacity = self.capacity();
        for series in self.series.iter_mut() {
            series.set_capacity(capacity);
        }
    }

    /// Drop all samples and release the autoscale ratchet.
    pub fn clear(&mut self) {
        for series in self.series.iter_mut() {
            series.clear();
        }
        self.scale.reset();
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn enable(&mut self) {
        self.ready = true;
    }

    pub fn disable(&mut self) {
        self.ready = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::MeterError;

    fn graph(autoscale: bool, width: u32) -> Graph {
        Graph::new(GraphConfig {
            autoscale,
            fixed_max: 100.0,
            width_px: width,
            ..GraphConfig::default()
        })
    }

    #[test]
    fn windows_hold_width_plus_one_samples() {
        let mut g = graph(true, 10);
        g.add_data_set("in", "network-in-color").unwrap();
        for i in 0..50 {
            g.add_data_point("in", i as f64).unwrap();
        }
        let s = g.series().get("in").unwrap();
        assert_eq!(s.len(), 11);
        assert_eq!(s.values().front(), Some(&39.0));
    }

    #[test]
    fn unknown_series_fails_fast() {
        let mut g = graph(true, 10);
        assert!(matches!(
            g.add_data_point("nope", 1.0),
            Err(MeterError::UnknownSeries(name)) if name == "nope"
        ));
    }

    #[test]
    fn scale_is_shared_across_series() {
        let mut g = graph(true, 10);
        g.add_data_set("in", "a").unwrap();
        g.add_data_set("out", "b").unwrap();
        g.add_data_point("in", 200.0).unwrap();
        g.add_data_point("out", 50.0).unwrap();

        assert_eq!(g.scaled("in").unwrap(), vec![1.0]);
        assert_eq!(g.scaled("out").unwrap(), vec![0.25]);
    }

    #[test]
    fn fixed_graph_scales_by_constant() {
        let mut g = graph(false, 10);
        g.add_data_set("cpu", "c").unwrap();
        g.add_data_point("cpu", 40.0).unwrap();
        assert_eq!(g.scaled("cpu").unwrap(), vec![0.4]);
        assert_eq!(g.scale().shared_max(), 100.0);
    }

    #[test]
    fn autoscale_holds_after_peak_is_evicted() {
        let mut g = graph(true, 1);
        g.add_data_set("in", "a").unwrap();
        for v in [10.0, 80.0, 5.0, 5.0, 5.0] {
            g.add_data_point("in", v).unwrap();
        }
        assert_eq!(g.series().get("in").unwrap().running_max(), 5.0);
        assert_eq!(g.scale().shared_max(), 80.0);

        g.clear();
        g.add_data_point("in", 5.0).unwrap();
        assert_eq!(g.scale().shared_max(), 5.0);
    }

    #[test]
    fn narrowing_truncates_oldest() {
        let mut g = graph(true, 10);
        g.add_data_set("in", "a").unwrap();
        for i in 0..11 {
            g.add_data_point("in", i as f64).unwrap();
        }
        g.set_width(2);
        let values: Vec<f64> = g.series().get("in").unwrap().values().iter().copied().collect();
        assert_eq!(values, vec![8.0, 9.0, 10.0]);
    }
}
