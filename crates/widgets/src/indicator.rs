use crate::scheduler::SampleScheduler;
use meter_core::{MeterWidget, Result, RuntimeContext, Scheduler, TimerToken, Visibility};
use meter_renderer::{BarGeometry, GRID_COLOR};
use meter_series::{BarSet, Graph, GraphConfig, StatValues};
use meter_theme::{Color, ColorCache, StyleLookup};
use std::time::Duration;

pub const LABEL_COLOR: &str = "label-color";

/// Per-indicator construction options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorOptions {
    pub interval:     Duration,
    pub bar_width:    f64,
    pub bar_padding:  f64,
    pub scale_factor: f64,
    pub graph_width:  u32,
    pub graph_height: u32,
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self {
            interval:     crate::scheduler::DEFAULT_INTERVAL,
            bar_width:    6.0,
            bar_padding:  1.0,
            scale_factor: 1.0,
            graph_width:  120,
            graph_height: 24,
        }
    }
}

impl IndicatorOptions {
    pub fn graph(&self) -> GraphConfig {
        GraphConfig {
            update_interval: self.interval,
            width_px: self.graph_width,
            height_px: self.graph_height,
            ..GraphConfig::default()
        }
    }
}

/// Everything one indicator owns: bars, strip chart, sampling timer,
/// resolved colors and text labels. Drawing happens elsewhere from this data.
#[derive(Debug)]
pub struct Indicator {
    name:         String,
    bars:         BarSet,
    graph:        Graph,
    schedule:     SampleScheduler,
    colors:       ColorCache,
    geometry:     BarGeometry,
    visibility:   Visibility,
    labels:       Vec<(String, String)>,
    needs_redraw: bool,
}

impl Indicator {
    pub fn new(name: impl Into<String>, options: &IndicatorOptions, graph: GraphConfig) -> Self {
        let name = name.into();
        Self {
            schedule: SampleScheduler::new(name.clone(), options.interval),
            name,
            bars: BarSet::new(),
            graph: Graph::new(graph),
            colors: ColorCache::new(),
            geometry: BarGeometry::scaled(options.bar_width, options.bar_padding, options.scale_factor),
            visibility: Visibility::SHOWN,
            labels: Vec::new(),
            needs_redraw: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bars(&self) -> &BarSet {
        &self.bars
    }

    pub fn bars_mut(&mut self) -> &mut BarSet {
        &mut self.bars
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn schedule(&self) -> &SampleScheduler {
        &self.schedule
    }

    pub fn colors(&self) -> &ColorCache {
        &self.colors
    }

    pub fn geometry(&self) -> BarGeometry {
        self.geometry
    }

    /// Panel width taken by the bars.
    pub fn width(&self) -> f64 {
        self.geometry.indicator_width(self.bars.len())
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.visibility != visibility {
            self.visibility = visibility;
            self.needs_redraw = true;
        }
    }

    pub fn add_bar(&mut self, name: &str, color: &str) -> Result<()> {
        self.bars.add_data_set(name, color)
    }

    pub fn add_bar_point(&mut self, name: &str, value: StatValues) -> Result<()> {
        self.bars.add_data_point(name, value)
    }

    /// Description/value pairs in insertion order.
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }

    pub fn label(&self, description: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(d, _)| d == description)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_label(&mut self, description: &str, value: String) {
        match self.labels.iter_mut().find(|(d, _)| d == description) {
            Some((_, v)) => *v = value,
            None => self.labels.push((description.to_string(), value)),
        }
    }

    /// Resolve every color class currently in use. Cached classes are not
    /// looked up again, so this is cheap to call after each sample.
    pub fn prepare_colors(&mut self, lookup: &dyn StyleLookup) {
        let mut classes: Vec<String> = vec![GRID_COLOR.to_string(), LABEL_COLOR.to_string()];
        for bar in self.bars.iter() {
            classes.push(bar.color().to_string());
            if let Some(latest) = bar.latest() {
                classes.extend(latest.values.iter().map(|v| v.color.clone()));
            }
        }
        classes.extend(self.graph.series().iter().map(|s| s.color().to_string()));
        classes.extend(self.graph.reference_lines().iter().map(|l| l.color.clone()));

        for class in classes {
            self.colors.resolve(lookup, &class, Color::DEFAULT_STATS);
        }
    }

    /// Drop cached colors after a style change.
    pub fn invalidate_styles(&mut self) {
        self.colors.invalidate();
        self.needs_redraw = true;
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Returns and clears the pending-redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn enable(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.schedule.enable(scheduler)?;
        self.graph.enable();
        Ok(())
    }

    pub fn disable(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.schedule.disable(scheduler)?;
        self.graph.disable();
        Ok(())
    }

    pub fn destroy(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.graph.disable();
        self.schedule.destroy(scheduler)
    }

    pub fn set_interval(&mut self, scheduler: &mut dyn Scheduler, interval: Duration) -> Result<()> {
        self.schedule.set_interval(scheduler, interval)
    }
}

/// A panel indicator: [`MeterWidget`] sampling on top of an [`Indicator`].
pub trait Monitor: MeterWidget {
    fn indicator(&self) -> &Indicator;
    fn indicator_mut(&mut self) -> &mut Indicator;

    fn enable(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.indicator_mut().enable(scheduler)
    }

    fn disable(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.indicator_mut().disable(scheduler)
    }

    fn destroy(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.indicator_mut().destroy(scheduler)
    }

    /// Settings changed; indicators with setting-dependent layout override this.
    fn apply_settings(&mut self, _ctx: &RuntimeContext) -> Result<()> {
        Ok(())
    }

    /// Sample once if `token` is this indicator's timer.
    /// Returns whether the tick was consumed.
    fn handle_tick(&mut self, token: TimerToken, ctx: &RuntimeContext) -> Result<bool> {
        if !self.indicator().schedule().owns(token) {
            return Ok(false);
        }
        self.update_values(ctx)?;
        self.indicator_mut().request_redraw();
        Ok(true)
    }
}
