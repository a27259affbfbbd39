use crate::indicator::{Indicator, IndicatorOptions, Monitor};
use meter_core::{MeterWidget, Result, RuntimeContext};
use meter_series::{format_metric_pretty, FillPolicy, Graph, GraphConfig, StatValue, StatValues};
use meter_system::{MemoryProvider, MemoryReading, MemorySource, MetricSource, SystemMemory};

const USED: &str = "mem-used";
const BUFFER: &str = "mem-buffer";
const CACHED: &str = "mem-cached";

/// Used memory as one bar, optionally stacked with buffers and cache.
#[derive(Debug)]
pub struct MemoryIndicator<P = SystemMemory> {
    indicator: Indicator,
    source:    MemorySource<P>,
    options:   IndicatorOptions,
    total:     u64,
    stacked:   bool,
}

impl<P: MemoryProvider> MemoryIndicator<P> {
    pub fn new(provider: P, options: &IndicatorOptions, ctx: &RuntimeContext) -> Result<Self> {
        let mut source = MemorySource::new(provider);
        let total = source.sample().total;
        let stacked = ctx.settings.mem_stack;

        let mut indicator = Indicator::new("memory", options, graph_config(options, total, stacked));
        indicator.add_bar(USED, "mem-used-color")?;
        add_series(indicator.graph_mut(), stacked)?;

        Ok(Self {
            indicator,
            source,
            options: *options,
            total,
            stacked,
        })
    }

    fn update_labels(&mut self, r: &MemoryReading) {
        let rows = [
            ("Total memory usage", r.used),
            ("Total buffer usage", r.buffer),
            ("Total shared usage", r.shared),
            ("Total cache usage", r.cached),
            ("Total user usage", r.user),
            ("Total locked usage", r.locked),
            ("Total free usage", r.free),
            ("Total RAM present", r.total),
        ];
        for (description, bytes) in rows {
            self.indicator
                .set_label(description, format_metric_pretty(bytes as f64, "B"));
        }
    }
}

fn graph_config(options: &IndicatorOptions, total: u64, stacked: bool) -> GraphConfig {
    GraphConfig {
        autoscale: false,
        fixed_max: total as f64,
        units: "B".into(),
        fill_policy: if stacked { FillPolicy::All } else { FillPolicy::FirstOnly },
        ..options.graph()
    }
}

/// Tallest band first so the smaller ones are painted over it.
fn add_series(graph: &mut Graph, stacked: bool) -> Result<()> {
    if stacked {
        graph.add_data_set(CACHED, "mem-cached-color")?;
        graph.add_data_set(BUFFER, "mem-buffer-color")?;
    }
    graph.add_data_set(USED, "mem-used-color")
}

/// `(series, bytes, color)` bands, cumulative when stacked.
fn bands(r: &MemoryReading, stacked: bool) -> Vec<(&'static str, u64, &'static str)> {
    let mut bands = vec![(USED, r.used, "mem-used-color")];
    if stacked {
        let buffered = r.used + r.buffer;
        bands.push((BUFFER, buffered, "mem-buffer-color"));
        bands.push((CACHED, buffered + r.cached, "mem-cached-color"));
    }
    bands
}

impl<P: MemoryProvider> MeterWidget for MemoryIndicator<P> {
    fn id(&self) -> &str {
        "memory"
    }

    fn update_values(&mut self, _ctx: &RuntimeContext) -> Result<()> {
        let reading = self.source.sample();

        if reading.total != 0 && reading.total != self.total {
            self.total = reading.total;
            self.indicator.graph_mut().set_fixed_max(reading.total as f64);
        }

        let bands = bands(&reading, self.stacked);
        let segments = bands
            .iter()
            .map(|(_, bytes, color)| {
                let fraction = if reading.total == 0 {
                    0.0
                } else {
                    (*bytes as f64 / reading.total as f64).min(1.0)
                };
                StatValue::new(fraction, *color)
            })
            .collect();
        self.indicator.add_bar_point(USED, StatValues::new(segments))?;

        for (series, bytes, _) in &bands {
            self.indicator
                .graph_mut()
                .add_data_point(series, *bytes as f64)?;
        }

        self.update_labels(&reading);
        Ok(())
    }
}

impl<P: MemoryProvider> Monitor for MemoryIndicator<P> {
    fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    fn indicator_mut(&mut self) -> &mut Indicator {
        &mut self.indicator
    }

    /// Switching `mem-stack` rebuilds the strip chart from scratch.
    fn apply_settings(&mut self, ctx: &RuntimeContext) -> Result<()> {
        let stacked = ctx.settings.mem_stack;
        if stacked == self.stacked {
            return Ok(());
        }

        let mut graph = Graph::new(graph_config(&self.options, self.total, stacked));
        add_series(&mut graph, stacked)?;
        if !self.indicator.graph().is_ready() {
            graph.disable();
        }

        *self.indicator.graph_mut() = graph;
        self.stacked = stacked;
        self.indicator.request_redraw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::{DebugLog, Settings};

    const GIB: u64 = 1024 * 1024 * 1024;

    #[derive(Debug)]
    struct Fixed(MemoryReading);

    impl MemoryProvider for Fixed {
        fn read_memory(&mut self) -> Result<MemoryReading> {
            Ok(self.0)
        }
    }

    fn reading() -> MemoryReading {
        MemoryReading {
            total: 16 * GIB,
            used: 4 * GIB,
            free: 2 * GIB,
            buffer: GIB,
            shared: 0,
            cached: 3 * GIB,
            user: 10 * GIB,
            locked: 0,
        }
    }

    fn ctx(mem_stack: bool) -> RuntimeContext {
        RuntimeContext::new(
            Settings { mem_stack, ..Settings::default() },
            DebugLog::new("/nonexistent/debug.log"),
        )
    }

    #[test]
    fn bar_is_used_over_total() {
        let mut mem = MemoryIndicator::new(Fixed(reading()), &IndicatorOptions::default(), &ctx(false)).unwrap();
        mem.update_values(&ctx(false)).unwrap();

        let bar = mem.indicator().bars().bar(USED).unwrap().latest().unwrap();
        assert_eq!(bar.values.len(), 1);
        assert_eq!(bar.values[0].value, 0.25);

        let graph = mem.indicator().graph();
        assert_eq!(graph.scale().shared_max(), (16 * GIB) as f64);
        assert_eq!(graph.max_label(), Some("16384.00 MiB"));
        assert_eq!(mem.indicator().label("Total memory usage"), Some("4096.00 MiB"));
        assert_eq!(mem.indicator().labels().len(), 8);
    }

    #[test]
    fn stacked_mode_accumulates_bands() {
        let mut mem = MemoryIndicator::new(Fixed(reading()), &IndicatorOptions::default(), &ctx(true)).unwrap();
        mem.update_values(&ctx(true)).unwrap();

        let bar = mem.indicator().bars().bar(USED).unwrap().latest().unwrap();
        let values: Vec<f64> = bar.values.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![0.25, 0.3125, 0.5]);

        let graph = mem.indicator().graph();
        assert_eq!(graph.config().fill_policy, FillPolicy::All);
        assert_eq!(graph.series().get(CACHED).unwrap().latest(), Some(&((8 * GIB) as f64)));
    }

    #[test]
    fn toggling_stack_rebuilds_graph() {
        let mut mem = MemoryIndicator::new(Fixed(reading()), &IndicatorOptions::default(), &ctx(false)).unwrap();
        assert_eq!(mem.indicator().graph().series().len(), 1);

        mem.apply_settings(&ctx(true)).unwrap();
        assert_eq!(mem.indicator().graph().series().len(), 3);
        assert!(mem.indicator_mut().take_redraw());

        mem.apply_settings(&ctx(false)).unwrap();
        assert_eq!(mem.indicator().graph().series().len(), 1);
    }
}
