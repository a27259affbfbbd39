use crate::indicator::{Indicator, IndicatorOptions, Monitor};
use meter_core::{MeterWidget, Result, RuntimeContext};
use meter_series::{
    format_metric_pretty, Graph, GraphConfig, ReferenceLine, SmoothedSeries, StatValues,
    LONG_HORIZON_DECAY,
};
use meter_system::{NetRates, NetworkProvider, NetworkSource, SystemNetworks};
use std::time::Instant;
use tracing::debug;

const IN: &str = "network-in-used";
const OUT: &str = "network-out-used";
const OK_COLOR: &str = "network-ok-color";
const BAD_COLOR: &str = "network-bad-color";

/// Starting maximum for both directions, in the displayed unit.
pub const INITIAL_MAXIMUM: f64 = 56.0 * 1024.0;

/// Long-horizon maxima of the five rate counters.
#[derive(Debug, Clone, Copy)]
struct Maxima {
    bytes_in:   SmoothedSeries,
    errors_in:  SmoothedSeries,
    bytes_out:  SmoothedSeries,
    errors_out: SmoothedSeries,
    collisions: SmoothedSeries,
}

impl Maxima {
    fn new() -> Self {
        let tracker = SmoothedSeries::absolute(LONG_HORIZON_DECAY);
        Self {
            bytes_in:   tracker,
            errors_in:  tracker,
            bytes_out:  tracker,
            errors_out: tracker,
            collisions: tracker,
        }
    }

    fn seed(&mut self, rates: &NetRates) {
        self.bytes_in.seed(INITIAL_MAXIMUM);
        self.errors_in.seed(rates.errors_in);
        self.bytes_out.seed(INITIAL_MAXIMUM);
        self.errors_out.seed(rates.errors_out);
        self.collisions.seed(rates.collisions);
    }

    fn update(&mut self, rates: &NetRates) {
        self.bytes_in.update(rates.bytes_in);
        self.errors_in.update(rates.errors_in);
        self.bytes_out.update(rates.bytes_out);
        self.errors_out.update(rates.errors_out);
        self.collisions.update(rates.collisions);
    }
}

fn max_of(series: &SmoothedSeries) -> f64 {
    series.value().unwrap_or(0.0)
}

/// Inbound and outbound throughput relative to their recent maxima.
#[derive(Debug)]
pub struct NetworkIndicator<P = SystemNetworks> {
    indicator: Indicator,
    source:    NetworkSource<P>,
    options:   IndicatorOptions,
    maxima:    Maxima,
    seeded:    bool,
    bits:      bool,
}

impl<P: NetworkProvider> NetworkIndicator<P> {
    pub fn new(provider: P, options: &IndicatorOptions, ctx: &RuntimeContext) -> Result<Self> {
        let bits = ctx.settings.bits_per_second;
        let mut indicator = Indicator::new("network", options, graph_config(options, bits));
        indicator.add_bar(IN, OK_COLOR)?;
        indicator.add_bar(OUT, OK_COLOR)?;
        add_series(indicator.graph_mut())?;

        Ok(Self {
            indicator,
            source: NetworkSource::new(provider),
            options: *options,
            maxima: Maxima::new(),
            seeded: false,
            bits,
        })
    }

    fn units(&self) -> &'static str {
        if self.bits {
            "b/s"
        } else {
            "B/s"
        }
    }

    /// One tick with an explicit clock.
    pub fn update_at(&mut self, now: Instant, ctx: &RuntimeContext) -> Result<()> {
        let reading = self.source.sample_at(now);
        if reading.baseline {
            return Ok(());
        }

        let factor = if self.bits { 8.0 } else { 1.0 };
        let rates = NetRates {
            bytes_in: reading.rates.bytes_in * factor,
            bytes_out: reading.rates.bytes_out * factor,
            ..reading.rates
        };

        if self.seeded {
            self.maxima.update(&rates);
            self.record(&rates, ctx)?;
        } else {
            self.maxima.seed(&rates);
            self.seeded = true;
            debug!("network maxima seeded at {INITIAL_MAXIMUM}");
        }

        self.update_colors()?;
        Ok(())
    }

    fn record(&mut self, rates: &NetRates, ctx: &RuntimeContext) -> Result<()> {
        let max_in = max_of(&self.maxima.bytes_in);
        let max_out = max_of(&self.maxima.bytes_out);

        let (color_in, color_out) = (self.bar_color(IN), self.bar_color(OUT));

        self.indicator
            .add_bar_point(IN, StatValues::single(ratio(rates.bytes_in, max_in), color_in))?;
        self.indicator
            .add_bar_point(OUT, StatValues::single(ratio(rates.bytes_out, max_out), color_out))?;

        let graph = self.indicator.graph_mut();
        graph.add_data_point(IN, rates.bytes_in)?;
        graph.add_data_point(OUT, rates.bytes_out)?;
        graph.set_reference_lines(if ctx.settings.show_max_lines {
            vec![
                ReferenceLine { value: max_in, color: "network-in-color".into() },
                ReferenceLine { value: max_out, color: "network-out-color".into() },
            ]
        } else {
            Vec::new()
        });

        let units = self.units();
        self.indicator.set_label("Current inbound", format_metric_pretty(rates.bytes_in, units));
        self.indicator.set_label("Current outbound", format_metric_pretty(rates.bytes_out, units));
        self.indicator
            .set_label("Maximum inbound (over 2 hours)", format_metric_pretty(max_in, units));
        self.indicator
            .set_label("Maximum outbound (over 2 hours)", format_metric_pretty(max_out, units));
        Ok(())
    }

    fn bar_color(&self, bar: &str) -> &'static str {
        let collisions = max_of(&self.maxima.collisions) > 0.0;
        let errors = match bar {
            IN => max_of(&self.maxima.errors_in) > 0.0,
            _ => max_of(&self.maxima.errors_out) > 0.0,
        };
        if errors || collisions {
            BAD_COLOR
        } else {
            OK_COLOR
        }
    }

    fn update_colors(&mut self) -> Result<()> {
        for bar in [IN, OUT] {
            let color = self.bar_color(bar);
            self.indicator.bars_mut().bar_mut(bar)?.set_color(color);
        }
        Ok(())
    }
}

fn ratio(rate: f64, max: f64) -> f64 {
    if max > 0.0 {
        rate / max
    } else {
        0.0
    }
}

fn graph_config(options: &IndicatorOptions, bits: bool) -> GraphConfig {
    GraphConfig {
        autoscale: true,
        units: if bits { "b/s" } else { "B/s" }.into(),
        show_max_label: true,
        ..options.graph()
    }
}

fn add_series(graph: &mut Graph) -> Result<()> {
    graph.add_data_set(IN, "network-in-color")?;
    graph.add_data_set(OUT, "network-out-color")
}

impl<P: NetworkProvider> MeterWidget for NetworkIndicator<P> {
    fn id(&self) -> &str {
        "network"
    }

    fn update_values(&mut self, ctx: &RuntimeContext) -> Result<()> {
        self.update_at(Instant::now(), ctx)
    }
}

impl<P: NetworkProvider> Monitor for NetworkIndicator<P> {
    fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    fn indicator_mut(&mut self) -> &mut Indicator {
        &mut self.indicator
    }

    /// A unit switch restarts the graph and the maxima in the new unit.
    fn apply_settings(&mut self, ctx: &RuntimeContext) -> Result<()> {
        if !ctx.settings.show_max_lines {
            self.indicator.graph_mut().set_reference_lines(Vec::new());
        }

        let bits = ctx.settings.bits_per_second;
        if bits == self.bits {
            return Ok(());
        }

        let mut graph = Graph::new(graph_config(&self.options, bits));
        add_series(&mut graph)?;
        if !self.indicator.graph().is_ready() {
            graph.disable();
        }
        *self.indicator.graph_mut() = graph;

        self.bits = bits;
        self.maxima = Maxima::new();
        self.seeded = false;
        self.indicator.request_redraw();
        Ok(())
    }
}
