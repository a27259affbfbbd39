use crate::indicator::{Indicator, IndicatorOptions, Monitor};
use meter_core::{MeterWidget, Result, RuntimeContext};
use meter_series::{format_metric_pretty, GraphConfig, StatValues};
use meter_system::{MetricSource, SwapProvider, SwapSource, SystemSwap};

const USED: &str = "swap-used";

/// Bar color class for a given usage fraction.
pub fn usage_color(fraction: f64) -> &'static str {
    if fraction > 0.5 {
        "swap-used-bad-color"
    } else if fraction > 0.25 {
        "swap-used-warn-color"
    } else {
        "swap-used-color"
    }
}

#[derive(Debug)]
pub struct SwapIndicator<P = SystemSwap> {
    indicator: Indicator,
    source:    SwapSource<P>,
    total:     u64,
}

impl<P: SwapProvider> SwapIndicator<P> {
    pub fn new(provider: P, options: &IndicatorOptions) -> Result<Self> {
        let mut source = SwapSource::new(provider);
        let total = source.sample().total;

        let graph = GraphConfig {
            autoscale: false,
            fixed_max: total as f64,
            units: "B".into(),
            ..options.graph()
        };
        let mut indicator = Indicator::new("swap", options, graph);
        indicator.add_bar(USED, "swap-used-color")?;
        indicator.graph_mut().add_data_set(USED, "swap-used-color")?;

        Ok(Self { indicator, source, total })
    }
}

impl<P: SwapProvider> MeterWidget for SwapIndicator<P> {
    fn id(&self) -> &str {
        "swap"
    }

    fn update_values(&mut self, _ctx: &RuntimeContext) -> Result<()> {
        let reading = self.source.sample();
        if reading.total != self.total {
            self.total = reading.total;
            self.indicator.graph_mut().set_fixed_max(reading.total as f64);
        }

        let fraction = reading.used_fraction();
        let color = usage_color(fraction);

        self.indicator.add_bar_point(USED, StatValues::single(fraction, color))?;
        self.indicator.graph_mut().add_data_point(USED, reading.used as f64)?;
        self.indicator
            .set_label("Total swap usage", format_metric_pretty(reading.used as f64, "B"));
        Ok(())
    }
}

impl<P: SwapProvider> Monitor for SwapIndicator<P> {
    fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    fn indicator_mut(&mut self) -> &mut Indicator {
        &mut self.indicator
    }
}
