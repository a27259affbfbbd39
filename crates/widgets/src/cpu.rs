use crate::indicator::{Indicator, IndicatorOptions, Monitor};
use meter_core::{MeterWidget, Result, RuntimeContext};
use meter_series::{format_metric_pretty, GraphConfig, SmoothedSeries, StatValue, StatValues, BAR_DECAY};
use meter_system::{CpuProvider, CpuSource, MetricSource, ProcStat};

/// `(register, description, drawn in the bar)`
const REGISTERS: [(&str, &str, bool); 3] = [
    ("user", "User CPU usage", false),
    ("sys", "System CPU usage", true),
    ("total", "Total CPU usage", true),
];

/// One bar per core (system and total segments) and a percent strip chart
/// averaged over all cores.
#[derive(Debug)]
pub struct CpuIndicator<P = ProcStat> {
    indicator: Indicator,
    source:    CpuSource<P>,
    smoothing: Vec<[SmoothedSeries; 3]>,
}

impl<P: CpuProvider> CpuIndicator<P> {
    pub fn new(provider: P, options: &IndicatorOptions) -> Result<Self> {
        let source = CpuSource::new(provider);
        let cores = source.core_count();

        let graph = GraphConfig {
            autoscale: false,
            fixed_max: 100.0,
            units: "%".into(),
            show_max_label: false,
            ..options.graph()
        };
        let mut indicator = Indicator::new("cpu", options, graph);

        for core in 0..cores {
            indicator.add_bar(&bar_name(core), "cpu-color")?;
        }
        for (register, _, _) in REGISTERS {
            indicator
                .graph_mut()
                .add_data_set(&series_name(register), &format!("cpu-{register}-color"))?;
        }

        Ok(Self {
            indicator,
            source,
            smoothing: vec![[SmoothedSeries::fraction(BAR_DECAY); 3]; cores],
        })
    }
}

fn bar_name(core: usize) -> String {
    format!("cpu_{core}")
}

fn series_name(register: &str) -> String {
    format!("cpu-{register}-used")
}

impl<P: CpuProvider> MeterWidget for CpuIndicator<P> {
    fn id(&self) -> &str {
        "cpu"
    }

    fn update_values(&mut self, _ctx: &RuntimeContext) -> Result<()> {
        let reading = self.source.sample();
        let mut totals = [0.0; 3];

        for (core, usage) in reading.cores.iter().enumerate().take(self.smoothing.len()) {
            let raw = [usage.user, usage.sys, usage.total];
            let mut segments = Vec::with_capacity(2);

            for (r, (register, _, drawn)) in REGISTERS.iter().enumerate() {
                let smoothed = self.smoothing[core][r].update(raw[r]);
                totals[r] += raw[r];
                if *drawn {
                    segments.push(StatValue::new(smoothed, format!("cpu-{register}-color")));
                }
            }

            self.indicator
                .add_bar_point(&bar_name(core), StatValues::new(segments))?;
        }

        let cores = self.smoothing.len().max(1) as f64;
        for (r, (register, description, _)) in REGISTERS.iter().enumerate() {
            let percent = totals[r] * 100.0 / cores;
            self.indicator
                .graph_mut()
                .add_data_point(&series_name(register), percent)?;
            self.indicator
                .set_label(description, format_metric_pretty(percent, "%"));
        }
        Ok(())
    }
}

impl<P: CpuProvider> Monitor for CpuIndicator<P> {
    fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    fn indicator_mut(&mut self) -> &mut Indicator {
        &mut self.indicator
    }
}
