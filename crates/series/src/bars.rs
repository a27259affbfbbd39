use crate::named::{NamedSeries, SeriesSet};
use crate::stat::StatValues;
use meter_core::Result;

/// Samples kept per bar; only the latest is drawn.
pub const KEEP_NUM_STATS: usize = 3;

/// Data behind a compact bar indicator: one composite value per bar.
#[derive(Debug, Clone, Default)]
pub struct BarSet {
    bars: SeriesSet<NamedSeries<StatValues>>,
}

impl BarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bar. `color` is the class used for one-segment values.
    pub fn add_data_set(&mut self, name: &str, color: &str) -> Result<()> {
        self.bars
            .register(name, NamedSeries::new(name, color, KEEP_NUM_STATS))
    }

    pub fn add_data_point(&mut self, name: &str, value: StatValues) -> Result<()> {
        self.bars.get_mut(name)?.push(value);
        Ok(())
    }

    pub fn bar(&self, name: &str) -> Result<&NamedSeries<StatValues>> {
        self.bars.get(name)
    }

    pub fn bar_mut(&mut self, name: &str) -> Result<&mut NamedSeries<StatValues>> {
        self.bars.get_mut(name)
    }

    /// Bars in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedSeries<StatValues>> {
        self.bars.iter()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_keep_only_recent_values() {
        let mut bars = BarSet::new();
        bars.add_data_set("cpu_0", "cpu-color").unwrap();
        for i in 0..10 {
            bars.add_data_point("cpu_0", StatValues::single(i as f64 / 10.0, "c")).unwrap();
        }
        let bar = bars.bar("cpu_0").unwrap();
        assert_eq!(bar.len(), KEEP_NUM_STATS);
        assert_eq!(bar.latest().unwrap().values[0].value, 0.9);
    }
}
