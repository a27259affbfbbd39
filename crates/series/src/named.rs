use meter_core::{MeterError, Result, Sample};
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// Bounded, time-ordered window of one plotted quantity.
///
/// Pushing past `capacity` evicts from the oldest end, so the window always
/// holds the most recent `capacity` values in arrival order.
#[derive(Debug, Clone)]
pub struct NamedSeries<T = f64> {
    name:        String,
    color:       String,
    values:      VecDeque<T>,
    capacity:    usize,
    last_update: Option<Instant>,
}

impl<T> NamedSeries<T> {
    /// `color` is a palette class name, resolved at draw time.
    pub fn new(name: impl Into<String>, color: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: name.into(),
            color: color.into(),
            values: VecDeque::with_capacity(capacity),
            capacity,
            last_update: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Switch the color class, e.g. to flag errors or pressure.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &VecDeque<T> {
        &self.values
    }

    /// Most recent value.
    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    /// Append a value stamped `at`, evicting the oldest when full.
    pub fn push_at(&mut self, value: T, at: Instant) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.last_update = Some(at);
    }

    pub fn push(&mut self, value: T) {
        self.push_at(value, Instant::now());
    }

    /// Change the window size, dropping the oldest values that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.last_update = None;
    }
}

impl NamedSeries<f64> {
    pub fn push_sample(&mut self, sample: Sample) {
        self.push_at(sample.value, sample.timestamp);
    }

    /// Maximum of the current window (0 when empty). Evicted samples no
    /// longer count.
    pub fn running_max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Window divided by `divisor`.
    pub fn scaled(&self, divisor: f64) -> Vec<f64> {
        self.values.iter().map(|v| v / divisor).collect()
    }
}

/// Series registry keyed by unique name, iterated in registration order.
#[derive(Debug, Clone)]
pub struct SeriesSet<S> {
    order:  Vec<String>,
    series: HashMap<String, S>,
}

impl<S> Default for SeriesSet<S> {
    fn default() -> Self {
        Self {
            order:  Vec::new(),
            series: HashMap::new(),
        }
    }
}

impl<S> SeriesSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `series` under `name`. Names must be unique.
    pub fn register(&mut self, name: impl Into<String>, series: S) -> Result<()> {
        let name = name.into();
        if self.series.contains_key(&name) {
            return Err(MeterError::DuplicateSeries(name));
        }
        self.order.push(name.clone());
        self.series.insert(name, series);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&S> {
        self.series
            .get(name)
            .ok_or_else(|| MeterError::UnknownSeries(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut S> {
        self.series
            .get_mut(name)
            .ok_or_else(|| MeterError::UnknownSeries(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Series in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.order.iter().filter_map(|name| self.series.get(name))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut S> {
        // Order only matters for drawing; mutation visits every entry once.
        self.series.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_never_exceeds_capacity_and_evicts_oldest() {
        let mut s: NamedSeries = NamedSeries::new("cpu", "cpu-color", 4);
        for i in 0..100 {
            s.push(i as f64);
            assert!(s.len() <= 4);
        }
        assert_eq!(s.values().iter().copied().collect::<Vec<_>>(), vec![96.0, 97.0, 98.0, 99.0]);
    }

    #[test]
    fn running_max_forgets_evicted_samples() {
        let mut s: NamedSeries = NamedSeries::new("net", "c", 2);
        s.push(50.0);
        s.push(10.0);
        assert_eq!(s.running_max(), 50.0);
        s.push(20.0);
        assert_eq!(s.running_max(), 20.0);
    }

    #[test]
    fn shrinking_capacity_keeps_newest() {
        let mut s: NamedSeries = NamedSeries::new("m", "c", 5);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            s.push(v);
        }
        s.set_capacity(2);
        assert_eq!(s.values().iter().copied().collect::<Vec<_>>(), vec![4.0, 5.0]);
        assert_eq!(s.latest(), Some(&5.0));
    }

    #[test]
    fn samples_keep_their_timestamp() {
        let mut s: NamedSeries = NamedSeries::new("m", "c", 3);
        let sample = Sample::now(0.5);
        s.push_sample(sample);
        assert_eq!(s.last_update(), Some(sample.timestamp));
    }

    #[test]
    fn registry_rejects_duplicates_and_unknown_names() {
        let mut set: SeriesSet<NamedSeries> = SeriesSet::new();
        set.register("a", NamedSeries::new("a", "c", 3)).unwrap();
        set.register("b", NamedSeries::new("b", "c", 3)).unwrap();

        assert!(matches!(
            set.register("a", NamedSeries::new("a", "c", 3)),
            Err(MeterError::DuplicateSeries(_))
        ));
        assert!(matches!(set.get("zzz"), Err(MeterError::UnknownSeries(_))));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
