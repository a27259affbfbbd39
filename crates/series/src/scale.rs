use crate::format::format_metric_pretty;

/// Below this shared maximum a graph is considered empty and is not drawn.
pub const EPSILON: f64 = 0.000_01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleMode {
    /// Constant divisor (total RAM, total swap, 100 %).
    Fixed(f64),
    /// Divisor follows the largest value observed across all series.
    Autoscale,
}

/// Shared vertical scale of one graph plus its max label.
///
/// In autoscale mode the maximum is a ratchet: it only grows or holds until
/// [`Autoscaler::reset`], so a receding peak does not make the plot jump.
#[derive(Debug, Clone)]
pub struct Autoscaler {
    mode:       ScaleMode,
    shared_max: f64,
    units:      String,
    show_label: bool,
    label:      Option<String>,
}

impl Autoscaler {
    pub fn fixed(max: f64, units: impl Into<String>, show_label: bool) -> Self {
        let mut scaler = Self {
            mode: ScaleMode::Fixed(max),
            shared_max: max,
            units: units.into(),
            show_label,
            label: None,
        };
        scaler.update_label();
        scaler
    }

    pub fn autoscale(units: impl Into<String>, show_label: bool) -> Self {
        Self {
            mode: ScaleMode::Autoscale,
            shared_max: 0.0,
            units: units.into(),
            show_label,
            label: None,
        }
    }

    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// Current divisor.
    pub fn shared_max(&self) -> f64 {
        self.shared_max
    }

    /// Formatted maximum, `None` when labels are off or nothing was seen yet.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Fold the per-series maxima of this tick into the shared maximum.
    /// Fixed scales ignore observations.
    pub fn observe(&mut self, series_maxima: impl IntoIterator<Item = f64>) -> f64 {
        if let ScaleMode::Autoscale = self.mode {
            let observed = series_maxima.into_iter().fold(0.0, f64::max);
            if observed > self.shared_max {
                self.shared_max = observed;
                self.update_label();
            }
        }
        self.shared_max
    }

    /// Forget the ratchet. Fixed scales keep their constant.
    pub fn reset(&mut self) {
        if let ScaleMode::Autoscale = self.mode {
            self.shared_max = 0.0;
            self.label = None;
        }
    }

    /// Replace the constant of a fixed scale, e.g. once total RAM is known.
    pub fn set_fixed(&mut self, max: f64) {
        self.mode = ScaleMode::Fixed(max);
        self.shared_max = max;
        self.update_label();
    }

    /// `false` while the divisor is too small to scale by.
    pub fn is_drawable(&self) -> bool {
        self.shared_max > EPSILON
    }

    pub fn scale(&self, value: f64) -> f64 {
        value / self.shared_max
    }

    fn update_label(&mut self) {
        if self.show_label {
            self.label = Some(format_metric_pretty(self.shared_max, &self.units));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_scale_ignores_observations() {
        let mut s = Autoscaler::fixed(16.0 * 1024.0 * 1024.0 * 1024.0, "B", true);
        assert_eq!(s.observe([1e12]), 16.0 * 1024.0 * 1024.0 * 1024.0);
        assert_eq!(s.label(), Some("16384.00 MiB"));
    }

    #[test]
    fn autoscale_is_non_decreasing() {
        let mut s = Autoscaler::autoscale("b/s", true);
        let ticks: [&[f64]; 6] = [&[10.0, 3.0], &[2.0], &[50.0, 49.0], &[0.0, 0.0], &[], &[51.0]];

        let mut previous = 0.0;
        for maxima in ticks {
            let now = s.observe(maxima.iter().copied());
            assert!(now >= previous);
            previous = now;
        }
        assert_eq!(previous, 51.0);
        assert_eq!(s.label(), Some("51.00 b/s"));
    }

    #[test]
    fn reset_releases_the_ratchet() {
        let mut s = Autoscaler::autoscale("", false);
        s.observe([100.0]);
        s.reset();
        assert_eq!(s.shared_max(), 0.0);
        assert_eq!(s.observe([4.0]), 4.0);
        assert!(s.label().is_none());
    }

    #[test]
    fn near_zero_max_is_not_drawable() {
        let mut s = Autoscaler::autoscale("", true);
        assert!(!s.is_drawable());
        s.observe([EPSILON / 2.0]);
        assert!(!s.is_drawable());
        s.observe([1.0]);
        assert!(s.is_drawable());
    }
}
