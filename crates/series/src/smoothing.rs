/// Decay used by the compact bar indicators.
pub const BAR_DECAY: f64 = 0.2;

/// Decay of the long-horizon network maximum: roughly a two hour half-life
/// at a 250 ms tick.
pub const LONG_HORIZON_DECAY: f64 = 0.9999;

/// Upper bound for the decayed term of a fractional series.
const FRACTION_CEILING: f64 = 0.999_999_999;

/// Attack-fast / decay-slow envelope.
///
/// Each update yields `max(raw, decay * previous)`: a spike shows up at once
/// and then fades exponentially instead of vanishing on the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedSeries {
    decay:    f64,
    fraction: bool,
    value:    Option<f64>,
}

impl SmoothedSeries {
    /// Envelope over a `[0, 1]` fraction; the decayed term stays below 1.
    pub fn fraction(decay: f64) -> Self {
        Self::new(decay, true)
    }

    /// Envelope over an unbounded quantity (rates, byte counts).
    pub fn absolute(decay: f64) -> Self {
        Self::new(decay, false)
    }

    fn new(decay: f64, fraction: bool) -> Self {
        debug_assert!(decay > 0.0 && decay < 1.0, "decay must be in (0, 1)");
        Self {
            decay: decay.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON),
            fraction,
            value: None,
        }
    }

    /// Feed one raw reading and return the smoothed value.
    /// The first reading seeds the envelope as-is.
    pub fn update(&mut self, raw: f64) -> f64 {
        let next = match self.value {
            None => raw,
            Some(previous) => {
                let mut decayed = previous * self.decay;
                if self.fraction {
                    decayed = decayed.min(FRACTION_CEILING);
                }
                raw.max(decayed)
            }
        };
        self.value = Some(next);
        next
    }

    /// Force the envelope to `value`, as if it had been observed.
    pub fn seed(&mut self, value: f64) {
        self.value = Some(value);
    }

    /// Last smoothed value, `None` before the first update.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
