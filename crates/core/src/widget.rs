use crate::{context::RuntimeContext, Result};

/// Every indicator (CPU, memory, swap, network) implements this trait.
///
/// Lifecycle and drawing live in `meter-widgets`; this trait only covers the
/// per-tick work, so the panel can drive indicators without knowing their kind.
pub trait MeterWidget: std::fmt::Debug {
    /// Unique string identifier, e.g. `"cpu"` or `"network"`.
    fn id(&self) -> &str;

    /// Sample the metric source and push the readings into the series.
    /// Called once per timer tick while the indicator is enabled.
    fn update_values(&mut self, ctx: &RuntimeContext) -> Result<()>;
}
