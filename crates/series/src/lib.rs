//! Rolling statistics behind the graphs: bounded named windows, the decay
//! envelope, and the shared autoscale.

pub mod bars;
pub mod format;
pub mod graph;
pub mod named;
pub mod scale;
pub mod smoothing;
pub mod stat;

pub use bars::BarSet;
pub use format::format_metric_pretty;
pub use graph::{FillPolicy, Graph, GraphConfig, ReferenceLine};
pub use named::{NamedSeries, SeriesSet};
pub use scale::{Autoscaler, ScaleMode, EPSILON};
pub use smoothing::{SmoothedSeries, BAR_DECAY, LONG_HORIZON_DECAY};
pub use stat::{StatValue, StatValues};
