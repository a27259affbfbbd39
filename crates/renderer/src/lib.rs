//! Drawing for the panel: strip charts and bar indicators.
//!
//! Renderers talk to a [`DrawContext`] and repaint everything from scratch
//! whenever they run. [`canvas`] maps that onto iced behind a geometry cache,
//! [`Recorder`] captures the calls for inspection.

pub mod bars;
pub mod canvas;
pub mod draw;
pub mod strip;

pub use bars::{render_bars, BarGeometry};
pub use canvas::{BarChart, ChartCache, FrameContext, StripChart};
pub use draw::{DrawContext, DrawOp, Recorder, Surface};
pub use strip::{render_strip_chart, GRID_COLOR, NUM_GRID_LINES};
