pub mod context;
pub mod error;
pub mod event;
pub mod log;
pub mod schedule;
pub mod state;
pub mod widget;

pub use context::{RuntimeContext, Settings};
pub use error::{MeterError, Result};
pub use event::Message;
pub use log::DebugLog;
pub use schedule::{Scheduler, TimerQueue, TimerToken};
pub use state::{Sample, Visibility};
pub use widget::MeterWidget;
