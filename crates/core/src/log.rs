//! Debug log file.
//!
//! While debug mode is on, every `tracing` event is appended to
//! `<cache-dir>/vuemeter/debug.log` as `HH:MM:SS.mmm: LEVEL - message`.
//! Turning debug mode on truncates the file; turning it off closes it.

use crate::Result;
use parking_lot::Mutex;
use std::fmt::{self, Write as _};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Directory name used under the user cache dir.
pub const APP_ID: &str = "vuemeter";

/// Switchable sink for the debug log. Cheap to clone; clones share the file.
#[derive(Debug, Clone)]
pub struct DebugLog {
    inner: Arc<Mutex<Sink>>,
}

#[derive(Debug)]
struct Sink {
    path: PathBuf,
    file: Option<File>,
}

impl DebugLog {
    /// A disabled log that will write to `path` once enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sink {
                path: path.into(),
                file: None,
            })),
        }
    }

    /// A disabled log at [`default_path`].
    pub fn at_default_location() -> Self {
        Self::new(default_path())
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().path.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.lock().file.is_some()
    }

    /// Switch the sink on or off. Enabling always starts a fresh file.
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        let mut sink = self.inner.lock();

        if !enabled {
            sink.file = None;
            return Ok(());
        }

        if let Some(dir) = sink.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&sink.path)?;
        sink.file = Some(file);
        Ok(())
    }

    /// Append one formatted line. No-op while disabled. Write errors are
    /// swallowed: the log must never take the panel down.
    pub fn write_line(&self, level: &Level, message: &str) {
        let mut sink = self.inner.lock();
        let Some(file) = sink.file.as_mut() else {
            return;
        };

        let line = format_line(&chrono::Utc::now().format("%H:%M:%S%.3f"), level, message);
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|()| file.flush()) {
            eprintln!("{APP_ID}: cannot write debug log: {e}");
        }
    }

    /// A `tracing-subscriber` layer forwarding every event to this log.
    pub fn layer(&self) -> DebugLogLayer {
        DebugLogLayer { log: self.clone() }
    }
}

/// Subscriber used by the binary.
///
/// `console` filters only the stderr output. The debug log keeps its own
/// DEBUG threshold so debug mode captures `debug!` events whatever
/// `RUST_LOG` says.
pub fn subscriber(console: EnvFilter, log: DebugLog) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(console))
        .with(log.layer().with_filter(LevelFilter::DEBUG))
}

/// `$XDG_CACHE_HOME/vuemeter/debug.log`, falling back to `~/.cache`.
pub fn default_path() -> PathBuf {
    cache_dir().join(APP_ID).join("debug.log")
}

fn cache_dir() -> PathBuf {
    std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".cache")
        })
}

fn format_line(time: &dyn fmt::Display, level: &Level, message: &str) -> String {
    format!("{time}: {} - {message}\n", level.as_str())
}

/// Layer returned by [`DebugLog::layer`].
#[derive(Debug, Clone)]
pub struct DebugLogLayer {
    log: DebugLog,
}

impl<S: Subscriber> Layer<S> for DebugLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.log.is_enabled() {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.log.write_line(event.metadata().level(), &visitor.finish());
    }
}

/// Flattens an event into `message key=value ...`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields:  String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={value:?}", field.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_matches_host_log() {
        let line = format_line(&"12:34:56.789", &Level::ERROR, "boom");
        assert_eq!(line, "12:34:56.789: ERROR - boom\n");
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = DebugLog::new(dir.path().join("debug.log"));

        log.write_line(&Level::INFO, "hidden");
        assert!(!log.path().exists());
    }

    #[test]
    fn enabling_truncates_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let log = DebugLog::new(dir.path().join("nested").join("debug.log"));

        log.set_enabled(true).unwrap();
        log.write_line(&Level::INFO, "first session");
        log.set_enabled(false).unwrap();
        log.write_line(&Level::INFO, "dropped");
        log.set_enabled(true).unwrap();
        log.write_line(&Level::DEBUG, "second session");

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert!(!text.contains("first session"));
        assert!(!text.contains("dropped"));
        assert!(text.ends_with(": DEBUG - second session\n"));
    }

    #[test]
    fn layer_records_tracing_events() {
        let dir = tempfile::tempdir().unwrap();
        let log = DebugLog::new(dir.path().join("debug.log"));
        log.set_enabled(true).unwrap();

        let subscriber = tracing_subscriber::registry().with(log.layer());
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(core = 3, "counter went backwards");
        });

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert!(text.contains("WARN - counter went backwards core=3"), "{text}");
    }

    #[test]
    fn debug_events_reach_the_log_under_an_info_console_filter() {
        let dir = tempfile::tempdir().unwrap();
        let log = DebugLog::new(dir.path().join("debug.log"));
        log.set_enabled(true).unwrap();

        let stack = subscriber(EnvFilter::new("info"), log.clone());
        tracing::subscriber::with_default(stack, || {
            tracing::debug!("sampling cpu");
            tracing::info!("panel ready");
            tracing::trace!("too chatty");
        });

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert!(text.contains("DEBUG - sampling cpu"), "{text}");
        assert!(text.contains("INFO - panel ready"), "{text}");
        assert!(!text.contains("too chatty"), "{text}");
    }
}
