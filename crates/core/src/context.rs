use crate::log::DebugLog;

/// Snapshot of the user-facing settings the indicators read on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Mirror every log event into the debug log file.
    pub debug_mode: bool,
    /// Draw the tracked maxima as lines in the network graph.
    pub show_max_lines: bool,
    /// Stack used/buffer/cache in the memory graph.
    pub mem_stack: bool,
    /// Report network rates in bits per second instead of bytes.
    pub bits_per_second: bool,
}

/// Everything an indicator needs from its environment, passed explicitly
/// instead of living in process-wide statics.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    pub settings: Settings,
    pub log:      DebugLog,
}

impl RuntimeContext {
    pub fn new(settings: Settings, log: DebugLog) -> Self {
        Self { settings, log }
    }

    /// Swap in freshly loaded settings, toggling the debug log when needed.
    pub fn apply_settings(&mut self, settings: Settings) {
        if settings.debug_mode != self.settings.debug_mode {
            if let Err(e) = self.log.set_enabled(settings.debug_mode) {
                tracing::error!("cannot switch debug log at '{}': {e}", self.log.path().display());
            }
        }
        self.settings = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_debug_mode_switches_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = RuntimeContext::new(
            Settings::default(),
            DebugLog::new(dir.path().join("debug.log")),
        );

        ctx.apply_settings(Settings { debug_mode: true, ..Settings::default() });
        assert!(ctx.log.is_enabled());

        ctx.apply_settings(Settings { mem_stack: true, ..Settings::default() });
        assert!(!ctx.log.is_enabled());
        assert!(ctx.settings.mem_stack);
    }
}
