/// All messages (events) that can flow through the panel's event bus.
///
/// Sources:
/// - Base clock subscription → `Tick`
/// - Config watcher task     → `ConfigReloaded`
/// - Reload with new palette → `StyleChanged`
/// - Signal handler          → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Clock ─────────────────────────────────────────────────────────────────
    /// Base clock tick. The host advances its timer queue and dispatches
    /// every due indicator timer.
    Tick,

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,
    /// Palette changed; cached colors must be re-resolved.
    StyleChanged,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    Shutdown,
}
