//! vuemeter: CPU, memory, swap and network meters on a Wayland layer-shell panel.
//!
//! Run with:  `RUST_LOG=info vuemeter`

use anyhow::{Context, Result};
use meter_core::DebugLog;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let debug_log = DebugLog::at_default_location();

    // Structured logging. RUST_LOG controls console verbosity (default: info);
    // the debug log records DEBUG and above while debug mode is on.
    let console = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    meter_core::log::subscriber(console, debug_log.clone()).init();

    let config = meter_config::load(meter_config::default_path())
        .context("cannot load settings")?;

    if config.debug_mode {
        debug_log
            .set_enabled(true)
            .with_context(|| format!("cannot open debug log at {}", debug_log.path().display()))?;
    }

    tracing::info!("vuemeter v{} starting", env!("CARGO_PKG_VERSION"));

    meter_wayland::run(config, debug_log).map_err(Into::into)
}
