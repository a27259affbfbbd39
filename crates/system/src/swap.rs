use crate::memory::fraction;
use crate::procfs;
use crate::MetricSource;
use meter_core::Result;
use std::path::PathBuf;
use sysinfo::System;
use tracing::error;

/// Swap usage in bytes; page counters are cumulative since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapReading {
    pub total:   u64,
    pub used:    u64,
    pub free:    u64,
    pub pagein:  u64,
    pub pageout: u64,
}

impl SwapReading {
    /// `used / total`, 0 on machines without swap.
    pub fn used_fraction(&self) -> f64 {
        fraction(self.used, self.total)
    }
}

pub trait SwapProvider: std::fmt::Debug {
    fn read_swap(&mut self) -> Result<SwapReading>;
}

/// Totals from `sysinfo`, page counters from `/proc/vmstat`.
pub struct SystemSwap {
    sys:    System,
    vmstat: PathBuf,
}

impl SystemSwap {
    pub fn new(vmstat: impl Into<PathBuf>) -> Self {
        Self {
            sys:    System::new(),
            vmstat: vmstat.into(),
        }
    }
}

impl Default for SystemSwap {
    fn default() -> Self {
        Self::new("/proc/vmstat")
    }
}

impl std::fmt::Debug for SystemSwap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemSwap").field("vmstat", &self.vmstat).finish()
    }
}

impl SwapProvider for SystemSwap {
    fn read_swap(&mut self) -> Result<SwapReading> {
        self.sys.refresh_memory();
        let vmstat = procfs::read(&self.vmstat)?;
        let kv = procfs::parse_key_values(&vmstat);

        Ok(SwapReading {
            total:   self.sys.total_swap(),
            used:    self.sys.used_swap(),
            free:    self.sys.free_swap(),
            pagein:  kv.get("pswpin").copied().unwrap_or(0),
            pageout: kv.get("pswpout").copied().unwrap_or(0),
        })
    }
}

#[derive(Debug)]
pub struct SwapSource<P = SystemSwap> {
    provider: P,
}

impl<P: SwapProvider> SwapSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: SwapProvider> MetricSource for SwapSource<P> {
    type Reading = SwapReading;

    fn sample(&mut self) -> SwapReading {
        self.provider.read_swap().unwrap_or_else(|e| {
            error!("swap sample failed: {e}");
            SwapReading::default()
        })
    }
}
