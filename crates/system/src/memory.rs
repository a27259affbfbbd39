use crate::procfs;
use crate::MetricSource;
use meter_core::Result;
use std::path::PathBuf;
use sysinfo::System;
use tracing::error;

/// Physical memory breakdown, all in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryReading {
    pub total:  u64,
    pub used:   u64,
    pub free:   u64,
    pub buffer: u64,
    pub shared: u64,
    pub cached: u64,
    pub user:   u64,
    pub locked: u64,
}

impl MemoryReading {
    /// `used / total`, 0 when total is unknown.
    pub fn used_fraction(&self) -> f64 {
        fraction(self.used, self.total)
    }
}

pub(crate) fn fraction(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

pub trait MemoryProvider: std::fmt::Debug {
    fn read_memory(&mut self) -> Result<MemoryReading>;
}

/// Totals from `sysinfo`, breakdown from `/proc/meminfo`.
pub struct SystemMemory {
    sys:     System,
    meminfo: PathBuf,
}

impl SystemMemory {
    pub fn new(meminfo: impl Into<PathBuf>) -> Self {
        Self {
            sys:     System::new(),
            meminfo: meminfo.into(),
        }
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new("/proc/meminfo")
    }
}

impl std::fmt::Debug for SystemMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemMemory").field("meminfo", &self.meminfo).finish()
    }
}

impl MemoryProvider for SystemMemory {
    fn read_memory(&mut self) -> Result<MemoryReading> {
        self.sys.refresh_memory();
        let text = procfs::read(&self.meminfo)?;
        Ok(breakdown(
            self.sys.total_memory(),
            self.sys.used_memory(),
            self.sys.free_memory(),
            &text,
        ))
    }
}

/// Combine `sysinfo` totals with the `/proc/meminfo` fields.
pub fn breakdown(total: u64, used: u64, free: u64, meminfo: &str) -> MemoryReading {
    let kv = procfs::parse_key_values(meminfo);
    let field = |key: &str| kv.get(key).copied().unwrap_or(0);

    let buffer = field("Buffers");
    let cached = field("Cached");

    MemoryReading {
        total,
        used,
        free,
        buffer,
        shared: field("Shmem"),
        cached,
        user: total.saturating_sub(free + buffer + cached),
        locked: field("Mlocked"),
    }
}

/// Fresh memory figures each tick.
#[derive(Debug)]
pub struct MemorySource<P = SystemMemory> {
    provider: P,
}

impl<P: MemoryProvider> MemorySource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: MemoryProvider> MetricSource for MemorySource<P> {
    type Reading = MemoryReading;

    fn sample(&mut self) -> MemoryReading {
        self.provider.read_memory().unwrap_or_else(|e| {
            error!("memory sample failed: {e}");
            MemoryReading::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::MeterError;

    const MEMINFO: &str = "\
MemTotal:        1000 kB
MemFree:          200 kB
Buffers:           50 kB
Cached:           250 kB
Shmem:             30 kB
Mlocked:            4 kB
";

    #[test]
    fn breakdown_reads_meminfo_fields() {
        let r = breakdown(1000 * 1024, 600 * 1024, 200 * 1024, MEMINFO);
        assert_eq!(r.buffer, 50 * 1024);
        assert_eq!(r.cached, 250 * 1024);
        assert_eq!(r.shared, 30 * 1024);
        assert_eq!(r.locked, 4 * 1024);
        assert_eq!(r.user, 500 * 1024);
        assert!((r.used_fraction() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn unknown_total_reads_as_empty() {
        assert_eq!(MemoryReading::default().used_fraction(), 0.0);
    }

    #[test]
    fn provider_error_yields_zero_reading() {
        #[derive(Debug)]
        struct Broken;
        impl MemoryProvider for Broken {
            fn read_memory(&mut self) -> Result<MemoryReading> {
                Err(MeterError::System("no meminfo".into()))
            }
        }
        assert_eq!(MemorySource::new(Broken).sample(), MemoryReading::default());
    }

    #[test]
    fn missing_meminfo_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = SystemMemory::new(dir.path().join("meminfo"));
        assert!(matches!(provider.read_memory(), Err(MeterError::System(_))));
    }
}
