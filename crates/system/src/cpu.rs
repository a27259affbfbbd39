use crate::procfs;
use crate::MetricSource;
use meter_core::{MeterError, Result};
use std::path::PathBuf;
use tracing::{debug, error};

/// Cumulative jiffy counters of one core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user:  u64,
    pub sys:   u64,
    pub idle:  u64,
    pub total: u64,
}

/// Raw per-core counter query.
pub trait CpuProvider: std::fmt::Debug {
    fn read_ticks(&mut self) -> Result<Vec<CpuTicks>>;
}

/// Reads the `cpuN` lines of `/proc/stat`.
#[derive(Debug, Clone)]
pub struct ProcStat {
    path: PathBuf,
}

impl ProcStat {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStat {
    fn default() -> Self {
        Self::new("/proc/stat")
    }
}

impl CpuProvider for ProcStat {
    fn read_ticks(&mut self) -> Result<Vec<CpuTicks>> {
        parse_stat(&procfs::read(&self.path)?)
    }
}

/// Per-core lines only; the aggregate `cpu` line is skipped.
///
/// Columns: user nice system idle iowait irq softirq steal [guest guest_nice].
/// Guest time is already accounted in user, so it is left out of the total.
pub fn parse_stat(text: &str) -> Result<Vec<CpuTicks>> {
    let mut cores = Vec::new();

    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let Some(label) = parts.next() else { continue };
        if label == "cpu" || !label.starts_with("cpu") {
            continue;
        }

        let fields: Vec<u64> = parts
            .take(8)
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| MeterError::System(format!("/proc/stat {label}: {e}")))?;
        if fields.len() < 4 {
            return Err(MeterError::System(format!("/proc/stat {label}: short line")));
        }

        cores.push(CpuTicks {
            user:  fields[0],
            sys:   fields[2],
            idle:  fields[3],
            total: fields.iter().sum(),
        });
    }

    if cores.is_empty() {
        return Err(MeterError::System("/proc/stat: no per-core lines".into()));
    }
    Ok(cores)
}

/// Fractions of one core's time since the previous sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoreUsage {
    pub user:  f64,
    pub sys:   f64,
    pub total: f64,
}

impl CoreUsage {
    /// Readings between two counter snapshots.
    pub fn between(previous: &CpuTicks, current: &CpuTicks) -> Self {
        let d_total = current.total.saturating_sub(previous.total);
        if d_total == 0 {
            return Self::default();
        }
        let d_total = d_total as f64;
        let d_user = current.user.saturating_sub(previous.user) as f64;
        let d_sys = current.sys.saturating_sub(previous.sys) as f64;
        let d_idle = current.idle.saturating_sub(previous.idle) as f64;

        Self {
            user:  d_user / d_total,
            sys:   d_sys / d_total,
            total: 1.0 - d_idle / d_total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuReading {
    pub cores: Vec<CoreUsage>,
}

impl CpuReading {
    /// Mean over all cores.
    pub fn average(&self) -> CoreUsage {
        if self.cores.is_empty() {
            return CoreUsage::default();
        }
        let n = self.cores.len() as f64;
        let sum = self.cores.iter().fold(CoreUsage::default(), |acc, c| CoreUsage {
            user:  acc.user + c.user,
            sys:   acc.sys + c.sys,
            total: acc.total + c.total,
        });
        CoreUsage {
            user:  sum.user / n,
            sys:   sum.sys / n,
            total: sum.total / n,
        }
    }
}

/// Per-core utilisation from successive tick snapshots.
#[derive(Debug)]
pub struct CpuSource<P = ProcStat> {
    provider: P,
    previous: Vec<CpuTicks>,
}

impl<P: CpuProvider> CpuSource<P> {
    /// Counters are captured here so the first [`MetricSource::sample`]
    /// already yields a real delta.
    pub fn new(mut provider: P) -> Self {
        let previous = provider.read_ticks().unwrap_or_else(|e| {
            error!("CPU counters unavailable: {e}");
            Vec::new()
        });
        debug!(cores = previous.len(), "CPU source ready");
        Self { provider, previous }
    }

    pub fn core_count(&self) -> usize {
        self.previous.len()
    }
}

impl<P: CpuProvider> MetricSource for CpuSource<P> {
    type Reading = CpuReading;

    fn sample(&mut self) -> CpuReading {
        let current = match self.provider.read_ticks() {
            Ok(ticks) => ticks,
            Err(e) => {
                error!("CPU sample failed: {e}");
                return CpuReading {
                    cores: vec![CoreUsage::default(); self.previous.len()],
                };
            }
        };

        let cores = current
            .iter()
            .enumerate()
            .map(|(i, now)| {
                let before = self.previous.get(i).copied().unwrap_or_default();
                CoreUsage::between(&before, now)
            })
            .collect();

        self.previous = current;
        CpuReading { cores }
    }
}
