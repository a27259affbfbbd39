//! OS counter adapters.
//!
//! Each source wraps a provider that performs the raw query, so the
//! arithmetic can be exercised with scripted counters. Sources never fail:
//! provider errors are logged and produce a zero reading.

pub mod cpu;
pub mod memory;
pub mod network;
pub mod swap;

mod procfs;

pub use cpu::{CoreUsage, CpuProvider, CpuReading, CpuSource, CpuTicks, ProcStat};
pub use memory::{MemoryProvider, MemoryReading, MemorySource, SystemMemory};
pub use network::{NetCounters, NetRates, NetworkProvider, NetworkReading, NetworkSource, SystemNetworks};
pub use swap::{SwapProvider, SwapReading, SwapSource, SystemSwap};

/// One resource counter, sampled once per tick.
pub trait MetricSource {
    type Reading;

    fn sample(&mut self) -> Self::Reading;
}
