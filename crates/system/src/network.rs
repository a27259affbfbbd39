use crate::procfs;
use crate::MetricSource;
use meter_core::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sysinfo::Networks;
use tracing::{debug, error};

/// Cumulative counters summed over the active interfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub bytes_in:   u64,
    pub errors_in:  u64,
    pub bytes_out:  u64,
    pub errors_out: u64,
    pub collisions: u64,
}

impl NetCounters {
    fn rates_since(&self, previous: &NetCounters, elapsed_s: f64) -> NetRates {
        let rate = |now: u64, before: u64| now.saturating_sub(before) as f64 / elapsed_s;
        NetRates {
            bytes_in:   rate(self.bytes_in, previous.bytes_in),
            errors_in:  rate(self.errors_in, previous.errors_in),
            bytes_out:  rate(self.bytes_out, previous.bytes_out),
            errors_out: rate(self.errors_out, previous.errors_out),
            collisions: rate(self.collisions, previous.collisions),
        }
    }
}

/// Per-second deltas of [`NetCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetRates {
    pub bytes_in:   f64,
    pub errors_in:  f64,
    pub bytes_out:  f64,
    pub errors_out: f64,
    pub collisions: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetworkReading {
    pub rates: NetRates,
    /// `true` for the first sample, which only records a baseline.
    pub baseline: bool,
}

pub trait NetworkProvider: std::fmt::Debug {
    fn read_counters(&mut self) -> Result<NetCounters>;
}

/// Interface counters from `sysinfo`, link state and collisions from sysfs.
pub struct SystemNetworks {
    networks: Networks,
    sysfs:    PathBuf,
}

impl SystemNetworks {
    pub fn new(sysfs: impl Into<PathBuf>) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            sysfs:    sysfs.into(),
        }
    }
}

impl Default for SystemNetworks {
    fn default() -> Self {
        Self::new("/sys/class/net")
    }
}

impl std::fmt::Debug for SystemNetworks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemNetworks").field("sysfs", &self.sysfs).finish()
    }
}

impl NetworkProvider for SystemNetworks {
    fn read_counters(&mut self) -> Result<NetCounters> {
        // `true` drops interfaces that disappeared since the last refresh.
        self.networks.refresh(true);

        let mut sum = NetCounters::default();
        for (name, data) in self.networks.iter() {
            if !is_active(&self.sysfs, name) {
                continue;
            }
            sum.bytes_in += data.total_received();
            sum.errors_in += data.total_errors_on_received();
            sum.bytes_out += data.total_transmitted();
            sum.errors_out += data.total_errors_on_transmitted();
            sum.collisions += collisions(&self.sysfs, name);
        }
        Ok(sum)
    }
}

/// Link is up and the interface is not loopback. Point-to-point and tunnel
/// devices (wireguard, ppp, tun) report `unknown` while carrying traffic.
pub fn is_active(sysfs: &Path, iface: &str) -> bool {
    iface != "lo"
        && matches!(
            procfs::read_attr(&sysfs.join(iface).join("operstate")).as_deref(),
            Some("up" | "unknown")
        )
}

fn collisions(sysfs: &Path, iface: &str) -> u64 {
    procfs::read_attr(&sysfs.join(iface).join("statistics/collisions"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Byte, error and collision rates between successive samples.
#[derive(Debug)]
pub struct NetworkSource<P = SystemNetworks> {
    provider: P,
    last:     Option<(NetCounters, Instant)>,
}

impl<P: NetworkProvider> NetworkSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, last: None }
    }

    /// Sample with an explicit clock.
    pub fn sample_at(&mut self, now: Instant) -> NetworkReading {
        let current = match self.provider.read_counters() {
            Ok(c) => c,
            Err(e) => {
                error!("network sample failed: {e}");
                return NetworkReading::default();
            }
        };

        let reading = match self.last {
            Some((previous, at)) => {
                let elapsed = now.saturating_duration_since(at).as_secs_f64();
                if elapsed <= 0.0 {
                    // Keep the older baseline so the next delta spans real time.
                    return NetworkReading::default();
                }
                NetworkReading {
                    rates:    current.rates_since(&previous, elapsed),
                    baseline: false,
                }
            }
            None => {
                debug!("network baseline recorded");
                NetworkReading {
                    rates:    NetRates::default(),
                    baseline: true,
                }
            }
        };

        self.last = Some((current, now));
        reading
    }
}

impl<P: NetworkProvider> MetricSource for NetworkSource<P> {
    type Reading = NetworkReading;

    fn sample(&mut self) -> NetworkReading {
        self.sample_at(Instant::now())
    }
}
