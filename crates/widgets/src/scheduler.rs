use meter_core::{MeterError, Result, Scheduler, TimerToken};
use std::time::Duration;
use tracing::debug;

/// Default sampling period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Enabled,
    Disabled,
    /// Terminal.
    Destroyed,
}

/// Periodic sampling timer of one indicator.
///
/// Holds a token while enabled and [`TimerToken::IDLE`] otherwise.
#[derive(Debug)]
pub struct SampleScheduler {
    name:     String,
    interval: Duration,
    token:    TimerToken,
    state:    Lifecycle,
}

impl SampleScheduler {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
            token: TimerToken::IDLE,
            state: Lifecycle::Created,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn token(&self) -> TimerToken {
        self.token
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.state == Lifecycle::Enabled
    }

    /// `token` is the running timer of this scheduler.
    pub fn owns(&self, token: TimerToken) -> bool {
        !token.is_idle() && token == self.token
    }

    /// Start ticking. No-op when already enabled. The first sample is taken
    /// when the timer first fires, not here.
    pub fn enable(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.ensure_alive()?;
        if self.state == Lifecycle::Enabled {
            return Ok(());
        }
        self.token = scheduler.start(self.interval);
        self.state = Lifecycle::Enabled;
        debug!("{} enabled ({} ms, timer {})", self.name, self.interval.as_millis(), self.token);
        Ok(())
    }

    /// Stop ticking. Always leaves the token idle.
    pub fn disable(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.ensure_alive()?;
        if !self.token.is_idle() {
            scheduler.cancel(self.token);
        }
        self.token = TimerToken::IDLE;
        if self.state == Lifecycle::Enabled {
            debug!("{} disabled", self.name);
        }
        if self.state != Lifecycle::Created {
            self.state = Lifecycle::Disabled;
        }
        Ok(())
    }

    /// Disable, then refuse every later operation.
    pub fn destroy(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.disable(scheduler)?;
        self.state = Lifecycle::Destroyed;
        debug!("{} destroyed", self.name);
        Ok(())
    }

    /// Change the period, restarting the timer if it is running.
    pub fn set_interval(&mut self, scheduler: &mut dyn Scheduler, interval: Duration) -> Result<()> {
        self.ensure_alive()?;
        if interval == self.interval {
            return Ok(());
        }
        self.interval = interval;
        if self.state == Lifecycle::Enabled {
            scheduler.cancel(self.token);
            self.token = scheduler.start(interval);
        }
        Ok(())
    }

    fn ensure_alive(&self) -> Result<()> {
        match self.state {
            Lifecycle::Destroyed => Err(MeterError::Destroyed(self.name.clone())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::TimerQueue;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn enable_is_idempotent() {
        let mut q = TimerQueue::new();
        let mut s = SampleScheduler::new("cpu", ms(250));

        s.enable(&mut q).unwrap();
        let token = s.token();
        s.enable(&mut q).unwrap();

        assert_eq!(s.token(), token);
        assert_eq!(q.len(), 1);
        assert!(s.owns(token));
    }

    #[test]
    fn disable_always_resets_token() {
        let mut q = TimerQueue::new();
        let mut s = SampleScheduler::new("cpu", ms(250));

        s.disable(&mut q).unwrap();
        assert_eq!(s.state(), Lifecycle::Created);
        assert!(s.token().is_idle());

        s.enable(&mut q).unwrap();
        s.disable(&mut q).unwrap();
        s.disable(&mut q).unwrap();
        assert_eq!(s.state(), Lifecycle::Disabled);
        assert!(s.token().is_idle());
        assert!(q.is_empty());
    }

    #[test]
    fn destroyed_scheduler_rejects_everything() {
        let mut q = TimerQueue::new();
        let mut s = SampleScheduler::new("swap", ms(2000));
        s.enable(&mut q).unwrap();
        s.destroy(&mut q).unwrap();

        assert!(q.is_empty());
        assert!(s.token().is_idle());
        assert!(matches!(s.enable(&mut q), Err(MeterError::Destroyed(_))));
        assert!(matches!(s.disable(&mut q), Err(MeterError::Destroyed(_))));
        assert!(matches!(s.destroy(&mut q), Err(MeterError::Destroyed(_))));
    }

    #[test]
    fn interval_change_restarts_running_timer() {
        let mut q = TimerQueue::new();
        let mut s = SampleScheduler::new("memory", ms(1000));
        s.enable(&mut q).unwrap();
        let old = s.token();

        s.set_interval(&mut q, ms(500)).unwrap();
        assert_ne!(s.token(), old);
        assert!(!q.is_active(old));
        assert_eq!(q.advance(ms(500)), vec![s.token()]);
    }

    #[test]
    fn idle_token_is_never_owned() {
        let s = SampleScheduler::new("net", ms(250));
        assert!(!s.owns(TimerToken::IDLE));
    }
}
