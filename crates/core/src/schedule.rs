//! Single-threaded periodic timers.
//!
//! A [`Scheduler`] hands out [`TimerToken`]s. When a timer is due the token is
//! returned to the owner, who dispatches the tick itself; there are no stored
//! callbacks and therefore no shared mutable state between timers.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Smallest period a timer may run at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle for a running timer. [`TimerToken::IDLE`] means "no timer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Sentinel held by anything that is not currently ticking.
    pub const IDLE: Self = Self(0);

    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability to start and cancel periodic timers.
pub trait Scheduler {
    /// Start a periodic timer firing every `interval`.
    fn start(&mut self, interval: Duration) -> TimerToken;

    /// Cancel a timer. Returns `false` when the token was idle or unknown.
    fn cancel(&mut self, token: TimerToken) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    interval: Duration,
    next_due: Duration,
}

/// Timer queue driven by elapsed time.
///
/// The host feeds wall-clock deltas through [`TimerQueue::advance`]; tests feed
/// exact durations. Each timer fires at most once per advance: periods missed
/// while the host was stalled collapse into a single tick.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now:     Duration,
    next_id: u64,
    timers:  BTreeMap<TimerToken, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_active(&self, token: TimerToken) -> bool {
        self.timers.contains_key(&token)
    }

    /// Move the clock forward by `elapsed` and return the tokens of every
    /// timer that came due, ordered by due time (ties broken by start order).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerToken> {
        self.now += elapsed;
        let now = self.now;

        let mut due: Vec<(Duration, TimerToken)> = Vec::new();
        for (token, timer) in &mut self.timers {
            if timer.next_due > now {
                continue;
            }
            due.push((timer.next_due, *token));

            timer.next_due += timer.interval;
            if timer.next_due <= now {
                timer.next_due = now + timer.interval;
            }
        }

        due.sort();
        due.into_iter().map(|(_, token)| token).collect()
    }

    /// Time until the earliest timer fires, if any timer is running.
    pub fn until_next(&self) -> Option<Duration> {
        self.timers
            .values()
            .map(|t| t.next_due.saturating_sub(self.now))
            .min()
    }
}

impl Scheduler for TimerQueue {
    fn start(&mut self, interval: Duration) -> TimerToken {
        let interval = interval.max(MIN_INTERVAL);
        self.next_id += 1;
        let token = TimerToken(self.next_id);
        self.timers.insert(
            token,
            Timer {
                interval,
                next_due: self.now + interval,
            },
        );
        tracing::trace!("timer {token} started ({} ms)", interval.as_millis());
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        if token.is_idle() {
            return false;
        }
        let removed = self.timers.remove(&token).is_some();
        if removed {
            tracing::trace!("timer {token} cancelled");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let mut q = TimerQueue::new();
        let t = q.start(ms(250));

        assert!(q.advance(ms(249)).is_empty());
        assert_eq!(q.advance(ms(1)), vec![t]);
        assert!(q.advance(ms(100)).is_empty());
        assert_eq!(q.advance(ms(150)), vec![t]);
    }

    #[test]
    fn missed_periods_collapse_into_one_tick() {
        let mut q = TimerQueue::new();
        let t = q.start(ms(250));

        assert_eq!(q.advance(ms(10_000)), vec![t]);
        assert_eq!(q.until_next(), Some(ms(250)));
    }

    #[test]
    fn due_tokens_are_ordered_by_due_time() {
        let mut q = TimerQueue::new();
        let slow = q.start(ms(300));
        let fast = q.start(ms(100));

        assert_eq!(q.advance(ms(300)), vec![fast, slow]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let t = q.start(ms(50));

        assert!(q.cancel(t));
        assert!(!q.cancel(t));
        assert!(q.advance(ms(1_000)).is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn idle_token_cannot_be_cancelled() {
        let mut q = TimerQueue::new();
        assert!(!q.cancel(TimerToken::IDLE));
        assert!(TimerToken::default().is_idle());
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut q = TimerQueue::new();
        let t = q.start(Duration::ZERO);
        assert_eq!(q.advance(MIN_INTERVAL), vec![t]);
    }
}
