//! Sliding-log rate limiter.

use std::collections::VecDeque;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::clock::{Clock, SystemClock};

/// Rejected limiter parameters. These signal a programming error, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("max_actions must be at least 1")]
    ZeroMaxActions,
    #[error("window must be at least 1ms")]
    ZeroWindow,
}

/// Admits at most `max_actions` actions in any window of `window` length
/// ending now.
///
/// The limiter keeps the timestamp of every admitted action, oldest first.
/// Each check first drops timestamps that have aged out of the window, so the
/// window slides with every call. Denied actions are not recorded.
#[derive(Debug)]
pub struct RateLimiter<C = SystemClock> {
    max_actions: usize,
    window_ms: u64,
    timestamps: VecDeque<u64>,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// A limiter on the system's monotonic clock.
    pub fn new(max_actions: usize, window: Duration) -> Result<Self, RateLimitError> {
        Self::with_clock(max_actions, window, SystemClock::new())
    }
}

impl<C: Clock> RateLimiter<C> {
    /// A limiter reading time from `clock`.
    ///
    /// Both limits must be positive; windows shorter than a millisecond are
    /// rejected.
    pub fn with_clock(max_actions: usize, window: Duration, clock: C) -> Result<Self, RateLimitError> {
        if max_actions == 0 {
            return Err(RateLimitError::ZeroMaxActions);
        }
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        if window_ms == 0 {
            return Err(RateLimitError::ZeroWindow);
        }
        Ok(Self {
            max_actions,
            window_ms,
            timestamps: VecDeque::with_capacity(max_actions),
            clock,
        })
    }

    /// Check whether an action may happen now, and record it if so.
    pub fn is_allowed(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.purge(now);

        if self.timestamps.len() < self.max_actions {
            self.timestamps.push_back(now);
            true
        } else {
            debug!(
                max_actions = self.max_actions,
                window_ms = self.window_ms,
                "Rate limit reached, action denied"
            );
            false
        }
    }

    /// How long until the next action would be admitted. Zero if it would be
    /// admitted now.
    pub fn time_until_allowed(&self) -> Duration {
        let now = self.clock.now_ms();
        let mut active = self.active(now);
        if active.len() < self.max_actions {
            return Duration::ZERO;
        }
        let oldest = active.next().unwrap_or(now);
        let elapsed = now.saturating_sub(oldest);
        Duration::from_millis(self.window_ms.saturating_sub(elapsed))
    }

    /// Actions still admissible in the current window.
    pub fn remaining(&self) -> usize {
        let now = self.clock.now_ms();
        self.max_actions.saturating_sub(self.active(now).len())
    }

    /// Forget every recorded action.
    pub fn reset(&mut self) {
        self.timestamps.clear();
    }

    pub fn max_actions(&self) -> usize {
        self.max_actions
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Timestamps still inside the window at `now`, oldest first.
    fn active(&self, now: u64) -> impl ExactSizeIterator<Item = u64> + '_ {
        let expired = self
            .timestamps
            .iter()
            .take_while(|&&t| !self.in_window(t, now))
            .count();
        self.timestamps.iter().skip(expired).copied()
    }

    fn purge(&mut self, now: u64) {
        while let Some(&oldest) = self.timestamps.front() {
            if self.in_window(oldest, now) {
                break;
            }
            self.timestamps.pop_front();
        }
    }

    fn in_window(&self, timestamp: u64, now: u64) -> bool {
        now.saturating_sub(timestamp) < self.window_ms
    }
}
