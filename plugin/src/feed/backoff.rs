//! Reconnect policy for the notification client.

use std::time::Duration;

const DEFAULT_INITIAL_DELAY_MS: u64 = 500;
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// What to do after the connection fails or drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Give up after the first failure. Notifications stop until the client
    /// is opened again.
    Never,
    /// Retry with doubling delays, capped at `max`.
    ///
    /// `max_attempts` bounds consecutive failed attempts; `None` retries forever.
    Exponential {
        initial: Duration,
        max: Duration,
        max_attempts: Option<u32>,
    },
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::Exponential {
            initial: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            max_attempts: None,
        }
    }
}

/// Retry bookkeeping for one connection thread.
#[derive(Debug)]
pub(crate) struct Backoff {
    policy: ReconnectPolicy,
    failures: u32,
}

impl Backoff {
    pub(crate) fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Called once a connection is established.
    pub(crate) fn reset(&mut self) {
        self.failures = 0;
    }

    /// Attempt number of the next connection try (1-indexed).
    pub(crate) fn attempt(&self) -> u32 {
        self.failures + 1
    }

    /// Record a failure and get the delay before retrying, or `None` to stop.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        match self.policy {
            ReconnectPolicy::Never => None,
            ReconnectPolicy::Exponential {
                initial,
                max,
                max_attempts,
            } => {
                self.failures = self.failures.saturating_add(1);
                if max_attempts.is_some_and(|limit| self.failures >= limit) {
                    return None;
                }

                let shift = (self.failures - 1).min(31);
                let delay = initial.saturating_mul(1u32 << shift);
                Some(delay.min(max))
            }
        }
    }
}
