//! Retry policy for temporary failures.
//!
//! A fixed delay between attempts and an attempt cap. A cap of `0` means
//! retry until success, a fatal error, or cancellation. The async loop that
//! applies the policy lives in `pushover-client`.

use std::time::Duration;

use crate::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};

/// Attempt cap and inter-attempt delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first; `0` is unlimited.
    pub max_attempts: u32,
    /// Wait between a temporary failure and the next attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Policy with an explicit cap and delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt, never retried.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Retry forever with the default delay.
    pub fn unlimited() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Replace the delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether the cap is disabled.
    pub fn is_unlimited(&self) -> bool {
        self.max_attempts == 0
    }

    /// Whether another attempt is allowed after `attempts_made` attempts.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        self.is_unlimited() || attempts_made < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.delay, Duration::from_secs(5));
        assert!(!p.is_unlimited());
    }

    #[test]
    fn capped_policy_stops_at_cap() {
        let p = RetryPolicy::new(3, Duration::from_millis(1));
        assert!(p.allows_another(1));
        assert!(p.allows_another(2));
        assert!(!p.allows_another(3));
        assert!(!p.allows_another(4));
    }

    #[test]
    fn once_never_retries() {
        let p = RetryPolicy::once();
        assert!(!p.allows_another(1));
        assert_eq!(p.delay, Duration::ZERO);
    }

    #[test]
    fn unlimited_always_allows() {
        let p = RetryPolicy::unlimited();
        assert!(p.is_unlimited());
        assert!(p.allows_another(1));
        assert!(p.allows_another(u32::MAX));
        assert_eq!(p.delay, DEFAULT_RETRY_DELAY);
    }

    #[test]
    fn with_delay_keeps_cap() {
        let p = RetryPolicy::new(7, Duration::from_secs(1)).with_delay(Duration::from_millis(10));
        assert_eq!(p.max_attempts, 7);
        assert_eq!(p.delay, Duration::from_millis(10));
    }
}
