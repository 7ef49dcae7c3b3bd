//! Bounded retry with exponential backoff for provider calls.
//!
//! Stateless: the policy only answers "retry?" and "how long to wait?".
//! The orchestrator owns the loop.

use std::time::Duration;

use parley_types::config::ProviderSettings;
use parley_types::llm::ProviderError;

/// How many times to attempt a provider call, and how long to wait between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Never less than 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff,
        }
    }

    /// A single attempt; the first failure goes straight to the fallback.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(
            settings.max_attempts,
            Duration::from_millis(settings.initial_backoff_ms),
            Duration::from_millis(settings.max_backoff_ms),
        )
    }

    /// Whether attempt number `attempt` (1-based) that failed with `error`
    /// should be followed by another attempt.
    pub fn should_retry(&self, attempt: u32, error: &ProviderError) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }

    /// Delay before the attempt following `attempt` (1-based).
    ///
    /// Doubles per attempt starting at `initial_backoff`, capped at `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&ProviderSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(4, Duration::from_millis(100), Duration::from_millis(350))
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let p = policy();
        assert_eq!(p.backoff_for(1), Duration::from_millis(100));
        assert_eq!(p.backoff_for(2), Duration::from_millis(200));
        assert_eq!(p.backoff_for(3), Duration::from_millis(350));
        assert_eq!(p.backoff_for(40), Duration::from_millis(350));
    }

    #[test]
    fn test_should_retry_respects_attempt_budget() {
        let p = policy();
        assert!(p.should_retry(1, &ProviderError::Timeout));
        assert!(p.should_retry(3, &ProviderError::Timeout));
        assert!(!p.should_retry(4, &ProviderError::Timeout));
    }

    #[test]
    fn test_permanent_errors_are_not_retried() {
        let p = policy();
        assert!(!p.should_retry(1, &ProviderError::MissingCredential));
        assert!(!p.should_retry(
            1,
            &ProviderError::AuthenticationFailed {
                status: 401,
                body: "bad key".to_string()
            }
        ));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let p = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(p.max_attempts, 1);
        assert!(!p.should_retry(1, &ProviderError::Timeout));
        assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
    }

    #[test]
    fn test_default_matches_settings() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts, 2);
        assert_eq!(p.initial_backoff, Duration::from_millis(250));
        assert_eq!(p.max_backoff, Duration::from_millis(2_000));
    }
}
