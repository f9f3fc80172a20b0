//! Retry and status classification policy
//!
//! The transport consumes a single pure decision function so the policy can
//! be tested without a network.

use crate::config::ClientConfig;
use std::time::Duration;

/// What the transport should do with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx: hand the body to the caller
    Success,
    /// Transient failure with attempts left: back off and try again
    Retry,
    /// Give up and surface the failure
    Fail(FailureKind),
}

/// Terminal failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 400 / 422
    InvalidInput,
    /// 401 / 403
    Unauthorized,
    /// 404
    NotFound,
    /// 429 after the budget was spent
    RateLimited,
    /// 5xx after the budget was spent
    ServerError,
    /// Any other non-success status
    Unexpected,
}

/// Whether a status is worth retrying (429 and 5xx)
pub fn is_transient(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Classify a response status for the given 1-based attempt
pub fn classify(status: u16, attempt: u32, max_attempts: u32) -> Outcome {
    if (200..300).contains(&status) {
        return Outcome::Success;
    }
    if is_transient(status) && attempt < max_attempts {
        return Outcome::Retry;
    }
    Outcome::Fail(match status {
        400 | 422 => FailureKind::InvalidInput,
        401 | 403 => FailureKind::Unauthorized,
        404 => FailureKind::NotFound,
        429 => FailureKind::RateLimited,
        500..=599 => FailureKind::ServerError,
        _ => FailureKind::Unexpected,
    })
}

/// Delay before the attempt following `attempt`: `base_ms * 2^(attempt-1)`
///
/// Returns `None` when the base is zero, meaning retry immediately.
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Option<Duration> {
    if base_ms == 0 {
        return None;
    }
    let factor = 1u64
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Some(Duration::from_millis(base_ms.saturating_mul(factor)))
}

/// Attempt budget and backoff schedule for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base_ms: u64,
}

impl RetryPolicy {
    /// `retry_max` retries after the first attempt
    pub fn new(retry_max: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_attempts: retry_max.saturating_add(1),
            backoff_base_ms,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.retry_max(), config.retry_backoff_base_ms())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn classify(&self, status: u16, attempt: u32) -> Outcome {
        classify(status, attempt, self.max_attempts)
    }

    /// Network failures share the status budget
    pub fn retry_network_failure(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        backoff_delay(self.backoff_base_ms, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(200 ; "ok")]
    #[test_case(201 ; "created")]
    #[test_case(204 ; "no content")]
    fn test_success_statuses(status: u16) {
        assert_eq!(classify(status, 1, 1), Outcome::Success);
    }

    #[test_case(429 ; "too many requests")]
    #[test_case(500 ; "internal error")]
    #[test_case(502 ; "bad gateway")]
    #[test_case(503 ; "unavailable")]
    #[test_case(599 ; "last 5xx")]
    fn test_transient_statuses_retry_while_budget_remains(status: u16) {
        assert_eq!(classify(status, 1, 3), Outcome::Retry);
        assert_eq!(classify(status, 2, 3), Outcome::Retry);
        assert!(matches!(classify(status, 3, 3), Outcome::Fail(_)));
    }

    #[test_case(429, FailureKind::RateLimited ; "rate limited")]
    #[test_case(500, FailureKind::ServerError ; "server error")]
    #[test_case(400, FailureKind::InvalidInput ; "bad request")]
    #[test_case(422, FailureKind::InvalidInput ; "unprocessable")]
    #[test_case(401, FailureKind::Unauthorized ; "unauthorized")]
    #[test_case(403, FailureKind::Unauthorized ; "forbidden")]
    #[test_case(404, FailureKind::NotFound ; "not found")]
    #[test_case(409, FailureKind::Unexpected ; "conflict")]
    #[test_case(302, FailureKind::Unexpected ; "redirect")]
    fn test_terminal_failures(status: u16, kind: FailureKind) {
        assert_eq!(classify(status, 1, 1), Outcome::Fail(kind));
    }

    #[test_case(401 ; "unauthorized")]
    #[test_case(404 ; "not found")]
    #[test_case(400 ; "bad request")]
    fn test_client_errors_never_retry(status: u16) {
        assert!(matches!(classify(status, 1, 10), Outcome::Fail(_)));
    }

    #[test_case(100, 1, 100 ; "first retry")]
    #[test_case(100, 2, 200 ; "second retry")]
    #[test_case(100, 3, 400 ; "third retry")]
    #[test_case(1, 10, 512 ; "tenth retry")]
    fn test_backoff_doubles(base: u64, attempt: u32, expected_ms: u64) {
        assert_eq!(
            backoff_delay(base, attempt),
            Some(Duration::from_millis(expected_ms))
        );
    }

    #[test]
    fn test_zero_base_skips_sleep() {
        assert_eq!(backoff_delay(0, 1), None);
        assert_eq!(backoff_delay(0, 5), None);
    }

    #[test]
    fn test_backoff_saturates() {
        assert_eq!(
            backoff_delay(u64::MAX, 70),
            Some(Duration::from_millis(u64::MAX))
        );
    }

    #[test]
    fn test_policy_budget() {
        let policy = RetryPolicy::new(2, 10);
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.retry_network_failure(2));
        assert!(!policy.retry_network_failure(3));
        assert_eq!(policy.backoff(2), Some(Duration::from_millis(20)));

        let no_retry = RetryPolicy::new(0, 10);
        assert_eq!(no_retry.max_attempts(), 1);
        assert!(matches!(no_retry.classify(503, 1), Outcome::Fail(FailureKind::ServerError)));
    }
}
