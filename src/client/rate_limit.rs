//! Rate-limit bookkeeping and retry backoff

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::clock::span_between;
use super::transport::HttpResponse;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Wait reported when a limited response carries no usable hint.
const FALLBACK_WAIT: Duration = Duration::from_secs(60);

/// Latest rate-limit window reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitState {
    pub remaining: Option<u64>,
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitState {
    /// Record the window from a response. Missing or unparsable headers
    /// leave the previous value in place.
    pub fn update(&mut self, response: &HttpResponse) {
        if let Some(remaining) = response
            .header(REMAINING_HEADER)
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.remaining = Some(remaining);
        }
        if let Some(reset) = response
            .header(RESET_HEADER)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            self.reset_at = Some(reset);
        }
    }

    /// Time left until calls are allowed again, or `None` if a call may go
    /// out now.
    pub fn blocked_for(&self, now: DateTime<Utc>) -> Option<Duration> {
        match (self.remaining, self.reset_at) {
            (Some(0), Some(reset)) if now < reset => Some(span_between(now, reset)),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// How long to wait after a 403/429, preferring `Retry-After`, then the
    /// reset time.
    pub fn wait_hint(&self, response: &HttpResponse, now: DateTime<Utc>) -> Duration {
        if let Some(secs) = response
            .header(RETRY_AFTER_HEADER)
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            return Duration::from_secs(secs);
        }
        match self.reset_at {
            Some(reset) if now < reset => span_between(now, reset),
            _ => FALLBACK_WAIT,
        }
    }
}

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_millis(1000),
            cap: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given 1-based attempt. The first attempt goes out
    /// immediately.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        self.base.saturating_mul(factor).min(self.cap)
    }

    /// Statuses worth another attempt: server errors and rate limiting.
    /// Every other client error is final.
    pub fn is_retryable_status(status: u16) -> bool {
        status >= 500 || status == 429 || status == 403
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_update_reads_headers() {
        let mut state = RateLimitState::default();
        let response = HttpResponse::new(200, "")
            .with_header("X-RateLimit-Remaining", "0")
            .with_header("X-RateLimit-Reset", "1700000060");
        state.update(&response);
        assert_eq!(state.remaining, Some(0));
        assert_eq!(state.reset_at, Some(at(1_700_000_060)));
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_update_keeps_previous_on_missing_headers() {
        let mut state = RateLimitState {
            remaining: Some(12),
            reset_at: Some(at(10)),
        };
        state.update(&HttpResponse::new(200, "").with_header("X-RateLimit-Remaining", "junk"));
        assert_eq!(state.remaining, Some(12));
        assert_eq!(state.reset_at, Some(at(10)));
    }

    #[test]
    fn test_blocked_only_when_exhausted_before_reset() {
        let now = at(1_700_000_000);
        let exhausted = RateLimitState {
            remaining: Some(0),
            reset_at: Some(at(1_700_000_060)),
        };
        assert_eq!(exhausted.blocked_for(now), Some(Duration::from_secs(60)));
        assert_eq!(exhausted.blocked_for(at(1_700_000_060)), None);

        let remaining = RateLimitState {
            remaining: Some(1),
            reset_at: Some(at(1_700_000_060)),
        };
        assert_eq!(remaining.blocked_for(now), None);
        assert_eq!(RateLimitState::default().blocked_for(now), None);
    }

    #[test]
    fn test_wait_hint_prefers_retry_after() {
        let now = at(1_700_000_000);
        let state = RateLimitState {
            remaining: Some(0),
            reset_at: Some(at(1_700_000_030)),
        };
        let with_retry_after = HttpResponse::new(429, "").with_header("Retry-After", "5");
        assert_eq!(state.wait_hint(&with_retry_after, now), Duration::from_secs(5));
        assert_eq!(
            state.wait_hint(&HttpResponse::new(403, ""), now),
            Duration::from_secs(30)
        );
        assert_eq!(
            RateLimitState::default().wait_hint(&HttpResponse::new(403, ""), now),
            FALLBACK_WAIT
        );
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_before(3), Duration::from_millis(2000));
        assert_eq!(policy.delay_before(4), Duration::from_millis(4000));
        assert_eq!(policy.delay_before(5), Duration::from_millis(5000));
        assert_eq!(policy.delay_before(40), Duration::from_millis(5000));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(RetryPolicy::is_retryable_status(500));
        assert!(RetryPolicy::is_retryable_status(503));
        assert!(RetryPolicy::is_retryable_status(429));
        assert!(RetryPolicy::is_retryable_status(403));
        assert!(!RetryPolicy::is_retryable_status(404));
        assert!(!RetryPolicy::is_retryable_status(401));
        assert!(!RetryPolicy::is_retryable_status(422));
    }
}
