//! Error types for repository loading

use std::time::Duration;

use thiserror::Error;

/// Failure surfaced by `RepoClient` after its retry budget is spent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Repository or branch does not exist. Terminal; the input must change.
    #[error("repository or branch not found: {0}")]
    NotFound(String),

    /// The API refused the call because the rate limit is used up.
    #[error("API rate limit exceeded, try again in {}", format_wait(*wait))]
    RateLimited { wait: Duration },

    /// Any other non-success status.
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Transport failure (DNS, TLS, connection reset, timeout).
    #[error("network error: {0}")]
    NetworkError(String),

    /// A success status whose body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

fn format_wait(wait: Duration) -> String {
    // Sub-second precision is noise for a human reading this.
    humantime::format_duration(Duration::from_secs(wait.as_secs().max(1))).to_string()
}

/// Input that could not be read as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoRefError {
    #[error("please enter a repository")]
    Empty,
    #[error("invalid repository format '{0}', use \"owner/repo\"")]
    Invalid(String),
}
