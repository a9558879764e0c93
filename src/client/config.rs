//! Configuration for the API client

use std::time::Duration;

use super::cache::DEFAULT_TTL;
use super::rate_limit::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for `RepoClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    pub user_agent: String,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    /// Per-request timeout for the default transport.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("repo-diagram/{}", env!("CARGO_PKG_VERSION")),
            token: None,
            cache_ttl: DEFAULT_TTL,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
