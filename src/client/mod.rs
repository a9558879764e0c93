//! Read-only client for the repository hosting API
//!
//! Only two endpoints are used: the recursive tree listing of a branch and
//! the branch list. Built trees are cached per repository for a short TTL,
//! the latest rate-limit window is tracked so exhausted windows fail fast,
//! and failed calls are retried with bounded exponential backoff.

mod api_types;
mod cache;
mod clock;
mod config;
mod rate_limit;
mod transport;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use api_types::{ApiMessage, BranchInfo, CommitRef, ListingEntry, TreeListing, next_page_url};
pub use cache::{DEFAULT_TTL, TreeCache};
pub use clock::{Clock, SystemClock};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimitState, RetryPolicy};
pub use transport::{HttpResponse, Transport, TransportError, UreqTransport};

use crate::error::FetchError;
use crate::tree::{EntryFilter, TreeNode, build_tree};

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Upper bound on branch pages followed through `Link` headers.
const MAX_BRANCH_PAGES: usize = 100;

pub struct RepoClient<T: Transport = UreqTransport, C: Clock = SystemClock> {
    config: ClientConfig,
    filter: EntryFilter,
    transport: T,
    clock: C,
    cache: TreeCache,
    rate_limit: RateLimitState,
}

impl RepoClient {
    /// Client over the network with the system clock.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config.user_agent, config.timeout);
        Self::with_parts(config, transport, SystemClock)
    }
}

impl<T: Transport, C: Clock> RepoClient<T, C> {
    pub fn with_parts(config: ClientConfig, transport: T, clock: C) -> Self {
        let cache = TreeCache::new(config.cache_ttl);
        Self {
            config,
            filter: EntryFilter::default(),
            transport,
            clock,
            cache,
            rate_limit: RateLimitState::default(),
        }
    }

    /// Drop matching entries from every listing before the tree is built.
    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rate_limit(&self) -> RateLimitState {
        self.rate_limit
    }

    /// Fetch and build the tree of `branch`.
    ///
    /// A fresh cached tree for `owner/name` is returned without a request,
    /// whatever branch it was fetched from; invalidate before switching
    /// branches.
    pub fn fetch_tree(
        &mut self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<Arc<TreeNode>, FetchError> {
        let key = TreeCache::key(owner, name);
        if let Some(tree) = self.cache.get(&key, self.clock.now()) {
            debug!(repo = %key, "tree cache hit");
            return Ok(tree);
        }
        debug!(repo = %key, branch, "tree cache miss");

        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.config.base_url, owner, name, branch
        );
        let response = self.get(&url, &format!("{}@{}", key, branch))?;
        let listing = TreeListing::parse(&response.body)?;
        if listing.truncated {
            warn!(repo = %key, branch, "tree listing was truncated by the API");
        }

        let entries = self.filter.apply(listing.into_entries());
        let tree = Arc::new(build_tree(&entries, name));
        info!(
            repo = %key,
            branch,
            entries = entries.len(),
            size = tree.size(),
            "fetched repository tree"
        );
        self.cache.insert(key, Arc::clone(&tree), self.clock.now());
        Ok(tree)
    }

    /// Branch names in API order, following `Link: rel="next"` pages.
    pub fn fetch_branches(&mut self, owner: &str, name: &str) -> Result<Vec<String>, FetchError> {
        let target = TreeCache::key(owner, name);
        let mut next = Some(format!(
            "{}/repos/{}/{}/branches?per_page=100",
            self.config.base_url, owner, name
        ));
        let mut names = Vec::new();
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_BRANCH_PAGES {
                warn!(repo = %target, pages, "stopped following branch pages");
                break;
            }
            pages += 1;

            let response = self.get(&url, &target)?;
            let branches: Vec<BranchInfo> = serde_json::from_str(&response.body)
                .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
            names.extend(branches.into_iter().map(|b| b.name));
            next = response.header("link").and_then(next_page_url).map(str::to_string);
        }

        debug!(repo = %target, pages, branches = names.len(), "fetched branches");
        Ok(names)
    }

    /// Forget the cached tree of one repository.
    pub fn invalidate(&mut self, owner: &str, name: &str) -> bool {
        self.cache.invalidate(&TreeCache::key(owner, name))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// GET with rate-limit gating and retries. Returns the first successful
    /// response or the last error.
    fn get(&mut self, url: &str, target: &str) -> Result<HttpResponse, FetchError> {
        let auth = self.config.token.as_ref().map(|t| format!("Bearer {}", t));
        let mut headers = vec![("Accept", ACCEPT)];
        if let Some(auth) = auth.as_deref() {
            headers.push(("Authorization", auth));
        }

        let policy = self.config.retry;
        let mut last_error = None;
        for attempt in 1..=policy.max_attempts.max(1) {
            if let Some(wait) = self.rate_limit.blocked_for(self.clock.now()) {
                debug!(url, wait_secs = wait.as_secs(), "rate limit exhausted, not calling");
                return Err(FetchError::RateLimited { wait });
            }

            let delay = policy.delay_before(attempt);
            if !delay.is_zero() {
                warn!(url, attempt, delay_ms = delay.as_millis() as u64, "retrying request");
                self.clock.sleep(delay);
            }

            let error = match self.transport.get(url, &headers) {
                Ok(response) => {
                    self.rate_limit.update(&response);
                    if response.is_success() {
                        return Ok(response);
                    }
                    let error = self.classify(&response, target);
                    if !RetryPolicy::is_retryable_status(response.status) {
                        return Err(error);
                    }
                    error
                }
                Err(err) => FetchError::NetworkError(err.0),
            };
            debug!(url, attempt, error = %error, "request failed");
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| FetchError::NetworkError("no request was made".to_string())))
    }

    fn classify(&self, response: &HttpResponse, target: &str) -> FetchError {
        let rate_limited = response.status == 429
            || (response.status == 403
                && (self.rate_limit.is_exhausted() || response.header("retry-after").is_some()));

        if response.status == 404 {
            FetchError::NotFound(target.to_string())
        } else if rate_limited {
            FetchError::RateLimited {
                wait: self.rate_limit.wait_hint(response, self.clock.now()),
            }
        } else {
            let message = serde_json::from_str::<ApiMessage>(&response.body)
                .map(|m| m.message)
                .unwrap_or_else(|_| format!("unexpected status {}", response.status));
            FetchError::ApiError {
                status: response.status,
                message,
            }
        }
    }
}
