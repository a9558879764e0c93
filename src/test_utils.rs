//! Test doubles for the API client and listing fixtures.
//!
//! This module is only compiled for tests and benchmarks.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::client::{Clock, HttpResponse, Transport, TransportError};
use crate::tree::{EntryKind, TreeEntry};

/// Scripted transport. Clones share the same script and request log, so a
/// test can keep a handle after moving one into a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Rc<RefCell<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Rc<RefCell<Vec<(String, Vec<(String, String)>)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request.
    pub fn respond(&self, response: HttpResponse) -> &Self {
        self.script.borrow_mut().push_back(Ok(response));
        self
    }

    /// Queue a transport failure for the next request.
    pub fn fail(&self, message: &str) -> &Self {
        self.script
            .borrow_mut()
            .push_back(Err(TransportError(message.to_string())));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Headers sent with the most recent request.
    pub fn last_headers(&self) -> Vec<(String, String)> {
        self.requests
            .borrow()
            .last()
            .map(|(_, headers)| headers.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let headers = headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.requests.borrow_mut().push((url.to_string(), headers));
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

/// Clock that only moves when told to. `sleep` advances it and records the
/// requested duration.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl ManualClock {
    pub fn at(epoch_secs: i64) -> Self {
        let start = DateTime::from_timestamp(epoch_secs, 0).expect("valid timestamp");
        Self {
            now: Rc::new(Cell::new(start)),
            sleeps: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let step = chrono::Duration::from_std(duration).expect("duration in range");
        self.now.set(self.now.get() + step);
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

/// Serialize entries the way the tree listing endpoint returns them.
pub fn listing_json(entries: &[TreeEntry]) -> String {
    let tree: Vec<_> = entries
        .iter()
        .map(|entry| match entry.kind {
            EntryKind::Dir => json!({
                "path": entry.path,
                "mode": entry.mode,
                "type": "tree",
                "sha": "0000000000000000000000000000000000000000",
            }),
            EntryKind::File => json!({
                "path": entry.path,
                "mode": entry.mode,
                "type": "blob",
                "sha": "0000000000000000000000000000000000000000",
                "size": entry.size,
            }),
        })
        .collect();
    json!({ "sha": "deadbeef", "tree": tree, "truncated": false }).to_string()
}

/// Serialize branch names the way the branch listing endpoint returns them.
pub fn branches_json(names: &[&str]) -> String {
    let branches: Vec<_> = names
        .iter()
        .map(|name| json!({ "name": name, "commit": { "sha": "cafebabe" } }))
        .collect();
    serde_json::Value::Array(branches).to_string()
}

/// A small repository used across tests.
pub fn sample_entries() -> Vec<TreeEntry> {
    vec![
        TreeEntry::dir("src"),
        TreeEntry::dir("src/layout"),
        TreeEntry::file("src/layout/radial.rs", 900),
        TreeEntry::file("src/layout/mod.rs", 1400),
        TreeEntry::file("src/main.rs", 2100),
        TreeEntry::file("src/lib.rs", 300),
        TreeEntry::dir("tests"),
        TreeEntry::file("tests/layout.rs", 700),
        TreeEntry::file("Cargo.toml", 600),
        TreeEntry::file("README.md", 1800),
    ]
}

/// A 200 response for the sample repository.
pub fn sample_listing_response() -> HttpResponse {
    HttpResponse::new(200, listing_json(&sample_entries()))
        .with_header("X-RateLimit-Remaining", "59")
        .with_header("X-RateLimit-Reset", "1700003600")
}
