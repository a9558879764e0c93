//! One diagram over one loaded repository
//!
//! The session owns the current tree and `DiagramState`, hands out load
//! tickets, and turns the pair into a fresh visible set and layout on every
//! render.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::client::{Clock, RepoClient, Transport};
use crate::error::FetchError;
use crate::layout::{LayoutParams, LayoutResult, compute_layout};
use crate::repo_ref::RepoRef;
use crate::state::DiagramState;
use crate::tree::TreeNode;
use crate::visibility::{VisibleSet, compute_visible};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("a repository is already loading")]
    AlreadyLoading,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The tree replaced the current one.
    Applied,
    /// A newer load was started meanwhile; the result was dropped.
    Stale,
}

/// Proof that a load was started. Consumed by `finish_load`.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    repo: RepoRef,
    branch: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

#[derive(Debug, Clone)]
struct Loaded {
    repo: RepoRef,
    branch: String,
    tree: Arc<TreeNode>,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Render<'a> {
    pub visible: VisibleSet<'a>,
    pub layout: LayoutResult<'a>,
}

#[derive(Debug, Default)]
pub struct DiagramSession {
    current: Option<Loaded>,
    state: DiagramState,
    generation: u64,
    in_flight: Option<u64>,
}

impl DiagramSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session starting from `state`; expansion is still reset on load.
    pub fn with_state(state: DiagramState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn tree(&self) -> Option<&Arc<TreeNode>> {
        self.current.as_ref().map(|loaded| &loaded.tree)
    }

    pub fn repo(&self) -> Option<&RepoRef> {
        self.current.as_ref().map(|loaded| &loaded.repo)
    }

    pub fn branch(&self) -> Option<&str> {
        self.current.as_ref().map(|loaded| loaded.branch.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a load. Refused while another one is in flight.
    pub fn begin_load(&mut self, repo: RepoRef, branch: &str) -> Result<LoadTicket, LoadError> {
        if self.in_flight.is_some() {
            return Err(LoadError::AlreadyLoading);
        }
        Ok(self.next_ticket(repo, branch))
    }

    /// Start a load that abandons the one in flight, if any. The abandoned
    /// ticket's result will come back as `Stale`.
    pub fn supersede_load(&mut self, repo: RepoRef, branch: &str) -> LoadTicket {
        self.next_ticket(repo, branch)
    }

    fn next_ticket(&mut self, repo: RepoRef, branch: &str) -> LoadTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        LoadTicket {
            generation: self.generation,
            repo,
            branch: branch.to_string(),
        }
    }

    /// Apply the result of a load. Only the latest ticket is honored; an
    /// error leaves the previous tree and state in place.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Arc<TreeNode>, FetchError>,
    ) -> Result<LoadOutcome, LoadError> {
        if self.in_flight != Some(ticket.generation) {
            warn!(
                repo = %ticket.repo,
                generation = ticket.generation,
                current = self.generation,
                "dropping stale load result"
            );
            return Ok(LoadOutcome::Stale);
        }
        self.in_flight = None;

        let tree = result?;
        info!(repo = %ticket.repo, branch = %ticket.branch, "loaded repository");
        self.state = self.state.reset_for_new_tree();
        self.current = Some(Loaded {
            repo: ticket.repo,
            branch: ticket.branch,
            tree,
        });
        Ok(LoadOutcome::Applied)
    }

    /// Fetch `repo` at `branch` through `client`. The client's cached tree
    /// for the repository is dropped first so a load always hits the API.
    pub fn load<T: Transport, C: Clock>(
        &mut self,
        client: &mut RepoClient<T, C>,
        repo: RepoRef,
        branch: &str,
    ) -> Result<LoadOutcome, LoadError> {
        let ticket = self.begin_load(repo, branch)?;
        client.invalidate(&ticket.repo.owner, &ticket.repo.name);
        let result = client.fetch_tree(&ticket.repo.owner, &ticket.repo.name, branch);
        self.finish_load(ticket, result)
    }

    /// Replace the state with `update(state)`. Returns whether the change
    /// requires a new render pass.
    pub fn apply(&mut self, update: impl FnOnce(&DiagramState) -> DiagramState) -> bool {
        let next = update(&self.state);
        let relayout = self.state.needs_relayout(&next);
        self.state = next;
        relayout
    }

    /// Expand every directory of the current tree. No-op without a tree.
    pub fn expand_all(&mut self) -> bool {
        match self.tree().cloned() {
            Some(tree) => self.apply(|state| state.expanded_all(&tree)),
            None => false,
        }
    }

    /// Visible set and layout for the current tree and state, computed from
    /// scratch. `None` until a tree is loaded.
    pub fn render(&self, params: &LayoutParams) -> Option<Render<'_>> {
        let tree = self.current.as_ref()?.tree.as_ref();
        let visible = compute_visible(tree, &self.state);
        let layout = compute_layout(&visible, self.state.layout_mode, params);
        Some(Render { visible, layout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, HttpResponse};
    use crate::state::LayoutMode;
    use crate::test_utils::{ManualClock, MockTransport, sample_listing_response};
    use crate::tree::{NodeId, TreeEntry, build_tree};

    const NOW: i64 = 1_700_000_000;

    fn client(transport: &MockTransport) -> RepoClient<MockTransport, ManualClock> {
        RepoClient::with_parts(ClientConfig::default(), transport.clone(), ManualClock::at(NOW))
    }

    fn repo() -> RepoRef {
        RepoRef::new("octo", "diagram")
    }

    fn small_tree(name: &str) -> Arc<TreeNode> {
        Arc::new(build_tree(&[TreeEntry::file("a/b.txt", 3)], name))
    }

    #[test]
    fn test_render_needs_a_tree() {
        let mut session = DiagramSession::new();
        assert!(session.render(&LayoutParams::default()).is_none());
        assert!(!session.expand_all());
    }

    #[test]
    fn test_load_applies_tree_and_resets_expansion() {
        let transport = MockTransport::new();
        transport.respond(sample_listing_response());
        let mut client = client(&transport);

        let mut session = DiagramSession::with_state(
            DiagramState::default()
                .with_expanded(NodeId::path("stale"))
                .with_search("rs"),
        );
        let outcome = session.load(&mut client, repo(), "main").unwrap();

        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(session.repo(), Some(&repo()));
        assert_eq!(session.branch(), Some("main"));
        assert_eq!(session.tree().unwrap().name(), "diagram");
        assert!(!session.state().is_expanded(&NodeId::path("stale")));
        assert!(session.state().is_expanded(&NodeId::Root));
        assert_eq!(session.state().search_query, "rs");
        assert!(!session.is_loading());
    }

    #[test]
    fn test_load_always_refetches() {
        let transport = MockTransport::new();
        transport.respond(sample_listing_response());
        transport.respond(sample_listing_response());
        let mut client = client(&transport);
        let mut session = DiagramSession::new();

        session.load(&mut client, repo(), "main").unwrap();
        session.load(&mut client, repo(), "main").unwrap();
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn test_failed_load_keeps_previous_tree() {
        let transport = MockTransport::new();
        transport.respond(sample_listing_response());
        transport.respond(HttpResponse::new(404, r#"{"message":"Not Found"}"#));
        let mut client = client(&transport);
        let mut session = DiagramSession::new();

        session.load(&mut client, repo(), "main").unwrap();
        let expanded = session.state().expanded_all(session.tree().unwrap());
        session.apply(|_| expanded.clone());

        let err = session
            .load(&mut client, RepoRef::new("octo", "missing"), "main")
            .unwrap_err();
        assert!(matches!(err, LoadError::Fetch(FetchError::NotFound(_))));
        assert_eq!(session.repo(), Some(&repo()));
        assert_eq!(session.state(), &expanded);
        assert!(!session.is_loading(), "a failed load releases the slot");
    }

    #[test]
    fn test_second_load_refused_while_in_flight() {
        let mut session = DiagramSession::new();
        let _ticket = session.begin_load(repo(), "main").unwrap();
        assert_eq!(
            session.begin_load(repo(), "dev").unwrap_err(),
            LoadError::AlreadyLoading
        );
    }

    #[test]
    fn test_superseded_result_is_stale() {
        let mut session = DiagramSession::new();
        let first = session.begin_load(RepoRef::new("a", "first"), "main").unwrap();
        let second = session.supersede_load(RepoRef::new("b", "second"), "main");
        assert!(second.generation() > first.generation());

        let applied = session.finish_load(second, Ok(small_tree("second"))).unwrap();
        assert_eq!(applied, LoadOutcome::Applied);

        // The older response arrives last and must not win.
        let stale = session.finish_load(first, Ok(small_tree("first"))).unwrap();
        assert_eq!(stale, LoadOutcome::Stale);
        assert_eq!(session.tree().unwrap().name(), "second");
    }

    #[test]
    fn test_stale_error_is_not_reported() {
        let mut session = DiagramSession::new();
        let first = session.begin_load(repo(), "main").unwrap();
        let _second = session.supersede_load(repo(), "dev");
        let outcome = session.finish_load(first, Err(FetchError::NetworkError("reset".into())));
        assert_eq!(outcome, Ok(LoadOutcome::Stale));
        assert!(session.is_loading());
    }

    #[test]
    fn test_apply_reports_relayout() {
        let mut session = DiagramSession::new();
        assert!(!session.apply(|s| s.with_zoom(2.0)));
        assert!(session.apply(|s| s.with_layout_mode(LayoutMode::Radial)));
        assert_eq!(session.state().layout_mode, LayoutMode::Radial);
        assert_eq!(session.state().viewport.zoom, 2.0);
    }

    #[test]
    fn test_render_follows_state() {
        let mut session = DiagramSession::new();
        let ticket = session.begin_load(repo(), "main").unwrap();
        session.finish_load(ticket, Ok(small_tree("diagram"))).unwrap();

        let params = LayoutParams::default();
        let ids = |session: &DiagramSession| -> Vec<String> {
            let render = session.render(&params).unwrap();
            render.layout.iter().map(|n| n.id.to_string()).collect()
        };
        assert_eq!(ids(&session), vec!["root", "a"]);

        assert!(session.expand_all());
        assert_eq!(ids(&session), vec!["root", "a", "a/b.txt"]);

        session.apply(|s| s.collapsed_all().with_search("b.TXT"));
        assert_eq!(ids(&session), vec!["a/b.txt"]);
    }
}
