//! repo-diagram - Browse a hosted repository's file tree as a laid-out diagram

pub mod client;
pub mod error;
pub mod layout;
pub mod output;
pub mod repo_ref;
pub mod session;
pub mod state;
pub mod stats;
pub mod tree;
pub mod visibility;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{ClientConfig, RepoClient, TreeListing};
pub use error::{FetchError, RepoRefError};
pub use layout::{Bounds, Edge, LayoutParams, LayoutResult, PlacedNode, Point, compute_layout};
pub use output::{DiagramFormatter, DiagramSnapshot, OutputConfig, highlight_ranges, print_json};
pub use repo_ref::RepoRef;
pub use session::{DiagramSession, LoadError, LoadOutcome, LoadTicket, Render};
pub use state::{DiagramState, LayoutMode, Viewport};
pub use stats::{RepoStats, collect_stats, print_stats, print_stats_json};
pub use tree::{EntryFilter, EntryKind, NodeId, TreeEntry, TreeNode, build_tree};
pub use visibility::{VisibleNode, VisibleSet, compute_visible};
