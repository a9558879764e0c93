//! Diagram formatting and display
//!
//! - `config` - Output configuration types
//! - `highlight` - Search match ranges within names
//! - `text` - Indented, optionally colored text output
//! - `json` - JSON snapshots of a render pass

mod config;
mod highlight;
mod json;
mod text;

pub use config::OutputConfig;
pub use highlight::{highlight_ranges, split_highlighted};
pub use json::{DiagramSnapshot, NodeSnapshot, print_json};
pub use text::DiagramFormatter;
