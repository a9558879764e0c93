//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Show sizes next to names, with file counts for directories
    pub show_size: bool,
    /// Emphasize the parts of names that match the search query
    pub highlight: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_size: false,
            highlight: true,
        }
    }
}
