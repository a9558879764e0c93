//! Repository statistics collection and display
//!
//! Aggregates over a loaded tree: file and directory counts, total size and
//! a rough line estimate.

use serde::Serialize;
use std::io::{self, Write};
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::{TreeNode, format_size};

/// Average bytes per line used for the line estimate.
const BYTES_PER_LINE: u64 = 50;

/// Collected statistics about a repository tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoStats {
    /// Total number of files
    pub files: usize,
    /// Total number of directories, the root included
    pub directories: usize,
    /// Sum of `size / 50` over all files
    pub estimated_lines: u64,
    /// Total size in bytes
    pub total_size: u64,
}

/// Walk `root` and aggregate its statistics.
pub fn collect_stats(root: &TreeNode) -> RepoStats {
    let mut stats = RepoStats::default();

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_dir() {
            stats.directories += 1;
            stack.extend(node.children());
            continue;
        }

        stats.files += 1;
        stats.total_size += node.size();
        stats.estimated_lines += node.size() / BYTES_PER_LINE;
    }

    stats
}

/// Print statistics to stdout with optional color.
pub fn print_stats(stats: &RepoStats, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);

    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    stdout.set_color(&bold)?;
    writeln!(stdout, "Repository Statistics")?;
    stdout.reset()?;
    writeln!(stdout, "─────────────────────")?;

    writeln!(stdout, "Files:        {} total", format_number(stats.files as u64))?;
    writeln!(stdout, "Directories:  {}", format_number(stats.directories as u64))?;
    writeln!(stdout, "Lines:        ~{}", format_number(stats.estimated_lines))?;
    writeln!(stdout, "Size:         {}", format_size(stats.total_size))?;
    Ok(())
}

/// Format a number with thousand separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }

    result
}

/// Print statistics as JSON.
pub fn print_stats_json(stats: &RepoStats) -> io::Result<()> {
    let json = serde_json::to_string_pretty(stats).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TreeEntry, build_tree};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_collect_counts_root_as_directory() {
        let tree = build_tree(
            &[
                TreeEntry::file("src/main.rs", 120),
                TreeEntry::file("src/lib.rs", 49),
                TreeEntry::file("README.md", 1000),
            ],
            "repo",
        );
        let stats = collect_stats(&tree);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 2);
        assert_eq!(stats.total_size, 1169);
        // Per file: 120/50 + 49/50 + 1000/50
        assert_eq!(stats.estimated_lines, 2 + 0 + 20);
    }

    #[test]
    fn test_empty_tree() {
        let tree = build_tree(&[], "repo");
        let stats = collect_stats(&tree);
        assert_eq!(stats.files, 0);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.estimated_lines, 0);
    }
}
