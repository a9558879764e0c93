//! Indented text rendering of a laid-out diagram

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::session::Render;
use crate::state::{DiagramState, LayoutMode};
use crate::tree::{ACCENT_COUNT, accent_index, count_files, format_size};
use crate::visibility::VisibleNode;

use super::config::OutputConfig;
use super::highlight::{highlight_ranges, split_highlighted};

/// Directory colors by depth; the root is always blue.
const ACCENTS: [Color; ACCENT_COUNT] = [
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Red,
];

/// Formatter for the visible part of a diagram, one node per line in tree
/// order, indented by level and followed by its layout position.
pub struct DiagramFormatter {
    config: OutputConfig,
}

impl DiagramFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render to a plain string, without colors.
    pub fn format(&self, title: &str, state: &DiagramState, render: &Render<'_>) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing to a Vec cannot fail.
        let _ = self.write(&mut out, title, state, render);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    pub fn print(&self, title: &str, state: &DiagramState, render: &Render<'_>) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, title, state, render)
    }

    pub fn write<W: WriteColor>(
        &self,
        out: &mut W,
        title: &str,
        state: &DiagramState,
        render: &Render<'_>,
    ) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "{}", title)?;
        out.reset()?;
        writeln!(out, "  ({} layout)", mode_name(render.layout.mode()))?;

        let mut dir_count = 0;
        let mut file_count = 0;
        for visible in render.visible.iter() {
            if !visible.id.is_root() {
                if visible.node.is_dir() {
                    dir_count += 1;
                } else {
                    file_count += 1;
                }
            }
            self.write_node(out, visible, state, render)?;
        }

        writeln!(out)?;
        writeln!(out, "{} directories, {} files visible", dir_count, file_count)?;
        if let Some(bounds) = render.layout.bounds() {
            writeln!(
                out,
                "bounds: {:.1} x {:.1} at ({:.1}, {:.1})",
                bounds.width, bounds.height, bounds.x, bounds.y
            )?;
        }
        Ok(())
    }

    fn write_node<W: WriteColor>(
        &self,
        out: &mut W,
        visible: &VisibleNode<'_>,
        state: &DiagramState,
        render: &Render<'_>,
    ) -> io::Result<()> {
        let node = visible.node;
        write!(out, "{:indent$}", "", indent = visible.level * 2)?;

        let marker = match (node.is_dir(), state.is_expanded(&visible.id)) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        write!(out, "{}", marker)?;

        let mut name_color = ColorSpec::new();
        if node.is_dir() {
            let color = accent_index(visible.level).map_or(Color::Blue, |i| ACCENTS[i]);
            name_color.set_fg(Some(color)).set_bold(true);
        } else {
            name_color.set_fg(Some(Color::White));
        }

        let ranges = if self.config.highlight && visible.matched {
            highlight_ranges(node.name(), &state.search_query)
        } else {
            Vec::new()
        };
        for (text, is_match) in split_highlighted(node.name(), &ranges) {
            if is_match {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            } else {
                out.set_color(&name_color)?;
            }
            write!(out, "{}", text)?;
        }
        if node.is_dir() {
            write!(out, "/")?;
        }
        out.reset()?;

        if let Some(placed) = render.layout.get(&visible.id) {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "  ({:.1}, {:.1})", placed.x, placed.y)?;
            out.reset()?;
        }

        if self.config.show_size {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            if node.is_dir() {
                write!(
                    out,
                    "  [{}, {} files]",
                    format_size(node.size()),
                    count_files(node)
                )?;
            } else if node.mode().is_empty() {
                write!(out, "  [{}]", format_size(node.size()))?;
            } else {
                write!(out, "  [{}, mode {}]", format_size(node.size()), node.mode())?;
            }
            out.reset()?;
        }

        writeln!(out)
    }
}

fn mode_name(mode: LayoutMode) -> &'static str {
    match mode {
        LayoutMode::Tree => "tree",
        LayoutMode::Horizontal => "horizontal",
        LayoutMode::Radial => "radial",
    }
}
