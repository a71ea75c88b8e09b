//! Writing comparison results to a terminal or any other [`Write`].
//!
//! Colors come from [`colored`]. Whether escape codes are actually emitted
//! for a colored renderer follows `colored::control`, which the binary
//! forces from `--color`.

use crate::diff::{FileDiff, LineKind};
use colored::{Color, Colorize};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// Totals accumulated over every file pair that produced hunks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Add one file diff to the totals. Empty diffs are not counted.
    pub fn record(&mut self, diff: &FileDiff) {
        if diff.is_empty() {
            return;
        }
        self.files_changed += 1;
        self.insertions += diff.insertions();
        self.deletions += diff.deletions();
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file{} changed, {} insertion{}(+), {} deletion{}(-)",
            self.files_changed,
            plural(self.files_changed),
            self.insertions,
            plural(self.insertions),
            self.deletions,
            plural(self.deletions),
        )
    }
}

/// Formats diffs and notices, optionally with ANSI colors.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Write the file header and all hunks. Writes nothing for an empty diff.
    pub fn file_diff(&self, out: &mut impl Write, diff: &FileDiff) -> io::Result<()> {
        if diff.is_empty() {
            return Ok(());
        }
        if !self.color {
            return write!(out, "{}", diff);
        }

        writeln!(out, "{}", format!("--- {}", diff.old_label).bold())?;
        writeln!(out, "{}", format!("+++ {}", diff.new_label).bold())?;
        for hunk in &diff.hunks {
            writeln!(out, "{}", hunk.header.to_string().cyan())?;
            for line in &hunk.lines {
                let text = line.to_string();
                match line.kind {
                    LineKind::Context => writeln!(out, "{}", text)?,
                    LineKind::Delete => writeln!(out, "{}", text.red())?,
                    LineKind::Insert => writeln!(out, "{}", text.green())?,
                }
            }
        }
        Ok(())
    }

    /// Notice for a file that exists only in the first tree.
    pub fn only_in_old(&self, out: &mut impl Write, path: &Path) -> io::Result<()> {
        self.notice(out, &format!("--- {}", path.display()), Color::Red)
    }

    /// Notice for a file that exists only in the second tree.
    pub fn only_in_new(&self, out: &mut impl Write, path: &Path) -> io::Result<()> {
        self.notice(out, &format!("+++ {}", path.display()), Color::Green)
    }

    pub fn binary_differ(&self, out: &mut impl Write, old: &Path, new: &Path) -> io::Result<()> {
        writeln!(
            out,
            "Binary files {} and {} differ",
            old.display(),
            new.display()
        )
    }

    pub fn stats(&self, out: &mut impl Write, stats: &DiffStats) -> io::Result<()> {
        if self.color {
            writeln!(out, "{}", stats.to_string().bold())
        } else {
            writeln!(out, "{}", stats)
        }
    }

    fn notice(&self, out: &mut impl Write, text: &str, color: Color) -> io::Result<()> {
        if self.color {
            writeln!(out, "{}", text.color(color))
        } else {
            writeln!(out, "{}", text)
        }
    }
}
