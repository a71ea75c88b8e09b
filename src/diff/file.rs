use super::edit::diff;
use super::hunk::{Hunk, assemble};
use crate::input::normalize_whitespace;
use std::fmt;

/// How two line sequences are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Unchanged lines shown around each change
    pub context: usize,
    /// Compare lines with runs of whitespace collapsed
    pub ignore_space: bool,
}

/// A complete unified diff for one pair of files.
///
/// Renders as the `--- old` / `+++ new` header followed by every hunk.
/// A diff without hunks renders as nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Label printed after `---`
    pub old_label: String,
    /// Label printed after `+++`
    pub new_label: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Diff two line sequences and assemble the hunks.
    ///
    /// With `ignore_space` the comparison runs on normalized copies of the
    /// lines, while the hunks still show the lines as written.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddiff::diff::file::{DiffOptions, FileDiff};
    ///
    /// let options = DiffOptions { context: 3, ignore_space: false };
    /// let diff = FileDiff::between("a.txt", "b.txt", &["one", "two"], &["one", "2"], options);
    ///
    /// assert_eq!(
    ///     diff.to_string(),
    ///     "--- a.txt\n+++ b.txt\n@@ -1,2 +1,2 @@\n one\n-two\n+2\n"
    /// );
    /// ```
    #[must_use]
    pub fn between<S: AsRef<str>>(
        old_label: impl Into<String>,
        new_label: impl Into<String>,
        old: &[S],
        new: &[S],
        options: DiffOptions,
    ) -> Self {
        let edits = if options.ignore_space {
            let old_keys: Vec<String> = old.iter().map(|l| normalize_whitespace(l.as_ref())).collect();
            let new_keys: Vec<String> = new.iter().map(|l| normalize_whitespace(l.as_ref())).collect();
            diff(&old_keys, &new_keys)
        } else {
            let old_keys: Vec<&str> = old.iter().map(AsRef::as_ref).collect();
            let new_keys: Vec<&str> = new.iter().map(AsRef::as_ref).collect();
            diff(&old_keys, &new_keys)
        };

        FileDiff {
            old_label: old_label.into(),
            new_label: new_label.into(),
            hunks: assemble(old, new, &edits, options.context),
        }
    }

    /// True when the two sides compared equal.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn insertions(&self) -> usize {
        self.hunks.iter().map(Hunk::insertions).sum()
    }

    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(Hunk::deletions).sum()
    }
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        writeln!(f, "--- {}", self.old_label)?;
        writeln!(f, "+++ {}", self.new_label)?;
        for hunk in &self.hunks {
            write!(f, "{}", hunk)?;
        }
        Ok(())
    }
}
