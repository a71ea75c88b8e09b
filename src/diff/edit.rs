//! Line-level edit scripts computed from a longest-common-subsequence table.
//!
//! [`diff`] compares two sequences with the classic O(n×m) dynamic program
//! and returns an ordered list of [`Edit`] operations. Concatenating the
//! `old` ranges of the Equal and Delete operations reconstructs the first
//! sequence; the `new` ranges of the Equal and Insert operations reconstruct
//! the second.
//!
//! # Examples
//!
//! ```
//! use ddiff::diff::edit::{diff, Edit, EditKind};
//!
//! let edits = diff(&["a", "b", "c"], &["a", "x", "c"]);
//! let kinds: Vec<EditKind> = edits.iter().map(|e| e.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![EditKind::Equal, EditKind::Delete, EditKind::Insert, EditKind::Equal]
//! );
//! assert_eq!(edits[1], Edit::delete(1..2, 1));
//! ```

use std::ops::Range;

/// What an [`Edit`] does to the two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Lines present unchanged on both sides
    Equal,
    /// Lines only present in the old sequence
    Delete,
    /// Lines only present in the new sequence
    Insert,
}

/// A single operation of an edit script.
///
/// Both ranges are half-open and 0-based. A Delete has an empty `new`
/// range positioned where the deletion happens on the new side, and an
/// Insert has an empty `old` range positioned likewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl Edit {
    /// A run of `len` matching lines starting at `old_start` / `new_start`.
    #[must_use]
    pub fn equal(old_start: usize, new_start: usize, len: usize) -> Self {
        Self {
            kind: EditKind::Equal,
            old: old_start..old_start + len,
            new: new_start..new_start + len,
        }
    }

    /// Removal of the `old` lines, positioned at `new_at` on the new side.
    #[must_use]
    pub fn delete(old: Range<usize>, new_at: usize) -> Self {
        Self {
            kind: EditKind::Delete,
            old,
            new: new_at..new_at,
        }
    }

    /// Addition of the `new` lines, positioned at `old_at` on the old side.
    #[must_use]
    pub fn insert(old_at: usize, new: Range<usize>) -> Self {
        Self {
            kind: EditKind::Insert,
            old: old_at..old_at,
            new,
        }
    }

    pub fn old_len(&self) -> usize {
        self.old.len()
    }

    pub fn new_len(&self) -> usize {
        self.new.len()
    }

    /// True for Delete and Insert operations.
    pub fn is_change(&self) -> bool {
        self.kind != EditKind::Equal
    }
}

/// LCS lengths for every prefix pair, stored row-major in one allocation.
struct LcsTable {
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    fn build<T: PartialEq>(old: &[T], new: &[T]) -> Self {
        let cols = new.len() + 1;
        let mut cells = vec![0; (old.len() + 1) * cols];

        for i in 1..=old.len() {
            for j in 1..=new.len() {
                cells[i * cols + j] = if old[i - 1] == new[j - 1] {
                    cells[(i - 1) * cols + j - 1] + 1
                } else {
                    cells[(i - 1) * cols + j].max(cells[i * cols + j - 1])
                };
            }
        }

        Self { cols, cells }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    /// Whether stepping back over `old[i - 1]` keeps a longest subsequence.
    /// Ties go to the deletion.
    fn prefers_delete(&self, i: usize, j: usize) -> bool {
        j == 0 || (i > 0 && self.get(i - 1, j) >= self.get(i, j - 1))
    }
}

/// Compute a minimal edit script turning `old` into `new`.
///
/// Lines are compared with `==` and nothing else. When two scripts of the
/// same length are possible the one that deletes first while walking back
/// from the end of both sequences is chosen, so the result is deterministic.
/// Inside every change region the Delete comes before the Insert.
pub fn diff<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let table = LcsTable::build(old, new);
    let matches = |i: usize, j: usize| i > 0 && j > 0 && old[i - 1] == new[j - 1];

    let mut edits = Vec::new();
    let (mut i, mut j) = (old.len(), new.len());

    while i > 0 || j > 0 {
        if matches(i, j) {
            let (end_i, end_j) = (i, j);
            while matches(i, j) {
                i -= 1;
                j -= 1;
            }
            edits.push(Edit::equal(i, j, end_i - i));
            debug_assert_eq!(end_j - j, end_i - i);
        } else if table.prefers_delete(i, j) {
            let end_i = i;
            while i > 0 && !matches(i, j) && table.prefers_delete(i, j) {
                i -= 1;
            }
            edits.push(Edit::delete(i..end_i, j));
        } else {
            let end_j = j;
            while j > 0 && !matches(i, j) && !table.prefers_delete(i, j) {
                j -= 1;
            }
            edits.push(Edit::insert(i, j..end_j));
        }
    }

    edits.reverse();
    coalesce_changes(edits)
}

/// Merge every cluster of adjacent Delete/Insert operations into one
/// Delete followed by one Insert. The matched lines are left untouched.
fn coalesce_changes(edits: Vec<Edit>) -> Vec<Edit> {
    let mut result = Vec::with_capacity(edits.len());
    let mut pending: Option<(Range<usize>, Range<usize>)> = None;

    for edit in edits {
        if edit.is_change() {
            pending = Some(match pending {
                None => (edit.old, edit.new),
                Some((old, new)) => (old.start..edit.old.end, new.start..edit.new.end),
            });
        } else {
            flush_change(&mut result, pending.take());
            result.push(edit);
        }
    }
    flush_change(&mut result, pending);

    result
}

fn flush_change(result: &mut Vec<Edit>, change: Option<(Range<usize>, Range<usize>)>) {
    let Some((old, new)) = change else {
        return;
    };

    if !old.is_empty() {
        result.push(Edit::delete(old.clone(), new.start));
    }
    if !new.is_empty() {
        result.push(Edit::insert(old.end, new));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use similar_asserts::assert_eq;

    fn rebuild_old(edits: &[Edit], old: &[u8]) -> Vec<u8> {
        edits
            .iter()
            .filter(|e| e.kind != EditKind::Insert)
            .flat_map(|e| old[e.old.clone()].iter().copied())
            .collect()
    }

    fn rebuild_new(edits: &[Edit], new: &[u8]) -> Vec<u8> {
        edits
            .iter()
            .filter(|e| e.kind != EditKind::Delete)
            .flat_map(|e| new[e.new.clone()].iter().copied())
            .collect()
    }

    fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
        let mut prev = vec![0; b.len() + 1];
        for x in a {
            let mut row = vec![0; b.len() + 1];
            for (j, y) in b.iter().enumerate() {
                row[j + 1] = if x == y {
                    prev[j] + 1
                } else {
                    prev[j + 1].max(row[j])
                };
            }
            prev = row;
        }
        prev[b.len()]
    }

    #[test]
    fn single_line_replacement() {
        let edits = diff(&["a", "b", "c"], &["a", "x", "c"]);
        assert_eq!(
            edits,
            vec![
                Edit::equal(0, 0, 1),
                Edit::delete(1..2, 1),
                Edit::insert(2, 1..2),
                Edit::equal(2, 2, 1),
            ]
        );
    }

    #[test]
    fn both_empty() {
        let edits = diff::<&str>(&[], &[]);
        assert!(edits.is_empty());
    }

    #[test]
    fn old_empty_is_one_insert() {
        let edits = diff(&[], &["a", "b"]);
        assert_eq!(edits, vec![Edit::insert(0, 0..2)]);
    }

    #[test]
    fn new_empty_is_one_delete() {
        let edits = diff(&["a", "b", "c"], &[]);
        assert_eq!(edits, vec![Edit::delete(0..3, 0)]);
    }

    #[test]
    fn identical_is_one_equal() {
        let lines = ["a", "b", "c", "d", "e"];
        assert_eq!(diff(&lines, &lines), vec![Edit::equal(0, 0, 5)]);
    }

    #[test]
    fn tie_keeps_the_earlier_line() {
        // Either "a" or "b" can be the common line; walking back from the
        // end deletes "b" first, so "a" is the one kept.
        let edits = diff(&["a", "b"], &["b", "a"]);
        assert_eq!(
            edits,
            vec![
                Edit::insert(0, 0..1),
                Edit::equal(0, 1, 1),
                Edit::delete(1..2, 2),
            ]
        );
    }

    #[test]
    fn whitespace_is_significant() {
        let edits = diff(&["a  b"], &["a b"]);
        assert_eq!(edits, vec![Edit::delete(0..1, 0), Edit::insert(1, 0..1)]);
    }

    #[test]
    fn interleaved_changes_are_coalesced() {
        let old = ["x", "1", "2", "y"];
        let new = ["x", "3", "4", "5", "y"];
        assert_eq!(
            diff(&old, &new),
            vec![
                Edit::equal(0, 0, 1),
                Edit::delete(1..3, 1),
                Edit::insert(3, 1..4),
                Edit::equal(3, 4, 1),
            ]
        );
    }

    #[test]
    fn pure_insertion_in_middle() {
        let edits = diff(&["a", "c"], &["a", "b", "c"]);
        assert_eq!(
            edits,
            vec![
                Edit::equal(0, 0, 1),
                Edit::insert(1, 1..2),
                Edit::equal(1, 2, 1),
            ]
        );
    }

    #[test]
    fn works_on_owned_strings() {
        let old: Vec<String> = vec!["one".into(), "two".into()];
        let new: Vec<String> = vec!["one".into(), "three".into()];
        let edits = diff(&old, &new);
        assert_eq!(edits.len(), 3);
        assert_eq!(edits[0], Edit::equal(0, 0, 1));
    }

    proptest! {
        #[test]
        fn reconstructs_both_sides(
            old in prop::collection::vec(0u8..4, 0..24),
            new in prop::collection::vec(0u8..4, 0..24),
        ) {
            let edits = diff(&old, &new);
            let rebuilt_old = rebuild_old(&edits, &old);
            let rebuilt_new = rebuild_new(&edits, &new);
            prop_assert_eq!(rebuilt_old, old.clone());
            prop_assert_eq!(rebuilt_new, new.clone());
        }

        #[test]
        fn ranges_are_contiguous_and_well_formed(
            old in prop::collection::vec(0u8..4, 0..24),
            new in prop::collection::vec(0u8..4, 0..24),
        ) {
            let edits = diff(&old, &new);
            let (mut at_old, mut at_new) = (0, 0);
            for edit in &edits {
                prop_assert_eq!(edit.old.start, at_old);
                prop_assert_eq!(edit.new.start, at_new);
                prop_assert!(edit.old_len() + edit.new_len() > 0);
                match edit.kind {
                    EditKind::Equal => {
                        prop_assert_eq!(edit.old_len(), edit.new_len());
                        prop_assert_eq!(&old[edit.old.clone()], &new[edit.new.clone()]);
                    }
                    EditKind::Delete => prop_assert_eq!(edit.new_len(), 0),
                    EditKind::Insert => prop_assert_eq!(edit.old_len(), 0),
                }
                at_old = edit.old.end;
                at_new = edit.new.end;
            }
            prop_assert_eq!(at_old, old.len());
            prop_assert_eq!(at_new, new.len());
        }

        #[test]
        fn script_is_minimal(
            old in prop::collection::vec(0u8..4, 0..24),
            new in prop::collection::vec(0u8..4, 0..24),
        ) {
            let edits = diff(&old, &new);
            let kept: usize = edits
                .iter()
                .filter(|e| e.kind == EditKind::Equal)
                .map(Edit::old_len)
                .sum();
            prop_assert_eq!(kept, lcs_len(&old, &new));
        }

        #[test]
        fn runs_are_maximal_and_deletes_lead(
            old in prop::collection::vec(0u8..4, 0..24),
            new in prop::collection::vec(0u8..4, 0..24),
        ) {
            let edits = diff(&old, &new);
            for pair in edits.windows(2) {
                prop_assert_ne!(pair[0].kind, pair[1].kind);
                prop_assert!(
                    !(pair[0].kind == EditKind::Insert && pair[1].kind == EditKind::Delete)
                );
            }
        }

        #[test]
        fn identity_is_single_equal(lines in prop::collection::vec(0u8..4, 1..24)) {
            prop_assert_eq!(diff(&lines, &lines), vec![Edit::equal(0, 0, lines.len())]);
        }
    }
}
