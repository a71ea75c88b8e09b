use super::edit::{Edit, EditKind};
use error_set::error_set;
use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{map_res, opt},
    sequence::preceded,
};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

error_set! {
    /// Errors from reading a rendered hunk header back
    HeaderError := {
        /// Text does not have the `@@ -s,l +s,l @@` shape
        #[display("Malformed hunk header '{header}'")]
        Malformed { header: String },
    }
}

/// Coordinates of a hunk as printed in its `@@` line.
///
/// Starts are 1-based. A side with zero length reports the line after
/// which the change happens, so an insertion into an empty file is
/// `-0,0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

impl HunkHeader {
    /// Build the header for 0-based half-open windows on both sides.
    #[must_use]
    pub fn from_windows(old: &Range<usize>, new: &Range<usize>) -> Self {
        Self {
            old_start: display_start(old),
            old_len: old.len(),
            new_start: display_start(new),
            new_len: new.len(),
        }
    }
}

fn display_start(window: &Range<usize>) -> usize {
    if window.is_empty() {
        window.start
    } else {
        window.start + 1
    }
}

impl fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        )
    }
}

impl FromStr for HunkHeader {
    type Err = HeaderError;

    /// Read a header back from rendered diff text, such as ddiff's own
    /// output or a patch produced by another tool.
    ///
    /// Accepts `@@ -s[,l] +s[,l] @@` followed by nothing or an optional
    /// section heading. A missing length means one line.
    ///
    /// ```
    /// use ddiff::HunkHeader;
    ///
    /// let header: HunkHeader = "@@ -3,2 +3 @@ fn main()".parse().unwrap();
    /// assert_eq!((header.old_start, header.old_len), (3, 2));
    /// assert_eq!((header.new_start, header.new_len), (3, 1));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match header(s) {
            Ok((rest, parsed)) if rest.is_empty() || rest.starts_with(' ') => Ok(parsed),
            _ => Err(HeaderError::Malformed {
                header: s.to_string(),
            }),
        }
    }
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>).parse(input)
}

fn range(input: &str) -> IResult<&str, (usize, usize)> {
    (number, opt(preceded(char(','), number)))
        .map(|(start, len)| (start, len.unwrap_or(1)))
        .parse(input)
}

fn header(input: &str) -> IResult<&str, HunkHeader> {
    let (rest, (_, (old_start, old_len), _, (new_start, new_len), _)) =
        (tag("@@ -"), range, tag(" +"), range, tag(" @@")).parse(input)?;

    Ok((
        rest,
        HunkHeader {
            old_start,
            old_len,
            new_start,
            new_len,
        },
    ))
}

/// Role of a line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Delete,
    Insert,
}

impl LineKind {
    /// The single-character marker written in front of the line.
    pub fn prefix(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Delete => '-',
            LineKind::Insert => '+',
        }
    }
}

/// One rendered line of a hunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub kind: LineKind,
    pub content: String,
}

impl fmt::Display for HunkLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.content)
    }
}

/// A change region plus its surrounding context, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: HunkHeader,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Prefixed lines without the header, e.g. `[" a", "-b", "+x"]`.
    pub fn rendered_lines(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }

    pub fn insertions(&self) -> usize {
        self.count(LineKind::Insert)
    }

    pub fn deletions(&self) -> usize {
        self.count(LineKind::Delete)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|line| line.kind == kind).count()
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Group an edit script into unified-diff hunks.
///
/// A hunk starts at the first change and keeps absorbing edits while the
/// unchanged runs between changes are shorter than `2 * context`. A longer
/// run ends the hunk. Each hunk is then widened by `context` lines on both
/// sides, clipped to the sequences.
///
/// Identical inputs (no Delete or Insert in `edits`) produce no hunks.
///
/// # Examples
///
/// ```
/// use ddiff::diff::{edit::diff, hunk::assemble};
///
/// let old = ["a", "b", "c"];
/// let new = ["a", "x", "c"];
/// let hunks = assemble(&old, &new, &diff(&old, &new), 1);
///
/// assert_eq!(hunks.len(), 1);
/// assert_eq!(hunks[0].header.to_string(), "@@ -1,3 +1,3 @@");
/// assert_eq!(hunks[0].rendered_lines(), vec![" a", "-b", "+x", " c"]);
/// ```
pub fn assemble<S: AsRef<str>>(old: &[S], new: &[S], edits: &[Edit], context: usize) -> Vec<Hunk> {
    group_changes(edits, context)
        .into_iter()
        .map(|group| build_hunk(old, new, group, context))
        .collect()
}

/// Split `edits` into slices that each become one hunk. Every slice starts
/// and ends with a change.
fn group_changes(edits: &[Edit], context: usize) -> Vec<&[Edit]> {
    let boundary = context.saturating_mul(2);
    let mut groups = Vec::new();
    let mut idx = 0;

    while idx < edits.len() {
        if !edits[idx].is_change() {
            idx += 1;
            continue;
        }

        let start = idx;
        let mut end = idx + 1;
        let mut cursor = end;

        while cursor < edits.len() {
            if edits[cursor].is_change() {
                cursor += 1;
                end = cursor;
                continue;
            }

            // Unchanged run: absorb it only when another change follows
            // and the run is too short to separate the two.
            let run_end = edits[cursor..]
                .iter()
                .position(Edit::is_change)
                .map(|offset| cursor + offset);
            let Some(run_end) = run_end else {
                break;
            };
            let gap: usize = edits[cursor..run_end].iter().map(Edit::old_len).sum();
            if gap >= boundary {
                break;
            }
            cursor = run_end;
        }

        groups.push(&edits[start..end]);
        idx = end;
    }

    groups
}

fn build_hunk<S: AsRef<str>>(old: &[S], new: &[S], group: &[Edit], context: usize) -> Hunk {
    let (first, last) = (&group[0], &group[group.len() - 1]);
    let old_span = first.old.start..last.old.end;
    let new_span = first.new.start..last.new.end;

    let old_window = widen(&old_span, context, old.len());
    let new_window = widen(&new_span, context, new.len());

    let mut lines = Vec::with_capacity(old_window.len() + new_span.len());
    push_lines(&mut lines, LineKind::Context, &old[old_window.start..old_span.start]);
    for edit in group {
        match edit.kind {
            EditKind::Equal => push_lines(&mut lines, LineKind::Context, &old[edit.old.clone()]),
            EditKind::Delete => push_lines(&mut lines, LineKind::Delete, &old[edit.old.clone()]),
            EditKind::Insert => push_lines(&mut lines, LineKind::Insert, &new[edit.new.clone()]),
        }
    }
    push_lines(&mut lines, LineKind::Context, &old[old_span.end..old_window.end]);

    Hunk {
        header: HunkHeader::from_windows(&old_window, &new_window),
        lines,
    }
}

fn widen(span: &Range<usize>, context: usize, len: usize) -> Range<usize> {
    span.start.saturating_sub(context)..span.end.saturating_add(context).min(len)
}

fn push_lines<S: AsRef<str>>(lines: &mut Vec<HunkLine>, kind: LineKind, source: &[S]) {
    lines.extend(source.iter().map(|line| HunkLine {
        kind,
        content: line.as_ref().to_string(),
    }));
}
