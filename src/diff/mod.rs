//! The line diff engine.
//!
//! - [`edit`]: minimal edit scripts from an LCS table
//! - [`hunk`]: grouping of edit scripts into unified-diff hunks
//! - [`file`]: a labelled pair of files and their hunks

pub mod edit;
pub mod file;
pub mod hunk;

pub use edit::{Edit, EditKind, diff};
pub use file::{DiffOptions, FileDiff};
pub use hunk::{Hunk, HunkHeader, HunkLine, LineKind, assemble};
