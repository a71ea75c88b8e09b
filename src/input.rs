//! Reading files into line sequences.
//!
//! Files containing a NUL byte are treated as binary and never split into
//! lines. Text files are split on `\n` (a trailing `\r` is dropped), and a
//! final newline does not produce an empty last line.

use error_set::error_set;
use std::fs;
use std::path::Path;

error_set! {
    /// Errors from loading a file for comparison
    InputError := {
        /// The file could not be read
        #[display("reading {path}: {source}")]
        Read(std::io::Error) { path: String },
    }
}

/// Contents of one side of a file comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Raw bytes of a file that contains a NUL byte
    Binary(Vec<u8>),
    /// Lines of a text file, without line terminators
    Text(Vec<String>),
}

impl Content {
    /// Classify raw bytes as binary or text.
    ///
    /// Invalid UTF-8 in a text file is replaced rather than rejected.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if is_binary(&bytes) {
            Content::Binary(bytes)
        } else {
            Content::Text(split_lines(&String::from_utf8_lossy(&bytes)))
        }
    }
}

/// Read `path` and classify its contents.
///
/// # Errors
///
/// Returns [`InputError::Read`] when the file cannot be read.
pub fn read_content(path: &Path) -> Result<Content, InputError> {
    let bytes = fs::read(path).map_err(|source| InputError::Read {
        source,
        path: path.display().to_string(),
    })?;

    Ok(Content::from_bytes(bytes))
}

/// True when the data contains a NUL byte.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Split text into lines without terminators.
///
/// ```
/// use ddiff::input::split_lines;
///
/// assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b"]);
/// assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
/// assert!(split_lines("").is_empty());
/// ```
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Collapse every run of whitespace to a single space and drop leading and
/// trailing whitespace.
pub fn normalize_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
