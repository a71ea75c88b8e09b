use crate::diff::DiffOptions;

/// Context lines shown around each change unless configured otherwise
pub const DEFAULT_CONTEXT: usize = 3;

/// Settings for one `ddiff` run.
///
/// Built once from the command line and handed to [`crate::Ddiff`]; nothing
/// reads configuration from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Unchanged lines shown around each change
    pub context: usize,
    /// Emit ANSI colors
    pub color: bool,
    /// Descend into subdirectories when comparing directories
    pub recursive: bool,
    /// Report differing binary files instead of skipping them silently
    pub show_binary: bool,
    /// Ignore changes in the amount of whitespace
    pub ignore_space: bool,
    /// Print a summary line after the diff
    pub show_stats: bool,
}

impl Config {
    /// The part of the configuration the diff engine needs.
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            context: self.context,
            ignore_space: self.ignore_space,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
            color: true,
            recursive: false,
            show_binary: false,
            ignore_space: false,
            show_stats: false,
        }
    }
}
