use error_set::error_set;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs::{self, Metadata};
use std::io::Write;
use std::path::Path;

pub mod config;
pub mod diff;
pub mod input;
pub mod render;
pub mod walk;

pub use config::Config;
pub use diff::{FileDiff, Hunk, HunkHeader};
pub use input::InputError;
pub use render::{DiffStats, Renderer};
pub use walk::WalkError;

use input::Content;

error_set! {
    /// Top-level error for a ddiff run
    DdiffError := {
        #[display("Error accessing {path}: {source}")]
        Access(std::io::Error) { path: String },
        #[display("Cannot compare file with directory")]
        Mismatch,
        #[display("Error comparing files: {0}")]
        InputError(InputError),
        #[display("Error comparing directories: {0}")]
        WalkError(WalkError),
    } || CompareError

    /// Errors from comparing a single pair of files
    CompareError := {
        InputError(InputError),
        #[display("Failed to write output: {0}")]
        Io(std::io::Error),
    }
}

/// Compares two files or two directory trees and writes unified diffs.
///
/// Diff output goes to `out`; per-file problems met while walking a
/// directory tree are reported on `err` and do not stop the walk.
///
/// # Examples
/// ```no_run
/// # use ddiff::{Config, Ddiff};
/// # use std::path::Path;
/// let mut ddiff = Ddiff::new(Config::default(), std::io::stdout(), std::io::stderr());
/// ddiff.run(Path::new("old.txt"), Path::new("new.txt")).unwrap();
/// ddiff.run(Path::new("old_dir"), Path::new("new_dir")).unwrap();
/// ```
pub struct Ddiff<W, E> {
    config: Config,
    renderer: Renderer,
    stats: DiffStats,
    out: W,
    err: E,
}

impl<W: Write, E: Write> Ddiff<W, E> {
    pub fn new(config: Config, out: W, err: E) -> Self {
        Self {
            renderer: Renderer::new(config.color),
            config,
            stats: DiffStats::default(),
            out,
            err,
        }
    }

    /// Compare `path1` with `path2`, which must both be files or both be
    /// directories.
    ///
    /// Finding differences is not an error. Statistics start from zero on
    /// every call.
    pub fn run(&mut self, path1: &Path, path2: &Path) -> Result<(), DdiffError> {
        self.stats = DiffStats::default();

        let meta1 = access(path1)?;
        let meta2 = access(path2)?;

        match (meta1.is_dir(), meta2.is_dir()) {
            (true, true) => self.compare_dirs(path1, path2)?,
            (false, false) => self.compare_files(path1, path2)?,
            _ => return Err(DdiffError::Mismatch),
        }

        if self.config.show_stats {
            self.renderer
                .stats(&mut self.out, &self.stats)
                .map_err(CompareError::from)?;
        }

        Ok(())
    }

    /// Totals for the most recent [`Ddiff::run`]
    pub fn stats(&self) -> &DiffStats {
        &self.stats
    }

    /// Give back the output and error writers.
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }

    fn compare_files(&mut self, path1: &Path, path2: &Path) -> Result<(), CompareError> {
        let content1 = input::read_content(path1)?;
        let content2 = input::read_content(path2)?;

        match (content1, content2) {
            (Content::Text(lines1), Content::Text(lines2)) => {
                let diff = FileDiff::between(
                    path1.display().to_string(),
                    path2.display().to_string(),
                    &lines1,
                    &lines2,
                    self.config.diff_options(),
                );
                debug!(
                    "{} vs {}: {} hunk(s)",
                    path1.display(),
                    path2.display(),
                    diff.hunks.len()
                );
                self.stats.record(&diff);
                self.renderer.file_diff(&mut self.out, &diff)?;
                Ok(())
            }
            (content1, content2) => {
                debug!(
                    "{} vs {}: binary content",
                    path1.display(),
                    path2.display()
                );
                if self.config.show_binary && content1 != content2 {
                    self.renderer.binary_differ(&mut self.out, path1, path2)?;
                }
                Ok(())
            }
        }
    }

    fn compare_dirs(&mut self, dir1: &Path, dir2: &Path) -> Result<(), DdiffError> {
        let files1 = walk::list_files(dir1, self.config.recursive)?;
        let files2 = walk::list_files(dir2, self.config.recursive)?;

        let all_files: BTreeSet<_> = files1.into_iter().chain(files2).collect();

        for relative in &all_files {
            let path1 = dir1.join(relative);
            let path2 = dir2.join(relative);

            let written = match (fs::metadata(&path1), fs::metadata(&path2)) {
                (Err(_), Err(_)) => continue,
                (Err(_), Ok(_)) => self.renderer.only_in_new(&mut self.out, &path2),
                (Ok(_), Err(_)) => self.renderer.only_in_old(&mut self.out, &path1),
                (Ok(meta1), Ok(meta2)) => {
                    if meta1.is_dir() || meta2.is_dir() {
                        continue;
                    }
                    if unchanged(&meta1, &meta2) {
                        debug!("{}: same size and mtime, skipped", relative.display());
                        continue;
                    }

                    match self.compare_files(&path1, &path2) {
                        Ok(()) => Ok(()),
                        Err(e @ CompareError::Io(_)) => return Err(e.into()),
                        Err(e) => {
                            warn!("{}: {}", relative.display(), e);
                            writeln!(self.err, "Error comparing {}: {}", relative.display(), e)
                        }
                    }
                }
            };

            written.map_err(CompareError::from)?;
        }

        Ok(())
    }
}

fn access(path: &Path) -> Result<Metadata, DdiffError> {
    fs::metadata(path).map_err(|source| DdiffError::Access {
        source,
        path: path.display().to_string(),
    })
}

/// Files with the same size and modification time are assumed identical.
fn unchanged(meta1: &Metadata, meta2: &Metadata) -> bool {
    meta1.len() == meta2.len()
        && matches!((meta1.modified(), meta2.modified()), (Ok(a), Ok(b)) if a == b)
}
