//! Blocking filesystem primitives used by every stage.
//!
//! These run on the blocking pool via [`run_blocking`]; nothing in here is
//! async.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};
use crate::report::StepOutcome;

/// Counts reported by [`copy_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

/// Recursively copy `src` into `dest`, overwriting files that already exist.
///
/// `skip_dir` is consulted for every directory below `src`; returning `true`
/// leaves that directory (and everything inside it) out of the copy.
///
/// Symlinks are followed. A directory whose real path was already copied is
/// left out, so a link back up the tree is copied at most once.
pub fn copy_tree<F>(src: &Path, dest: &Path, skip_dir: F) -> Result<CopyStats, SyncError>
where
    F: Fn(&Path) -> bool,
{
    let mut stats = CopyStats::default();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dest.to_path_buf())];

    while let Some((from_dir, to_dir)) = stack.pop() {
        let real = fs::canonicalize(&from_dir).map_err(|e| io_err(&from_dir, e))?;
        if !visited.insert(real) {
            tracing::warn!(
                path = %from_dir.display(),
                "skipped directory already copied through a symlink"
            );
            continue;
        }
        fs::create_dir_all(&to_dir).map_err(|e| io_err(&to_dir, e))?;
        stats.dirs += 1;

        let entries = fs::read_dir(&from_dir).map_err(|e| io_err(&from_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&from_dir, e))?;
            let path = entry.path();
            let target = to_dir.join(entry.file_name());
            // Follow symlinks so linked packs are copied by content.
            let meta = fs::metadata(&path).map_err(|e| io_err(&path, e))?;

            if meta.is_dir() {
                if skip_dir(&path) {
                    tracing::debug!(path = %path.display(), "skipped directory");
                    continue;
                }
                stack.push((path, target));
            } else {
                fs::copy(&path, &target).map_err(|e| io_err(&target, e))?;
                stats.files += 1;
            }
        }
    }
    Ok(stats)
}

/// Copy everything.
pub fn copy_all(src: &Path, dest: &Path) -> Result<CopyStats, SyncError> {
    copy_tree(src, dest, |_| false)
}

/// Remove `path` and everything below it.
///
/// A missing path is [`StepOutcome::Skipped`]; any other failure (typically a
/// file held open by the game) is [`StepOutcome::Failed`]. Neither is an error.
pub fn remove_tree(path: &Path) -> StepOutcome {
    match fs::remove_dir_all(path) {
        Ok(()) => StepOutcome::Done,
        Err(e) if e.kind() == io::ErrorKind::NotFound => StepOutcome::Skipped {
            reason: "not present".to_string(),
        },
        Err(e) => StepOutcome::Failed {
            error: e.to_string(),
        },
    }
}

/// Run blocking filesystem work on tokio's blocking pool.
pub async fn run_blocking<T, F>(f: F) -> Result<T, SyncError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SyncError::Join(e.to_string()))
}
