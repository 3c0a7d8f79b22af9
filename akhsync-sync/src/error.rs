//! Error types for akhsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use akhsync_compiler::CompileError;
use akhsync_core::{CoreError, PackType};

/// Errors that stop a pipeline run. Per-addon best-effort failures are not
/// errors; they are recorded as [`crate::StepOutcome`]s instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Script compilation failed.
    #[error("script compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// Working-set resolution failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The source has a pack subtree but the build root does not.
    #[error("build output missing for '{addon}' ({pack}): {path}")]
    BuildMissing {
        addon: String,
        pack: PackType,
        path: PathBuf,
    },

    /// A blocking filesystem task panicked or was cancelled.
    #[error("filesystem task failed: {0}")]
    Join(String),
}

impl SyncError {
    /// `true` when a sync was attempted without a completed build behind it.
    pub fn is_build_missing(&self) -> bool {
        matches!(self, SyncError::BuildMissing { .. })
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
