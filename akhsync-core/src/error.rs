//! Error types for akhsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while resolving the working set of a command.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project configuration file exists but could not be parsed.
    #[error("failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// `<project>/src` does not exist; nothing can run without it.
    #[error("source directory not found: {path}")]
    SourceRootMissing { path: PathBuf },

    /// An addon named on the command line has no directory under `src/`.
    #[error("addon directory not found: {path}")]
    AddonNotFound { name: String, path: PathBuf },

    /// Addon names must be a single path segment.
    #[error("invalid addon name '{name}'")]
    InvalidAddonName { name: String },

    /// `src/` exists but holds no addon directories.
    #[error("no addon directories found under {path}")]
    NoAddons { path: PathBuf },

    /// `--set-version` is not `x.y.z[-suffix]`.
    #[error("invalid version '{version}'")]
    InvalidVersion { version: String },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`CoreError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
