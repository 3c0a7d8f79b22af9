//! Error types for akhsync-compiler.

use std::path::PathBuf;

use thiserror::Error;

/// Every compiler-side failure is fatal to the pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler executable could not be started.
    #[error("failed to start compiler '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran and reported failure.
    #[error("compiling scripts of '{addon}' failed ({status}): {stderr}")]
    Failed {
        addon: String,
        status: String,
        stderr: String,
    },

    /// `tsconfig.json` exists but could not be parsed.
    #[error("failed to parse {path}: {message}")]
    TsConfig { path: PathBuf, message: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CompileError {
    CompileError::Io {
        path: path.into(),
        source,
    }
}
