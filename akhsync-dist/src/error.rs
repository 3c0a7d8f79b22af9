use std::path::PathBuf;

use thiserror::Error;

use akhsync_sync::SyncError;

use crate::nbt::NbtError;

#[derive(Debug, Error)]
pub enum DistError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("failed to write archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to patch {path}: {source}")]
    LevelDat {
        path: PathBuf,
        #[source]
        source: NbtError,
    },

    /// The world directory does not exist.
    #[error("world directory not found: {path}")]
    WorldMissing {
        path: PathBuf,
        /// Where the game keeps its worlds, for the hint.
        worlds_dir: PathBuf,
    },

    /// The world directory exists but is not a world save.
    #[error("world directory {path} is missing: {}", missing.join(", "))]
    WorldIncomplete {
        path: PathBuf,
        missing: Vec<&'static str>,
        worlds_dir: PathBuf,
    },

    #[error("filesystem task failed: {0}")]
    Join(String),
}

impl DistError {
    /// Game worlds directory to suggest when the world save is unusable.
    pub fn worlds_dir(&self) -> Option<&PathBuf> {
        match self {
            DistError::WorldMissing { worlds_dir, .. }
            | DistError::WorldIncomplete { worlds_dir, .. } => Some(worlds_dir),
            _ => None,
        }
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DistError {
    DistError::Io {
        path: path.into(),
        source,
    }
}
