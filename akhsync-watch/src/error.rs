use thiserror::Error;

/// Errors that stop the watch controller. A failed pipeline run is not one of
/// them; it is logged and watching continues.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("nothing to watch: no addon source directories exist")]
    NothingToWatch,
}
