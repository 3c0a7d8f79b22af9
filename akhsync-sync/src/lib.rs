//! # akhsync-sync
//!
//! Stage clearing, build copying, verification and the sync-target copy,
//! composed by [`Pipeline`].
//!
//! Every command runs the same [`Pipeline`] with a different [`Stages`]
//! selection; see [`Stages::build`], [`Stages::sync`],
//! [`Stages::sync_without_build`] and [`Stages::clear_only`].

pub mod error;
pub mod fs_ops;
pub mod pipeline;
pub mod report;
pub mod stages;

pub use error::SyncError;
pub use pipeline::{Pipeline, RunOptions, Stages};
pub use report::{Stage, StageReport, StepOutcome, StepRecord};
