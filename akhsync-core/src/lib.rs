//! akhsync core library — addon domain types, project configuration, path
//! resolution and addon enumeration.
//!
//! - [`types`] — addon newtype and pack-type filter
//! - [`config`] — optional `akhsync.config.*` loader
//! - [`context`] — resolved working-tree locations ([`Context`])
//! - [`addons`] — list / validate the addon directories to operate on
//! - [`version`] — package version lookup and `--set-version` validation
//! - [`error`] — [`CoreError`]

pub mod addons;
pub mod config;
pub mod context;
pub mod error;
pub mod types;
pub mod version;

pub use config::{Config, LoadedConfig};
pub use context::Context;
pub use error::CoreError;
pub use types::{AddonName, PackFilter, PackType, NAMESPACE_FLAG};
