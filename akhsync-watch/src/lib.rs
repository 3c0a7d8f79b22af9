//! # akhsync-watch
//!
//! Watch controller: a notify watcher over each selected addon's source
//! directory feeding a [`CooldownGate`], which decides when the sync pipeline
//! reruns. Ctrl-c ends the loop.

mod error;
pub mod gate;
mod runtime;

pub use error::WatchError;
pub use gate::{CooldownGate, GateState, DEFAULT_COOLDOWN};
pub use runtime::{drive, watch};
