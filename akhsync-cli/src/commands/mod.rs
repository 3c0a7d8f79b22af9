pub mod build;
pub mod clear;
pub mod dist;
pub mod sync;
pub mod watch;

use anyhow::Result;

use akhsync_core::{addons, AddonName, Context};

/// Resolve the project in the current directory and the addons to work on.
pub(crate) fn prepare(names: &[String]) -> Result<(Context, Vec<AddonName>)> {
    let ctx = Context::resolve()?;
    let addons = addons::select(&ctx, names)?;
    Ok((ctx, addons))
}
