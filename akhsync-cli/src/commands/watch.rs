//! `akhsync watch [addon...] [-d]`

use anyhow::Result;
use clap::Args;

use akhsync_compiler::EsbuildCompiler;
use akhsync_sync::RunOptions;
use akhsync_watch::DEFAULT_COOLDOWN;

use crate::output;

/// Sync again whenever an addon's sources change.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Addon directories under src/ (default: all of them).
    pub addons: Vec<String>,

    /// Emit source maps instead of minified scripts.
    #[arg(short = 'd', long)]
    pub development: bool,
}

impl WatchArgs {
    pub async fn run(self) -> Result<()> {
        let (ctx, addons) = super::prepare(&self.addons)?;
        let compiler = EsbuildCompiler::from_context(&ctx);
        let options = RunOptions {
            development: self.development,
            ..RunOptions::default()
        };

        output::info(format!(
            "watching {} addon(s), press ctrl-c to stop",
            addons.len()
        ));
        akhsync_watch::watch(&ctx, &addons, &compiler, options, DEFAULT_COOLDOWN).await?;
        output::done("Goodbye!");
        Ok(())
    }
}
