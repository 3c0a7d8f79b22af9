//! `akhsync sync [addon...] [-d] [--no-build] [-o behavior|resource]`

use anyhow::{Context as _, Result};
use clap::Args;

use akhsync_compiler::EsbuildCompiler;
use akhsync_core::PackType;
use akhsync_sync::{Pipeline, RunOptions, Stages};

use crate::output;

/// Build, then copy packs into the development pack directories.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Addon directories under src/ (default: all of them).
    pub addons: Vec<String>,

    /// Emit source maps instead of minified scripts.
    #[arg(short = 'd', long)]
    pub development: bool,

    /// Sync the existing build/ output without rebuilding.
    #[arg(long)]
    pub no_build: bool,

    /// Only sync one pack type.
    #[arg(short = 'o', long, value_name = "TYPE")]
    pub only: Option<PackType>,
}

impl SyncArgs {
    pub async fn run(self) -> Result<()> {
        let (ctx, addons) = super::prepare(&self.addons)?;
        let compiler = EsbuildCompiler::from_context(&ctx);
        let stages = if self.no_build {
            Stages::sync_without_build()
        } else {
            Stages::sync()
        };
        let options = RunOptions {
            filter: self.only.into(),
            development: self.development,
        };

        let report = Pipeline::new(&ctx, &compiler, stages)
            .run(&addons, options)
            .await
            .context("sync failed")?;

        output::print_report(&report, false);
        output::done(format!(
            "synced {} addon(s) to {}",
            addons.len(),
            ctx.sync_target_dir.display()
        ));
        Ok(())
    }
}
