//! `akhsync async [addon...] [-o behavior|resource]`: undo a sync.

use anyhow::{Context as _, Result};
use clap::Args;

use akhsync_compiler::EsbuildCompiler;
use akhsync_core::PackType;
use akhsync_sync::{Pipeline, RunOptions, Stages};

use crate::output;

/// Remove this tool's entries from the development pack directories.
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Addon directories under src/ (default: all of them).
    pub addons: Vec<String>,

    /// Only remove one pack type.
    #[arg(short = 'o', long, value_name = "TYPE")]
    pub only: Option<PackType>,
}

impl ClearArgs {
    pub async fn run(self) -> Result<()> {
        let (ctx, addons) = super::prepare(&self.addons)?;
        // Never invoked: the clear-only stage set has no compile stage.
        let compiler = EsbuildCompiler::from_context(&ctx);
        let options = RunOptions {
            filter: self.only.into(),
            development: false,
        };

        let report = Pipeline::new(&ctx, &compiler, Stages::clear_only())
            .run(&addons, options)
            .await
            .context("async failed")?;

        output::print_report(&report, true);
        Ok(())
    }
}
