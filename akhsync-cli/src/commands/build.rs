//! `akhsync build [addon...] [-d] [-o behavior|resource]`

use anyhow::{Context as _, Result};
use clap::Args;

use akhsync_compiler::EsbuildCompiler;
use akhsync_core::PackType;
use akhsync_sync::{Pipeline, RunOptions, Stages};

use crate::output;

/// Compile scripts and stage packs under build/.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Addon directories under src/ (default: all of them).
    pub addons: Vec<String>,

    /// Emit source maps instead of minified scripts.
    #[arg(short = 'd', long)]
    pub development: bool,

    /// Only build one pack type.
    #[arg(short = 'o', long, value_name = "TYPE")]
    pub only: Option<PackType>,
}

impl BuildArgs {
    pub async fn run(self) -> Result<()> {
        let (ctx, addons) = super::prepare(&self.addons)?;
        let compiler = EsbuildCompiler::from_context(&ctx);
        let options = RunOptions {
            filter: self.only.into(),
            development: self.development,
        };

        let report = Pipeline::new(&ctx, &compiler, Stages::build())
            .run(&addons, options)
            .await
            .context("build failed")?;

        output::print_report(&report, false);
        output::done(format!(
            "built {} addon(s) into {}",
            addons.len(),
            ctx.build_dir.display()
        ));
        Ok(())
    }
}
