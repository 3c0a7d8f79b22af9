//! `akhsync dist [addon...] [-t world|addon]... [--set-version v] [--set-world-name tpl]`

use anyhow::{Context as _, Result};
use clap::Args;

use akhsync_compiler::EsbuildCompiler;
use akhsync_core::version::{package_version_at, validate_version};
use akhsync_dist::{DistKind, DistOptions, DEFAULT_WORLD_NAME_TEMPLATE};

use crate::output;

/// Build and package addons as .mcaddon and/or a .mcworld.
#[derive(Args, Debug)]
pub struct DistArgs {
    /// Addon directories under src/ (default: all of them).
    pub addons: Vec<String>,

    /// What to produce; repeatable.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        num_args = 1..,
        default_values_t = [DistKind::Addon],
    )]
    pub kinds: Vec<DistKind>,

    /// Version for archive names (default: package.json version).
    #[arg(long, value_name = "VERSION")]
    pub set_version: Option<String>,

    /// World display name; {name} is the project directory, {version} the version.
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_WORLD_NAME_TEMPLATE)]
    pub set_world_name: String,
}

impl DistArgs {
    pub async fn run(self) -> Result<()> {
        if let Some(version) = &self.set_version {
            validate_version(version)?;
        }

        let (ctx, addons) = super::prepare(&self.addons)?;
        let version = self
            .set_version
            .unwrap_or_else(|| package_version_at(&ctx.project_root));

        let mut kinds: Vec<DistKind> = Vec::new();
        for kind in self.kinds {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        let options = DistOptions {
            kinds,
            version,
            world_name_template: self.set_world_name,
        };

        let compiler = EsbuildCompiler::from_context(&ctx);
        let report = akhsync_dist::dist(&ctx, &addons, &compiler, &options)
            .await
            .context("dist failed")?;

        output::print_report(&report.build, false);
        for archive in &report.archives {
            output::done(format!(
                "{} ({} files, {} bytes)",
                archive.path.display(),
                archive.stats.files,
                archive.stats.bytes
            ));
        }
        Ok(())
    }
}
