//! The single pipeline every command runs, configured by [`Stages`].
//!
//! Stage order is fixed: clear (sync target and build, concurrently) → copy
//! to build → script assets + compile (concurrently) → verify → sync copy.
//! A disabled stage is simply not run.

use futures_util::future::join_all;

use akhsync_compiler::{compile_addon, CompileOutcome, PathAliases, ScriptCompiler};
use akhsync_core::{AddonName, Context, PackFilter, PackType};

use crate::error::SyncError;
use crate::report::StageReport;
use crate::stages;

/// Which stages a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stages {
    pub clear_sync_target: bool,
    pub clear_build: bool,
    pub copy_to_build: bool,
    pub compile: bool,
    pub verify: bool,
    pub sync_copy: bool,
}

impl Stages {
    /// `build` (also the first half of `dist`).
    pub const fn build() -> Self {
        Self {
            clear_sync_target: true,
            clear_build: true,
            copy_to_build: true,
            compile: true,
            verify: false,
            sync_copy: false,
        }
    }

    /// `sync` and every `watch` run.
    pub const fn sync() -> Self {
        Self {
            verify: true,
            sync_copy: true,
            ..Self::build()
        }
    }

    /// `sync --no-build`: ship whatever is already in the build root.
    pub const fn sync_without_build() -> Self {
        Self {
            clear_sync_target: true,
            clear_build: false,
            copy_to_build: false,
            compile: false,
            verify: true,
            sync_copy: true,
        }
    }

    /// `async`: remove the synced entries and nothing else.
    pub const fn clear_only() -> Self {
        Self {
            clear_sync_target: true,
            clear_build: false,
            copy_to_build: false,
            compile: false,
            verify: false,
            sync_copy: false,
        }
    }
}

/// Per-invocation options that do not change which stages run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub filter: PackFilter,
    /// Source maps instead of minification.
    pub development: bool,
}

pub struct Pipeline<'a, C> {
    ctx: &'a Context,
    compiler: &'a C,
    stages: Stages,
}

impl<'a, C: ScriptCompiler> Pipeline<'a, C> {
    pub fn new(ctx: &'a Context, compiler: &'a C, stages: Stages) -> Self {
        Self {
            ctx,
            compiler,
            stages,
        }
    }

    /// Run every enabled stage for `addons`.
    ///
    /// Returns `Err` on a compile failure or a failed verification; per-addon
    /// filesystem failures are only recorded in the report.
    pub async fn run(
        &self,
        addons: &[AddonName],
        options: RunOptions,
    ) -> Result<StageReport, SyncError> {
        let ctx = self.ctx;
        let filter = options.filter;
        let mut report = StageReport::default();

        tracing::debug!(?addons, %filter, stages = ?self.stages, "pipeline start");

        let (cleared_sync, cleared_build) = tokio::join!(
            async {
                if self.stages.clear_sync_target {
                    stages::clear_sync_target(ctx, addons, filter).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if self.stages.clear_build {
                    stages::clear_build(ctx, addons, filter).await
                } else {
                    Ok(Vec::new())
                }
            },
        );
        report.extend(cleared_sync?);
        report.extend(cleared_build?);

        if self.stages.copy_to_build {
            report.extend(stages::copy_to_build(ctx, addons, filter).await?);
        }

        if self.stages.compile && filter.includes(PackType::Behavior) {
            let aliases = PathAliases::load_at(&ctx.project_root)?;
            let (assets, compiled) = tokio::join!(
                stages::copy_assets(ctx, addons),
                self.compile_all(addons, options.development, aliases.as_ref()),
            );
            report.extend(assets?);
            report.compiled = compiled?;
        }

        if self.stages.verify {
            stages::verify_build(ctx, addons, filter)?;
        }

        if self.stages.sync_copy {
            report.extend(stages::copy_to_sync_target(ctx, addons, filter).await?);
            tracing::info!(
                sync_target = %ctx.sync_target_dir.display(),
                addons = addons.len(),
                "synced"
            );
        }

        Ok(report)
    }

    /// Compile every addon concurrently. All compilations are awaited before
    /// the first error, if any, is returned.
    async fn compile_all(
        &self,
        addons: &[AddonName],
        development: bool,
        aliases: Option<&PathAliases>,
    ) -> Result<Vec<AddonName>, SyncError> {
        let results = join_all(addons.iter().map(|addon| async move {
            let outcome =
                compile_addon(self.ctx, addon, development, aliases, self.compiler).await?;
            Ok::<_, SyncError>((addon.clone(), outcome))
        }))
        .await;

        let mut compiled = Vec::new();
        for result in results {
            if let (addon, CompileOutcome::Compiled { .. }) = result? {
                compiled.push(addon);
            }
        }
        Ok(compiled)
    }
}
