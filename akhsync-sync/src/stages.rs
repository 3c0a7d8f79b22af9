//! The individual pipeline stages.
//!
//! Each stage fans out one blocking job per (addon, pack) onto the blocking
//! pool and awaits every job before returning. A job that fails is recorded in
//! its [`StepRecord`]; only verification and task panics stop the run.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;

use akhsync_compiler::assets::copy_script_assets;
use akhsync_core::{AddonName, Context, PackFilter, PackType};

use crate::error::SyncError;
use crate::fs_ops::{copy_all, copy_tree, remove_tree, run_blocking};
use crate::report::{Stage, StepOutcome, StepRecord};

/// Directory name compiled separately from the plain copy.
pub const SCRIPTS_DIR: &str = "scripts";

type Work = Box<dyn FnOnce(&Path) -> StepOutcome + Send>;

struct Job {
    stage: Stage,
    addon: AddonName,
    pack: Option<PackType>,
    path: PathBuf,
    work: Work,
}

impl Job {
    fn new<F>(stage: Stage, addon: &AddonName, pack: Option<PackType>, path: PathBuf, work: F) -> Self
    where
        F: FnOnce(&Path) -> StepOutcome + Send + 'static,
    {
        Self {
            stage,
            addon: addon.clone(),
            pack,
            path,
            work: Box::new(work),
        }
    }
}

async fn run_jobs(jobs: Vec<Job>) -> Result<Vec<StepRecord>, SyncError> {
    let pending = jobs.into_iter().map(|job| async move {
        let Job {
            stage,
            addon,
            pack,
            path,
            work,
        } = job;
        let target = path.clone();
        let outcome = run_blocking(move || work(&target)).await?;
        Ok::<_, SyncError>(StepRecord {
            stage,
            addon,
            pack,
            path,
            outcome,
        })
    });
    join_all(pending).await.into_iter().collect()
}

fn skipped(reason: impl Into<String>) -> StepOutcome {
    StepOutcome::Skipped {
        reason: reason.into(),
    }
}

fn copy_outcome(result: Result<crate::fs_ops::CopyStats, SyncError>) -> StepOutcome {
    match result {
        Ok(_) => StepOutcome::Done,
        Err(e) => StepOutcome::Failed {
            error: e.to_string(),
        },
    }
}

fn is_scripts_dir(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == SCRIPTS_DIR)
}

// ---------------------------------------------------------------------------
// Clear
// ---------------------------------------------------------------------------

/// Remove `<sync target>/development_<pack>_packs/<namespace>-<addon>` for
/// every addon and every pack type in `filter`. Nothing else is touched.
pub async fn clear_sync_target(
    ctx: &Context,
    addons: &[AddonName],
    filter: PackFilter,
) -> Result<Vec<StepRecord>, SyncError> {
    let mut jobs = Vec::new();
    for &pack in filter.pack_types() {
        for addon in addons {
            jobs.push(Job::new(
                Stage::ClearSyncTarget,
                addon,
                Some(pack),
                ctx.sync_entry(addon, pack),
                remove_tree,
            ));
        }
    }
    let records = run_jobs(jobs).await?;
    for record in records.iter().filter(|r| r.outcome.is_failed()) {
        tracing::info!(
            addon = %record.addon,
            path = %record.path.display(),
            "could not clear sync entry; it may be held open by the game"
        );
    }
    Ok(records)
}

/// Remove `build/<addon>`, or only `build/<addon>/<pack>_packs` under a
/// single-pack filter.
pub async fn clear_build(
    ctx: &Context,
    addons: &[AddonName],
    filter: PackFilter,
) -> Result<Vec<StepRecord>, SyncError> {
    let jobs = addons
        .iter()
        .map(|addon| match filter {
            PackFilter::Both => Job::new(
                Stage::ClearBuild,
                addon,
                None,
                ctx.addon_build(addon),
                remove_tree,
            ),
            PackFilter::Only(pack) => Job::new(
                Stage::ClearBuild,
                addon,
                Some(pack),
                ctx.pack_build(addon, pack),
                remove_tree,
            ),
        })
        .collect();
    run_jobs(jobs).await
}

// ---------------------------------------------------------------------------
// Copy to build
// ---------------------------------------------------------------------------

/// Mirror each addon's source into the build root, leaving out every
/// `scripts` directory (those are produced by the compile stage).
pub async fn copy_to_build(
    ctx: &Context,
    addons: &[AddonName],
    filter: PackFilter,
) -> Result<Vec<StepRecord>, SyncError> {
    let jobs = addons
        .iter()
        .map(|addon| {
            let (pack, src, dest) = match filter {
                PackFilter::Both => (None, ctx.addon_src(addon), ctx.addon_build(addon)),
                PackFilter::Only(pack) => (
                    Some(pack),
                    ctx.pack_src(addon, pack),
                    ctx.pack_build(addon, pack),
                ),
            };
            Job::new(Stage::CopyToBuild, addon, pack, dest, move |dest| {
                if !src.is_dir() {
                    return skipped(format!("no source at {}", src.display()));
                }
                copy_outcome(copy_tree(&src, dest, is_scripts_dir))
            })
        })
        .collect();
    run_jobs(jobs).await
}

/// Copy the non-script files under `behavior_packs/scripts` as-is.
pub async fn copy_assets(
    ctx: &Context,
    addons: &[AddonName],
) -> Result<Vec<StepRecord>, SyncError> {
    let jobs = addons
        .iter()
        .map(|addon| {
            let src = ctx.scripts_src(addon);
            Job::new(
                Stage::CopyScriptAssets,
                addon,
                Some(PackType::Behavior),
                ctx.scripts_build(addon),
                move |dest| {
                    if !src.is_dir() {
                        return skipped("no scripts directory");
                    }
                    match copy_script_assets(&src, dest) {
                        Ok(_) => StepOutcome::Done,
                        Err(e) => StepOutcome::Failed {
                            error: e.to_string(),
                        },
                    }
                },
            )
        })
        .collect();
    run_jobs(jobs).await
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

/// Check that every pack present in the source also has a build. Runs for all
/// addons before anything is copied into the sync target.
pub fn verify_build(
    ctx: &Context,
    addons: &[AddonName],
    filter: PackFilter,
) -> Result<(), SyncError> {
    for addon in addons {
        for &pack in filter.pack_types() {
            let build = ctx.pack_build(addon, pack);
            if ctx.pack_src(addon, pack).is_dir() && !build.is_dir() {
                return Err(SyncError::BuildMissing {
                    addon: addon.to_string(),
                    pack,
                    path: build,
                });
            }
        }
    }
    Ok(())
}

/// Copy each built pack into its namespaced sync-target entry.
pub async fn copy_to_sync_target(
    ctx: &Context,
    addons: &[AddonName],
    filter: PackFilter,
) -> Result<Vec<StepRecord>, SyncError> {
    let mut jobs = Vec::new();
    for &pack in filter.pack_types() {
        for addon in addons {
            let src = ctx.pack_src(addon, pack);
            let build = ctx.pack_build(addon, pack);
            jobs.push(Job::new(
                Stage::SyncCopy,
                addon,
                Some(pack),
                ctx.sync_entry(addon, pack),
                move |dest| {
                    if !src.is_dir() {
                        return skipped(format!("addon has no {pack} pack"));
                    }
                    copy_outcome(copy_all(&build, dest))
                },
            ));
        }
    }
    run_jobs(jobs).await
}
