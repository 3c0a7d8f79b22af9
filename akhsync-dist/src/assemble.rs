//! `dist`: build, stage and archive.
//!
//! ```text
//! build (production) → clear dist/ → stage addons → [world] → archives
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use akhsync_compiler::ScriptCompiler;
use akhsync_core::{AddonName, Context, PackType};
use akhsync_sync::fs_ops::{copy_all, run_blocking};
use akhsync_sync::{Pipeline, RunOptions, StageReport, Stages, SyncError};

use crate::archive::{zip_dir, ArchiveStats};
use crate::error::{io_err, DistError};
use crate::world;

pub const ADDON_ARCHIVE_EXT: &str = "mcaddon";
pub const WORLD_ARCHIVE_EXT: &str = "mcworld";

/// What `dist` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistKind {
    /// One `.mcaddon` per addon.
    Addon,
    /// One `.mcworld` with every addon installed.
    World,
}

impl fmt::Display for DistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistKind::Addon => write!(f, "addon"),
            DistKind::World => write!(f, "world"),
        }
    }
}

impl FromStr for DistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addon" => Ok(DistKind::Addon),
            "world" => Ok(DistKind::World),
            other => Err(format!("unknown dist type '{other}'; expected: world, addon")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistOptions {
    pub kinds: Vec<DistKind>,
    pub version: String,
    pub world_name_template: String,
}

impl DistOptions {
    pub fn wants(&self, kind: DistKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// One archive that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub kind: DistKind,
    pub path: PathBuf,
    pub stats: ArchiveStats,
}

#[derive(Debug, Clone, Default)]
pub struct DistReport {
    pub build: StageReport,
    pub archives: Vec<Archive>,
}

/// `dist/<addon>-<version>`
pub fn addon_staging_dir(ctx: &Context, addon: &AddonName, version: &str) -> PathBuf {
    ctx.dist_dir.join(format!("{addon}-{version}"))
}

/// `dist/<project>-world-<version>`
pub fn world_staging_dir(ctx: &Context, version: &str) -> PathBuf {
    ctx.dist_dir
        .join(format!("{}-world-{version}", ctx.project_name()))
}

fn archive_path(staging: &Path, ext: &str) -> PathBuf {
    let mut name = staging.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn join_err(e: SyncError) -> DistError {
    match e {
        SyncError::Join(msg) => DistError::Join(msg),
        other => DistError::Sync(other),
    }
}

/// Empty `dist/`, creating it if needed.
pub fn reset_dist_root(ctx: &Context) -> Result<(), DistError> {
    match fs::remove_dir_all(&ctx.dist_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(&ctx.dist_dir, e)),
    }
    fs::create_dir_all(&ctx.dist_dir).map_err(|e| io_err(&ctx.dist_dir, e))
}

/// Copy each addon's build output into its staging directory.
pub async fn stage_addons(
    ctx: &Context,
    addons: &[AddonName],
    version: &str,
) -> Result<Vec<PathBuf>, DistError> {
    let results = join_all(addons.iter().map(|addon| {
        let build = ctx.addon_build(addon);
        let staging = addon_staging_dir(ctx, addon, version);
        async move {
            tracing::debug!(from = %build.display(), to = %staging.display(), "staging addon");
            let target = staging.clone();
            run_blocking(move || copy_all(&build, &target))
                .await
                .map_err(join_err)?
                .map_err(DistError::Sync)?;
            Ok::<_, DistError>(staging)
        }
    }))
    .await;
    results.into_iter().collect()
}

/// Copy the world save into staging, rename it, and install every staged
/// addon pack under `<pack>_packs/<addon>-<version>`.
pub fn stage_world(
    ctx: &Context,
    addons: &[AddonName],
    options: &DistOptions,
) -> Result<PathBuf, DistError> {
    world::validate(ctx)?;

    let staging = world_staging_dir(ctx, &options.version);
    copy_all(&ctx.world_dir, &staging)?;

    let name = world::render_world_name(
        &options.world_name_template,
        &ctx.project_name(),
        &options.version,
    );
    world::patch_level_name(&staging, &name)?;

    for addon in addons {
        let addon_staging = addon_staging_dir(ctx, addon, &options.version);
        for pack in PackType::ALL {
            let src = addon_staging.join(pack.dir_name());
            if !src.is_dir() {
                tracing::debug!(addon = %addon, %pack, "no staged pack, skipping");
                continue;
            }
            let dest = staging
                .join(pack.dir_name())
                .join(format!("{addon}-{}", options.version));
            copy_all(&src, &dest)?;
        }
    }
    Ok(staging)
}

/// Run the whole distribution: production build, staging, archives.
pub async fn dist<C: ScriptCompiler>(
    ctx: &Context,
    addons: &[AddonName],
    compiler: &C,
    options: &DistOptions,
) -> Result<DistReport, DistError> {
    let build = Pipeline::new(ctx, compiler, Stages::build())
        .run(
            addons,
            RunOptions {
                development: false,
                ..RunOptions::default()
            },
        )
        .await?;

    reset_dist_root(ctx)?;
    let staged = stage_addons(ctx, addons, &options.version).await?;

    let mut jobs: Vec<(DistKind, PathBuf)> = Vec::new();
    if options.wants(DistKind::World) {
        let world = {
            let ctx = ctx.clone();
            let addons = addons.to_vec();
            let options = options.clone();
            run_blocking(move || stage_world(&ctx, &addons, &options))
                .await
                .map_err(join_err)??
        };
        jobs.push((DistKind::World, world));
    }
    if options.wants(DistKind::Addon) {
        jobs.extend(staged.into_iter().map(|dir| (DistKind::Addon, dir)));
    }

    let results = join_all(jobs.into_iter().map(|(kind, staging)| async move {
        let ext = match kind {
            DistKind::Addon => ADDON_ARCHIVE_EXT,
            DistKind::World => WORLD_ARCHIVE_EXT,
        };
        let path = archive_path(&staging, ext);
        let dest = path.clone();
        let stats = run_blocking(move || zip_dir(&staging, &dest))
            .await
            .map_err(join_err)??;
        Ok::<_, DistError>(Archive { kind, path, stats })
    }))
    .await;

    let archives = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(DistReport { build, archives })
}
