//! World save validation, naming and the `level.dat` patch.

use std::fs;
use std::path::{Path, PathBuf};

use akhsync_core::Context;

use crate::error::{io_err, DistError};
use crate::nbt;

/// Default display name of a distributed world.
pub const DEFAULT_WORLD_NAME_TEMPLATE: &str = "{name} {version}";

pub const LEVEL_DAT: &str = "level.dat";
pub const LEVEL_DAT_BACKUP: &str = "level.dat_old";

/// Entries every world save has: `(name, is_dir)`.
pub const WORLD_MARKERS: [(&str, bool); 4] = [
    (LEVEL_DAT, false),
    ("db", true),
    ("behavior_packs", true),
    ("resource_packs", true),
];

/// `<sync target>/minecraftWorlds`, where the game keeps its saves.
pub fn worlds_dir(ctx: &Context) -> PathBuf {
    ctx.sync_target_dir.join("minecraftWorlds")
}

/// Check that `ctx.world_dir` looks like a world save.
pub fn validate(ctx: &Context) -> Result<(), DistError> {
    let path = &ctx.world_dir;
    if !path.is_dir() {
        return Err(DistError::WorldMissing {
            path: path.clone(),
            worlds_dir: worlds_dir(ctx),
        });
    }

    let missing: Vec<&'static str> = WORLD_MARKERS
        .iter()
        .filter(|(name, is_dir)| {
            let marker = path.join(name);
            if *is_dir {
                !marker.is_dir()
            } else {
                !marker.is_file()
            }
        })
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DistError::WorldIncomplete {
            path: path.clone(),
            missing,
            worlds_dir: worlds_dir(ctx),
        })
    }
}

/// Replace every `{name}` and `{version}` in `template`.
pub fn render_world_name(template: &str, project: &str, version: &str) -> String {
    template.replace("{name}", project).replace("{version}", version)
}

/// Back up `<world>/level.dat` as `level.dat_old` and rewrite it with
/// `LevelName` set to `name`.
pub fn patch_level_name(world: &Path, name: &str) -> Result<(), DistError> {
    let level_dat = world.join(LEVEL_DAT);
    let original = fs::read(&level_dat).map_err(|e| io_err(&level_dat, e))?;

    let backup = world.join(LEVEL_DAT_BACKUP);
    fs::write(&backup, &original).map_err(|e| io_err(&backup, e))?;

    let patched = nbt::set_level_name(&original, name).map_err(|source| DistError::LevelDat {
        path: level_dat.clone(),
        source,
    })?;
    fs::write(&level_dat, patched).map_err(|e| io_err(&level_dat, e))?;

    tracing::info!(path = %level_dat.display(), name, "world renamed");
    Ok(())
}
