//! Resolved working-tree locations for one invocation.
//!
//! # Layout
//!
//! ```text
//! <project>/
//!   src/<addon>/{behavior_packs,resource_packs}     input
//!   build/<addon>/{behavior_packs,resource_packs}   owned, rebuilt every run
//!   dist/                                            owned, regenerated by `dist`
//!   world/                                           world save used by `dist --type world`
//! <sync target>/development_<pack>_packs/<namespace>-<addon>
//! ```
//!
//! # API pattern
//!
//! - [`Context::resolve_at`] — explicit project root and home; used in tests
//! - [`Context::resolve`] — current directory + `dirs::home_dir()`
//!
//! The [`Context`] is built once and passed to every component. Nothing reads
//! the current directory after that.

use std::path::{Path, PathBuf};

use crate::config::{self, LoadedConfig};
use crate::error::{io_err, CoreError};
use crate::types::{AddonName, PackType, NAMESPACE_FLAG};

/// Leaf name of the world directory when the config does not override it.
pub const DEFAULT_WORLD_DIR_NAME: &str = "world";

/// Sync-target root relative to the user's home directory.
pub const DEFAULT_SYNC_TARGET_SUFFIX: &str =
    "AppData/Local/Packages/Microsoft.MinecraftUWP_8wekyb3d8bbwe/LocalState/games/com.mojang";

/// `<home>/AppData/Local/Packages/.../games/com.mojang`
pub fn default_sync_target_dir(home: &Path) -> PathBuf {
    home.join(DEFAULT_SYNC_TARGET_SUFFIX)
}

/// Every location a pipeline run reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub project_root: PathBuf,
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub world_dir: PathBuf,
    pub sync_target_dir: PathBuf,
    pub namespace: String,
    /// esbuild executable requested by the config file, if any.
    pub compiler: Option<PathBuf>,
    /// Config file that was applied, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Build a context from already-loaded configuration. Pure, no I/O.
    pub fn from_config(project_root: &Path, home: &Path, loaded: Option<&LoadedConfig>) -> Self {
        let config = loaded.map(|l| &l.config);

        let sync_target_dir = match config.and_then(|c| c.sync_target_dir.as_ref()) {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => project_root.join(dir),
            None => default_sync_target_dir(home),
        };
        let world_dir_name = config
            .and_then(|c| c.world_dir_name.as_deref())
            .unwrap_or(DEFAULT_WORLD_DIR_NAME);

        Self {
            project_root: project_root.to_path_buf(),
            src_dir: project_root.join("src"),
            build_dir: project_root.join("build"),
            dist_dir: project_root.join("dist"),
            world_dir: project_root.join(world_dir_name),
            sync_target_dir,
            namespace: NAMESPACE_FLAG.to_string(),
            compiler: config.and_then(|c| c.compiler.clone()),
            config_path: loaded.map(|l| l.path.clone()),
        }
    }

    /// Load config from `project_root`, build the context, and check that the
    /// source root exists.
    pub fn resolve_at(project_root: &Path, home: &Path) -> Result<Self, CoreError> {
        let loaded = config::load_at(project_root)?;
        if let Some(loaded) = loaded.as_ref() {
            tracing::info!(path = %loaded.path.display(), "using config file");
        }
        let ctx = Self::from_config(project_root, home, loaded.as_ref());
        ctx.ensure_source_root()?;
        Ok(ctx)
    }

    /// [`Context::resolve_at`] for the current directory and user home.
    pub fn resolve() -> Result<Self, CoreError> {
        let cwd = std::env::current_dir().map_err(|e| io_err(".", e))?;
        let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
        Self::resolve_at(&cwd, &home)
    }

    /// Fails with [`CoreError::SourceRootMissing`] unless `src/` is a directory.
    pub fn ensure_source_root(&self) -> Result<(), CoreError> {
        if self.src_dir.is_dir() {
            Ok(())
        } else {
            Err(CoreError::SourceRootMissing {
                path: self.src_dir.clone(),
            })
        }
    }

    /// Directory name of the project root, used for world naming.
    pub fn project_name(&self) -> String {
        self.project_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// `src/<addon>`
    pub fn addon_src(&self, addon: &AddonName) -> PathBuf {
        self.src_dir.join(addon.as_str())
    }

    /// `build/<addon>`
    pub fn addon_build(&self, addon: &AddonName) -> PathBuf {
        self.build_dir.join(addon.as_str())
    }

    /// `src/<addon>/<pack>_packs`
    pub fn pack_src(&self, addon: &AddonName, pack: PackType) -> PathBuf {
        self.addon_src(addon).join(pack.dir_name())
    }

    /// `build/<addon>/<pack>_packs`
    pub fn pack_build(&self, addon: &AddonName, pack: PackType) -> PathBuf {
        self.addon_build(addon).join(pack.dir_name())
    }

    /// `src/<addon>/behavior_packs/scripts`
    pub fn scripts_src(&self, addon: &AddonName) -> PathBuf {
        self.pack_src(addon, PackType::Behavior).join("scripts")
    }

    /// `build/<addon>/behavior_packs/scripts`
    pub fn scripts_build(&self, addon: &AddonName) -> PathBuf {
        self.pack_build(addon, PackType::Behavior).join("scripts")
    }

    /// `<sync target>/development_<pack>_packs`
    pub fn sync_pack_root(&self, pack: PackType) -> PathBuf {
        self.sync_target_dir.join(pack.development_dir_name())
    }

    /// `<sync target>/development_<pack>_packs/<namespace>-<addon>`
    pub fn sync_entry(&self, addon: &AddonName, pack: PackType) -> PathBuf {
        self.sync_pack_root(pack)
            .join(addon.namespaced(&self.namespace))
    }
}
