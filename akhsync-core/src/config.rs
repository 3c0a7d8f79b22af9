//! Optional project configuration file.
//!
//! # Lookup
//!
//! The first existing file in [`CONFIG_FILES`] inside the project root wins.
//! The format follows the extension. Keys are camelCase on disk:
//!
//! ```toml
//! syncTargetDir = "/mnt/games/com.mojang"
//! worldDirName = "my_world"
//! compiler = "node_modules/.bin/esbuild"
//! ```
//!
//! A missing file is not an error; a malformed one is.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

/// Candidate file names, in lookup order.
pub const CONFIG_FILES: [&str; 4] = [
    "akhsync.config.toml",
    "akhsync.config.yaml",
    "akhsync.config.yml",
    "akhsync.config.json",
];

/// Overrides read from the project configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Replaces the platform default sync-target root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_target_dir: Option<PathBuf>,
    /// Replaces the `world` leaf name of the world directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_dir_name: Option<String>,
    /// esbuild executable to invoke for script compilation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<PathBuf>,
}

/// A parsed config together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: Config,
}

/// Return the first config file present in `project_root`, if any.
pub fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Load the project configuration from `project_root`.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_at(project_root: &Path) -> Result<Option<LoadedConfig>, CoreError> {
    let Some(path) = find_config_file(project_root) else {
        return Ok(None);
    };
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let config = parse(&path, &contents)?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(Some(LoadedConfig { path, config }))
}

fn parse(path: &Path, contents: &str) -> Result<Config, CoreError> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    let parse_err = |message: String| CoreError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(contents).map_err(|e| parse_err(e.to_string())),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(contents).map_err(|e| parse_err(e.to_string()))
        }
        Some("json") => serde_json::from_str(contents).map_err(|e| parse_err(e.to_string())),
        other => Err(parse_err(format!(
            "unsupported config extension {other:?}"
        ))),
    }
}
