//! Distribution version: `--set-version` validation and `package.json` lookup.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::CoreError;

/// Version used when `package.json` is missing or has no `version`.
pub const FALLBACK_VERSION: &str = "1.0.0";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+(-.+)?$").expect("static regex"))
}

/// `x.y.z` with an optional `-prerelease` suffix.
pub fn is_valid_version(version: &str) -> bool {
    version_regex().is_match(version)
}

/// [`is_valid_version`] as a `Result`.
pub fn validate_version(version: &str) -> Result<(), CoreError> {
    if is_valid_version(version) {
        Ok(())
    } else {
        Err(CoreError::InvalidVersion {
            version: version.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    version: Option<String>,
}

/// The `version` declared in `<project_root>/package.json`.
///
/// Falls back to [`FALLBACK_VERSION`] with a warning when it cannot be read.
pub fn package_version_at(project_root: &Path) -> String {
    let path = project_root.join("package.json");
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str::<PackageJson>(&s).map_err(|e| e.to_string()));

    match parsed {
        Ok(PackageJson {
            version: Some(version),
        }) => version,
        Ok(PackageJson { version: None }) => {
            tracing::warn!(path = %path.display(), "package.json has no version; using {FALLBACK_VERSION}");
            FALLBACK_VERSION.to_string()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read package version; using {FALLBACK_VERSION}");
            FALLBACK_VERSION.to_string()
        }
    }
}
