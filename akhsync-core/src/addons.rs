//! Addon Directory Enumerator.
//!
//! The working set is fixed once per invocation: either every immediate
//! subdirectory of `src/`, or the names given on the command line, each of
//! which must exist.

use std::path::{Component, Path};

use crate::context::Context;
use crate::error::{io_err, CoreError};
use crate::types::AddonName;

/// Every immediate, non-hidden subdirectory of `src_dir`, sorted by name.
///
/// Returns [`CoreError::NoAddons`] when the set is empty.
pub fn list_all_at(src_dir: &Path) -> Result<Vec<AddonName>, CoreError> {
    let entries = std::fs::read_dir(src_dir).map_err(|e| io_err(src_dir, e))?;
    let mut names: Vec<AddonName> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .map(AddonName::from)
        .collect();
    names.sort();

    if names.is_empty() {
        return Err(CoreError::NoAddons {
            path: src_dir.to_path_buf(),
        });
    }
    Ok(names)
}

/// Check that each requested name is an existing directory under `src_dir`.
///
/// Duplicates are dropped, order is kept.
pub fn validate_at(src_dir: &Path, names: &[String]) -> Result<Vec<AddonName>, CoreError> {
    let mut addons: Vec<AddonName> = Vec::with_capacity(names.len());
    for name in names {
        if !is_single_segment(name) {
            return Err(CoreError::InvalidAddonName { name: name.clone() });
        }
        let path = src_dir.join(name);
        if !path.is_dir() {
            return Err(CoreError::AddonNotFound {
                name: name.clone(),
                path,
            });
        }
        let addon = AddonName::from(name.as_str());
        if !addons.contains(&addon) {
            addons.push(addon);
        }
    }
    Ok(addons)
}

/// `validate_at` for explicit names, `list_all_at` when none were given.
pub fn select(ctx: &Context, names: &[String]) -> Result<Vec<AddonName>, CoreError> {
    let addons = if names.is_empty() {
        list_all_at(&ctx.src_dir)?
    } else {
        validate_at(&ctx.src_dir, names)?
    };
    tracing::debug!(addons = ?addons, "selected addons");
    Ok(addons)
}

fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
