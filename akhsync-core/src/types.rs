//! Domain types shared by every akhsync crate.
//!
//! An addon is a directory under `src/` holding up to two pack subtrees,
//! `behavior_packs/` and `resource_packs/`. [`PackType`] names one of them and
//! [`PackFilter`] selects which of them a command touches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix given to every directory akhsync creates inside the sync target.
///
/// Entries without this prefix belong to someone else and are never touched.
pub const NAMESPACE_FLAG: &str = "akhsync";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of an addon directory, relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddonName(pub String);

impl AddonName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<namespace>-<addon>`, the directory name used inside the sync target.
    pub fn namespaced(&self, namespace: &str) -> String {
        format!("{namespace}-{}", self.0)
    }
}

impl fmt::Display for AddonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AddonName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AddonName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One of the two pack subtrees of an addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackType {
    Behavior,
    Resource,
}

impl PackType {
    pub const ALL: [PackType; 2] = [PackType::Behavior, PackType::Resource];

    /// Subdirectory name inside an addon: `behavior_packs` / `resource_packs`.
    pub fn dir_name(self) -> &'static str {
        match self {
            PackType::Behavior => "behavior_packs",
            PackType::Resource => "resource_packs",
        }
    }

    /// Directory inside the sync target: `development_behavior_packs` / ...
    pub fn development_dir_name(self) -> &'static str {
        match self {
            PackType::Behavior => "development_behavior_packs",
            PackType::Resource => "development_resource_packs",
        }
    }
}

impl fmt::Display for PackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackType::Behavior => write!(f, "behavior"),
            PackType::Resource => write!(f, "resource"),
        }
    }
}

impl FromStr for PackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "behavior" => Ok(PackType::Behavior),
            "resource" => Ok(PackType::Resource),
            other => Err(format!(
                "unknown pack type '{other}'; expected: behavior, resource"
            )),
        }
    }
}

/// Which pack subtrees an operation covers. Unset on the command line means both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackFilter {
    #[default]
    Both,
    Only(PackType),
}

impl PackFilter {
    pub fn pack_types(self) -> &'static [PackType] {
        match self {
            PackFilter::Both => &PackType::ALL,
            PackFilter::Only(PackType::Behavior) => &PackType::ALL[..1],
            PackFilter::Only(PackType::Resource) => &PackType::ALL[1..],
        }
    }

    pub fn includes(self, pack: PackType) -> bool {
        match self {
            PackFilter::Both => true,
            PackFilter::Only(only) => only == pack,
        }
    }
}

impl From<Option<PackType>> for PackFilter {
    fn from(only: Option<PackType>) -> Self {
        match only {
            Some(pack) => PackFilter::Only(pack),
            None => PackFilter::Both,
        }
    }
}

impl fmt::Display for PackFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackFilter::Both => write!(f, "behavior+resource"),
            PackFilter::Only(pack) => pack.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
