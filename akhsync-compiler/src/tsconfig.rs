//! `tsconfig.json` path aliases (`compilerOptions.paths` + `baseUrl`).
//!
//! Aliased imports are kept out of the bundle and rewritten afterwards into
//! plain relative specifiers, so the emitted scripts never depend on the
//! alias table at runtime.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::{io_err, CompileError};

/// Compiler configuration file looked up in the project root.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Extensions tried, in order, when an alias target has none.
pub const RESOLVE_EXTENSIONS: [&str; 5] = ["ts", "tsx", "js", "jsx", "json"];

#[derive(Debug, Default, Deserialize)]
struct TsConfigFile {
    #[serde(default, rename = "compilerOptions")]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
struct AliasMatcher {
    pattern: String,
    regex: Regex,
    replacements: Vec<String>,
}

/// Alias table parsed from a `tsconfig.json`.
#[derive(Debug, Clone)]
pub struct PathAliases {
    pub tsconfig: PathBuf,
    base_url: PathBuf,
    matchers: Vec<AliasMatcher>,
}

impl PathAliases {
    /// Load `<project_root>/tsconfig.json`. `Ok(None)` when there is none.
    pub fn load_at(project_root: &Path) -> Result<Option<Self>, CompileError> {
        let path = project_root.join(TSCONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        Self::parse(&path, &contents).map(Some)
    }

    /// Parse tsconfig text (comments and trailing commas allowed).
    pub fn parse(tsconfig: &Path, contents: &str) -> Result<Self, CompileError> {
        let file: TsConfigFile =
            json5::from_str(contents).map_err(|e| CompileError::TsConfig {
                path: tsconfig.to_path_buf(),
                message: e.to_string(),
            })?;

        let tsconfig_dir = tsconfig.parent().unwrap_or(Path::new("."));
        let base_url = normalize(
            &tsconfig_dir.join(file.compiler_options.base_url.as_deref().unwrap_or(".")),
        );

        let mut matchers = Vec::new();
        for (pattern, replacements) in file.compiler_options.paths {
            let source = format!("^{}$", regex::escape(&pattern).replace(r"\*", "(.*)"));
            let regex = Regex::new(&source).map_err(|e| CompileError::TsConfig {
                path: tsconfig.to_path_buf(),
                message: format!("invalid paths pattern '{pattern}': {e}"),
            })?;
            tracing::debug!(pattern = %pattern, ?replacements, "registered path alias");
            matchers.push(AliasMatcher {
                pattern,
                regex,
                replacements,
            });
        }
        // Most specific (longest literal prefix) first.
        matchers.sort_by_key(|m| std::cmp::Reverse(literal_prefix(&m.pattern).len()));

        Ok(Self {
            tsconfig: tsconfig.to_path_buf(),
            base_url,
            matchers,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// The raw `paths` keys, e.g. `@/*`.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.pattern.as_str())
    }

    /// Source file an aliased `specifier` points at, if any alias matches and
    /// the target exists on disk.
    pub fn resolve_target(&self, specifier: &str) -> Option<PathBuf> {
        if specifier.starts_with('.') || specifier.starts_with('/') {
            return None;
        }
        for matcher in &self.matchers {
            let Some(caps) = matcher.regex.captures(specifier) else {
                continue;
            };
            for replacement in &matcher.replacements {
                let substituted = match caps.get(1) {
                    Some(wildcard) => replacement.replacen('*', wildcard.as_str(), 1),
                    None => replacement.clone(),
                };
                let candidate = normalize(&self.base_url.join(substituted));
                if let Some(found) = try_resolve_file(&candidate) {
                    return Some(found);
                }
            }
            tracing::warn!(
                pattern = %matcher.pattern,
                specifier,
                "alias matched but no file could be resolved",
            );
        }
        None
    }

    /// Relative specifier (`./x.js`, `../y/z.js`) replacing `specifier` in a
    /// module whose source lives in `importer_dir`.
    pub fn relative_specifier(&self, specifier: &str, importer_dir: &Path) -> Option<String> {
        let target = self.resolve_target(specifier)?;
        let relative = relative_path(&normalize(importer_dir), &target);
        let emitted = match target.extension().and_then(|e| e.to_str()) {
            Some("ts" | "tsx" | "js" | "jsx") => relative.with_extension("js"),
            _ => relative,
        };

        let mut spec = emitted
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if !spec.starts_with("../") {
            spec = format!("./{spec}");
        }
        Some(spec)
    }
}

fn literal_prefix(pattern: &str) -> &str {
    pattern.split('*').next().unwrap_or(pattern)
}

fn with_appended_extension(base: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(base.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn try_resolve_file(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    // `@/foo.js` may name `foo.ts`.
    if base.extension().and_then(|e| e.to_str()) == Some("js") {
        let ts = base.with_extension("ts");
        if ts.is_file() {
            return Some(ts);
        }
    }
    RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| with_appended_extension(base, ext))
        .chain(
            RESOLVE_EXTENSIONS
                .iter()
                .map(|ext| base.join(format!("index.{ext}"))),
        )
        .find(|p| p.is_file())
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path from directory `from_dir` to `to`, both absolute and normalized.
pub(crate) fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from_dir.components().collect();
    let target: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in &target[common..] {
        out.push(component.as_os_str());
    }
    out
}
