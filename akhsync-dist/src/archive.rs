//! Zip archives of a staging directory (`.mcaddon` / `.mcworld`).

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Component, Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{io_err, DistError};

/// Entry counts of a written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: usize,
    pub dirs: usize,
    pub bytes: u64,
}

/// Zip entry name for `path` relative to `root`, always `/`-separated.
pub fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Directories and files below `root`, each list sorted.
///
/// Symlinked directories are followed once per real path.
fn walk(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), DistError> {
    let mut visited = HashSet::new();
    visited.insert(fs::canonicalize(root).map_err(|e| io_err(root, e))?);
    let mut dirs = vec![root.to_path_buf()];
    let mut files = Vec::new();
    let mut cursor = 0;
    while cursor < dirs.len() {
        let current = dirs[cursor].clone();
        cursor += 1;
        for entry in fs::read_dir(&current).map_err(|e| io_err(&current, e))? {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let path = entry.path();
            let meta = fs::metadata(&path).map_err(|e| io_err(&path, e))?;
            if meta.is_dir() {
                let real = fs::canonicalize(&path).map_err(|e| io_err(&path, e))?;
                if visited.insert(real) {
                    dirs.push(path);
                } else {
                    tracing::warn!(path = %path.display(), "skipped directory cycle");
                }
            } else {
                files.push(path);
            }
        }
    }
    dirs.remove(0);
    dirs.sort();
    files.sort();
    Ok((dirs, files))
}

/// Write every file and directory below `src` into a new zip at `dest`.
///
/// Entry names are relative to `src`; `src`'s own name never appears.
pub fn zip_dir(src: &Path, dest: &Path) -> Result<ArchiveStats, DistError> {
    let zip_err = |source| DistError::Zip {
        path: dest.to_path_buf(),
        source,
    };

    let (dirs, files) = walk(src)?;
    let file = File::create(dest).map_err(|e| io_err(dest, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut stats = ArchiveStats::default();
    for dir in &dirs {
        let Some(name) = entry_name(src, dir) else {
            continue;
        };
        writer.add_directory(format!("{name}/"), options).map_err(zip_err)?;
        stats.dirs += 1;
    }
    for path in &files {
        let Some(name) = entry_name(src, path) else {
            continue;
        };
        writer.start_file(name, options).map_err(zip_err)?;
        let mut input = File::open(path).map_err(|e| io_err(path, e))?;
        stats.bytes += io::copy(&mut input, &mut writer).map_err(|e| io_err(path, e))?;
        stats.files += 1;
    }
    writer.finish().map_err(zip_err)?;

    tracing::info!(
        archive = %dest.display(),
        files = stats.files,
        bytes = stats.bytes,
        "archive written"
    );
    Ok(stats)
}
