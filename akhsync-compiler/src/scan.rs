//! Directory scanning for script entry points and plain assets.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CompileError};

/// Extensions handed to the compiler.
pub const SCRIPT_EXTENSIONS: [&str; 2] = ["ts", "js"];

/// `true` for `*.ts` / `*.js`, excluding `*.d.ts` declarations.
pub fn is_script_entry(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(".d.ts") {
        return false;
    }
    is_script_source(path)
}

/// `true` for any `*.ts` / `*.js` file, declarations included.
pub fn is_script_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCRIPT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Every regular file below `root`, sorted. A missing `root` yields nothing.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, CompileError> {
    let mut dirs = vec![root.to_path_buf()];
    let mut files = Vec::new();
    let mut cursor = 0;
    while cursor < dirs.len() {
        let current = dirs[cursor].clone();
        cursor += 1;
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&current, err)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&current, e))?;
            let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            if ty.is_dir() {
                dirs.push(entry.path());
            } else if ty.is_file() {
                files.push(entry.path());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Script sources under `scripts_dir` that become compiler entry points.
pub fn collect_script_entries(scripts_dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
    Ok(collect_files(scripts_dir)?
        .into_iter()
        .filter(|p| is_script_entry(p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entry_filter_skips_declarations_and_assets() {
        assert!(is_script_entry(Path::new("main.ts")));
        assert!(is_script_entry(Path::new("lib/util.js")));
        assert!(!is_script_entry(Path::new("types/global.d.ts")));
        assert!(!is_script_entry(Path::new("config.json")));
        assert!(is_script_source(Path::new("types/global.d.ts")));
    }

    #[test]
    fn collects_nested_entries_sorted() {
        let dir = TempDir::new().unwrap();
        let scripts = dir.path().join("scripts");
        fs::create_dir_all(scripts.join("lib")).unwrap();
        fs::write(scripts.join("main.ts"), "").unwrap();
        fs::write(scripts.join("lib").join("a.js"), "").unwrap();
        fs::write(scripts.join("lib").join("a.d.ts"), "").unwrap();
        fs::write(scripts.join("data.json"), "{}").unwrap();

        let entries = collect_script_entries(&scripts).unwrap();
        assert_eq!(
            entries,
            vec![scripts.join("lib").join("a.js"), scripts.join("main.ts")]
        );
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(collect_files(&dir.path().join("nope")).unwrap().is_empty());
    }
}
