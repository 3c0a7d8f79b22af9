//! Copies the non-script files of a `scripts/` tree (JSON fragments, text
//! assets) into the build tree. The compiler never sees these.

use std::fs;
use std::path::Path;

use crate::error::{io_err, CompileError};
use crate::scan::{collect_files, is_script_source};

/// Mirror every non-`.ts`/`.js` file of `scripts_src` into `scripts_build`.
///
/// Returns the number of files copied.
pub fn copy_script_assets(scripts_src: &Path, scripts_build: &Path) -> Result<usize, CompileError> {
    let mut copied = 0;
    for file in collect_files(scripts_src)? {
        if is_script_source(&file) {
            continue;
        }
        let Ok(relative) = file.strip_prefix(scripts_src) else {
            continue;
        };
        let dest = scripts_build.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        fs::copy(&file, &dest).map_err(|e| io_err(&dest, e))?;
        tracing::debug!(from = %file.display(), to = %dest.display(), "copied script asset");
        copied += 1;
    }
    Ok(copied)
}
