//! Post-compile rewrite of module specifiers in emitted ES modules.
//!
//! Handles `from "x"`, bare `import "x"` and dynamic `import("x")`, in both
//! pretty and minified output (`from"x"`).

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{io_err, CompileError};
use crate::scan::collect_files;
use crate::tsconfig::PathAliases;

fn specifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(\bfrom\s*|\bimport\s*\(\s*|\bimport\s*)(["'])([^"'\r\n]+)(["'])"#)
            .expect("static regex")
    })
}

/// Replace every specifier for which `map` returns `Some`.
///
/// Returns the new source and the number of replacements made.
pub fn rewrite_specifiers<F>(code: &str, mut map: F) -> (String, usize)
where
    F: FnMut(&str) -> Option<String>,
{
    let mut count = 0;
    let rewritten = specifier_regex().replace_all(code, |caps: &Captures<'_>| {
        let specifier = &caps[3];
        match map(specifier) {
            Some(replacement) => {
                count += 1;
                format!("{}{}{}{}", &caps[1], &caps[2], replacement, &caps[4])
            }
            None => caps[0].to_string(),
        }
    });
    (rewritten.into_owned(), count)
}

/// Rewrite aliased specifiers in every `.js` file under `scripts_build`.
///
/// Each output file is mapped back to its source directory under
/// `scripts_src` so relative paths are computed against the source layout,
/// which the output mirrors.
pub fn rewrite_output_tree(
    scripts_build: &Path,
    scripts_src: &Path,
    aliases: &PathAliases,
) -> Result<usize, CompileError> {
    let mut total = 0;
    for file in collect_files(scripts_build)? {
        if file.extension().and_then(|e| e.to_str()) != Some("js") {
            continue;
        }
        let Ok(relative) = file.strip_prefix(scripts_build) else {
            continue;
        };
        let importer_dir = match relative.parent() {
            Some(parent) => scripts_src.join(parent),
            None => scripts_src.to_path_buf(),
        };

        let code = fs::read_to_string(&file).map_err(|e| io_err(&file, e))?;
        let (rewritten, count) =
            rewrite_specifiers(&code, |spec| aliases.relative_specifier(spec, &importer_dir));
        if count > 0 {
            fs::write(&file, rewritten).map_err(|e| io_err(&file, e))?;
            tracing::debug!(file = %file.display(), count, "rewrote aliased imports");
            total += count;
        }
    }
    Ok(total)
}
