//! Per-addon compile step: discover entries, invoke the compiler, rewrite
//! aliased imports in the output.

use akhsync_core::{AddonName, Context};

use crate::error::CompileError;
use crate::esbuild::{relative_to, CompileRequest, ScriptCompiler};
use crate::rewrite::rewrite_output_tree;
use crate::scan::collect_script_entries;
use crate::tsconfig::PathAliases;

/// What the compile step did for one addon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The addon has no `behavior_packs/scripts` entry points.
    NoScripts,
    /// The compiler succeeded.
    Compiled { entries: usize, rewritten: usize },
}

/// Build the compiler request for `addon`, or `None` when it has no scripts.
pub fn request_for(
    ctx: &Context,
    addon: &AddonName,
    development: bool,
    aliases: Option<&PathAliases>,
) -> Result<Option<CompileRequest>, CompileError> {
    let scripts_src = ctx.scripts_src(addon);
    let entry_points = collect_script_entries(&scripts_src)?;
    if entry_points.is_empty() {
        return Ok(None);
    }

    Ok(Some(CompileRequest {
        addon: addon.to_string(),
        entry_points,
        outdir: ctx.scripts_build(addon),
        outbase: scripts_src.clone(),
        source_root: relative_to(&ctx.project_root, &scripts_src),
        development,
        tsconfig: aliases.map(|a| a.tsconfig.clone()),
        extra_externals: aliases
            .map(|a| a.patterns().map(str::to_string).collect())
            .unwrap_or_default(),
    }))
}

/// Compile the scripts of `addon` into its build tree.
///
/// Any failure is returned as-is; the caller treats it as fatal.
pub async fn compile_addon<C: ScriptCompiler>(
    ctx: &Context,
    addon: &AddonName,
    development: bool,
    aliases: Option<&PathAliases>,
    compiler: &C,
) -> Result<CompileOutcome, CompileError> {
    let Some(request) = request_for(ctx, addon, development, aliases)? else {
        tracing::debug!(addon = %addon, "no script entry points");
        return Ok(CompileOutcome::NoScripts);
    };

    let entries = request.entry_points.len();
    compiler.compile(&request).await?;

    let rewritten = match aliases {
        Some(aliases) if !aliases.is_empty() => {
            rewrite_output_tree(&request.outdir, &request.outbase, aliases)?
        }
        _ => 0,
    };

    tracing::info!(addon = %addon, entries, rewritten, "compiled scripts");
    Ok(CompileOutcome::Compiled { entries, rewritten })
}
