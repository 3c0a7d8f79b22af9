//! The external compiler seam and its esbuild implementation.
//!
//! esbuild is invoked as a black box through its CLI. The contract is the
//! argument list built by [`CompileRequest::to_args`]: entry points in, one
//! output directory out, non-zero exit on failure.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use akhsync_core::Context;

use crate::error::CompileError;

/// Module format passed to the compiler.
pub const FORMAT: &str = "esm";
/// Compile target passed to the compiler.
pub const TARGET: &str = "node18";
/// Platform passed to the compiler.
pub const PLATFORM: &str = "node";

/// Modules provided by the game at runtime. Never bundled.
pub const HOST_MODULES: [&str; 8] = [
    "@minecraft/server",
    "@minecraft/server-ui",
    "@minecraft/server-admin",
    "@minecraft/server-gametest",
    "@minecraft/server-net",
    "@minecraft/server-common",
    "@minecraft/server-editor",
    "@minecraft/debug-utilities",
];

/// Relative imports stay separate modules instead of being inlined.
pub const RELATIVE_EXTERNALS: [&str; 2] = ["./*", "../*"];

/// Environment variable naming the esbuild executable.
pub const COMPILER_ENV: &str = "AKHSYNC_ESBUILD";

/// Everything the compiler needs for one addon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub addon: String,
    pub entry_points: Vec<PathBuf>,
    pub outdir: PathBuf,
    /// Root the output tree mirrors.
    pub outbase: PathBuf,
    /// Source root recorded in source maps, relative to the project.
    pub source_root: PathBuf,
    pub development: bool,
    pub tsconfig: Option<PathBuf>,
    /// Externals in addition to [`HOST_MODULES`] and [`RELATIVE_EXTERNALS`].
    pub extra_externals: Vec<String>,
}

impl CompileRequest {
    /// The esbuild command line (without the program name).
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .entry_points
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        args.push("--bundle".into());
        args.push(format!("--format={FORMAT}"));
        args.push(format!("--platform={PLATFORM}"));
        args.push(format!("--target={TARGET}"));
        args.push(format!("--outdir={}", self.outdir.display()));
        args.push(format!("--outbase={}", self.outbase.display()));
        args.push("--log-level=warning".into());

        if self.development {
            args.push("--sourcemap".into());
            args.push(format!("--source-root={}", self.source_root.display()));
        } else {
            args.push("--minify".into());
        }

        if let Some(tsconfig) = &self.tsconfig {
            args.push(format!("--tsconfig={}", tsconfig.display()));
        }

        for external in HOST_MODULES
            .iter()
            .copied()
            .chain(RELATIVE_EXTERNALS.iter().copied())
            .chain(self.extra_externals.iter().map(String::as_str))
        {
            args.push(format!("--external:{external}"));
        }
        args
    }
}

/// Compiles the scripts of one addon.
#[allow(async_fn_in_trait)]
pub trait ScriptCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError>;
}

/// Runs the esbuild CLI as a child process.
#[derive(Debug, Clone)]
pub struct EsbuildCompiler {
    pub program: PathBuf,
    pub working_dir: PathBuf,
}

impl EsbuildCompiler {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    /// `$AKHSYNC_ESBUILD`, else the config's `compiler`, else the project's
    /// `node_modules/.bin` install, else `esbuild` on `PATH`.
    pub fn from_context(ctx: &Context) -> Self {
        let program = resolve_program(std::env::var_os(COMPILER_ENV), ctx);
        Self::new(program, &ctx.project_root)
    }

    fn program_path(&self) -> PathBuf {
        if self.program.components().count() > 1 && self.program.is_relative() {
            self.working_dir.join(&self.program)
        } else {
            self.program.clone()
        }
    }
}

impl ScriptCompiler for EsbuildCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        let program = self.program_path();
        let args = request.to_args();
        tracing::debug!(program = %program.display(), ?args, "invoking compiler");

        let output = Command::new(&program)
            .args(&args)
            .current_dir(&self.working_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                addon: request.addon.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let warnings = String::from_utf8_lossy(&output.stderr);
        if !warnings.trim().is_empty() {
            tracing::warn!(addon = %request.addon, "{}", warnings.trim());
        }
        Ok(())
    }
}

/// Names npm links into `node_modules/.bin`; on Windows these are shims that
/// are not found by a bare `esbuild` lookup.
#[cfg(windows)]
const LOCAL_BIN_NAMES: [&str; 3] = ["esbuild.cmd", "esbuild.exe", "esbuild"];
#[cfg(not(windows))]
const LOCAL_BIN_NAMES: [&str; 1] = ["esbuild"];

fn resolve_program(from_env: Option<OsString>, ctx: &Context) -> PathBuf {
    if let Some(program) = from_env.filter(|p| !p.is_empty()) {
        return PathBuf::from(program);
    }
    if let Some(program) = &ctx.compiler {
        return program.clone();
    }
    local_install(&ctx.project_root).unwrap_or_else(|| PathBuf::from("esbuild"))
}

/// `<project>/node_modules/.bin/esbuild`, if npm installed it there.
fn local_install(project_root: &Path) -> Option<PathBuf> {
    let bin = project_root.join("node_modules").join(".bin");
    LOCAL_BIN_NAMES
        .iter()
        .map(|name| bin.join(name))
        .find(|path| path.is_file())
}

/// Display helper for the request's source root relative to `root`.
pub(crate) fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
