//! Terminal output: progress markers, step reports and fatal diagnostics.

use std::fmt::Display;

use colored::Colorize;

use akhsync_compiler::CompileError;
use akhsync_core::CoreError;
use akhsync_dist::DistError;
use akhsync_sync::{Stage, StageReport, StepOutcome, SyncError};
use akhsync_watch::WatchError;

pub fn done(message: impl Display) {
    println!("{} {message}", "✓".green().bold());
}

pub fn info(message: impl Display) {
    println!("{} {message}", "ℹ".blue().bold());
}

/// Print what a pipeline run did. Skips are only shown when `show_skips`.
pub fn print_report(report: &StageReport, show_skips: bool) {
    for addon in &report.compiled {
        done(format!("compiled scripts of {}", addon.as_str().bold()));
    }

    for step in &report.steps {
        let pack = step.pack.map(|p| format!(" ({p})")).unwrap_or_default();
        let addon = step.addon.as_str().bold();
        match (&step.outcome, step.stage) {
            (StepOutcome::Done, Stage::SyncCopy) => {
                done(format!("{addon}{pack} → {}", step.path.display()))
            }
            (StepOutcome::Done, Stage::ClearSyncTarget) if show_skips => {
                done(format!("removed {}", step.path.display()))
            }
            (StepOutcome::Skipped { reason }, _) if show_skips => {
                info(format!("{addon}{pack}: {reason}"))
            }
            (StepOutcome::Failed { error }, Stage::ClearSyncTarget) => info(format!(
                "could not remove {}: {error} (the game may be holding it open)",
                step.path.display()
            )),
            (StepOutcome::Failed { error }, stage) => eprintln!(
                "{} {} {addon}{pack}: {error}",
                "❌".red(),
                format!("[{stage}]").red()
            ),
            _ => {}
        }
    }
}

/// One error line and at least one hint line.
pub fn fatal(err: &anyhow::Error) {
    eprintln!("{} {}", "❌".red(), format!("{err:#}").red());
    for hint in hints(err) {
        eprintln!("{} {hint}", "💡".yellow());
    }
}

fn hints(err: &anyhow::Error) -> Vec<String> {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<DistError>() {
            return dist_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<WatchError>() {
            return watch_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<SyncError>() {
            return sync_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<CompileError>() {
            return compile_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<CoreError>() {
            return core_hints(e);
        }
    }
    vec!["run again with --debug for more detail".to_string()]
}

fn core_hints(err: &CoreError) -> Vec<String> {
    match err {
        CoreError::SourceRootMissing { .. } => vec![
            "run akhsync from the project root, the directory that contains src/".into(),
        ],
        CoreError::AddonNotFound { name, .. } => vec![
            format!("'{name}' must be a directory directly under src/"),
            "omit addon names to use every addon under src/".into(),
        ],
        CoreError::InvalidAddonName { .. } => {
            vec!["addon names are plain directory names under src/, without slashes".into()]
        }
        CoreError::NoAddons { path } => vec![format!(
            "create an addon, e.g. {}",
            path.join("my_addon").join("behavior_packs").display()
        )],
        CoreError::ConfigParse { path, .. } => {
            vec![format!("fix or remove {}", path.display())]
        }
        CoreError::InvalidVersion { .. } => {
            vec!["expected format: x.y.z or x.y.z-prerelease, e.g. 1.2.3".into()]
        }
        CoreError::HomeNotFound => {
            vec!["set syncTargetDir in akhsync.config.toml".into()]
        }
        CoreError::Io { .. } => vec!["check that the path exists and is readable".into()],
    }
}

fn compile_hints(err: &CompileError) -> Vec<String> {
    match err {
        CompileError::Spawn { program, .. } => vec![
            format!("could not run '{}'; install esbuild (npm i -D esbuild)", program.display()),
            "or set AKHSYNC_ESBUILD, or `compiler` in akhsync.config.toml".into(),
        ],
        CompileError::Failed { .. } => vec!["fix the script errors reported above".into()],
        CompileError::TsConfig { path, .. } => vec![format!("fix {}", path.display())],
        CompileError::Io { .. } => vec!["check permissions on the build directory".into()],
    }
}

fn sync_hints(err: &SyncError) -> Vec<String> {
    match err {
        SyncError::BuildMissing { .. } => vec![
            "run `akhsync build` first, or sync without --no-build".into(),
        ],
        SyncError::Compile(e) => compile_hints(e),
        SyncError::Core(e) => core_hints(e),
        SyncError::Io { .. } | SyncError::Join(_) => {
            vec!["run again with --debug for more detail".into()]
        }
    }
}

fn watch_hints(err: &WatchError) -> Vec<String> {
    match err {
        WatchError::Notify(_) => vec!["the file watcher could not be started".into()],
        WatchError::NothingToWatch => vec!["check the addon names under src/".into()],
    }
}

fn dist_hints(err: &DistError) -> Vec<String> {
    match err {
        DistError::WorldMissing { path, worlds_dir }
        | DistError::WorldIncomplete {
            path, worlds_dir, ..
        } => vec![
            format!("copy a world save to {}", path.display()),
            format!(
                "worlds are usually found in {}",
                worlds_dir.join("<id>").display()
            ),
        ],
        DistError::Sync(e) => sync_hints(e),
        DistError::LevelDat { path, .. } => {
            vec![format!("{} is not a valid Bedrock level.dat", path.display())]
        }
        DistError::Io { .. } | DistError::Zip { .. } | DistError::Join(_) => {
            vec!["run again with --debug for more detail".into()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn nested_errors_get_their_own_hints() {
        let err = anyhow::Error::from(SyncError::Core(CoreError::SourceRootMissing {
            path: PathBuf::from("/p/src"),
        }))
        .context("sync failed");
        assert!(hints(&err)[0].contains("src/"));

        let err = anyhow::Error::from(DistError::WorldMissing {
            path: PathBuf::from("/p/world"),
            worlds_dir: PathBuf::from("/t/minecraftWorlds"),
        });
        let hints = hints(&err);
        assert_eq!(hints.len(), 2);
        assert!(hints[1].contains("minecraftWorlds"));
    }

    #[test]
    fn unknown_errors_fall_back_to_debug_hint() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(hints(&err), vec!["run again with --debug for more detail"]);
    }
}
