//! Watch loop: a recursive notify watcher over each addon's source feeds
//! [`drive`], which runs the sync pipeline through a [`CooldownGate`] until
//! ctrl-c.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use akhsync_compiler::ScriptCompiler;
use akhsync_core::{AddonName, Context};
use akhsync_sync::{Pipeline, RunOptions, StageReport, Stages, SyncError};

use crate::error::WatchError;
use crate::gate::CooldownGate;

/// Watch `src/<addon>` for every addon and rerun the sync pipeline on change.
///
/// Returns `Ok(())` on ctrl-c.
pub async fn watch<C: ScriptCompiler>(
    ctx: &Context,
    addons: &[AddonName],
    compiler: &C,
    options: RunOptions,
    cooldown: Duration,
) -> Result<(), WatchError> {
    let roots: Vec<PathBuf> = addons
        .iter()
        .map(|addon| ctx.addon_src(addon))
        .filter(|dir| dir.is_dir())
        .collect();
    if roots.is_empty() {
        return Err(WatchError::NothingToWatch);
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<PathBuf>();
    let mut watcher: RecommendedWatcher =
        recommended_watcher(move |event: notify::Result<Event>| match event {
            Ok(event) if is_relevant_event_kind(&event.kind) => {
                if let Some(path) = event.paths.into_iter().next() {
                    let _ = event_tx.send(path);
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "watcher event error"),
        })?;
    for root in &roots {
        watcher.watch(root, RecursiveMode::Recursive)?;
        tracing::debug!(path = %root.display(), "watching");
    }
    tracing::info!(
        addons = addons.len(),
        dirs = ?roots.iter().map(|r| r.display().to_string()).collect::<Vec<_>>(),
        "watching for changes"
    );

    let pipeline = Pipeline::new(ctx, compiler, Stages::sync());
    drive(
        event_rx,
        CooldownGate::new(cooldown),
        || pipeline.run(addons, options),
        shutdown_signal(),
    )
    .await;

    drop(watcher);
    Ok(())
}

/// The event loop, independent of the filesystem watcher.
///
/// Runs `run` on the first event, then lets `gate` decide. Returns when
/// `shutdown` resolves or the event channel closes. A run is raced against
/// `shutdown` so an interrupt never waits for the pipeline.
pub async fn drive<R, Fut, S>(
    mut events: mpsc::UnboundedReceiver<PathBuf>,
    mut gate: CooldownGate,
    mut run: R,
    shutdown: S,
) where
    R: FnMut() -> Fut,
    Fut: Future<Output = Result<StageReport, SyncError>>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let deadline = gate.deadline();
        let start = tokio::select! {
            _ = &mut shutdown => break,
            event = events.recv() => {
                let Some(path) = event else { break };
                let start = gate.on_event(Instant::now());
                if start {
                    tracing::info!(path = %path.display(), "change");
                } else {
                    tracing::debug!(path = %path.display(), "change deferred");
                }
                start
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let start = gate.on_deadline(Instant::now());
                if start {
                    tracing::info!("running deferred changes");
                }
                start
            }
        };
        if !start {
            continue;
        }

        tokio::select! {
            _ = &mut shutdown => break,
            result = run() => log_run(result),
        }
        gate.on_run_finished(Instant::now());
    }

    tracing::info!("stopped watching, goodbye");
}

fn log_run(result: Result<StageReport, SyncError>) {
    match result {
        Ok(report) => {
            let failed = report.failures().count();
            if failed > 0 {
                tracing::warn!(failed, "sync finished with failed steps");
            } else {
                tracing::info!(compiled = report.compiled.len(), "sync finished");
            }
        }
        Err(err) => tracing::error!(error = %err, "sync failed, still watching"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "ctrl-c handler failed");
        std::future::pending::<()>().await;
    }
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
