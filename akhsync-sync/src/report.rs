//! Per-addon step outcomes collected over a pipeline run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use akhsync_core::{AddonName, PackType};

/// Result of one best-effort filesystem step for one addon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Done,
    /// Nothing to do, e.g. the path was already absent.
    Skipped { reason: String },
    /// The step failed; the rest of the run continued.
    Failed { error: String },
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

/// Pipeline stage a [`StepRecord`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    ClearSyncTarget,
    ClearBuild,
    CopyToBuild,
    CopyScriptAssets,
    SyncCopy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ClearSyncTarget => "clear sync target",
            Stage::ClearBuild => "clear build",
            Stage::CopyToBuild => "copy to build",
            Stage::CopyScriptAssets => "copy script assets",
            Stage::SyncCopy => "copy to sync target",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub stage: Stage,
    pub addon: AddonName,
    /// `None` when the step covered the whole addon.
    pub pack: Option<PackType>,
    pub path: PathBuf,
    pub outcome: StepOutcome,
}

impl StepRecord {
    /// Emit the record as a tracing event at a level matching its outcome.
    pub(crate) fn log(&self) {
        let pack = self.pack.map(|p| p.to_string()).unwrap_or_default();
        match &self.outcome {
            StepOutcome::Done => tracing::debug!(
                stage = %self.stage, addon = %self.addon, pack = %pack, path = %self.path.display(), "done"
            ),
            StepOutcome::Skipped { reason } => tracing::debug!(
                stage = %self.stage, addon = %self.addon, pack = %pack, path = %self.path.display(), reason = %reason, "skipped"
            ),
            StepOutcome::Failed { error } => tracing::warn!(
                stage = %self.stage, addon = %self.addon, pack = %pack, path = %self.path.display(), error = %error, "failed"
            ),
        }
    }
}

/// Everything a pipeline run did, in stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub steps: Vec<StepRecord>,
    /// Addons whose scripts were compiled.
    pub compiled: Vec<AddonName>,
}

impl StageReport {
    pub(crate) fn extend(&mut self, records: Vec<StepRecord>) {
        for record in &records {
            record.log();
        }
        self.steps.extend(records);
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|r| r.outcome.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn steps_for(&self, stage: Stage) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(move |r| r.stage == stage)
    }
}
