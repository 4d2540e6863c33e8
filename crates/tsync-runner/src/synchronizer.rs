use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tsync_cache::SnapshotStore;
use tsync_core::{
    plan_download, DownloadInputs, DownloadPlan, RunId, SnapshotRecord, SyncMode, SyncOptions, SyncResult,
    TaskReport, TaskState, TranslationSnapshot,
};
use tsync_exec::CommandRunner;

use crate::{executor::SyncExecutor, prober::StatusProber, util::now_unix};

/// Result of probing without executing anything.
#[derive(Clone, Debug)]
pub struct StatusReport {
    pub snapshot: TranslationSnapshot,
    pub previous: Option<SnapshotRecord>,
    pub plan: DownloadPlan,
}

/// Drives one task invocation through
/// `Idle -> Probing -> {Skipped | Executing} -> {Succeeded | Failed}`.
pub struct Synchronizer {
    prober: StatusProber,
    executor: SyncExecutor,
    store: Arc<dyn SnapshotStore>,
}

impl Synchronizer {
    pub fn new(runner: Arc<dyn CommandRunner>, store: Arc<dyn SnapshotStore>, program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            prober: StatusProber::new(runner.clone(), program.clone()),
            executor: SyncExecutor::new(runner, program),
            store,
        }
    }

    /// Probe and plan, but never download.
    pub fn status(&self, options: &SyncOptions) -> Result<StatusReport> {
        options.validate()?;
        let snapshot = self.prober.probe(&options.working_directory)?;
        let previous = self.load_previous();
        let plan = plan_download(&DownloadInputs {
            previous: previous.as_ref(),
            current: &snapshot,
            export_only_approved: options.export_only_approved,
            output_exists: options.output_directory.is_dir(),
            force: false,
        });
        Ok(StatusReport { snapshot, previous, plan })
    }

    pub fn download(&self, options: &SyncOptions, force: bool) -> Result<TaskReport> {
        options.validate()?;
        let mut trail = Trail::new(SyncMode::Download);

        trail.advance(TaskState::Probing);
        let snapshot = match self.prober.probe(&options.working_directory) {
            Ok(s) => s,
            Err(e) => return Err(trail.fail(e)),
        };
        let digest = snapshot.digest();
        let previous = self.load_previous();
        let plan = plan_download(&DownloadInputs {
            previous: previous.as_ref(),
            current: &snapshot,
            export_only_approved: options.export_only_approved,
            output_exists: options.output_directory.is_dir(),
            force,
        });

        match &plan {
            DownloadPlan::Skip => {
                info!(run_id = %trail.run_id, digest = %digest, "translations up to date, skipping download");
                trail.advance(TaskState::Skipped);
                return Ok(trail.finish(Some(plan), Some(digest), None));
            }
            DownloadPlan::Run(reason) => {
                info!(run_id = %trail.run_id, ?reason, digest = %digest, "translations are stale");
            }
        }

        trail.advance(TaskState::Executing);
        let result = match self.executor.download(options) {
            Ok(r) => r,
            Err(e) => return Err(trail.fail(e)),
        };

        // only a successful download moves the cache key forward
        let record = SnapshotRecord::new(&snapshot, options.export_only_approved, trail.run_id.clone(), now_unix());
        if let Err(e) = self.store.save(&record) {
            return Err(trail.fail(e.context("record snapshot")));
        }
        trail.advance(TaskState::Succeeded);
        info!(run_id = %trail.run_id, files = result.files().len(), "download complete");
        Ok(trail.finish(Some(plan), Some(digest), Some(result)))
    }

    pub fn upload(&self, options: &SyncOptions) -> Result<TaskReport> {
        options.validate_working_directory()?;
        let mut trail = Trail::new(SyncMode::Upload);
        trail.advance(TaskState::Executing);
        let result = match self.executor.upload(options) {
            Ok(r) => r,
            Err(e) => return Err(trail.fail(e)),
        };
        trail.advance(TaskState::Succeeded);
        info!(run_id = %trail.run_id, "upload complete");
        Ok(trail.finish(None, None, Some(result)))
    }

    /// Forget the recorded snapshot so the next download always runs.
    pub fn invalidate(&self) -> Result<()> {
        self.store.clear()
    }

    fn load_previous(&self) -> Option<SnapshotRecord> {
        // an unreadable record only costs a redundant download
        self.store.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable snapshot record");
            None
        })
    }
}

struct Trail {
    run_id: RunId,
    mode: SyncMode,
    states: Vec<TaskState>,
}

impl Trail {
    fn new(mode: SyncMode) -> Self {
        Self { run_id: RunId::new(), mode, states: vec![TaskState::Idle] }
    }

    fn current(&self) -> TaskState {
        self.states.last().copied().unwrap_or(TaskState::Idle)
    }

    fn advance(&mut self, next: TaskState) {
        debug_assert!(
            self.current().can_transition(next, self.mode),
            "illegal transition {:?} -> {:?}",
            self.current(),
            next
        );
        tracing::debug!(run_id = %self.run_id, mode = self.mode.as_str(), from = ?self.current(), to = ?next, "state");
        self.states.push(next);
    }

    fn fail(&mut self, err: impl Into<anyhow::Error>) -> anyhow::Error {
        let err = err.into();
        self.advance(TaskState::Failed);
        warn!(run_id = %self.run_id, mode = self.mode.as_str(), error = %format!("{err:#}"), "task failed");
        err
    }

    fn finish(self, plan: Option<DownloadPlan>, snapshot_digest: Option<String>, result: Option<SyncResult>) -> TaskReport {
        TaskReport {
            run_id: self.run_id,
            mode: self.mode,
            states: self.states,
            plan,
            snapshot_digest,
            result,
        }
    }
}
