use crate::{DownloadPlan, RunId, SyncMode, SyncResult, TaskState};

/// What a finished (non-failed) task invocation reports back.
#[derive(Clone, Debug)]
pub struct TaskReport {
    pub run_id: RunId,
    pub mode: SyncMode,
    pub states: Vec<TaskState>,
    pub plan: Option<DownloadPlan>,
    pub snapshot_digest: Option<String>,
    pub result: Option<SyncResult>,
}

impl TaskReport {
    pub fn final_state(&self) -> TaskState {
        self.states.last().copied().unwrap_or(TaskState::Idle)
    }

    pub fn skipped(&self) -> bool {
        self.final_state() == TaskState::Skipped
    }
}
