use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SyncMode {
    Download,
    Upload,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Download => "download",
            SyncMode::Upload => "upload",
        }
    }
}

/// Lifecycle of a single task invocation.
///
/// `Idle -> Probing -> {Skipped | Executing} -> {Succeeded | Failed}`.
/// Uploads carry no cache key and go straight from `Idle` to `Executing`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Probing,
    Skipped,
    Executing,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Skipped | TaskState::Succeeded | TaskState::Failed)
    }

    pub fn can_transition(&self, next: TaskState, mode: SyncMode) -> bool {
        use TaskState::*;
        match (self, next) {
            (Idle, Probing) => mode == SyncMode::Download,
            (Idle, Executing) => mode == SyncMode::Upload,
            (Probing, Skipped) => mode == SyncMode::Download,
            (Probing, Executing) => true,
            // the probe itself may fail
            (Probing, Failed) => true,
            (Executing, Succeeded) | (Executing, Failed) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_only_reachable_for_download() {
        assert!(TaskState::Probing.can_transition(TaskState::Skipped, SyncMode::Download));
        assert!(!TaskState::Probing.can_transition(TaskState::Skipped, SyncMode::Upload));
    }

    #[test]
    fn upload_bypasses_probing() {
        assert!(TaskState::Idle.can_transition(TaskState::Executing, SyncMode::Upload));
        assert!(!TaskState::Idle.can_transition(TaskState::Probing, SyncMode::Upload));
        assert!(!TaskState::Idle.can_transition(TaskState::Executing, SyncMode::Download));
    }

    #[test]
    fn failed_is_terminal() {
        assert!(TaskState::Failed.is_terminal());
        for next in [TaskState::Idle, TaskState::Probing, TaskState::Executing, TaskState::Succeeded] {
            assert!(!TaskState::Failed.can_transition(next, SyncMode::Download));
        }
    }
}
