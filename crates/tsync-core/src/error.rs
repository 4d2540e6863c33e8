use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The invoked program could not be started or terminated abnormally.
    /// `exit_code` is `None` when it never ran or was killed by a signal.
    #[error("{program} failed (exit={exit_code:?}): {stderr}")]
    ExternalTool {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SyncError {
    pub fn config(msg: impl Into<String>) -> Self {
        SyncError::Configuration(msg.into())
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            SyncError::ExternalTool { exit_code, .. } => *exit_code,
            SyncError::Configuration(_) => None,
        }
    }
}
