use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tsync_core::{validate_working_directory, SyncError, ToolCommand, TranslationSnapshot};
use tsync_exec::{run_tool, CommandRunner};

/// Asks the translation tool for proofreading status. The captured stdout is
/// the download cache key.
#[derive(Clone)]
pub struct StatusProber {
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl StatusProber {
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self { runner, program: program.into() }
    }

    pub fn probe(&self, working_directory: &Path) -> Result<TranslationSnapshot, SyncError> {
        validate_working_directory(working_directory)?;
        let inv = ToolCommand::Status.invocation(&self.program, working_directory);
        debug!(args = ?inv.args, "probing translation status");
        let out = run_tool(self.runner.as_ref(), &inv)?;
        Ok(TranslationSnapshot::new(out.stdout))
    }
}
