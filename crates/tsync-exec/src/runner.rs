use std::process::{Command, Stdio};

use tracing::debug;
use tsync_core::{Invocation, SyncError};

/// Captured result of one finished process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { exit_code: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code: Some(exit_code), stdout: String::new(), stderr: stderr.into() }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into `SyncError::ExternalTool`.
    pub fn into_result(self, program: &str) -> Result<CommandOutput, SyncError> {
        if self.success() {
            return Ok(self);
        }
        Err(SyncError::ExternalTool {
            program: program.to_string(),
            exit_code: self.exit_code,
            stderr: self.stderr,
        })
    }
}

/// Seam between the sync logic and process creation.
///
/// `Err` means the process never ran (missing executable, bad cwd). A process
/// that ran and exited non-zero is still `Ok` with its exit code.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;
}

/// Runs the invocation as a blocking child process with stdin detached.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        debug!(program = %invocation.program, args = ?invocation.args, cwd = %invocation.cwd.display(), "spawn");
        let out = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            exit_code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Run and map every failure mode onto `SyncError::ExternalTool`.
pub fn run_tool(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<CommandOutput, SyncError> {
    let out = runner.run(invocation).map_err(|e| SyncError::ExternalTool {
        program: invocation.program.clone(),
        exit_code: None,
        stderr: format!("failed to start {}: {e}", invocation.program),
    })?;
    out.into_result(&invocation.program)
}
