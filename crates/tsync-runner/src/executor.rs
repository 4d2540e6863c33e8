use std::sync::Arc;

use tracing::{debug, info, warn};
use tsync_core::{SyncError, SyncOptions, SyncResult, ToolCommand};
use tsync_exec::{run_tool, CommandOutput, CommandRunner};

use crate::util::list_files;

/// Runs the actual download/upload. Owns the output directory for the
/// duration of a call; callers serialize invocations.
#[derive(Clone)]
pub struct SyncExecutor {
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl SyncExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self { runner, program: program.into() }
    }

    /// Pull translations. Only `export_only_approved` changes the argv.
    pub fn download(&self, options: &SyncOptions) -> Result<SyncResult, SyncError> {
        options.validate()?;
        let inv = ToolCommand::download(options).invocation(&self.program, &options.working_directory);
        info!(args = ?inv.args, "downloading translations");
        let out = run_tool(self.runner.as_ref(), &inv)?;
        log_output(&out);

        let files = list_files(&options.output_directory).map_err(|e| {
            SyncError::config(format!("cannot read output directory {}: {e}", options.output_directory.display()))
        })?;
        if files.is_empty() {
            warn!(
                output = %options.output_directory.display(),
                "download succeeded but the output directory is empty; check the tool's own config"
            );
        }
        Ok(SyncResult::Downloaded { output_directory: options.output_directory.clone(), files })
    }

    /// Push the full source string set. No filter.
    pub fn upload(&self, options: &SyncOptions) -> Result<SyncResult, SyncError> {
        options.validate_working_directory()?;
        let inv = ToolCommand::Upload.invocation(&self.program, &options.working_directory);
        info!(args = ?inv.args, "uploading source strings");
        let out = run_tool(self.runner.as_ref(), &inv)?;
        log_output(&out);
        Ok(SyncResult::Uploaded { stdout: out.stdout })
    }
}

fn log_output(out: &CommandOutput) {
    for line in out.stdout.lines().filter(|l| !l.trim().is_empty()) {
        debug!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;
    use tsync_exec::FakeRunner;

    fn options(root: &std::path::Path, approved: bool) -> SyncOptions {
        SyncOptions::new(root.to_path_buf(), root.join("out"), approved)
    }

    #[test]
    fn approval_flag_only_when_requested() {
        let dir = tempdir().unwrap();
        let fake = Arc::new(FakeRunner::new());
        let exec = SyncExecutor::new(fake.clone(), "crowdin");

        exec.download(&options(dir.path(), true)).unwrap();
        exec.download(&options(dir.path(), false)).unwrap();

        let calls = fake.calls_to("download");
        assert!(calls[0].has_flag("--export-only-approved"));
        assert!(!calls[1].has_flag("--export-only-approved"));
        for c in &calls {
            assert!(c.has_flag("--skip-untranslated-files"));
            assert!(c.has_flag("--no-progress"));
            assert!(c.has_flag("--no-colors"));
        }
    }

    #[test]
    fn upload_flags() {
        let dir = tempdir().unwrap();
        let fake = Arc::new(FakeRunner::new().respond("upload", CommandOutput::ok("uploaded 3 files")));
        let exec = SyncExecutor::new(fake.clone(), "crowdin");

        let res = exec.upload(&options(dir.path(), true)).unwrap();
        assert_eq!(res, SyncResult::Uploaded { stdout: "uploaded 3 files".into() });

        let call = &fake.calls_to("upload")[0];
        assert!(!call.has_flag("--export-only-approved"));
        assert!(call.has_flag("--skip-untranslated-files"));
        assert!(call.has_flag("--no-progress"));
        assert!(call.has_flag("--no-colors"));
    }

    #[test]
    fn download_lists_written_files() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let fake = Arc::new(FakeRunner::new().on_success("download", move |_| {
            std::fs::create_dir_all(&out_dir).unwrap();
            std::fs::write(out_dir.join("fr.json"), "{}").unwrap();
            std::fs::write(out_dir.join("en.json"), "{}").unwrap();
        }));
        let res = SyncExecutor::new(fake, "crowdin").download(&options(dir.path(), false)).unwrap();
        assert_eq!(res.files(), &[PathBuf::from("en.json"), PathBuf::from("fr.json")]);
    }

    #[test]
    fn failures_carry_exit_code_and_stderr() {
        let dir = tempdir().unwrap();
        let fake = Arc::new(
            FakeRunner::new()
                .respond("download", CommandOutput::failed(2, "network unreachable"))
                .respond("upload", CommandOutput::failed(5, "forbidden")),
        );
        let exec = SyncExecutor::new(fake, "crowdin");

        let err = exec.download(&options(dir.path(), false)).unwrap_err();
        assert_eq!(err.exit_code(), Some(2));
        assert!(err.to_string().contains("network unreachable"));

        let err = exec.upload(&options(dir.path(), false)).unwrap_err();
        assert_eq!(err.exit_code(), Some(5));
        assert!(err.to_string().contains("forbidden"));

        // the wrapper itself wrote nothing
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn invalid_output_directory_fails_before_spawning() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("out"), "not a dir").unwrap();
        let fake = Arc::new(FakeRunner::new());
        let err = SyncExecutor::new(fake.clone(), "crowdin").download(&options(dir.path(), false)).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(fake.calls().is_empty());
    }
}
