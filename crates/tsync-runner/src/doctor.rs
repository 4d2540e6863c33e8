use std::path::Path;

use tsync_core::{validate_working_directory, SyncError, ToolCommand};
use tsync_exec::{run_tool, CommandRunner};

/// Check the environment a sync needs. Returns the tool's version line.
pub fn doctor(
    runner: &dyn CommandRunner,
    program: &str,
    working_directory: &Path,
    tool_config_file: &str,
) -> Result<String, SyncError> {
    validate_working_directory(working_directory)?;

    let tool_cfg = working_directory.join(tool_config_file);
    if !tool_cfg.is_file() {
        return Err(SyncError::config(format!(
            "{} not found; the translation tool needs it to locate sources and translations",
            tool_cfg.display()
        )));
    }

    let out = run_tool(runner, &ToolCommand::Version.invocation(program, working_directory))?;
    Ok(out.stdout.lines().next().unwrap_or("").trim().to_string())
}
