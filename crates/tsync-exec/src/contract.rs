use std::path::Path;

use anyhow::{anyhow, Result};
use tsync_core::Invocation;

use crate::runner::CommandRunner;

/// Shared runner contract suite. Needs a POSIX `sh` on PATH.
pub fn run_runner_contract_suite(runner: &dyn CommandRunner, dir: &Path) -> Result<()> {
    // stdout is captured verbatim, cwd is honoured
    std::fs::write(dir.join("marker.txt"), "present")?;
    let out = runner.run(&sh(dir, "cat marker.txt"))?;
    if !out.success() || out.stdout != "present" {
        return Err(anyhow!("expected captured stdout from cwd, got {out:?}"));
    }

    // two identical calls give identical output
    let again = runner.run(&sh(dir, "cat marker.txt"))?;
    if again != out {
        return Err(anyhow!("expected deterministic output"));
    }

    // non-zero exit is reported, not raised
    let out = runner.run(&sh(dir, "echo nope >&2; exit 7"))?;
    if out.exit_code != Some(7) || out.stderr.trim() != "nope" {
        return Err(anyhow!("expected exit 7 with stderr, got {out:?}"));
    }

    // stdin is detached, so a read returns immediately with nothing
    let out = runner.run(&sh(dir, "cat"))?;
    if !out.success() || !out.stdout.is_empty() {
        return Err(anyhow!("expected empty stdin, got {out:?}"));
    }
    Ok(())
}

fn sh(dir: &Path, script: &str) -> Invocation {
    Invocation {
        program: "sh".into(),
        args: vec!["-c".into(), script.into()],
        cwd: dir.to_path_buf(),
    }
}
