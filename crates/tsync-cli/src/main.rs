use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tsync_core::{DownloadPlan, SyncError, SyncResult};
use tsync_runner::{Overrides, Project};

#[derive(Parser)]
#[command(name = "tsync", version, about = "Synchronize translations with the translation service")]
struct Cli {
    /// Repo root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create .tsync/tsync.toml with defaults
    Init,

    /// Check the tool, its config file and the working directory
    Doctor,

    /// Probe translation status and report whether a download is due
    Status {
        #[arg(long)]
        export_only_approved: bool,
    },

    /// Download translations if the remote status changed
    Download {
        /// Only include proofreader-approved strings
        #[arg(long)]
        export_only_approved: bool,
        /// Ignore the recorded snapshot
        #[arg(long)]
        force: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Upload source strings
    Upload,

    /// Copy downloaded translations into the resource directory
    Install {
        #[arg(long)]
        into: Option<PathBuf>,
    },
}

fn overrides(export_only_approved: bool, output: Option<PathBuf>) -> Overrides {
    Overrides {
        // the flag can only turn the filter on; config decides otherwise
        export_only_approved: export_only_approved.then_some(true),
        output_directory: output,
    }
}

/// The external tool's own exit status when it caused the failure, otherwise 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SyncError>().and_then(SyncError::exit_code) {
        Some(code) if code != 0 => code,
        _ => 1,
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let repo_root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    tracing::debug!(root = %repo_root.display(), "repo root");

    match cli.cmd {
        Command::Init => {
            let path = Project::init_repo(&repo_root)?;
            println!("Wrote {}", path.display());
        }
        Command::Doctor => {
            let p = Project::open(repo_root)?;
            let version = p.doctor()?;
            println!("OK ({} {})", p.cfg.tool.program, version);
        }
        Command::Status { export_only_approved } => {
            let p = Project::open(repo_root)?;
            let report = p.status(&overrides(export_only_approved, None))?;
            println!("Snapshot: {}", report.snapshot.digest());
            match &report.previous {
                Some(prev) => println!("Recorded: {} (run {})", prev.digest, prev.run_id),
                None => println!("Recorded: none"),
            }
            match report.plan {
                DownloadPlan::Skip => println!("Up to date"),
                DownloadPlan::Run(reason) => println!("Stale: {:?}", reason),
            }
        }
        Command::Download { export_only_approved, force, output } => {
            let p = Project::open(repo_root)?;
            let report = p.download(&overrides(export_only_approved, output), force)?;
            match report.result {
                Some(SyncResult::Downloaded { output_directory, files }) => {
                    println!("Downloaded {} files into {}", files.len(), output_directory.display());
                }
                _ => println!("Up to date, nothing downloaded"),
            }
        }
        Command::Upload => {
            let p = Project::open(repo_root)?;
            p.upload()?;
            println!("Uploaded source strings");
        }
        Command::Install { into } => {
            let p = Project::open(repo_root)?;
            let report = p.install(into, &Overrides::default())?;
            println!("Installed {} files ({} duplicates excluded)", report.copied.len(), report.excluded.len());
        }
    }

    Ok(())
}
