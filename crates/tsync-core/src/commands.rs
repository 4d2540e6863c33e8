use std::path::PathBuf;

use crate::SyncOptions;

pub const EXPORT_ONLY_APPROVED: &str = "--export-only-approved";
pub const SKIP_UNTRANSLATED_FILES: &str = "--skip-untranslated-files";
pub const NO_PROGRESS: &str = "--no-progress";
pub const NO_COLORS: &str = "--no-colors";
pub const VERBOSE: &str = "--verbose";

/// Subcommands of the translation tool this crate knows how to shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolCommand {
    Status,
    Download { export_only_approved: bool },
    Upload,
    Version,
}

impl ToolCommand {
    pub fn download(options: &SyncOptions) -> Self {
        ToolCommand::Download { export_only_approved: options.export_only_approved }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCommand::Status => "status",
            ToolCommand::Download { .. } => "download",
            ToolCommand::Upload => "upload",
            ToolCommand::Version => "--version",
        }
    }

    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            ToolCommand::Status => vec!["status", "proofreading", VERBOSE, NO_PROGRESS, NO_COLORS],
            ToolCommand::Download { export_only_approved } => {
                let mut args = vec!["download", SKIP_UNTRANSLATED_FILES, NO_PROGRESS, NO_COLORS];
                if *export_only_approved {
                    args.insert(1, EXPORT_ONLY_APPROVED);
                }
                args
            }
            ToolCommand::Upload => vec!["upload", SKIP_UNTRANSLATED_FILES, NO_PROGRESS, NO_COLORS],
            ToolCommand::Version => vec!["--version"],
        };
        args.into_iter().map(String::from).collect()
    }

    pub fn invocation(&self, program: &str, cwd: impl Into<PathBuf>) -> Invocation {
        Invocation {
            program: program.to_string(),
            args: self.args(),
            cwd: cwd.into(),
        }
    }
}

/// A fully shaped external process call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}
