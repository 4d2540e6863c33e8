use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{RunId, SyncError};

/// Captured output of the remote status query. Only compared for equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationSnapshot(String);

impl TranslationSnapshot {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the raw text, hex encoded. This is what gets persisted.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Options resolved once per invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    pub export_only_approved: bool,
    skip_untranslated: bool,
    pub working_directory: PathBuf,
    pub output_directory: PathBuf,
}

impl SyncOptions {
    pub fn new(working_directory: PathBuf, output_directory: PathBuf, export_only_approved: bool) -> Self {
        Self {
            export_only_approved,
            skip_untranslated: true,
            working_directory,
            output_directory,
        }
    }

    pub fn skip_untranslated(&self) -> bool {
        self.skip_untranslated
    }

    pub fn validate_working_directory(&self) -> Result<(), SyncError> {
        validate_working_directory(&self.working_directory)
    }

    /// Fail fast before any process is spawned.
    pub fn validate(&self) -> Result<(), SyncError> {
        self.validate_working_directory()?;
        if self.output_directory.as_os_str().is_empty() {
            return Err(SyncError::config("output directory is not set"));
        }
        if self.output_directory.exists() && !self.output_directory.is_dir() {
            return Err(SyncError::config(format!(
                "output directory {} exists but is not a directory",
                self.output_directory.display()
            )));
        }
        Ok(())
    }
}

pub fn validate_working_directory(dir: &Path) -> Result<(), SyncError> {
    if dir.as_os_str().is_empty() {
        return Err(SyncError::config("working directory is not set"));
    }
    if !dir.is_dir() {
        return Err(SyncError::config(format!(
            "working directory {} does not exist or is not a directory",
            dir.display()
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncResult {
    /// Files under the output directory after the download, relative and sorted.
    Downloaded { output_directory: PathBuf, files: Vec<PathBuf> },
    Uploaded { stdout: String },
}

impl SyncResult {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            SyncResult::Downloaded { files, .. } => files,
            SyncResult::Uploaded { .. } => &[],
        }
    }
}

/// Persisted cache key of the last successful download.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub digest: String,
    pub export_only_approved: bool,
    pub run_id: RunId,
    pub recorded_at_unix: i64,
}

impl SnapshotRecord {
    pub fn new(snapshot: &TranslationSnapshot, export_only_approved: bool, run_id: RunId, now_unix: i64) -> Self {
        Self {
            digest: snapshot.digest(),
            export_only_approved,
            run_id,
            recorded_at_unix: now_unix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_content_addressed() {
        let a = TranslationSnapshot::new("fr: 100%\nde: 40%\n");
        let b = TranslationSnapshot::new("fr: 100%\nde: 40%\n");
        let c = TranslationSnapshot::new("fr: 100%\nde: 41%\n");
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn skip_untranslated_is_always_on() {
        let opts = SyncOptions::new(PathBuf::from("."), PathBuf::from("out"), false);
        assert!(opts.skip_untranslated());
    }

    #[test]
    fn validate_rejects_missing_working_directory() {
        let opts = SyncOptions::new(
            Path::new("/definitely/not/here/tsync").to_path_buf(),
            PathBuf::from("out"),
            false,
        );
        assert!(matches!(opts.validate(), Err(SyncError::Configuration(_))));
    }

    #[test]
    fn validate_rejects_empty_output_directory() {
        let opts = SyncOptions::new(std::env::temp_dir(), PathBuf::new(), false);
        assert!(matches!(opts.validate(), Err(SyncError::Configuration(_))));
    }
}
