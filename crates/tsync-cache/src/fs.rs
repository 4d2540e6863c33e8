use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tsync_core::SnapshotRecord;

use crate::traits::SnapshotStore;

/// JSON file holding a single `SnapshotRecord`. A missing file means no record.
#[derive(Clone, Debug)]
pub struct FsSnapshotStore {
    pub path: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self) -> Result<Option<SnapshotRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        let record: SnapshotRecord =
            serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(record))
    }

    fn save(&self, record: &SnapshotRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(record)?;
        // write-then-rename so a crash never leaves half a record behind
        let tmp = self.tmp_path();
        std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| format!("rename into {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}

/// Default record location under the repo root.
pub fn default_cache_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".tsync").join("cache").join("download.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tsync_core::{RunId, TranslationSnapshot};

    fn record() -> SnapshotRecord {
        SnapshotRecord::new(&TranslationSnapshot::new("fr 100%"), true, RunId::from_str("r1"), 10)
    }

    #[test]
    fn missing_file_is_no_record() {
        let dir = tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = FsSnapshotStore::new(default_cache_path(dir.path()));
        store.save(&record()).unwrap();
        assert_eq!(store.load().unwrap(), Some(record()));
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path().join("download.json"));
        store.save(&record()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("download.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FsSnapshotStore::new(path).load().is_err());
    }
}
