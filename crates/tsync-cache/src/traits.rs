use tsync_core::SnapshotRecord;

/// Where the last successful download's cache key lives between runs.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<SnapshotRecord>>;
    fn save(&self, record: &SnapshotRecord) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}
