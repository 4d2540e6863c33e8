use std::sync::Mutex;

use tsync_core::SnapshotRecord;

use crate::traits::SnapshotStore;

/// In-memory store for tests. Not durable.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    inner: Mutex<Option<SnapshotRecord>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SnapshotRecord) -> Self {
        Self { inner: Mutex::new(Some(record)) }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> anyhow::Result<Option<SnapshotRecord>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, record: &SnapshotRecord) -> anyhow::Result<()> {
        *self.inner.lock().unwrap() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}
