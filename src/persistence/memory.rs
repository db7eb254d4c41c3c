//! In-memory store, for tests and for hosts without a data directory

use super::{PersistenceError, ProgressRecord, ProgressStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: ProgressRecord,
    /// Number of successful writes, for asserting persistence policy
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: ProgressRecord) -> Self {
        Self { record, writes: 0 }
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<ProgressRecord, PersistenceError> {
        Ok(self.record)
    }

    fn write(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        self.record = *record;
        self.writes += 1;
        Ok(())
    }
}
