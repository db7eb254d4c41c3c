//! Progress persistence
//!
//! Features:
//! - One logical record per install, under a fixed key
//! - Additive schema: missing fields load as zero
//! - Atomic writes (tmp → rename)
//! - Failures are reported, never fatal; callers fall back to defaults

pub mod file;
pub mod memory;
pub mod record;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{AuxGame, MAX_LIVES, ProgressRecord};

/// Errors from reading or writing saved progress
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("progress I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress data is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("no data directory available on this platform")]
    NoDataDir,
}

/// Load/save contract the host uses for high scores and resumable runs
pub trait ProgressStore {
    /// Read the whole record. A store with nothing saved yet returns zeros.
    fn load(&self) -> Result<ProgressRecord, PersistenceError>;

    /// Replace the whole record
    fn write(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError>;

    /// Store the Space Invaders run: high score plus resumable level/score/lives.
    /// The stored high score never goes down.
    fn save(
        &mut self,
        high_score: u32,
        level: u32,
        score: u32,
        lives: u8,
    ) -> Result<(), PersistenceError> {
        let mut record = self.load_for_update()?;
        record.high_score = record.high_score.max(high_score);
        record.level = level;
        record.score = score;
        record.lives = lives.min(MAX_LIVES);
        self.write(&record)
    }

    /// Store the high score of one of the single-screen games, if it beats the saved one
    fn save_aux(&mut self, game: AuxGame, high_score: u32) -> Result<(), PersistenceError> {
        let mut record = self.load_for_update()?;
        let slot = record.aux_high_score_mut(game);
        *slot = (*slot).max(high_score);
        self.write(&record)
    }

    /// Drop the resumable run, keeping every high score
    fn reset(&mut self) -> Result<(), PersistenceError> {
        let mut record = self.load_for_update()?;
        record.level = 0;
        record.score = 0;
        record.lives = 0;
        self.write(&record)
    }

    /// Current record for read-modify-write. A malformed record is replaced
    /// rather than blocking the write; I/O failures abort it.
    fn load_for_update(&self) -> Result<ProgressRecord, PersistenceError> {
        match self.load() {
            Err(PersistenceError::Format(e)) => {
                log::warn!("Overwriting malformed progress: {}", e);
                Ok(ProgressRecord::default())
            }
            other => other,
        }
    }
}

/// `load`, falling back to a fresh record on any failure
pub fn load_or_default(store: &impl ProgressStore) -> ProgressRecord {
    match store.load() {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Could not load progress, starting fresh: {}", e);
            ProgressRecord::default()
        }
    }
}
