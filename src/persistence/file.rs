//! JSON file store
//!
//! The record lives under a fixed key so the file can grow other sections
//! later without breaking old saves.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde_json::{Map, Value};

use super::{PersistenceError, ProgressRecord, ProgressStore};

/// Key the record is stored under
pub const STORAGE_KEY: &str = "term_arcade_progress";
/// File name inside the data directory
pub const FILE_NAME: &str = "progress.json";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/progress.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(FILE_NAME))
    }

    /// Platform data directory, e.g. `~/.local/share/term-arcade`
    pub fn default_dir() -> Result<PathBuf, PersistenceError> {
        dirs::data_dir()
            .map(|d| d.join("term-arcade"))
            .ok_or(PersistenceError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<ProgressRecord, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No saved progress at {}, starting fresh", self.path.display());
                return Ok(ProgressRecord::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut root = match serde_json::from_str::<Value>(&json)? {
            Value::Object(root) => root,
            _ => return Err(serde_json::Error::custom("progress file is not a JSON object").into()),
        };
        match root.remove(STORAGE_KEY) {
            Some(section) => Ok(serde_json::from_value(section)?),
            None => Ok(ProgressRecord::default()),
        }
    }

    fn write(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut root = Map::new();
        root.insert(STORAGE_KEY.to_owned(), serde_json::to_value(record)?);
        let json = serde_json::to_string_pretty(&Value::Object(root))?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Progress saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AuxGame;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert_eq!(store.load().unwrap(), ProgressRecord::default());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path().join("nested"));
        store.save(1200, 4, 830, 1).unwrap();
        store.save_aux(AuxGame::Snake, 150).unwrap();

        let reopened = JsonFileStore::in_dir(dir.path().join("nested"));
        let record = reopened.load().unwrap();
        assert_eq!(record.high_score, 1200);
        assert_eq!(record.level, 4);
        assert_eq!(record.score, 830);
        assert_eq!(record.lives, 1);
        assert_eq!(record.snake_high_score, 150);
        assert!(!reopened.tmp_path().exists());
    }

    #[test]
    fn test_record_lives_under_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path());
        store.save(5, 1, 5, 3).unwrap();
        let json = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[STORAGE_KEY]["high_score"], 5);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(PersistenceError::Format(_))));

        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.load(), Err(PersistenceError::Format(_))));
    }

    #[test]
    fn test_file_without_progress_section_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"other_section": {"volume": 3}}"#).unwrap();
        assert_eq!(store.load().unwrap(), ProgressRecord::default());
    }

    #[test]
    fn test_older_file_without_aux_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(
            store.path(),
            r#"{"term_arcade_progress": {"high_score": 40, "level": 2, "score": 10, "lives": 3}}"#,
        )
        .unwrap();
        let record = store.load().unwrap();
        assert_eq!(record.level, 2);
        assert_eq!(record.flappy_high_score, 0);
    }
}
