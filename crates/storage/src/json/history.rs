use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quiz_core::model::NoteId;

use crate::repository::{HistoryRepository, StorageError};

/// File-backed history of previously quizzed note ids.
///
/// The on-disk form is a flat JSON array of ids, rewritten wholesale on
/// every save. Loading is best-effort: a missing or unreadable file is an
/// empty history.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_set(&self) -> HashSet<NoteId> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return HashSet::new();
        };
        serde_json::from_str::<Vec<NoteId>>(&raw)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }
}

impl HistoryRepository for JsonHistoryStore {
    fn load(&self) -> Result<HashSet<NoteId>, StorageError> {
        Ok(self.read_set())
    }

    fn save(&self, ids: &HashSet<NoteId>) -> Result<(), StorageError> {
        let mut merged = self.read_set();
        merged.extend(ids.iter().copied());

        let mut ordered: Vec<NoteId> = merged.into_iter().collect();
        ordered.sort_unstable();

        let raw = serde_json::to_string(&ordered)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|err| StorageError::Io(err.to_string()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err.to_string())),
        }
    }
}
