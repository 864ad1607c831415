use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quiz_core::model::{QuizConfig, QuizConfigDraft};

use crate::repository::{ConfigRepository, StorageError};

/// File-backed configuration store.
///
/// Persists the raw draft form; values that fail validation on the way
/// back in degrade to "nothing stored" rather than erroring, so a stale
/// or hand-edited file can never wedge the config panel.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigRepository for JsonConfigStore {
    fn load(&self) -> Result<Option<QuizConfig>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::Io(err.to_string())),
        };

        let Ok(draft) = serde_json::from_str::<QuizConfigDraft>(&raw) else {
            return Ok(None);
        };
        Ok(draft.validate().ok())
    }

    fn save(&self, config: &QuizConfig) -> Result<(), StorageError> {
        let draft = QuizConfigDraft::from_config(config);
        let raw = serde_json::to_string_pretty(&draft)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|err| StorageError::Io(err.to_string()))
    }
}
