use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use quiz_core::model::{NoteId, NoteTypeId, QuizConfig};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── HOST RECORDS ──────────────────────────────────────────────────────────────
//

/// One named field on a host note, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteField {
    pub name: String,
    pub value: String,
}

impl NoteField {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Snapshot of a host note, as handed out by a [`NoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: NoteId,
    pub note_type_id: NoteTypeId,
    pub note_type: String,
    pub fields: Vec<NoteField>,
}

impl NoteRecord {
    /// Value of the named field, if the note has one.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

//
// ─── COLLABORATOR TRAITS ───────────────────────────────────────────────────────
//

/// Read access to the host's note collection.
///
/// One adapter implementation per host version, selected at startup;
/// callers never branch on the host API shape themselves.
pub trait NoteStore: Send + Sync {
    /// Ids of the notes in the named deck (exact name match), omitting
    /// notes that carry any of the given tags.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the host query fails.
    fn find_note_ids(
        &self,
        deck: &str,
        exclude_tags: &[String],
    ) -> Result<Vec<NoteId>, StorageError>;

    /// Resolve a note by id. `Ok(None)` means the note no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the host lookup itself fails.
    fn get_note(&self, id: NoteId) -> Result<Option<NoteRecord>, StorageError>;

    /// Ordered field names of a note type.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown note type.
    fn list_field_names(&self, note_type: NoteTypeId) -> Result<Vec<String>, StorageError>;
}

/// Key/value configuration storage.
pub trait ConfigRepository: Send + Sync {
    /// Persisted configuration, or `Ok(None)` when nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    fn load(&self) -> Result<Option<QuizConfig>, StorageError>;

    /// Persist the configuration, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    fn save(&self, config: &QuizConfig) -> Result<(), StorageError>;
}

/// The set of previously quizzed note ids.
///
/// History is best-effort and never load-bearing for correctness: it only
/// grows via completed sessions, and clearing is a total reset.
pub trait HistoryRepository: Send + Sync {
    /// Load the persisted set. Missing state loads as an empty set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store cannot be read at all.
    fn load(&self) -> Result<HashSet<NoteId>, StorageError>;

    /// Merge the given ids into the persisted set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    fn save(&self, ids: &HashSet<NoteId>) -> Result<(), StorageError>;

    /// Reset the persisted set to empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    fn clear(&self) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY HOST ────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct HostState {
    decks: HashMap<String, Vec<NoteId>>,
    notes: HashMap<NoteId, StoredNote>,
    note_types: HashMap<NoteTypeId, Vec<String>>,
    config: Option<QuizConfig>,
    history: HashSet<NoteId>,
}

struct StoredNote {
    record: NoteRecord,
    tags: Vec<String>,
}

/// In-memory host implementation for tests and prototyping.
///
/// Implements all three collaborator traits over one `Mutex`-guarded
/// state, mirroring how the real host serializes its callbacks.
#[derive(Clone, Default)]
pub struct InMemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl InMemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a note type and its ordered field names.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned (test-only backend).
    pub fn insert_note_type(&self, id: NoteTypeId, fields: &[&str]) {
        let mut state = self.state.lock().expect("host state poisoned");
        state
            .note_types
            .insert(id, fields.iter().map(|name| (*name).to_string()).collect());
    }

    /// Add a note to a deck, keeping insertion order per deck.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned (test-only backend).
    pub fn insert_note(&self, deck: &str, record: NoteRecord, tags: &[&str]) {
        let mut state = self.state.lock().expect("host state poisoned");
        state
            .decks
            .entry(deck.to_string())
            .or_default()
            .push(record.id);
        state.notes.insert(
            record.id,
            StoredNote {
                record,
                tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            },
        );
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HostState>, StorageError> {
        self.state
            .lock()
            .map_err(|err| StorageError::Io(err.to_string()))
    }
}

impl NoteStore for InMemoryHost {
    fn find_note_ids(
        &self,
        deck: &str,
        exclude_tags: &[String],
    ) -> Result<Vec<NoteId>, StorageError> {
        let state = self.lock()?;
        let Some(ids) = state.decks.get(deck) else {
            return Ok(Vec::new());
        };

        let ids = ids
            .iter()
            .filter(|id| {
                state.notes.get(*id).is_some_and(|note| {
                    !note.tags.iter().any(|tag| exclude_tags.contains(tag))
                })
            })
            .copied()
            .collect();
        Ok(ids)
    }

    fn get_note(&self, id: NoteId) -> Result<Option<NoteRecord>, StorageError> {
        let state = self.lock()?;
        Ok(state.notes.get(&id).map(|note| note.record.clone()))
    }

    fn list_field_names(&self, note_type: NoteTypeId) -> Result<Vec<String>, StorageError> {
        let state = self.lock()?;
        state
            .note_types
            .get(&note_type)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

impl ConfigRepository for InMemoryHost {
    fn load(&self) -> Result<Option<QuizConfig>, StorageError> {
        Ok(self.lock()?.config.clone())
    }

    fn save(&self, config: &QuizConfig) -> Result<(), StorageError> {
        self.lock()?.config = Some(config.clone());
        Ok(())
    }
}

impl HistoryRepository for InMemoryHost {
    fn load(&self) -> Result<HashSet<NoteId>, StorageError> {
        Ok(self.lock()?.history.clone())
    }

    fn save(&self, ids: &HashSet<NoteId>) -> Result<(), StorageError> {
        self.lock()?.history.extend(ids.iter().copied());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.history.clear();
        Ok(())
    }
}
