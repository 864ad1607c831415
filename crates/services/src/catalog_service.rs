use std::collections::HashSet;
use std::sync::Arc;

use storage::repository::{NoteStore, StorageError};

/// A note type observed in a deck, with its ordered field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTypeInfo {
    pub name: String,
    pub fields: Vec<String>,
}

/// Discovers which note types (and fields) a deck actually contains, so
/// the config panel only offers choices that can produce questions.
#[derive(Clone)]
pub struct CatalogService {
    notes: Arc<dyn NoteStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// Distinct note types across the deck's notes, sorted by name.
    ///
    /// The first note seen for a type supplies its field order; later
    /// notes of the same type are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the host query fails.
    pub fn note_types_in_deck(&self, deck: &str) -> Result<Vec<NoteTypeInfo>, StorageError> {
        let ids = self.notes.find_note_ids(deck, &[])?;

        let mut seen = HashSet::new();
        let mut types = Vec::new();
        for id in ids {
            let Some(note) = self.notes.get_note(id)? else {
                continue;
            };
            if !seen.insert(note.note_type.clone()) {
                continue;
            }
            let fields = self.notes.list_field_names(note.note_type_id)?;
            types.push(NoteTypeInfo {
                name: note.note_type,
                fields,
            });
        }

        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }
}
