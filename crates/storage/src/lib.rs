#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonConfigStore, JsonHistoryStore};
pub use repository::{
    ConfigRepository, HistoryRepository, InMemoryHost, NoteField, NoteRecord, NoteStore,
    StorageError,
};
