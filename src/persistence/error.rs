//! Error type for save/load operations

use std::fmt;

use crate::platform::storage::StoreError;

/// Errors that can occur during save/load operations.
#[derive(Debug)]
pub enum SaveError {
    /// The storage backend failed (quota exceeded, unavailable, ...)
    Store(StoreError),
    /// JSON encoding failed.
    Serialize(String),
    /// Stored or imported JSON is corrupt or not the expected shape.
    Deserialize(String),
    /// Slot number outside `0..=max_save_slots`.
    InvalidSlot(u8),
    /// Game state did not serialize to a JSON object.
    NotAnObject,
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Store(e) => write!(f, "Storage error: {e}"),
            SaveError::Serialize(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Deserialize(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::InvalidSlot(slot) => write!(f, "Invalid save slot: {slot}"),
            SaveError::NotAnObject => write!(f, "Game data must be a JSON object"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SaveError {
    fn from(e: StoreError) -> Self {
        SaveError::Store(e)
    }
}
