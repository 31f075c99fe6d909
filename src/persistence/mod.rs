//! Save/load persistence over a key-value store
//!
//! Features:
//! - Twelve manual save slots plus an autosave slot
//! - Settings merged over defaults on every read
//! - JSON export/import bundle of all slots and settings
//! - Storage usage reporting for the save menu

pub mod config;
pub mod error;
pub mod record;
pub mod system;
pub mod usage;

pub use config::{SaveConfig, slot_from_number};
pub use error::SaveError;
pub use record::{SaveRecord, SaveSlotInfo, calculate_progress};
pub use system::{ExportBundle, SaveSystem};
pub use usage::{StorageUsage, format_bytes};
