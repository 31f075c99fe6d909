//! Misaki - save data and gallery tables for the browser game
//!
//! Core modules:
//! - `persistence`: Save slots, import/export, storage usage
//! - `settings`: Player preferences merged over built-in defaults
//! - `gallery`: Static table of unlockable gallery entries
//! - `platform`: Browser/native storage abstraction
//! - `web`: wasm-bindgen surface for the page (wasm32 only)

pub mod gallery;
pub mod persistence;
pub mod platform;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use gallery::GalleryEntry;
pub use persistence::{SaveConfig, SaveError, SaveRecord, SaveSlotInfo, SaveSystem, StorageUsage};
pub use platform::storage::{KeyValueStore, MemoryStorage, StoreError};
pub use settings::{Settings, TextSpeed};

/// Save system configuration constants
pub mod consts {
    /// Number of manual save slots (slot 0 is the autosave on top of these)
    pub const MAX_SAVE_SLOTS: u8 = 12;
    /// Slot reserved for the autosave record
    pub const AUTOSAVE_SLOT: u8 = 0;

    /// Version tag stamped into every record and export bundle
    pub const SAVE_VERSION: &str = "1.0.0";

    /// LocalStorage keys
    pub const SAVE_KEY_PREFIX: &str = "misaki_save_slot_";
    pub const AUTOSAVE_KEY: &str = "misaki_autosave";
    pub const SETTINGS_KEY: &str = "misaki_settings";

    /// Progress weighting: rounds cleared out of `TOTAL_ROUNDS` are worth
    /// `ROUND_WEIGHT` percent, decided games out of `TOTAL_GAMES` the rest.
    pub const TOTAL_ROUNDS: f64 = 9.0;
    pub const ROUND_WEIGHT: f64 = 60.0;
    pub const TOTAL_GAMES: f64 = 10.0;
    pub const WIN_WEIGHT: f64 = 40.0;
}
