//! Save system facade
//!
//! Every operation catches store and JSON failures at its own boundary:
//! they are logged and handed back as a `SaveError` or an absent value,
//! never a panic. Nothing here coordinates multiple writers, and multi-key
//! operations (import, clear) are applied one key at a time.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::SaveConfig;
use super::error::SaveError;
use super::record::{SaveRecord, SaveSlotInfo};
use super::usage::StorageUsage;
use crate::consts::AUTOSAVE_SLOT;
use crate::platform::storage::KeyValueStore;
use crate::settings::Settings;

/// Everything `export_game_data` writes out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    /// Version tag of the exporting build; anything but a string counts as
    /// a mismatch
    #[serde(default)]
    pub version: Option<Value>,
    /// Export time, informational only
    #[serde(default)]
    pub timestamp: Option<Value>,
    /// Slot number (as a string key) to stored record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

/// Save slots and settings over a key-value store
pub struct SaveSystem<S: KeyValueStore> {
    store: S,
    config: SaveConfig,
    clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStore> SaveSystem<S> {
    /// Save system with the default key layout
    pub fn new(store: S) -> Self {
        Self::with_config(store, SaveConfig::default())
    }

    pub fn with_config(store: S, config: SaveConfig) -> Self {
        Self {
            store,
            config,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for record timestamps
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current time as ISO-8601 with millisecond precision
    pub fn now_timestamp(&self) -> String {
        (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn check_slot(&self, slot: u8) -> Result<(), SaveError> {
        if self.config.is_valid_slot(slot) {
            Ok(())
        } else {
            Err(SaveError::InvalidSlot(slot))
        }
    }

    fn write_record(&mut self, slot: u8, data: Map<String, Value>) -> Result<(), SaveError> {
        self.check_slot(slot)?;
        let record = SaveRecord::new(data, self.now_timestamp(), self.config.version.clone());
        let json = serde_json::to_string(&record).map_err(|e| SaveError::Serialize(e.to_string()))?;
        self.store.set_item(&self.config.slot_key(slot), &json)?;
        Ok(())
    }

    // === Save slots ===

    /// Stamp `data` with the save time and version and store it in `slot`
    pub fn save_game(&mut self, slot: u8, data: Map<String, Value>) -> Result<(), SaveError> {
        match self.write_record(slot, data) {
            Ok(()) => {
                log::info!("Game saved (slot {})", slot);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save slot {}: {}", slot, e);
                Err(e)
            }
        }
    }

    /// Save any serializable state that encodes as a JSON object
    pub fn save_state<T: Serialize>(&mut self, slot: u8, state: &T) -> Result<(), SaveError> {
        let data = match serde_json::to_value(state) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::error!("Failed to save slot {}: state is not an object", slot);
                return Err(SaveError::NotAnObject);
            }
            Err(e) => {
                log::error!("Failed to encode state for slot {}: {}", slot, e);
                return Err(SaveError::Serialize(e.to_string()));
            }
        };
        self.save_game(slot, data)
    }

    /// Store `data` in the autosave slot
    pub fn auto_save(&mut self, data: Map<String, Value>) -> Result<(), SaveError> {
        self.save_game(AUTOSAVE_SLOT, data)
    }

    /// Load `slot`, distinguishing "empty" from "unreadable"
    pub fn try_load_game(&self, slot: u8) -> Result<Option<SaveRecord>, SaveError> {
        self.check_slot(slot)?;
        let Some(json) = self.store.get_item(&self.config.slot_key(slot))? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| SaveError::Deserialize(e.to_string()))
    }

    /// Load `slot`; missing, unreadable and corrupt slots are all `None`
    pub fn load_game(&self, slot: u8) -> Option<SaveRecord> {
        match self.try_load_game(slot) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Failed to load slot {}: {}", slot, e);
                None
            }
        }
    }

    /// Whether anything is stored for `slot` (content is not validated)
    pub fn has_save_data(&self, slot: u8) -> bool {
        if !self.config.is_valid_slot(slot) {
            return false;
        }
        matches!(self.store.get_item(&self.config.slot_key(slot)), Ok(Some(_)))
    }

    /// Remove `slot`; deleting an empty slot succeeds
    pub fn delete_save(&mut self, slot: u8) -> Result<(), SaveError> {
        self.check_slot(slot)?;
        match self.store.remove_item(&self.config.slot_key(slot)) {
            Ok(()) => {
                log::info!("Save deleted (slot {})", slot);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to delete slot {}: {}", slot, e);
                Err(e.into())
            }
        }
    }

    /// Summary of every slot, autosave first
    pub fn all_save_info(&self) -> Vec<SaveSlotInfo> {
        self.config
            .slots()
            .map(|slot| match self.load_game(slot) {
                Some(record) => SaveSlotInfo::from_record(slot, &record),
                None => SaveSlotInfo::empty(slot),
            })
            .collect()
    }

    // === Settings ===

    /// Store `settings` as given (defaults are filled in on read)
    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), SaveError> {
        let result = serde_json::to_string(settings)
            .map_err(|e| SaveError::Serialize(e.to_string()))
            .and_then(|json| {
                self.store
                    .set_item(&self.config.settings_key, &json)
                    .map_err(SaveError::from)
            });
        match result {
            Ok(()) => {
                log::info!("Settings saved");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save settings: {}", e);
                Err(e)
            }
        }
    }

    /// Stored settings merged over the defaults
    pub fn load_settings(&self) -> Settings {
        let json = match self.store.get_item(&self.config.settings_key) {
            Ok(Some(json)) => json,
            Ok(None) => return Settings::default(),
            Err(e) => {
                log::warn!("Failed to read settings, using defaults: {}", e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&json) {
            Ok(persisted) => Settings::merged_over_defaults(persisted),
            Err(e) => {
                log::warn!("Stored settings are corrupt, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// One setting, or `default` when the key is unknown
    pub fn get_setting(&self, key: &str, default: Value) -> Value {
        self.load_settings().get(key).cloned().unwrap_or(default)
    }

    /// Read-modify-write a single setting
    pub fn update_setting(&mut self, key: &str, value: impl Into<Value>) -> Result<(), SaveError> {
        let mut settings = self.load_settings();
        settings.set(key, value);
        self.save_settings(&settings)
    }

    // === Import / export ===

    fn present_records(&self) -> Result<Vec<(u8, SaveRecord)>, SaveError> {
        let mut records = Vec::new();
        for slot in self.config.slots() {
            match self.try_load_game(slot) {
                Ok(Some(record)) => records.push((slot, record)),
                Ok(None) => {}
                Err(SaveError::Deserialize(e)) => {
                    log::warn!("Skipping corrupt slot {} in export: {}", slot, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    /// Bundle every saved slot and the settings into one JSON document
    pub fn try_export_game_data(&self) -> Result<String, SaveError> {
        let mut saves = BTreeMap::new();
        for (slot, record) in self.present_records()? {
            let value = serde_json::to_value(&record).map_err(|e| SaveError::Serialize(e.to_string()))?;
            saves.insert(slot.to_string(), value);
        }

        let bundle = ExportBundle {
            version: Some(Value::String(self.config.version.clone())),
            timestamp: Some(Value::String(self.now_timestamp())),
            saves: Some(saves),
            settings: Some(self.load_settings().into_map()),
        };
        serde_json::to_string_pretty(&bundle).map_err(|e| SaveError::Serialize(e.to_string()))
    }

    /// Export bundle, `None` if it could not be produced
    pub fn export_game_data(&self) -> Option<String> {
        match self.try_export_game_data() {
            Ok(json) => {
                log::info!("Game data exported ({} bytes)", json.len());
                Some(json)
            }
            Err(e) => {
                log::error!("Failed to export game data: {}", e);
                None
            }
        }
    }

    /// Whether an export's `version` field names this build's version
    fn is_current_version(&self, version: Option<&Value>) -> bool {
        version.and_then(Value::as_str) == Some(self.config.version.as_str())
    }

    fn restore_bundle(&mut self, blob: &str) -> Result<(), SaveError> {
        let bundle: ExportBundle =
            serde_json::from_str(blob).map_err(|e| SaveError::Deserialize(e.to_string()))?;

        if !self.is_current_version(bundle.version.as_ref()) {
            // Imported anyway; there is no migration path between versions
            log::warn!(
                "Importing data from version {} into {}",
                bundle.version.as_ref().map_or_else(|| "(none)".to_string(), Value::to_string),
                self.config.version
            );
        }

        let mut records = Vec::new();
        for (key, value) in bundle.saves.unwrap_or_default() {
            let slot = match key.parse::<u8>() {
                Ok(slot) if self.config.is_valid_slot(slot) => slot,
                _ => {
                    log::warn!("Skipping unknown save slot {:?} in import", key);
                    continue;
                }
            };
            match serde_json::from_value::<SaveRecord>(value) {
                Ok(record) => records.push((slot, record)),
                Err(e) => log::warn!("Skipping corrupt save for slot {} in import: {}", slot, e),
            }
        }

        for (slot, record) in &records {
            let json = serde_json::to_string(record).map_err(|e| SaveError::Serialize(e.to_string()))?;
            self.store.set_item(&self.config.slot_key(*slot), &json)?;
        }

        if let Some(settings) = bundle.settings {
            self.save_settings(&Settings::from(settings))?;
        }

        log::info!("Game data imported ({} saves)", records.len());
        Ok(())
    }

    /// Restore slots and settings from an export bundle
    pub fn import_game_data(&mut self, blob: &str) -> Result<(), SaveError> {
        self.restore_bundle(blob)
            .inspect_err(|e| log::error!("Failed to import game data: {}", e))
    }

    // === Housekeeping ===

    /// Delete every slot and reset settings to defaults
    pub fn clear_all_data(&mut self) -> Result<(), SaveError> {
        for slot in self.config.slots() {
            self.delete_save(slot)?;
        }
        self.save_settings(&Settings::default())?;
        log::info!("All save data cleared");
        Ok(())
    }

    /// Bytes and item count used by this save system's keys
    pub fn storage_usage(&self) -> Result<StorageUsage, SaveError> {
        self.scan_usage()
            .inspect_err(|e| log::error!("Failed to read storage usage: {}", e))
    }

    fn scan_usage(&self) -> Result<StorageUsage, SaveError> {
        let mut total_size = 0;
        let mut item_count = 0;
        for key in self.store.keys()? {
            if !self.config.owns_key(&key) {
                continue;
            }
            if let Some(value) = self.store.get_item(&key)? {
                total_size += key.len() + value.len();
                item_count += 1;
            }
        }
        Ok(StorageUsage::new(total_size, item_count))
    }
}
