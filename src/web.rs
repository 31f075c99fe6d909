//! wasm-bindgen surface for the page scripts
//!
//! Everything crosses the boundary as JSON strings, booleans or `undefined`;
//! failures are logged to the console and never thrown.

use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

use crate::gallery;
use crate::persistence::{SaveSystem, calculate_progress, slot_from_number};
use crate::platform::storage::LocalStorage;
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) just keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Save system ready");
}

fn parse_object(json: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            log::warn!("Expected a JSON object");
            None
        }
        Err(e) => {
            log::warn!("Invalid JSON from page: {}", e);
            None
        }
    }
}

/// Slot from the page; out-of-range numbers are refused rather than narrowed
fn js_slot(slot: f64) -> Option<u8> {
    let converted = slot_from_number(slot);
    if converted.is_none() {
        log::warn!("Invalid save slot from page: {}", slot);
    }
    converted
}

fn to_json<T: serde::Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value)
        .inspect_err(|e| log::error!("Failed to encode response: {}", e))
        .ok()
}

/// Save system backed by the window's localStorage
#[wasm_bindgen]
pub struct WebSaveSystem {
    inner: SaveSystem<LocalStorage>,
}

#[wasm_bindgen]
impl WebSaveSystem {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebSaveSystem, JsValue> {
        let storage = LocalStorage::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: SaveSystem::new(storage),
        })
    }

    #[wasm_bindgen(js_name = saveGame)]
    pub fn save_game(&mut self, slot: f64, game_data: &str) -> bool {
        let Some(slot) = js_slot(slot) else {
            return false;
        };
        parse_object(game_data).is_some_and(|data| self.inner.save_game(slot, data).is_ok())
    }

    #[wasm_bindgen(js_name = loadGame)]
    pub fn load_game(&self, slot: f64) -> Option<String> {
        self.inner
            .load_game(js_slot(slot)?)
            .and_then(|record| to_json(&record))
    }

    #[wasm_bindgen(js_name = hasSaveData)]
    pub fn has_save_data(&self, slot: f64) -> bool {
        js_slot(slot).is_some_and(|slot| self.inner.has_save_data(slot))
    }

    #[wasm_bindgen(js_name = deleteSave)]
    pub fn delete_save(&mut self, slot: f64) -> bool {
        js_slot(slot).is_some_and(|slot| self.inner.delete_save(slot).is_ok())
    }

    #[wasm_bindgen(js_name = getAllSaveInfo)]
    pub fn all_save_info(&self) -> Option<String> {
        to_json(&self.inner.all_save_info())
    }

    #[wasm_bindgen(js_name = calculateProgress)]
    pub fn calculate_progress(&self, game_data: &str) -> u8 {
        parse_object(game_data)
            .map(|data| calculate_progress(&data))
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = autoSave)]
    pub fn auto_save(&mut self, game_data: &str) -> bool {
        parse_object(game_data).is_some_and(|data| self.inner.auto_save(data).is_ok())
    }

    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&mut self, settings: &str) -> bool {
        parse_object(settings)
            .is_some_and(|map| self.inner.save_settings(&Settings::from(map)).is_ok())
    }

    #[wasm_bindgen(js_name = loadSettings)]
    pub fn load_settings(&self) -> Option<String> {
        to_json(&self.inner.load_settings())
    }

    /// `default_value` is JSON; an unparsable default counts as `null`
    #[wasm_bindgen(js_name = getSetting)]
    pub fn get_setting(&self, key: &str, default_value: &str) -> Option<String> {
        let default = serde_json::from_str(default_value).unwrap_or(Value::Null);
        to_json(&self.inner.get_setting(key, default))
    }

    #[wasm_bindgen(js_name = updateSetting)]
    pub fn update_setting(&mut self, key: &str, value: &str) -> bool {
        match serde_json::from_str::<Value>(value) {
            Ok(value) => self.inner.update_setting(key, value).is_ok(),
            Err(e) => {
                log::warn!("Invalid value for setting {}: {}", key, e);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = exportGameData)]
    pub fn export_game_data(&self) -> Option<String> {
        self.inner.export_game_data()
    }

    #[wasm_bindgen(js_name = importGameData)]
    pub fn import_game_data(&mut self, blob: &str) -> bool {
        self.inner.import_game_data(blob).is_ok()
    }

    #[wasm_bindgen(js_name = clearAllData)]
    pub fn clear_all_data(&mut self) -> bool {
        self.inner.clear_all_data().is_ok()
    }

    #[wasm_bindgen(js_name = getStorageUsage)]
    pub fn storage_usage(&self) -> Option<String> {
        self.inner
            .storage_usage()
            .ok()
            .and_then(|usage| to_json(&usage))
    }
}

/// Gallery table as a JSON array
#[wasm_bindgen(js_name = galleryJson)]
pub fn gallery_json() -> Option<String> {
    to_json(&gallery::entries())
}
