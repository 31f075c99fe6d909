//! Key layout and limits for a save system instance

use std::ops::RangeInclusive;

use crate::consts::*;

/// Storage namespace and slot limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConfig {
    /// Prefix for manual slot keys (`{prefix}{slot}`)
    pub key_prefix: String,
    /// Key holding slot 0
    pub autosave_key: String,
    /// Key holding the settings blob
    pub settings_key: String,
    /// Highest manual slot number
    pub max_save_slots: u8,
    /// Version tag stamped on records and exports
    pub version: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            key_prefix: SAVE_KEY_PREFIX.to_string(),
            autosave_key: AUTOSAVE_KEY.to_string(),
            settings_key: SETTINGS_KEY.to_string(),
            max_save_slots: MAX_SAVE_SLOTS,
            version: SAVE_VERSION.to_string(),
        }
    }
}

impl SaveConfig {
    /// Storage key for `slot` (slot 0 maps to the autosave key)
    pub fn slot_key(&self, slot: u8) -> String {
        if slot == AUTOSAVE_SLOT {
            self.autosave_key.clone()
        } else {
            format!("{}{}", self.key_prefix, slot)
        }
    }

    pub fn is_valid_slot(&self, slot: u8) -> bool {
        slot <= self.max_save_slots
    }

    /// All slots, autosave first
    pub fn slots(&self) -> RangeInclusive<u8> {
        0..=self.max_save_slots
    }

    /// Whether `key` belongs to this save system
    pub fn owns_key(&self, key: &str) -> bool {
        key.starts_with(&self.key_prefix) || key == self.autosave_key || key == self.settings_key
    }
}

/// Slot number from a script-side number, `None` unless it is a whole
/// number that fits in a `u8`
pub fn slot_from_number(value: f64) -> Option<u8> {
    if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return None;
    }
    u8::try_from(value as i64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_keys() {
        let config = SaveConfig::default();
        assert_eq!(config.slot_key(0), "misaki_autosave");
        assert_eq!(config.slot_key(1), "misaki_save_slot_1");
        assert_eq!(config.slot_key(12), "misaki_save_slot_12");
    }

    #[test]
    fn test_slot_range() {
        let config = SaveConfig::default();
        assert!(config.is_valid_slot(0));
        assert!(config.is_valid_slot(12));
        assert!(!config.is_valid_slot(13));
        assert_eq!(config.slots().count(), 13);
    }

    #[test]
    fn test_slot_from_number() {
        assert_eq!(slot_from_number(0.0), Some(0));
        assert_eq!(slot_from_number(12.0), Some(12));
        assert_eq!(slot_from_number(255.0), Some(255));
        // Would wrap to 0 and 1 if narrowed
        assert_eq!(slot_from_number(256.0), None);
        assert_eq!(slot_from_number(257.0), None);
        assert_eq!(slot_from_number(-1.0), None);
        assert_eq!(slot_from_number(1.5), None);
        assert_eq!(slot_from_number(f64::NAN), None);
        assert_eq!(slot_from_number(f64::INFINITY), None);
    }

    #[test]
    fn test_owns_key() {
        let config = SaveConfig::default();
        assert!(config.owns_key("misaki_save_slot_3"));
        assert!(config.owns_key("misaki_autosave"));
        assert!(config.owns_key("misaki_settings"));
        assert!(!config.owns_key("roto_pong_settings"));
        assert!(!config.owns_key("misaki_autosave_old"));
    }
}
