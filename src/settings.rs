//! Game settings and preferences
//!
//! Persisted separately from game saves in LocalStorage. The stored blob is a
//! plain JSON object; every read overlays it on the built-in defaults so
//! options added in later releases pick up their default without migration,
//! and keys this build doesn't know about survive a load/save cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Text speed presets (milliseconds per character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
    Instant,
}

impl TextSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSpeed::Slow => "Slow",
            TextSpeed::Normal => "Normal",
            TextSpeed::Fast => "Fast",
            TextSpeed::Instant => "Instant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(TextSpeed::Slow),
            "normal" | "med" | "medium" => Some(TextSpeed::Normal),
            "fast" => Some(TextSpeed::Fast),
            "instant" | "off" => Some(TextSpeed::Instant),
            _ => None,
        }
    }

    /// Delay between revealed characters
    pub fn ms_per_char(&self) -> u64 {
        match self {
            TextSpeed::Slow => 80,
            TextSpeed::Normal => 50,
            TextSpeed::Fast => 25,
            TextSpeed::Instant => 0,
        }
    }

    /// Closest preset to a raw `textSpeed` value
    pub fn from_ms(ms: u64) -> Self {
        [
            TextSpeed::Slow,
            TextSpeed::Normal,
            TextSpeed::Fast,
            TextSpeed::Instant,
        ]
        .into_iter()
        .min_by_key(|preset| preset.ms_per_char().abs_diff(ms))
        .unwrap_or_default()
    }
}

/// Player settings, keyed by option name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            values: Self::defaults(),
        }
    }
}

impl From<Map<String, Value>> for Settings {
    /// Wrap a mapping as-is, without filling in defaults
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl Settings {
    /// Built-in default for every known option
    pub fn defaults() -> Map<String, Value> {
        let mut map = Map::new();

        // Audio
        map.insert("bgmVolume".into(), json!(0.7));
        map.insert("seVolume".into(), json!(0.8));
        map.insert("voiceVolume".into(), json!(1.0));

        // Text
        map.insert("textSpeed".into(), json!(TextSpeed::Normal.ms_per_char()));
        map.insert("autoAdvance".into(), json!(false));
        map.insert("skipUnread".into(), json!(false));

        // Display
        map.insert("fullscreen".into(), json!(false));
        map.insert("showEffects".into(), json!(true));
        map.insert("language".into(), json!("ja"));

        map
    }

    /// Overlay `persisted` on the defaults, key by key
    pub fn merged_over_defaults(persisted: Map<String, Value>) -> Self {
        let mut values = Self::defaults();
        values.extend(persisted);
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    fn number_or_default(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(Value::as_f64)
            .or_else(|| Self::defaults().get(key).and_then(Value::as_f64))
            .unwrap_or(0.0)
    }

    fn flag_or_default(&self, key: &str) -> bool {
        self.get(key)
            .and_then(Value::as_bool)
            .or_else(|| Self::defaults().get(key).and_then(Value::as_bool))
            .unwrap_or(false)
    }

    /// Music volume (0.0 - 1.0)
    pub fn bgm_volume(&self) -> f64 {
        self.number_or_default("bgmVolume").clamp(0.0, 1.0)
    }

    /// Sound effects volume (0.0 - 1.0)
    pub fn se_volume(&self) -> f64 {
        self.number_or_default("seVolume").clamp(0.0, 1.0)
    }

    /// Voice volume (0.0 - 1.0)
    pub fn voice_volume(&self) -> f64 {
        self.number_or_default("voiceVolume").clamp(0.0, 1.0)
    }

    pub fn set_bgm_volume(&mut self, volume: f64) {
        self.set("bgmVolume", volume.clamp(0.0, 1.0));
    }

    pub fn set_se_volume(&mut self, volume: f64) {
        self.set("seVolume", volume.clamp(0.0, 1.0));
    }

    pub fn set_voice_volume(&mut self, volume: f64) {
        self.set("voiceVolume", volume.clamp(0.0, 1.0));
    }

    /// Milliseconds per revealed character
    pub fn text_speed(&self) -> u64 {
        self.number_or_default("textSpeed").max(0.0).round() as u64
    }

    pub fn text_speed_preset(&self) -> TextSpeed {
        TextSpeed::from_ms(self.text_speed())
    }

    pub fn apply_text_speed(&mut self, preset: TextSpeed) {
        self.set("textSpeed", preset.ms_per_char());
    }

    pub fn auto_advance(&self) -> bool {
        self.flag_or_default("autoAdvance")
    }

    pub fn skip_unread(&self) -> bool {
        self.flag_or_default("skipUnread")
    }

    pub fn fullscreen(&self) -> bool {
        self.flag_or_default("fullscreen")
    }

    pub fn show_effects(&self) -> bool {
        self.flag_or_default("showEffects")
    }

    /// UI language code
    pub fn language(&self) -> &str {
        self.get("language").and_then(Value::as_str).unwrap_or("ja")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_complete() {
        let settings = Settings::default();
        for key in [
            "bgmVolume",
            "seVolume",
            "voiceVolume",
            "textSpeed",
            "autoAdvance",
            "skipUnread",
            "fullscreen",
            "showEffects",
            "language",
        ] {
            assert!(settings.contains_key(key), "missing default {key}");
        }
        assert_eq!(settings.se_volume(), 0.8);
        assert_eq!(settings.language(), "ja");
        assert_eq!(settings.text_speed_preset(), TextSpeed::Normal);
    }

    #[test]
    fn test_merge_keeps_persisted_and_unknown_keys() {
        let mut persisted = Map::new();
        persisted.insert("bgmVolume".into(), json!(0.2));
        persisted.insert("customFlag".into(), json!("yes"));

        let settings = Settings::merged_over_defaults(persisted);
        assert_eq!(settings.get("bgmVolume"), Some(&json!(0.2)));
        assert_eq!(settings.get("seVolume"), Some(&json!(0.8)));
        assert_eq!(settings.get("customFlag"), Some(&json!("yes")));
    }

    #[test]
    fn test_typed_accessors_fall_back_on_bad_types() {
        let mut persisted = Map::new();
        persisted.insert("seVolume".into(), json!("loud"));
        persisted.insert("bgmVolume".into(), json!(3.5));
        persisted.insert("fullscreen".into(), json!(1));

        let settings = Settings::merged_over_defaults(persisted);
        assert_eq!(settings.se_volume(), 0.8);
        assert_eq!(settings.bgm_volume(), 1.0);
        assert!(!settings.fullscreen());
    }

    #[test]
    fn test_text_speed_presets() {
        assert_eq!(TextSpeed::from_str("FAST"), Some(TextSpeed::Fast));
        assert_eq!(TextSpeed::from_str("warp"), None);
        assert_eq!(TextSpeed::from_ms(70), TextSpeed::Slow);
        assert_eq!(TextSpeed::from_ms(5), TextSpeed::Instant);

        let mut settings = Settings::default();
        settings.apply_text_speed(TextSpeed::Fast);
        assert_eq!(settings.text_speed(), 25);
        assert_eq!(settings.text_speed_preset().as_str(), "Fast");
    }

    #[test]
    fn test_volume_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_voice_volume(-1.0);
        settings.set_bgm_volume(0.25);
        assert_eq!(settings.voice_volume(), 0.0);
        assert_eq!(settings.get("bgmVolume"), Some(&json!(0.25)));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut map = Map::new();
        map.insert("bgmVolume".into(), json!(0.5));
        let json = serde_json::to_string(&Settings::from(map)).unwrap();
        assert_eq!(json, r#"{"bgmVolume":0.5}"#);
    }
}
