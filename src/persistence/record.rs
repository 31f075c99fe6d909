//! Save records and the per-slot summaries shown in the save/load menu

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::*;

/// A stored game state plus save metadata
///
/// Serialized as one flat JSON object: the caller's fields with `timestamp`
/// and `version` alongside. A blob missing either metadata field does not
/// deserialize, so partially written records never load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(flatten)]
    data: Map<String, Value>,
    timestamp: String,
    version: String,
}

impl SaveRecord {
    /// Wrap `data`, replacing any `timestamp`/`version` fields it carries
    pub fn new(
        mut data: Map<String, Value>,
        timestamp: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        data.remove("timestamp");
        data.remove("version");
        Self {
            data,
            timestamp: timestamp.into(),
            version: version.into(),
        }
    }

    /// Caller-supplied game state, without metadata
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match key {
            "timestamp" | "version" => None,
            _ => self.data.get(key),
        }
    }

    /// ISO-8601 save time
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Scene the player was in when saving
    pub fn scene(&self) -> Option<&str> {
        self.data.get("currentScene").and_then(Value::as_str)
    }

    /// Completion percentage (0-100)
    pub fn progress(&self) -> u8 {
        calculate_progress(&self.data)
    }

    /// Deserialize the game state into a caller type
    pub fn to_state<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.data.clone()))
    }
}

/// Completion percentage of a game state
///
/// Rounds reached out of nine are worth 60%, decided games (either side's
/// wins) out of ten the remaining 40%. `currentRound` defaults to 1 and the
/// win counters to 0 when missing or not numbers.
pub fn calculate_progress(data: &Map<String, Value>) -> u8 {
    let number = |key: &str, default: f64| data.get(key).and_then(Value::as_f64).unwrap_or(default);

    let current_round = number("currentRound", 1.0);
    let player_wins = number("playerWins", 0.0);
    let misaki_wins = number("misakiWins", 0.0);

    let round_progress = current_round / TOTAL_ROUNDS * ROUND_WEIGHT;
    let win_progress = (player_wins + misaki_wins) / TOTAL_GAMES * WIN_WEIGHT;

    let total = (round_progress + win_progress).round();
    if total.is_nan() {
        return 0;
    }
    total.clamp(0.0, 100.0) as u8
}

/// Summary of one slot for the save/load menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSlotInfo {
    pub slot: u8,
    pub exists: bool,
    pub timestamp: Option<String>,
    pub scene: Option<String>,
    pub progress: u8,
}

impl SaveSlotInfo {
    /// Summary for a slot with nothing loadable in it
    pub fn empty(slot: u8) -> Self {
        Self {
            slot,
            exists: false,
            timestamp: None,
            scene: None,
            progress: 0,
        }
    }

    pub fn from_record(slot: u8, record: &SaveRecord) -> Self {
        Self {
            slot,
            exists: true,
            timestamp: Some(record.timestamp().to_string()),
            scene: record.scene().map(str::to_string),
            progress: record.progress(),
        }
    }

    /// Whether this is the autosave slot
    pub fn is_autosave(&self) -> bool {
        self.slot == AUTOSAVE_SLOT
    }

    /// Relative save time, empty for empty slots
    pub fn saved_ago(&self, now: DateTime<Utc>) -> String {
        self.timestamp
            .as_deref()
            .map(|ts| format_age(ts, now))
            .unwrap_or_default()
    }
}

/// Format an ISO-8601 timestamp as a relative date string
pub fn format_age(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(saved) = DateTime::parse_from_rfc3339(timestamp) else {
        return "Unknown".to_string();
    };
    let saved = saved.with_timezone(&Utc);
    let diff = now.signed_duration_since(saved);

    let days = diff.num_days();
    let hours = diff.num_hours();
    let mins = diff.num_minutes();

    if days >= 1 {
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            saved.format("%-m/%-d/%y").to_string()
        }
    } else if hours >= 1 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if mins >= 1 {
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_progress_complete() {
        let data = map(json!({"currentRound": 9, "playerWins": 5, "misakiWins": 5}));
        assert_eq!(calculate_progress(&data), 100);
    }

    #[test]
    fn test_progress_defaults() {
        // round(1/9 * 60) = round(6.67) = 7
        assert_eq!(calculate_progress(&Map::new()), 7);
    }

    #[test]
    fn test_progress_clamped() {
        let data = map(json!({"currentRound": 20, "playerWins": 30}));
        assert_eq!(calculate_progress(&data), 100);
        let data = map(json!({"currentRound": -20}));
        assert_eq!(calculate_progress(&data), 0);
    }

    #[test]
    fn test_progress_ignores_non_numbers() {
        let data = map(json!({"currentRound": "nine", "playerWins": null}));
        assert_eq!(calculate_progress(&data), 7);
    }

    #[test]
    fn test_progress_mid_game() {
        // 4/9*60 = 26.67, 3/10*40 = 12 -> 38.67 -> 39
        let data = map(json!({"currentRound": 4, "playerWins": 2, "misakiWins": 1}));
        assert_eq!(calculate_progress(&data), 39);
    }

    #[test]
    fn test_record_strips_metadata_from_data() {
        let data = map(json!({"currentScene": "rooftop", "timestamp": "old", "version": "0.1"}));
        let record = SaveRecord::new(data, "2026-01-01T00:00:00.000Z", "1.0.0");
        assert_eq!(record.timestamp(), "2026-01-01T00:00:00.000Z");
        assert_eq!(record.version(), "1.0.0");
        assert_eq!(record.scene(), Some("rooftop"));
        assert_eq!(record.data().len(), 1);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({"currentScene": "rooftop", "timestamp": "2026-01-01T00:00:00.000Z", "version": "1.0.0"})
        );
    }

    #[test]
    fn test_record_requires_metadata() {
        assert!(serde_json::from_str::<SaveRecord>(r#"{"currentRound": 3}"#).is_err());
        assert!(serde_json::from_str::<SaveRecord>(r#"{"timestamp": "x"}"#).is_err());
        assert!(serde_json::from_str::<SaveRecord>(r#"{"timestamp": 5, "version": "1.0.0"}"#).is_err());
        assert!(serde_json::from_str::<SaveRecord>("[1, 2]").is_err());

        let record: SaveRecord =
            serde_json::from_str(r#"{"currentRound": 3, "timestamp": "t", "version": "v"}"#).unwrap();
        assert_eq!(record.get("currentRound"), Some(&json!(3)));
    }

    #[test]
    fn test_record_to_state() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct State {
            current_round: u32,
        }

        let record = SaveRecord::new(map(json!({"currentRound": 5})), "t", "v");
        let state: State = record.to_state().unwrap();
        assert_eq!(state.current_round, 5);
    }

    #[test]
    fn test_slot_info() {
        let record = SaveRecord::new(
            map(json!({"currentScene": "cafe", "currentRound": 9})),
            "2026-10-19T10:00:00.000Z",
            "1.0.0",
        );
        let info = SaveSlotInfo::from_record(3, &record);
        assert!(info.exists);
        assert!(!info.is_autosave());
        assert_eq!(info.scene.as_deref(), Some("cafe"));
        assert_eq!(info.progress, 60);

        let empty = SaveSlotInfo::empty(0);
        assert!(empty.is_autosave());
        assert_eq!(empty.progress, 0);
        assert_eq!(empty.saved_ago(Utc::now()), "");
    }

    #[test]
    fn test_format_age() {
        let now = DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_age("2026-10-19T11:59:30.000Z", now), "Just now");
        assert_eq!(format_age("2026-10-19T11:59:00.000Z", now), "1 min ago");
        assert_eq!(format_age("2026-10-19T11:45:00.000Z", now), "15 mins ago");
        assert_eq!(format_age("2026-10-19T11:00:00.000Z", now), "1 hour ago");
        assert_eq!(format_age("2026-10-19T07:00:00.000Z", now), "5 hours ago");
        assert_eq!(format_age("2026-10-18T10:00:00.000Z", now), "Yesterday");
        assert_eq!(format_age("2026-10-16T12:00:00.000Z", now), "3 days ago");
        assert_eq!(format_age("2026-09-05T12:00:00.000Z", now), "9/5/26");
        assert_eq!(format_age("not a date", now), "Unknown");
        assert_eq!(format_age("2026-10-20T12:00:00.000Z", now), "Just now");
    }

    proptest! {
        #[test]
        fn prop_progress_in_range(round in -50i64..50, wins in -50i64..50, losses in -50i64..50) {
            let data = map(json!({"currentRound": round, "playerWins": wins, "misakiWins": losses}));
            prop_assert!(calculate_progress(&data) <= 100);
        }

        #[test]
        fn prop_progress_monotonic_in_round(round in 1i64..9) {
            let lower = map(json!({"currentRound": round}));
            let higher = map(json!({"currentRound": round + 1}));
            prop_assert!(calculate_progress(&lower) <= calculate_progress(&higher));
        }
    }
}
