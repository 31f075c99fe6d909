//! Storage usage report for the save menu

use serde::{Deserialize, Serialize};

/// Bytes used by this game's keys in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    /// Sum of key and value lengths (UTF-8 bytes)
    pub total_size: usize,
    /// Number of keys counted
    pub item_count: usize,
    /// `total_size` in human units
    pub formatted_size: String,
}

impl StorageUsage {
    pub fn new(total_size: usize, item_count: usize) -> Self {
        Self {
            total_size,
            item_count,
            formatted_size: format_bytes(total_size),
        }
    }
}

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count with 1024-based units, at most two decimals
pub fn format_bytes(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1000), "1000 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1234), "1.21 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_usage_serializes_camel_case() {
        let usage = StorageUsage::new(2048, 3);
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["totalSize"], 2048);
        assert_eq!(json["itemCount"], 3);
        assert_eq!(json["formattedSize"], "2 KB");
    }
}
