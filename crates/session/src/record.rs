use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenzies_core::WinSummary;

/// One completed game, as written to the result sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameResultRecord {
    pub timestamp: DateTime<Utc>,
    pub dice_count: usize,
    pub roll_count: u32,
    pub winning_value: u8,
}

impl GameResultRecord {
    pub fn from_summary(summary: &WinSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            dice_count: summary.dice_count,
            roll_count: summary.roll_count,
            winning_value: summary.winning_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_document_field_names() {
        let record = GameResultRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            dice_count: 10,
            roll_count: 17,
            winning_value: 3,
        };
        let value = serde_json::to_value(&record).expect("json");
        assert_eq!(value["diceCount"], 10);
        assert_eq!(value["rollCount"], 17);
        assert_eq!(value["winningValue"], 3);
        assert_eq!(value["timestamp"], "2024-05-01T12:30:00Z");
    }
}
