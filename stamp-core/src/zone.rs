use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Thông tin locale của nền tảng: độ lệch múi giờ, tên IANA, danh sách ngôn ngữ.
///
/// Độ lệch theo quy ước `Date.getTimezoneOffset()`: phút, phía tây UTC mang dấu dương.
pub trait LocalZone {
    fn offset_minutes_at(&self, timestamp: Timestamp) -> i32;

    fn time_zone_name(&self) -> Option<String>;

    fn languages(&self) -> Vec<String>;

    /// Độ lệch cục bộ tại `timestamp` dưới dạng `FixedOffset` của chrono.
    fn fixed_offset_at(&self, timestamp: Timestamp) -> Option<FixedOffset> {
        let minutes = self.offset_minutes_at(timestamp);
        FixedOffset::east_opt(-minutes * 60)
    }
}

/// Múi giờ cố định, dùng cho kiểm thử và làm fallback khi nền tảng không trả lời.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedZone {
    pub offset_minutes: i32,
    pub time_zone: Option<String>,
    pub languages: Vec<String>,
}

impl FixedZone {
    pub fn utc() -> Self {
        Self {
            offset_minutes: 0,
            time_zone: Some("UTC".to_string()),
            languages: vec!["en-US".to_string()],
        }
    }

    pub fn new(offset_minutes: i32, time_zone: Option<&str>, languages: &[&str]) -> Self {
        Self {
            offset_minutes,
            time_zone: time_zone.map(str::to_string),
            languages: languages.iter().map(|lang| lang.to_string()).collect(),
        }
    }
}

impl LocalZone for FixedZone {
    fn offset_minutes_at(&self, _timestamp: Timestamp) -> i32 {
        self.offset_minutes
    }

    fn time_zone_name(&self) -> Option<String> {
        self.time_zone.clone()
    }

    fn languages(&self) -> Vec<String> {
        self.languages.clone()
    }
}
