use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{StampError, Timestamp};

/// Bố cục hiển thị ngày giờ trong tooltip.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    #[default]
    Default,
    Iso,
    Short,
    Long,
}

/// Đơn vị hiển thị timestamp (chỉ ảnh hưởng phần hiển thị ở popup).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl DateFormat {
    pub const ALL: [DateFormat; 4] = [
        DateFormat::Default,
        DateFormat::Iso,
        DateFormat::Short,
        DateFormat::Long,
    ];

    /// Tên lưu trong storage, cũng là `value` của ô chọn ở popup.
    pub fn key(self) -> &'static str {
        match self {
            DateFormat::Default => "default",
            DateFormat::Iso => "iso",
            DateFormat::Short => "short",
            DateFormat::Long => "long",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.key() == key)
    }
}

impl TimestampUnit {
    pub const ALL: [TimestampUnit; 2] = [TimestampUnit::Seconds, TimestampUnit::Milliseconds];

    pub fn key(self) -> &'static str {
        match self {
            TimestampUnit::Seconds => "seconds",
            TimestampUnit::Milliseconds => "milliseconds",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.key() == key)
    }

    /// Giá trị hiển thị của `timestamp` (giây) theo đơn vị này.
    pub fn render(self, timestamp: Timestamp) -> i64 {
        match self {
            TimestampUnit::Seconds => timestamp,
            TimestampUnit::Milliseconds => timestamp.saturating_mul(1000),
        }
    }
}

/// Bản ghi cấu hình người dùng, luôn đầy đủ mọi khóa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub date_format: DateFormat,
    pub timestamp_format: TimestampUnit,
    pub detect_timestamps: bool,
    pub show_tooltip_in_edit_mode: bool,
    pub show_time_difference: bool,
    pub use_utc_time: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            date_format: DateFormat::Default,
            timestamp_format: TimestampUnit::Seconds,
            detect_timestamps: true,
            show_tooltip_in_edit_mode: true,
            show_time_difference: true,
            use_utc_time: false,
        }
    }
}

/// Cập nhật một phần, ví dụ `detail` của sự kiện `settingsChanged`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    #[serde(default)]
    pub date_format: Option<DateFormat>,
    #[serde(default)]
    pub timestamp_format: Option<TimestampUnit>,
    #[serde(default)]
    pub detect_timestamps: Option<bool>,
    #[serde(default)]
    pub show_tooltip_in_edit_mode: Option<bool>,
    #[serde(default)]
    pub show_time_difference: Option<bool>,
    #[serde(default)]
    pub use_utc_time: Option<bool>,
}

/// Một mục trong delta `storage.onChanged`: `{ newValue, oldValue }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(default)]
    pub new_value: Option<Value>,
    #[serde(default)]
    pub old_value: Option<Value>,
}

impl UserSettings {
    /// Các khóa mà bản ghi quản lý, đúng tên lưu trong storage.
    pub const KEYS: [&'static str; 6] = [
        "dateFormat",
        "timestampFormat",
        "detectTimestamps",
        "showTooltipInEditMode",
        "showTimeDifference",
        "useUtcTime",
    ];

    /// Đọc bản ghi từ JSON theo từng khóa: khóa thiếu hoặc sai kiểu lấy giá
    /// trị mặc định, các khóa hợp lệ khác vẫn được giữ.
    pub fn from_json(value: &Value) -> Result<Self, StampError> {
        let Value::Object(fields) = value else {
            return Err(StampError::InvalidSettings(
                "bản ghi cấu hình phải là object".to_string(),
            ));
        };

        let mut settings = Self::default();
        for (key, raw) in fields {
            if let Err(err) = settings.set_field(key, raw) {
                tracing::warn!(key = key.as_str(), error = %err, "khóa cấu hình không hợp lệ, dùng mặc định");
            }
        }
        Ok(settings)
    }

    /// Gán một khóa từ giá trị JSON. Trả về `false` với khóa không quen.
    fn set_field(&mut self, key: &str, raw: &Value) -> Result<bool, StampError> {
        match key {
            "dateFormat" => self.date_format = parse_field(key, raw)?,
            "timestampFormat" => self.timestamp_format = parse_field(key, raw)?,
            "detectTimestamps" => self.detect_timestamps = parse_field(key, raw)?,
            "showTooltipInEditMode" => self.show_tooltip_in_edit_mode = parse_field(key, raw)?,
            "showTimeDifference" => self.show_time_difference = parse_field(key, raw)?,
            "useUtcTime" => self.use_utc_time = parse_field(key, raw)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Ghép cập nhật một phần lên bản ghi hiện tại.
    pub fn merged(&self, partial: &PartialSettings) -> Self {
        let mut next = self.clone();
        if let Some(format) = partial.date_format {
            next.date_format = format;
        }
        if let Some(unit) = partial.timestamp_format {
            next.timestamp_format = unit;
        }
        if let Some(flag) = partial.detect_timestamps {
            next.detect_timestamps = flag;
        }
        if let Some(flag) = partial.show_tooltip_in_edit_mode {
            next.show_tooltip_in_edit_mode = flag;
        }
        if let Some(flag) = partial.show_time_difference {
            next.show_time_difference = flag;
        }
        if let Some(flag) = partial.use_utc_time {
            next.use_utc_time = flag;
        }
        next
    }

    /// Áp dụng delta từ storage. Khóa không quen bị bỏ qua; khóa bị xóa
    /// (không có `newValue`) trở về mặc định; giá trị sai kiểu bị bỏ qua và
    /// khóa đó giữ giá trị hiện tại. Trả về `true` khi bản ghi thay đổi.
    pub fn apply_storage_changes(&mut self, changes: &HashMap<String, StorageChange>) -> bool {
        let defaults = Self::default().to_json();
        let mut next = self.clone();

        for (key, change) in changes {
            let raw = match &change.new_value {
                Some(value) => value,
                None => &defaults[key.as_str()],
            };
            if let Err(err) = next.set_field(key, raw) {
                tracing::warn!(key = key.as_str(), error = %err, "bỏ qua giá trị cấu hình không hợp lệ");
            }
        }

        let changed = next != *self;
        *self = next;
        changed
    }
}

fn parse_field<T: DeserializeOwned>(key: &str, raw: &Value) -> Result<T, StampError> {
    serde_json::from_value(raw.clone())
        .map_err(|err| StampError::InvalidSettings(format!("{key}: {err}")))
}
