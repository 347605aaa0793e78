//! Nội dung tooltip dạng có cấu trúc và trạng thái hiển thị của tooltip dùng chung.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::flag::{flag_for_zone, Flag};
use crate::relative::format_time_difference;
use crate::render::{render_date, timezone_label, RenderZone};
use crate::{LocalZone, StampError, Timestamp, UserSettings};

/// Thuộc tính `data-role` của phần chênh lệch thời gian, để làm mới tại chỗ.
pub const DIFFERENCE_ROLE: &str = "time-difference";

/// Ba phần của tooltip: UTC, Local và (tùy chọn) chênh lệch so với hiện tại.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub timestamp: Timestamp,
    pub utc: String,
    pub local: String,
    pub zone_label: String,
    pub flag: Flag,
    pub difference: Option<String>,
}

impl TooltipContent {
    /// Số phần sẽ được render.
    pub fn section_count(&self) -> usize {
        if self.difference.is_some() {
            3
        } else {
            2
        }
    }

    /// Render thành markup, thứ tự cố định UTC → Local → Time Difference.
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        markup.push_str(&section(
            "utc",
            "🌐 UTC",
            &escape_html(&self.utc),
        ));
        markup.push_str(&section(
            "local",
            &format!("{} Local ({})", self.flag.to_markup(), self.zone_label),
            &escape_html(&self.local),
        ));
        if let Some(difference) = &self.difference {
            markup.push_str(&section(
                "difference",
                "⏱️ Time Difference",
                &format!(
                    r#"<span data-role="{DIFFERENCE_ROLE}">{}</span>"#,
                    escape_html(difference)
                ),
            ));
        }
        markup
    }
}

fn section(name: &str, heading: &str, body: &str) -> String {
    format!(
        "<div class=\"timestamp-section\" data-section=\"{name}\"><strong>{heading}</strong>\n{body}</div>"
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Dựng nội dung tooltip cho `timestamp` theo cấu hình người dùng.
pub fn build_tooltip(
    timestamp: Timestamp,
    settings: &UserSettings,
    zone: &dyn LocalZone,
    now: Timestamp,
) -> Result<TooltipContent, StampError> {
    let offset_minutes = zone.offset_minutes_at(timestamp);
    let offset = FixedOffset::east_opt(-offset_minutes * 60).ok_or_else(|| {
        StampError::Format(format!("độ lệch múi giờ không hợp lệ: {offset_minutes} phút"))
    })?;

    let utc = render_date(timestamp, settings.date_format, RenderZone::Utc)?;
    let local = render_date(timestamp, settings.date_format, RenderZone::Local(offset))?;

    let difference = settings
        .show_time_difference
        .then(|| format_time_difference(timestamp, now));

    Ok(TooltipContent {
        timestamp,
        utc,
        local,
        zone_label: timezone_label(offset_minutes),
        flag: flag_for_zone(zone),
        difference,
    })
}

/// Giống [`build_tooltip`] nhưng không bao giờ lỗi: lỗi được thay bằng khối báo lỗi.
pub fn tooltip_markup(
    timestamp: Timestamp,
    settings: &UserSettings,
    zone: &dyn LocalZone,
    now: Timestamp,
) -> String {
    match build_tooltip(timestamp, settings, zone, now) {
        Ok(content) => content.to_markup(),
        Err(err) => {
            tracing::warn!(timestamp, error = %err, "không định dạng được tooltip");
            error_markup(&err)
        }
    }
}

/// Khối lỗi hiển thị thay cho nội dung tooltip.
pub fn error_markup(err: &StampError) -> String {
    format!(
        "<div class=\"timestamp-section timestamp-error\" data-section=\"error\"><strong>⚠️ Error</strong>\n{}</div>",
        escape_html(&err.to_string())
    )
}

/// Bản ghi chú thích gắn trên phần tử đã xử lý.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationState {
    pub raw_timestamp: Timestamp,
    pub tooltip_content: String,
    /// Suy ra lúc quét, không lưu lên DOM.
    #[serde(skip)]
    pub edit_mode: bool,
}

/// Trạng thái của tooltip dùng chung: timestamp đang neo, hiển thị hay không,
/// và thế hệ của timer làm mới hiện hành.
#[derive(Debug, Clone, Default)]
pub struct TooltipModel {
    timestamp: Option<Timestamp>,
    visible: bool,
    generation: u64,
}

impl TooltipModel {
    /// Ghi nhận tooltip được mở cho `timestamp`. Trả về token cho timer làm mới
    /// mới; mọi token cũ hết hiệu lực.
    pub fn show(&mut self, timestamp: Timestamp) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.timestamp = Some(timestamp);
        self.visible = true;
        self.generation
    }

    pub fn hide(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.timestamp = None;
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    /// Văn bản chênh lệch mới cho một nhịp làm mới, hoặc `None` nếu token đã cũ,
    /// tooltip đã ẩn, hay người dùng tắt hiển thị chênh lệch.
    pub fn tick(&self, token: u64, now: Timestamp, show_difference: bool) -> Option<String> {
        if !self.visible || token != self.generation || !show_difference {
            return None;
        }
        self.timestamp
            .map(|timestamp| format_time_difference(timestamp, now))
    }
}
