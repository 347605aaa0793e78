//! Logic lõi nhận diện, định dạng và chú thích Unix timestamp trong DOM của console.
//!
//! Crate này không phụ thuộc trình duyệt: mọi thao tác DOM đi qua trait
//! [`AnnotationHost`], múi giờ cục bộ đi qua [`LocalZone`], nên toàn bộ engine
//! chạy và kiểm thử được trên native.

mod classify;
mod config;
mod convert;
mod engine;
mod flag;
mod placement;
mod relative;
mod render;
mod settings;
mod tooltip;
mod watcher;
mod zone;

pub use classify::classify;
pub use config::{EngineConfig, HostProfile};
pub use convert::{
    convert_datetime_local, datetime_local_string, parse_datetime_local, parse_timestamp_input,
    render_timestamp_input, rezone_datetime_local, InputZone,
};
pub use engine::{Affordance, AnnotationHost, Annotator, Cursor, ScanReport, Transition};
pub use flag::{flag_for_zone, resolve_country, Flag, FLAG_PLACEHOLDER};
pub use placement::{place_tooltip, Horizontal, Placement, Rect, Viewport, Vertical};
pub use relative::{format_time_difference, JUST_NOW};
pub use render::{render_date, timezone_label, RenderZone};
pub use settings::{DateFormat, PartialSettings, StorageChange, TimestampUnit, UserSettings};
pub use tooltip::{
    build_tooltip, error_markup, tooltip_markup, AnnotationState, TooltipContent, TooltipModel,
    DIFFERENCE_ROLE,
};
pub use watcher::{plan_settings_reaction, SettingsReaction};
pub use zone::{FixedZone, LocalZone};

/// Số giây kể từ Unix epoch.
pub type Timestamp = i64;

/// Lỗi chung của engine chú thích.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StampError {
    #[error("Cấu hình người dùng không hợp lệ: {0}")]
    InvalidSettings(String),
    #[error("Chuỗi ngày giờ không hợp lệ: {0}")]
    InvalidDateTime(String),
    #[error("Timestamp nằm ngoài phạm vi biểu diễn: {0}")]
    OutOfRange(Timestamp),
    #[error("Lỗi định dạng: {0}")]
    Format(String),
}

/// Thời điểm hiện tại theo đồng hồ hệ thống, tính bằng giây.
pub fn now_seconds() -> Timestamp {
    chrono::Utc::now().timestamp()
}
