//! Hiển thị ngày giờ theo bốn bố cục `dateFormat`, giữ đúng thứ tự trường
//! kiểu en-US mà extension vẫn hiển thị.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::{DateFormat, StampError, Timestamp};

/// Đồng hồ mà một lần hiển thị nhắm tới.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderZone {
    Utc,
    Local(FixedOffset),
}

/// Hiển thị `timestamp` theo bố cục và múi giờ cho trước.
pub fn render_date(
    timestamp: Timestamp,
    format: DateFormat,
    zone: RenderZone,
) -> Result<String, StampError> {
    let instant =
        DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or(StampError::OutOfRange(timestamp))?;

    let rendered = match zone {
        RenderZone::Utc => match format {
            DateFormat::Iso => instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            other => layout(&instant, other),
        },
        RenderZone::Local(offset) => {
            let local = offset.from_utc_datetime(&instant.naive_utc());
            match format {
                DateFormat::Iso => local.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
                other => layout(&local, other),
            }
        }
    };

    Ok(rendered)
}

fn layout<Tz>(instant: &DateTime<Tz>, format: DateFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let pattern = match format {
        DateFormat::Default => "%b %-d, %Y, %H:%M:%S",
        DateFormat::Short => "%m/%d/%Y, %I:%M %p",
        DateFormat::Long => "%A, %B %-d, %Y at %I:%M:%S %p",
        DateFormat::Iso => "%Y-%m-%dT%H:%M:%S",
    };
    instant.format(pattern).to_string()
}

/// Nhãn `GMT±H[:MM]` từ giá trị `Date.getTimezoneOffset()`.
///
/// Nền tảng báo phía tây UTC là số dương nên dấu bị đảo: `-330` thành
/// `GMT+5:30`, `0` thành `GMT+0`.
pub fn timezone_label(offset_minutes: i32) -> String {
    let sign = if offset_minutes <= 0 { '+' } else { '-' };
    let magnitude = offset_minutes.unsigned_abs();
    let hours = magnitude / 60;
    let minutes = magnitude % 60;

    if minutes == 0 {
        format!("GMT{sign}{hours}")
    } else {
        format!("GMT{sign}{hours}:{minutes:02}")
    }
}
