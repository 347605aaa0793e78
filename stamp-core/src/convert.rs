//! Chuyển đổi cho popup: chuỗi `datetime-local` ↔ timestamp.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::classify::classify;
use crate::render::RenderZone;
use crate::{LocalZone, StampError, Timestamp, TimestampUnit};

const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Múi giờ dùng để diễn giải ô nhập ngày giờ của popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputZone {
    Utc,
    Local,
}

/// Diễn giải giá trị ô `datetime-local` thành timestamp.
pub fn parse_datetime_local(
    input: &str,
    zone: InputZone,
    local: &dyn LocalZone,
) -> Result<Timestamp, StampError> {
    let input = input.trim();
    let naive = INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| StampError::InvalidDateTime(input.to_string()))?;

    let wall = naive.and_utc().timestamp();
    match zone {
        InputZone::Utc => Ok(wall),
        InputZone::Local => {
            // Độ lệch phụ thuộc chính thời điểm cần tìm; lặp một lần để qua mốc DST.
            let first = wall + i64::from(local.offset_minutes_at(wall)) * 60;
            Ok(wall + i64::from(local.offset_minutes_at(first)) * 60)
        }
    }
}

/// Giá trị cho ô `datetime-local` (độ chính xác phút) ứng với `timestamp`.
pub fn datetime_local_string(
    timestamp: Timestamp,
    zone: InputZone,
    local: &dyn LocalZone,
) -> Result<String, StampError> {
    let instant =
        DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or(StampError::OutOfRange(timestamp))?;

    let render_zone = match zone {
        InputZone::Utc => RenderZone::Utc,
        InputZone::Local => RenderZone::Local(
            local
                .fixed_offset_at(timestamp)
                .ok_or(StampError::OutOfRange(timestamp))?,
        ),
    };

    Ok(match render_zone {
        RenderZone::Utc => instant.format(OUTPUT_FORMAT).to_string(),
        RenderZone::Local(offset) => instant
            .with_timezone(&offset)
            .format(OUTPUT_FORMAT)
            .to_string(),
    })
}

/// Đổi giá trị ô ngày giờ khi người dùng bật/tắt công tắc UTC, giữ nguyên thời điểm.
pub fn convert_datetime_local(
    input: &str,
    to: InputZone,
    local: &dyn LocalZone,
) -> Result<String, StampError> {
    let from = match to {
        InputZone::Utc => InputZone::Local,
        InputZone::Local => InputZone::Utc,
    };
    let timestamp = parse_datetime_local(input, from, local)?;
    datetime_local_string(timestamp, to, local)
}

/// Đồng bộ ô ngày giờ khi múi giờ nhập đổi từ `from` sang `to` (công tắc UTC
/// hoặc cấu hình vừa tải). Ô trống hay cùng múi giờ được giữ nguyên.
pub fn rezone_datetime_local(
    input: &str,
    from: InputZone,
    to: InputZone,
    local: &dyn LocalZone,
) -> Result<String, StampError> {
    if from == to || input.trim().is_empty() {
        return Ok(input.to_string());
    }
    let timestamp = parse_datetime_local(input, from, local)?;
    datetime_local_string(timestamp, to, local)
}

/// Viết lại ô nhập timestamp theo đơn vị hiển thị mới. `None` khi ô không
/// chứa timestamp hợp lệ, để giữ nguyên những gì người dùng đang gõ.
pub fn render_timestamp_input(input: &str, unit: TimestampUnit) -> Option<String> {
    parse_timestamp_input(input)
        .ok()
        .map(|timestamp| unit.render(timestamp).to_string())
}

/// Đọc ô nhập timestamp của popup: nhận dạng 10/13 chữ số trước, sau đó mọi số
/// nguyên được coi là giây.
pub fn parse_timestamp_input(input: &str) -> Result<Timestamp, StampError> {
    let input = input.trim();
    if let Some(timestamp) = classify(input) {
        return Ok(timestamp);
    }
    input
        .parse::<Timestamp>()
        .map_err(|_| StampError::InvalidDateTime(input.to_string()))
}
