//! Khoảng cách dễ đọc giữa một timestamp và đồng hồ hiện tại.

use crate::Timestamp;

pub const JUST_NOW: &str = "just now";

const MINUTE: i64 = 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;
const WEEK: i64 = DAY * 7;
const MONTH: i64 = DAY * 30;
const YEAR: i64 = DAY * 365;

struct Unit {
    seconds: i64,
    singular: &'static str,
    plural: &'static str,
}

const fn unit(seconds: i64, singular: &'static str, plural: &'static str) -> Unit {
    Unit {
        seconds,
        singular,
        plural,
    }
}

/// Các bậc từ lớn đến nhỏ, mỗi bậc kèm đơn vị cho phần dư. Tháng tách ra
/// ngày, không tách ra tuần.
const BUCKETS: [(Unit, Option<Unit>); 6] = [
    (unit(YEAR, "year", "years"), Some(unit(MONTH, "month", "months"))),
    (unit(MONTH, "month", "months"), Some(unit(DAY, "day", "days"))),
    (unit(WEEK, "week", "weeks"), Some(unit(DAY, "day", "days"))),
    (unit(DAY, "day", "days"), Some(unit(HOUR, "hour", "hours"))),
    (unit(HOUR, "hour", "hours"), Some(unit(MINUTE, "minute", "minutes"))),
    (unit(MINUTE, "minute", "minutes"), None),
];

/// Khoảng cách có dấu từ `now` tới `target`, ví dụ `"in 3 days 2 hours"`,
/// `"2 hours 15 minutes ago"`, hoặc `"just now"` khi lệch dưới một phút.
pub fn format_time_difference(target: Timestamp, now: Timestamp) -> String {
    let diff = target.saturating_sub(now);
    let magnitude = diff.saturating_abs();

    if magnitude < MINUTE {
        return JUST_NOW.to_string();
    }

    let body = BUCKETS
        .iter()
        .find(|(bucket, _)| magnitude >= bucket.seconds)
        .map(|(bucket, remainder)| describe(magnitude, bucket, remainder.as_ref()))
        .unwrap_or_default();

    if diff > 0 {
        format!("in {body}")
    } else {
        format!("{body} ago")
    }
}

fn describe(magnitude: i64, bucket: &Unit, remainder: Option<&Unit>) -> String {
    let count = magnitude / bucket.seconds;
    let head = quantity(count, bucket);

    let Some(smaller) = remainder else {
        return head;
    };

    let rest = (magnitude % bucket.seconds) / smaller.seconds;
    if rest == 0 {
        head
    } else {
        format!("{head} {}", quantity(rest, smaller))
    }
}

fn quantity(count: i64, unit: &Unit) -> String {
    let word = if count == 1 { unit.singular } else { unit.plural };
    format!("{count} {word}")
}
