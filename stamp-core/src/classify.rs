use crate::Timestamp;

const SECONDS_DIGITS: usize = 10;
const MILLIS_DIGITS: usize = 13;

/// Nhận diện chuỗi là Unix timestamp 10 chữ số (giây) hoặc 13 chữ số (mili giây).
///
/// Chuỗi được trim trước khi kiểm tra. Giá trị mili giây được chia lấy phần
/// nguyên cho 1000. Mọi hình dạng khác (dấu, phần thập phân, sai độ dài) trả về
/// `None`.
pub fn classify(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    match text.len() {
        SECONDS_DIGITS => text.parse().ok(),
        MILLIS_DIGITS => text.parse::<Timestamp>().ok().map(|millis| millis / 1000),
        _ => None,
    }
}
