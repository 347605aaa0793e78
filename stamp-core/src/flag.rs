//! Cờ quốc gia theo locale người xem, hiện cạnh tiêu đề "Local".

use crate::LocalZone;

const FLAG_BASE_URL: &str = "https://purecatamphetamine.github.io/country-flag-icons/3x2/";

/// Cờ chung khi không xác định được quốc gia.
pub const FLAG_PLACEHOLDER: &str = "🏳️";

const TIMEZONE_COUNTRIES: &[(&str, &str)] = &[
    // Châu Phi
    ("Africa/Abidjan", "CI"),
    ("Africa/Accra", "GH"),
    ("Africa/Cairo", "EG"),
    ("Africa/Casablanca", "MA"),
    ("Africa/Johannesburg", "ZA"),
    ("Africa/Lagos", "NG"),
    ("Africa/Nairobi", "KE"),
    // Châu Mỹ
    ("America/Anchorage", "US"),
    ("America/Argentina/Buenos_Aires", "AR"),
    ("America/Bogota", "CO"),
    ("America/Caracas", "VE"),
    ("America/Chicago", "US"),
    ("America/Denver", "US"),
    ("America/Halifax", "CA"),
    ("America/Los_Angeles", "US"),
    ("America/Mexico_City", "MX"),
    ("America/New_York", "US"),
    ("America/Phoenix", "US"),
    ("America/Santiago", "CL"),
    ("America/Sao_Paulo", "BR"),
    ("America/Toronto", "CA"),
    ("America/Vancouver", "CA"),
    // Châu Á
    ("Asia/Bangkok", "TH"),
    ("Asia/Dubai", "AE"),
    ("Asia/Ho_Chi_Minh", "VN"),
    ("Asia/Hong_Kong", "HK"),
    ("Asia/Jakarta", "ID"),
    ("Asia/Kolkata", "IN"),
    ("Asia/Kuwait", "KW"),
    ("Asia/Manila", "PH"),
    ("Asia/Saigon", "VN"),
    ("Asia/Seoul", "KR"),
    ("Asia/Shanghai", "CN"),
    ("Asia/Singapore", "SG"),
    ("Asia/Tokyo", "JP"),
    // Úc và Thái Bình Dương
    ("Australia/Adelaide", "AU"),
    ("Australia/Brisbane", "AU"),
    ("Australia/Melbourne", "AU"),
    ("Australia/Perth", "AU"),
    ("Australia/Sydney", "AU"),
    ("Pacific/Auckland", "NZ"),
    ("Pacific/Honolulu", "US"),
    // Châu Âu
    ("Europe/Amsterdam", "NL"),
    ("Europe/Berlin", "DE"),
    ("Europe/Brussels", "BE"),
    ("Europe/Dublin", "IE"),
    ("Europe/Istanbul", "TR"),
    ("Europe/Lisbon", "PT"),
    ("Europe/London", "GB"),
    ("Europe/Madrid", "ES"),
    ("Europe/Moscow", "RU"),
    ("Europe/Paris", "FR"),
    ("Europe/Rome", "IT"),
    ("Europe/Stockholm", "SE"),
    ("Europe/Zurich", "CH"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    Country(String),
    Placeholder,
}

impl Flag {
    /// Ảnh SVG của cờ quốc gia; cờ chung không có ảnh.
    pub fn image_url(&self) -> Option<String> {
        match self {
            Flag::Country(code) => Some(format!("{FLAG_BASE_URL}{code}.svg")),
            Flag::Placeholder => None,
        }
    }

    pub fn to_markup(&self) -> String {
        match (self, self.image_url()) {
            (Flag::Country(code), Some(url)) => {
                format!(r#"<img src="{url}" alt="{code} flag" class="timestamp-flag" />"#)
            }
            _ => FLAG_PLACEHOLDER.to_string(),
        }
    }
}

/// Mã quốc gia theo múi giờ, sau đó theo subtag vùng của thẻ ngôn ngữ đầu
/// tiên có subtag này. `None` khi cả hai nguồn đều không chỉ ra quốc gia.
pub fn resolve_country(time_zone: Option<&str>, languages: &[String]) -> Option<String> {
    if let Some(code) = time_zone.and_then(country_for_timezone) {
        return Some(code.to_string());
    }

    languages.iter().find_map(|tag| region_subtag(tag))
}

pub fn flag_for_zone(zone: &dyn LocalZone) -> Flag {
    let time_zone = zone.time_zone_name();
    match resolve_country(time_zone.as_deref(), &zone.languages()) {
        Some(code) => Flag::Country(code),
        None => Flag::Placeholder,
    }
}

fn country_for_timezone(time_zone: &str) -> Option<&'static str> {
    TIMEZONE_COUNTRIES
        .iter()
        .find(|(name, _)| *name == time_zone)
        .map(|(_, code)| *code)
}

/// `en-US` → `US`, `zh-Hant-TW` → `TW`, `fr` → không có.
fn region_subtag(tag: &str) -> Option<String> {
    tag.split(['-', '_'])
        .skip(1)
        .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase)
}
