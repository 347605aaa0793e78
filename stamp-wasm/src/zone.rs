use js_sys::{Array, Date, Intl, Object, Reflect};
use stamp_core::{LocalZone, Timestamp};
use wasm_bindgen::JsValue;

/// Múi giờ và ngôn ngữ của trình duyệt, đọc qua `Date`, `Intl` và `navigator`.
#[derive(Debug, Clone, Default)]
pub struct BrowserZone {
    time_zone: Option<String>,
    languages: Vec<String>,
}

impl BrowserZone {
    pub fn detect() -> Self {
        Self {
            time_zone: resolved_time_zone(),
            languages: navigator_languages(),
        }
    }
}

impl LocalZone for BrowserZone {
    fn offset_minutes_at(&self, timestamp: Timestamp) -> i32 {
        let date = Date::new(&JsValue::from_f64(timestamp as f64 * 1000.0));
        let offset = date.get_timezone_offset();
        if offset.is_finite() {
            offset as i32
        } else {
            0
        }
    }

    fn time_zone_name(&self) -> Option<String> {
        self.time_zone.clone()
    }

    fn languages(&self) -> Vec<String> {
        self.languages.clone()
    }
}

fn resolved_time_zone() -> Option<String> {
    let format = Intl::DateTimeFormat::new(&Array::new(), &Object::new());
    Reflect::get(&format.resolved_options(), &JsValue::from_str("timeZone"))
        .ok()
        .and_then(|value| value.as_string())
}

fn navigator_languages() -> Vec<String> {
    let Some(navigator) = web_sys::window().map(|window| window.navigator()) else {
        return Vec::new();
    };

    let languages: Vec<String> = navigator
        .languages()
        .iter()
        .filter_map(|value| value.as_string())
        .collect();

    if languages.is_empty() {
        navigator.language().into_iter().collect()
    } else {
        languages
    }
}
