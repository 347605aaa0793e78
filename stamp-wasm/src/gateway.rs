//! Cổng cấu hình: `chrome.storage.sync`, lắng nghe thay đổi và broadcast giữa các tab.

use std::collections::HashMap;

use js_sys::Function;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use stamp_core::{PartialSettings, StorageChange, UserSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Document, Event};

/// Tên CustomEvent phát trong cùng document khi cấu hình được lưu.
pub const SETTINGS_CHANGED_EVENT: &str = "settingsChanged";
/// `action` của message gửi tới các tab khác.
pub const SETTINGS_UPDATED_ACTION: &str = "settingsUpdated";
const STORAGE_AREA: &str = "sync";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = "get")]
    async fn storage_sync_get(defaults: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = "set")]
    async fn storage_sync_set(items: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "onChanged"], js_name = "addListener")]
    fn storage_on_changed(listener: &Function);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = "addListener")]
    fn runtime_on_message(listener: &Function);

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = "query")]
    async fn tabs_query(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = "sendMessage")]
    async fn tabs_send_message(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Serialize, Deserialize)]
struct SettingsMessage {
    action: String,
    #[serde(default)]
    settings: PartialSettings,
}

#[derive(Deserialize)]
struct Tab {
    #[serde(default)]
    id: Option<i32>,
    #[serde(default)]
    url: Option<String>,
}

/// Đọc cấu hình; khóa chưa lưu hoặc sai kiểu lấy mặc định, từng khóa riêng.
pub async fn load_settings() -> Result<UserSettings, JsValue> {
    let defaults = to_value(&UserSettings::default())
        .map_err(|err| JsValue::from_str(&format!("Không serialize cấu hình mặc định: {err}")))?;
    let stored = storage_sync_get(defaults).await?;
    let record: serde_json::Value = from_value(stored)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được cấu hình: {err}")))?;
    UserSettings::from_json(&record).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Lưu cấu hình, phát sự kiện trong document hiện tại rồi broadcast tới các tab.
pub async fn save_settings(
    document: &Document,
    settings: &UserSettings,
    url_pattern: &str,
) -> Result<(), JsValue> {
    let value = to_value(settings)
        .map_err(|err| JsValue::from_str(&format!("Không serialize cấu hình: {err}")))?;
    storage_sync_set(value.clone()).await?;

    dispatch_local(document, &value)?;
    broadcast_settings(settings, url_pattern).await;
    Ok(())
}

fn dispatch_local(document: &Document, detail: &JsValue) -> Result<(), JsValue> {
    let init = CustomEventInit::new();
    init.set_detail(detail);
    let event = CustomEvent::new_with_event_init_dict(SETTINGS_CHANGED_EVENT, &init)?;
    document.dispatch_event(&event)?;
    Ok(())
}

/// Gửi cấu hình mới tới mọi tab khớp `url_pattern`. Tab đã đóng hoặc không có
/// content script bị bỏ qua.
pub async fn broadcast_settings(settings: &UserSettings, url_pattern: &str) {
    let tabs = match tabs_query(js_sys::Object::new().into()).await {
        Ok(value) => from_value::<Vec<Tab>>(value).unwrap_or_default(),
        Err(err) => {
            tracing::debug!(error = ?err, "không liệt kê được tab");
            return;
        }
    };

    let message = SettingsMessage {
        action: SETTINGS_UPDATED_ACTION.to_string(),
        settings: PartialSettings {
            date_format: Some(settings.date_format),
            timestamp_format: Some(settings.timestamp_format),
            detect_timestamps: Some(settings.detect_timestamps),
            show_tooltip_in_edit_mode: Some(settings.show_tooltip_in_edit_mode),
            show_time_difference: Some(settings.show_time_difference),
            use_utc_time: Some(settings.use_utc_time),
        },
    };
    let Ok(message) = to_value(&message) else {
        return;
    };

    for tab in tabs {
        let (Some(id), Some(url)) = (tab.id, tab.url) else {
            continue;
        };
        if !url.contains(url_pattern) {
            continue;
        }
        if let Err(err) = tabs_send_message(id, message.clone()).await {
            tracing::debug!(tab = id, error = ?err, "tab không nhận được cấu hình");
        }
    }
}

/// Nhận delta `storage.onChanged` của vùng `sync`.
pub fn subscribe_storage(mut callback: impl FnMut(HashMap<String, StorageChange>) + 'static) {
    let listener = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |changes: JsValue, area: JsValue| {
        if area.as_string().as_deref() != Some(STORAGE_AREA) {
            return;
        }
        match from_value::<HashMap<String, StorageChange>>(changes) {
            Ok(changes) => callback(changes),
            Err(err) => tracing::warn!(error = %err, "delta storage không hợp lệ"),
        }
    });
    storage_on_changed(listener.as_ref().unchecked_ref());
    listener.forget();
}

/// Nhận message `settingsUpdated` do popup broadcast.
pub fn subscribe_messages(mut callback: impl FnMut(PartialSettings) + 'static) {
    let listener = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
        let Ok(message) = from_value::<SettingsMessage>(message) else {
            return;
        };
        if message.action == SETTINGS_UPDATED_ACTION {
            callback(message.settings);
        }
    });
    runtime_on_message(listener.as_ref().unchecked_ref());
    listener.forget();
}

/// Nhận sự kiện `settingsChanged` phát trong cùng document.
pub fn subscribe_local(
    document: &Document,
    mut callback: impl FnMut(PartialSettings) + 'static,
) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<CustomEvent>() else {
            return;
        };
        match from_value::<PartialSettings>(event.detail()) {
            Ok(partial) => callback(partial),
            Err(err) => tracing::warn!(error = %err, "detail settingsChanged không hợp lệ"),
        }
    });
    document.add_event_listener_with_callback(
        SETTINGS_CHANGED_EVENT,
        listener.as_ref().unchecked_ref(),
    )?;
    listener.forget();
    Ok(())
}
