//! Content script WASM: nhận diện và chú thích timestamp trên trang console.
//!
//! Các module DOM chỉ biên dịch cho `wasm32`; phần chuyển đổi cấu hình dùng
//! chung được và kiểm thử được trên native.

mod config;

#[cfg(target_arch = "wasm32")]
mod context;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
pub mod gateway;
#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod styles;
#[cfg(target_arch = "wasm32")]
mod tooltip;
#[cfg(target_arch = "wasm32")]
mod watcher;
#[cfg(target_arch = "wasm32")]
pub mod zone;

pub use config::JsEngineConfig;

#[cfg(target_arch = "wasm32")]
pub use context::{start_content_script, ContentHandle};

#[cfg(not(target_arch = "wasm32"))]
pub fn start_content_script(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "stamp-wasm chỉ hỗ trợ biên dịch target wasm32",
    ))
}
