use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const TOOLTIP_MARKER: &str = "data-stamp-lens";

/// CSS cho tooltip, kèm các biến thiết kế có thể ghi đè.
pub const TOOLTIP_STYLES: &str = r#"
:root {
  --stamp-tooltip-bg: #232f3e;
  --stamp-tooltip-text: #ffffff;
  --stamp-tooltip-radius: 4px;
  --stamp-tooltip-font: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
  --stamp-tooltip-error: #ffb4a8;
}

.timestamp-tooltip {
  position: fixed;
  background: var(--stamp-tooltip-bg);
  color: var(--stamp-tooltip-text);
  padding: 8px 12px;
  border-radius: var(--stamp-tooltip-radius);
  font-family: var(--stamp-tooltip-font);
  font-size: 13px;
  white-space: pre-line;
  z-index: 10000;
  pointer-events: none;
  opacity: 0;
  transition: opacity 0.1s;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.2);
  width: 300px;
  box-sizing: border-box;
}

.timestamp-tooltip.visible {
  opacity: 1;
}

.timestamp-tooltip .timestamp-section + .timestamp-section {
  margin-top: 10px;
}

.timestamp-tooltip .timestamp-error {
  color: var(--stamp-tooltip-error);
}

.timestamp-tooltip .timestamp-flag {
  width: 16px;
  height: 12px;
  vertical-align: middle;
  margin-right: 4px;
}
"#;

/// CSS tooltip của content script.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    inject_styles(document, TOOLTIP_MARKER, TOOLTIP_STYLES)
}

/// Chèn `<style {marker}>` chứa `css` vào `<head>` nếu chưa có; gọi lặp lại
/// không chèn thêm. Dùng chung cho content script và popup.
pub fn inject_styles(document: &Document, marker: &str, css: &str) -> Result<(), JsValue> {
    if document.query_selector(&format!("style[{marker}]"))?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute(marker, "v1")?;
    style_el.set_text_content(Some(css));
    head.append_child(&style_el.dyn_into::<Node>()?)?;

    Ok(())
}
