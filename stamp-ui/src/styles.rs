#![cfg(target_arch = "wasm32")]

use stamp_wasm::styles::inject_styles;
use wasm_bindgen::JsValue;
use web_sys::Document;

const POPUP_MARKER: &str = "data-stamp-popup";

/// CSS cho popup, kèm các biến thiết kế có thể ghi đè.
pub const POPUP_STYLES: &str = r#"
:root {
  --stamp-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --stamp-bg: #ffffff;
  --stamp-surface: #f8fafc;
  --stamp-border: rgba(148, 163, 184, 0.38);
  --stamp-radius: 10px;
  --stamp-text: #1f2933;
  --stamp-muted: #52606d;
  --stamp-heading: #11181c;
  --stamp-accent: #2563eb;
  --stamp-accent-text: #ffffff;
  --stamp-error: #b42318;
  --stamp-error-bg: rgba(180, 35, 24, 0.1);
}

.stamp-popup {
  font-family: var(--stamp-font-family);
  background: var(--stamp-bg);
  color: var(--stamp-text);
  width: 340px;
  display: flex;
  flex-direction: column;
  gap: 14px;
  padding: 16px;
}

.popup-panel {
  display: flex;
  flex-direction: column;
  gap: 10px;
  padding: 14px;
  border: 1px solid var(--stamp-border);
  border-radius: var(--stamp-radius);
  background: var(--stamp-surface);
}

.panel-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
}

.panel-header h2 {
  margin: 0;
  font-size: 14px;
  font-weight: 600;
  color: var(--stamp-heading);
}

.panel-input,
.settings-field select {
  font: inherit;
  padding: 6px 8px;
  border: 1px solid var(--stamp-border);
  border-radius: 6px;
  background: var(--stamp-bg);
  color: inherit;
}

.ghost-button {
  font: inherit;
  font-size: 12px;
  padding: 4px 10px;
  border: 1px solid var(--stamp-border);
  border-radius: 999px;
  background: transparent;
  color: var(--stamp-muted);
  cursor: pointer;
}

.primary-button {
  font: inherit;
  padding: 8px 12px;
  border: none;
  border-radius: 6px;
  background: var(--stamp-accent);
  color: var(--stamp-accent-text);
  cursor: pointer;
}

.primary-button:disabled {
  opacity: 0.5;
  cursor: not-allowed;
}

.helper-text {
  margin: 0;
  font-size: 12px;
  color: var(--stamp-muted);
}

.conversion {
  margin: 0;
  display: grid;
  gap: 2px;
  font-size: 13px;
}

.conversion dt {
  font-weight: 600;
  margin-top: 6px;
  display: flex;
  align-items: center;
  gap: 4px;
}

.conversion dd {
  margin: 0;
  font-variant-numeric: tabular-nums;
  word-break: break-all;
}

.conversion-error {
  margin: 0;
  padding: 6px 8px;
  border-radius: 6px;
  font-size: 12px;
  color: var(--stamp-error);
  background: var(--stamp-error-bg);
}

.timestamp-flag {
  width: 16px;
  height: 12px;
  vertical-align: middle;
}

.settings-field {
  display: flex;
  flex-direction: column;
  gap: 4px;
  font-size: 13px;
}

.settings-toggle {
  display: flex;
  align-items: center;
  gap: 8px;
  font-size: 13px;
  cursor: pointer;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    inject_styles(document, POPUP_MARKER, POPUP_STYLES)
}
