use serde::{Deserialize, Serialize};

/// Bộ selector CSS mô tả một console cụ thể.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HostProfile {
    /// Vùng nội dung chính; không có thì dùng `document.body`.
    pub main_root: String,
    /// Ô bảng hiển thị giá trị tĩnh.
    pub cells: String,
    /// Ô nhập liệu và span hiển thị giá trị lồng trong form.
    pub inputs: String,
    /// Hộp thoại/modal có vòng đời DOM riêng.
    pub modal_roots: String,
    /// Tổ tiên khiến một phần tử được coi là đang ở chế độ chỉnh sửa.
    pub edit_contexts: String,
    /// Mẫu URL của tab nhận broadcast khi cấu hình thay đổi.
    pub url_pattern: String,
}

impl Default for HostProfile {
    fn default() -> Self {
        Self {
            main_root: "#console-main-content".to_string(),
            cells: "td".to_string(),
            inputs: "input[type='text'], input:not([type]), textarea, \
                     [class*='value-display'] span, [role='dialog'] [class*='form-field'] span"
                .to_string(),
            modal_roots: "[role='dialog'], [class*='awsui_modal']".to_string(),
            edit_contexts: "[role='dialog'], form, [class*='editable-cell'], [class*='form-field']"
                .to_string(),
            url_pattern: "console.aws.amazon.com".to_string(),
        }
    }
}

/// Tham số vận hành của engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Khoảng lặng (ms) để gộp một loạt mutation thành một lần quét.
    pub debounce_ms: u32,
    /// Chu kỳ (ms) làm mới dòng chênh lệch thời gian khi tooltip mở.
    pub refresh_ms: u32,
    /// Độ rộng mặc định của tooltip (px).
    pub tooltip_width: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    pub host: HostProfile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            refresh_ms: 1000,
            tooltip_width: 300.0,
            horizontal_gap: 10.0,
            vertical_gap: 5.0,
            host: HostProfile::default(),
        }
    }
}
