use serde::Deserialize;
use stamp_core::EngineConfig;

/// Cấu hình một phần do loader JS truyền vào; khóa vắng mặt giữ mặc định.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsEngineConfig {
    #[serde(default)]
    pub debounce_ms: Option<u32>,
    #[serde(default)]
    pub refresh_ms: Option<u32>,
    #[serde(default)]
    pub tooltip_width: Option<f64>,
    #[serde(default)]
    pub main_root: Option<String>,
    #[serde(default)]
    pub cell_selector: Option<String>,
    #[serde(default)]
    pub input_selector: Option<String>,
    #[serde(default)]
    pub modal_selector: Option<String>,
    #[serde(default)]
    pub edit_context_selector: Option<String>,
    #[serde(default)]
    pub url_pattern: Option<String>,
    /// Ghi log mức debug ra console.
    #[serde(default)]
    pub verbose: bool,
}

impl From<JsEngineConfig> for EngineConfig {
    fn from(cfg: JsEngineConfig) -> Self {
        let mut base = EngineConfig::default();
        if let Some(ms) = cfg.debounce_ms {
            base.debounce_ms = ms;
        }
        if let Some(ms) = cfg.refresh_ms {
            base.refresh_ms = ms;
        }
        if let Some(width) = cfg.tooltip_width.filter(|width| *width > 0.0) {
            base.tooltip_width = width;
        }
        if let Some(selector) = cfg.main_root {
            base.host.main_root = selector;
        }
        if let Some(selector) = cfg.cell_selector {
            base.host.cells = selector;
        }
        if let Some(selector) = cfg.input_selector {
            base.host.inputs = selector;
        }
        if let Some(selector) = cfg.modal_selector {
            base.host.modal_roots = selector;
        }
        if let Some(selector) = cfg.edit_context_selector {
            base.host.edit_contexts = selector;
        }
        if let Some(pattern) = cfg.url_pattern {
            base.host.url_pattern = pattern;
        }
        base
    }
}
