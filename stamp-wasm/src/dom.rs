//! Cài đặt `AnnotationHost` trên DOM thật qua web-sys.
//!
//! Trạng thái chú thích nằm trên chính phần tử (thuộc tính `data-timestamp-*`),
//! nên việc framework của trang dựng lại node không làm hỏng tính idempotent.
//! Listener là các hàm JS dùng chung: `addEventListener` với cùng một hàm
//! không gắn trùng, và node bị gỡ khỏi DOM sẽ mang listener đi theo.

use js_sys::Function;
use stamp_core::{Affordance, AnnotationHost, AnnotationState, HostProfile};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, NodeList};

pub const PROCESSED_ATTR: &str = "data-timestamp-processed";
pub const CONTENT_ATTR: &str = "data-timestamp-content";
pub const RAW_ATTR: &str = "data-timestamp-raw";

/// Các hàm listener dùng chung cho mọi phần tử đã chú thích.
pub struct Listeners {
    pub hover_enter: Function,
    pub hover_leave: Function,
    pub value_input: Function,
}

pub struct WebHost {
    profile: HostProfile,
    candidates: String,
    listeners: Listeners,
}

impl WebHost {
    pub fn new(profile: HostProfile, listeners: Listeners) -> Self {
        let candidates = unprocessed_selector(&[&profile.cells, &profile.inputs]);
        Self {
            profile,
            candidates,
            listeners,
        }
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    /// Ô nhập dưới `root`, để gắn observer theo dõi thuộc tính `value`.
    pub fn input_elements(&self, root: &Element) -> Vec<Element> {
        query_all(root, "input, textarea")
    }

    fn bind(&self, element: &Element, event: &str, listener: &Function) {
        if let Err(err) = element.add_event_listener_with_callback(event, listener) {
            tracing::warn!(event, error = ?err, "không gắn được listener");
        }
    }

    fn unbind(&self, element: &Element, event: &str, listener: &Function) {
        if let Err(err) = element.remove_event_listener_with_callback(event, listener) {
            tracing::warn!(event, error = ?err, "không gỡ được listener");
        }
    }
}

impl AnnotationHost for WebHost {
    type Element = Element;

    fn unprocessed_candidates(&self, root: &Element) -> Vec<Element> {
        query_all(root, &self.candidates)
    }

    fn processed_elements(&self, root: &Element) -> Vec<Element> {
        query_all(root, &format!("[{PROCESSED_ATTR}]"))
    }

    fn display_text(&self, element: &Element) -> Option<String> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(area.value());
        }
        element.text_content()
    }

    fn is_input(&self, element: &Element) -> bool {
        element.is_instance_of::<HtmlInputElement>() || element.is_instance_of::<HtmlTextAreaElement>()
    }

    fn in_edit_context(&self, element: &Element) -> bool {
        matches!(element.closest(&self.profile.edit_contexts), Ok(Some(_)))
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn read_state(&self, element: &Element) -> Option<AnnotationState> {
        if element.get_attribute(PROCESSED_ATTR).as_deref() != Some("true") {
            return None;
        }
        let raw_timestamp = element.get_attribute(RAW_ATTR)?.parse().ok()?;
        Some(AnnotationState {
            raw_timestamp,
            tooltip_content: element.get_attribute(CONTENT_ATTR).unwrap_or_default(),
            edit_mode: self.is_input(element) || self.in_edit_context(element),
        })
    }

    fn write_state(&self, element: &Element, state: &AnnotationState, affordance: Affordance) {
        let result = (|| -> Result<(), JsValue> {
            element.set_attribute(PROCESSED_ATTR, "true")?;
            element.set_attribute(CONTENT_ATTR, &state.tooltip_content)?;
            element.set_attribute(RAW_ATTR, &state.raw_timestamp.to_string())?;
            if let Some(html) = element.dyn_ref::<HtmlElement>() {
                let style = html.style();
                style.set_property("text-decoration", "underline dotted")?;
                style.set_property("cursor", affordance.cursor.as_css())?;
            }
            Ok(())
        })();

        if let Err(err) = result {
            tracing::warn!(error = ?err, "không ghi được chú thích lên phần tử");
        }
    }

    fn clear_state(&self, element: &Element) {
        let result = (|| -> Result<(), JsValue> {
            element.remove_attribute(PROCESSED_ATTR)?;
            element.remove_attribute(CONTENT_ATTR)?;
            element.remove_attribute(RAW_ATTR)?;
            if let Some(html) = element.dyn_ref::<HtmlElement>() {
                let style = html.style();
                style.remove_property("text-decoration")?;
                style.remove_property("cursor")?;
            }
            Ok(())
        })();

        if let Err(err) = result {
            tracing::warn!(error = ?err, "không gỡ được chú thích");
        }
    }

    fn set_hover(&self, element: &Element, enabled: bool) {
        if enabled {
            self.bind(element, "mouseenter", &self.listeners.hover_enter);
            self.bind(element, "mouseleave", &self.listeners.hover_leave);
        } else {
            self.unbind(element, "mouseenter", &self.listeners.hover_enter);
            self.unbind(element, "mouseleave", &self.listeners.hover_leave);
        }
    }

    fn ensure_change_listener(&self, element: &Element) {
        self.bind(element, "input", &self.listeners.value_input);
    }
}

/// `"td, input"` → `"td:not([data-timestamp-processed]), input:not([…])"`.
fn unprocessed_selector(lists: &[&str]) -> String {
    lists
        .iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|selector| !selector.is_empty())
        .map(|selector| format!("{selector}:not([{PROCESSED_ATTR}])"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(err) => {
            tracing::warn!(selector, error = ?err, "selector không hợp lệ");
            Vec::new()
        }
    }
}

fn collect_elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
