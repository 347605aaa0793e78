//! Tooltip nổi duy nhất, dùng chung cho mọi phần tử đã chú thích.

use gloo_timers::callback::Interval;
use stamp_core::{
    place_tooltip, EngineConfig, Rect, Timestamp, TooltipModel, Viewport, DIFFERENCE_ROLE,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

const VISIBLE_CLASS: &str = "visible";

pub struct TooltipController {
    element: HtmlElement,
    model: TooltipModel,
    anchor: Option<Element>,
    refresh: Option<Interval>,
}

impl TooltipController {
    pub fn mount(document: &Document) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("Document không có <body>"))?;
        let element: HtmlElement = document.create_element("div")?.dyn_into()?;
        element.set_class_name("timestamp-tooltip");
        element.set_attribute("role", "tooltip")?;
        body.append_child(&element)?;

        Ok(Self {
            element,
            model: TooltipModel::default(),
            anchor: None,
            refresh: None,
        })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub fn is_anchored_to(&self, element: &Element) -> bool {
        self.model.is_visible() && self.anchor.as_ref() == Some(element)
    }

    /// Hiện `content` cạnh `anchor`. Trả về token làm mới để truyền cho
    /// [`TooltipController::tick`].
    pub fn show(
        &mut self,
        anchor: &Element,
        content: &str,
        timestamp: Timestamp,
        config: &EngineConfig,
    ) -> Result<u64, JsValue> {
        self.refresh = None;
        self.element.set_inner_html(content);

        // Đo lúc còn ẩn để khung hình đầu tiên đã đúng vị trí.
        let style = self.element.style();
        style.set_property("visibility", "hidden")?;
        style.set_property("width", &format!("{}px", config.tooltip_width))?;
        self.element.class_list().add_1(VISIBLE_CLASS)?;

        let measured = self.element.get_bounding_client_rect();
        let anchor_rect = anchor.get_bounding_client_rect();
        let placement = place_tooltip(
            Rect::new(
                anchor_rect.left(),
                anchor_rect.top(),
                anchor_rect.width(),
                anchor_rect.height(),
            ),
            (measured.width(), measured.height()),
            viewport()?,
            config,
        );

        style.set_property("left", &format!("{}px", placement.left))?;
        style.set_property("top", &format!("{}px", placement.top))?;
        style.set_property("width", &format!("{}px", placement.width))?;
        style.set_property("visibility", "visible")?;

        self.anchor = Some(anchor.clone());
        Ok(self.model.show(timestamp))
    }

    /// Gắn timer làm mới định kỳ; timer cũ bị drop và do đó bị hủy.
    pub fn start_refresh(&mut self, interval: Interval) {
        self.refresh = Some(interval);
    }

    /// Chỉ cập nhật dòng chênh lệch thời gian; token cũ bị bỏ qua.
    pub fn tick(&self, token: u64, now: Timestamp, show_difference: bool) {
        let Some(text) = self.model.tick(token, now, show_difference) else {
            return;
        };
        let selector = format!("[data-role=\"{DIFFERENCE_ROLE}\"]");
        if let Ok(Some(field)) = self.element.query_selector(&selector) {
            field.set_text_content(Some(&text));
        }
    }

    pub fn hide(&mut self) {
        self.refresh = None;
        self.anchor = None;
        self.model.hide();
        if let Err(err) = self.element.class_list().remove_1(VISIBLE_CLASS) {
            tracing::warn!(error = ?err, "không ẩn được tooltip");
        }
    }

    pub fn unmount(&mut self) {
        self.hide();
        self.element.remove();
    }
}

fn viewport() -> Result<Viewport, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
    let width = window.inner_width()?.as_f64().unwrap_or_default();
    let height = window.inner_height()?.as_f64().unwrap_or_default();
    Ok(Viewport { width, height })
}
