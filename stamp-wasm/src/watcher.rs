//! Theo dõi mutation DOM và kích hoạt quét lại có debounce.

use gloo_timers::callback::Timeout;
use js_sys::{Array, Function};
use stamp_core::HostProfile;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit};

/// Tập observer đang hoạt động: một observer cây cho mỗi root, cộng một
/// observer thuộc tính `value` dùng chung cho mọi ô nhập.
pub struct ChangeWatcher {
    tree_callback: Function,
    value_callback: Function,
    tree_observers: Vec<MutationObserver>,
    value_observer: Option<MutationObserver>,
    observed: Vec<Element>,
    pending: Option<Timeout>,
}

impl ChangeWatcher {
    pub fn new(tree_callback: Function, value_callback: Function) -> Self {
        Self {
            tree_callback,
            value_callback,
            tree_observers: Vec::new(),
            value_observer: None,
            observed: Vec::new(),
            pending: None,
        }
    }

    /// Tập root hiện tại khác tập đang theo dõi (modal vừa mở hoặc đóng).
    pub fn roots_changed(&self, roots: &[Element]) -> bool {
        self.observed.as_slice() != roots
    }

    /// Ngắt mọi observer cũ rồi gắn lại lên các root hiện có.
    ///
    /// `portal` (thường là `body`) được theo dõi nông, chỉ các con trực tiếp,
    /// để phát hiện modal gắn thẳng vào body ngoài vùng nội dung chính.
    pub fn install(&mut self, roots: &[Element], portal: Option<&Element>) -> Result<(), JsValue> {
        // Có thể được gọi từ chính timer đang chờ, nên không đụng tới `pending`.
        self.disconnect_observers();

        let deep = MutationObserverInit::new();
        deep.set_child_list(true);
        deep.set_subtree(true);

        for root in roots {
            let observer = MutationObserver::new(&self.tree_callback)?;
            observer.observe_with_options(root, &deep)?;
            self.tree_observers.push(observer);
        }

        if let Some(portal) = portal.filter(|portal| !roots.contains(portal)) {
            let shallow = MutationObserverInit::new();
            shallow.set_child_list(true);
            let observer = MutationObserver::new(&self.tree_callback)?;
            observer.observe_with_options(portal, &shallow)?;
            self.tree_observers.push(observer);
        }

        self.value_observer = Some(MutationObserver::new(&self.value_callback)?);
        self.observed = roots.to_vec();

        tracing::debug!(roots = roots.len(), "đã gắn observer");
        Ok(())
    }

    /// Theo dõi thuộc tính `value` của các ô nhập. Gọi lại trên cùng node chỉ
    /// thay tùy chọn, không nhân đôi.
    pub fn watch_inputs(&self, inputs: &[Element]) {
        let Some(observer) = &self.value_observer else {
            return;
        };

        let init = MutationObserverInit::new();
        init.set_attributes(true);
        let filter = Array::of1(&JsValue::from_str("value"));
        init.set_attribute_filter(&filter);

        for input in inputs {
            if let Err(err) = observer.observe_with_options(input, &init) {
                tracing::warn!(error = ?err, "không theo dõi được ô nhập");
            }
        }
    }

    /// Thay timer đang chờ bằng timer mới; timer cũ bị hủy khi drop.
    pub fn schedule(&mut self, delay_ms: u32, callback: impl FnOnce() + 'static) {
        self.pending = Some(Timeout::new(delay_ms, callback));
    }

    pub fn disconnect(&mut self) {
        self.disconnect_observers();
        self.pending = None;
    }

    fn disconnect_observers(&mut self) {
        for observer in self.tree_observers.drain(..) {
            observer.disconnect();
        }
        if let Some(observer) = self.value_observer.take() {
            observer.disconnect();
        }
        self.observed.clear();
    }
}

/// Root cần theo dõi: vùng nội dung chính (hoặc `body`) và các modal đang mở.
pub fn observed_roots(document: &Document, profile: &HostProfile) -> Vec<Element> {
    let mut roots = Vec::new();

    let main = document
        .query_selector(&profile.main_root)
        .ok()
        .flatten()
        .or_else(|| document.body().map(Element::from));
    if let Some(main) = main {
        roots.push(main);
    }

    if let Ok(list) = document.query_selector_all(&profile.modal_roots) {
        for index in 0..list.length() {
            let Some(node) = list.item(index) else {
                continue;
            };
            let Ok(modal) = wasm_bindgen::JsCast::dyn_into::<Element>(node) else {
                continue;
            };
            if !roots.iter().any(|root| root.contains(Some(modal.as_ref()))) {
                roots.push(modal);
            }
        }
    }

    roots
}
