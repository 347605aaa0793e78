//! Ngữ cảnh ứng dụng của content script.
//!
//! Toàn bộ trạng thái (cấu hình, tooltip, observer) nằm trong một `Inner` duy
//! nhất sau `Rc<RefCell<_>>`. Listener JS chỉ giữ `Weak`, nên sau `teardown`
//! hoặc khi handle bị thu hồi, các callback còn sót lại tự trở thành no-op.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use js_sys::{Array, Function};
use serde_wasm_bindgen::from_value;
use stamp_core::{
    now_seconds, plan_settings_reaction, Affordance, AnnotationHost, Annotator, EngineConfig,
    ScanReport, SettingsReaction, Transition, UserSettings,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, Event, MutationObserver, MutationRecord, Node};

use crate::config::JsEngineConfig;
use crate::dom::{Listeners, WebHost};
use crate::tooltip::TooltipController;
use crate::watcher::{observed_roots, ChangeWatcher};
use crate::zone::BrowserZone;
use crate::{gateway, logging, styles};

type Shared = Rc<RefCell<Inner>>;

struct Inner {
    active: bool,
    config: EngineConfig,
    settings: UserSettings,
    zone: BrowserZone,
    document: Document,
    host: WebHost,
    tooltip: TooltipController,
    watcher: ChangeWatcher,
}

/// Handle trả về cho JS; giữ ngữ cảnh sống cho tới khi `teardown`.
#[wasm_bindgen]
pub struct ContentHandle {
    inner: Shared,
}

#[wasm_bindgen]
impl ContentHandle {
    /// Quét lại ngay toàn bộ root, bỏ qua debounce.
    pub fn rescan(&self) {
        if let Ok(inner) = self.inner.try_borrow() {
            if inner.active && inner.settings.detect_timestamps {
                inner.scan_all();
            }
        }
    }

    /// Ngắt observer, gỡ tooltip và mọi chú thích.
    pub fn teardown(&self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.shutdown();
        }
    }
}

#[wasm_bindgen]
pub async fn start_content_script(config: Option<JsValue>) -> Result<ContentHandle, JsValue> {
    console_error_panic_hook::set_once();

    let js_config = match config {
        Some(value) if !value.is_undefined() && !value.is_null() => from_value::<JsEngineConfig>(value)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
        _ => JsEngineConfig::default(),
    };
    logging::init(js_config.verbose);
    let config = EngineConfig::from(js_config);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

    if let Err(err) = styles::ensure_styles(&document) {
        console::error_1(&err);
    }

    let settings = gateway::load_settings().await.unwrap_or_else(|err| {
        tracing::warn!(error = ?err, "không đọc được cấu hình, dùng mặc định");
        UserSettings::default()
    });

    let tooltip = TooltipController::mount(&document)?;
    let shared: Shared = Rc::new_cyclic(|weak| {
        RefCell::new(Inner {
            active: true,
            host: WebHost::new(config.host.clone(), listeners(weak)),
            watcher: ChangeWatcher::new(tree_callback(weak), value_callback(weak)),
            config,
            settings,
            zone: BrowserZone::detect(),
            document: document.clone(),
            tooltip,
        })
    });

    {
        let mut inner = shared.borrow_mut();
        if inner.settings.detect_timestamps {
            let report = inner.scan_all();
            tracing::info!(annotated = report.annotated, "đã chú thích timestamp lần đầu");
            if let Err(err) = inner.install_watcher() {
                tracing::warn!(error = ?err, "không gắn được observer");
            }
        }
    }

    subscribe_settings(&shared, &document)?;

    Ok(ContentHandle { inner: shared })
}

impl Inner {
    fn annotator(&self) -> Annotator<'_, WebHost> {
        Annotator::new(&self.host, &self.settings, &self.zone, now_seconds())
    }

    fn roots(&self) -> Vec<Element> {
        observed_roots(&self.document, self.host.profile())
    }

    fn scan_all(&self) -> ScanReport {
        let annotator = self.annotator();
        let mut total = ScanReport::default();
        for root in self.roots() {
            total.merge(annotator.scan(&root));
            self.watcher.watch_inputs(&self.host.input_elements(&root));
        }
        total
    }

    fn install_watcher(&mut self) -> Result<(), JsValue> {
        let roots = self.roots();
        let portal = self.document.body().map(Element::from);
        self.watcher.install(&roots, portal.as_ref())?;
        for root in &roots {
            self.watcher.watch_inputs(&self.host.input_elements(root));
        }
        Ok(())
    }

    fn apply_settings(&mut self, next: UserSettings) {
        if !self.active || next == self.settings {
            return;
        }

        let reaction = plan_settings_reaction(&self.settings, &next);
        self.settings = next;
        self.tooltip.hide();

        match reaction {
            SettingsReaction::Rescan { rebuild_observers } => {
                if rebuild_observers {
                    if let Err(err) = self.install_watcher() {
                        tracing::warn!(error = ?err, "không dựng lại được observer");
                    }
                }
                let annotator = self.annotator();
                for root in self.roots() {
                    annotator.reformat(&root);
                }
                let report = self.scan_all();
                tracing::debug!(annotated = report.annotated, "quét lại sau khi đổi cấu hình");
            }
            SettingsReaction::Teardown => {
                self.watcher.disconnect();
                self.clear_annotations();
            }
            SettingsReaction::Ignore => {}
        }
    }

    fn clear_annotations(&self) {
        let annotator = self.annotator();
        for root in self.roots() {
            annotator.clear_all(&root);
        }
    }

    fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.watcher.disconnect();
        self.clear_annotations();
        self.tooltip.unmount();
        tracing::info!("content script đã dừng");
    }
}

fn into_function<F: ?Sized + wasm_bindgen::closure::WasmClosure>(closure: Closure<F>) -> Function {
    closure.into_js_value().unchecked_into()
}

fn event_element(event: &Event) -> Option<Element> {
    event.current_target()?.dyn_into::<Element>().ok()
}

fn listeners(weak: &Weak<RefCell<Inner>>) -> Listeners {
    let enter = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let (Some(shared), Some(element)) = (weak.upgrade(), event_element(&event)) {
                show_tooltip(&shared, &element);
            }
        })
    };

    let leave = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade() {
                if let Ok(mut inner) = shared.try_borrow_mut() {
                    inner.tooltip.hide();
                }
            }
        })
    };

    let input = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let (Some(shared), Some(element)) = (weak.upgrade(), event_element(&event)) {
                refresh_element(&shared, &element);
            }
        })
    };

    Listeners {
        hover_enter: into_function(enter),
        hover_leave: into_function(leave),
        value_input: into_function(input),
    }
}

fn tree_callback(weak: &Weak<RefCell<Inner>>) -> Function {
    let weak = weak.clone();
    into_function(Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |records: Array, _observer: MutationObserver| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Ok(mut inner) = shared.try_borrow_mut() else {
                return;
            };
            if !inner.active {
                return;
            }

            // Thay đổi bên trong tooltip không cần quét lại.
            let relevant = {
                let tooltip: &Node = inner.tooltip.element().as_ref();
                records
                    .iter()
                    .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                    .any(|record| {
                        record
                            .target()
                            .map_or(true, |target| !tooltip.contains(Some(&target)))
                    })
            };
            if !relevant {
                return;
            }

            let delay = inner.config.debounce_ms;
            let weak = weak.clone();
            inner.watcher.schedule(delay, move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let Ok(mut inner) = shared.try_borrow_mut() else {
                    return;
                };
                if !inner.active || !inner.settings.detect_timestamps {
                    return;
                }
                inner.scan_all();
                let roots = inner.roots();
                if inner.watcher.roots_changed(&roots) {
                    if let Err(err) = inner.install_watcher() {
                        tracing::warn!(error = ?err, "không gắn lại được observer cho modal mới");
                    }
                }
            });
        },
    ))
}

fn value_callback(weak: &Weak<RefCell<Inner>>) -> Function {
    let weak = weak.clone();
    into_function(Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |records: Array, _observer: MutationObserver| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                if let Some(element) = record.target().and_then(|node| node.dyn_into::<Element>().ok()) {
                    refresh_element(&shared, &element);
                }
            }
        },
    ))
}

fn show_tooltip(shared: &Shared, element: &Element) {
    let weak = Rc::downgrade(shared);
    let Ok(mut inner) = shared.try_borrow_mut() else {
        return;
    };
    if !inner.active {
        return;
    }
    let Some(state) = inner.host.read_state(element) else {
        return;
    };
    if !Affordance::for_element(state.edit_mode, &inner.settings).hover {
        return;
    }

    let Inner {
        tooltip,
        config,
        settings,
        ..
    } = &mut *inner;

    let token = match tooltip.show(element, &state.tooltip_content, state.raw_timestamp, config) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(error = ?err, "không hiển thị được tooltip");
            return;
        }
    };

    if !settings.show_time_difference {
        return;
    }

    // Nội dung cache được tính lúc quét; cập nhật ngay rồi mới chờ nhịp kế.
    tooltip.tick(token, now_seconds(), true);
    let interval = Interval::new(config.refresh_ms, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if let Ok(inner) = shared.try_borrow() {
            inner
                .tooltip
                .tick(token, now_seconds(), inner.settings.show_time_difference);
        };
    });
    tooltip.start_refresh(interval);
}

fn refresh_element(shared: &Shared, element: &Element) {
    let Ok(mut inner) = shared.try_borrow_mut() else {
        return;
    };
    if !inner.active || !inner.settings.detect_timestamps {
        return;
    }

    let transition = inner.annotator().refresh_element(element);
    if transition == Transition::Reverted && inner.tooltip.is_anchored_to(element) {
        inner.tooltip.hide();
    }
    if let Transition::Annotated(timestamp) = transition {
        tracing::debug!(timestamp, "ô nhập được chú thích lại");
    }
}

fn subscribe_settings(shared: &Shared, document: &Document) -> Result<(), JsValue> {
    let weak = Rc::downgrade(shared);
    gateway::subscribe_storage(move |changes| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = shared.try_borrow_mut() else {
            return;
        };
        let mut next = inner.settings.clone();
        if next.apply_storage_changes(&changes) {
            inner.apply_settings(next);
        }
    });

    let weak = Rc::downgrade(shared);
    gateway::subscribe_messages(move |partial| {
        if let Some(shared) = weak.upgrade() {
            if let Ok(mut inner) = shared.try_borrow_mut() {
                let next = inner.settings.merged(&partial);
                inner.apply_settings(next);
            }
        }
    });

    let weak = Rc::downgrade(shared);
    gateway::subscribe_local(document, move |partial| {
        if let Some(shared) = weak.upgrade() {
            if let Ok(mut inner) = shared.try_borrow_mut() {
                let next = inner.settings.merged(&partial);
                inner.apply_settings(next);
            }
        }
    })
}
