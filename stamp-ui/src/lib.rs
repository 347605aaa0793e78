//! Popup của extension: đổi timestamp ↔ ngày giờ và chỉnh cấu hình người dùng.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::styles;
    use gloo_timers::callback::Timeout;
    use serde_wasm_bindgen::from_value;
    use stamp_core::{
        build_tooltip, datetime_local_string, now_seconds, parse_datetime_local,
        parse_timestamp_input, render_timestamp_input, rezone_datetime_local, DateFormat, EngineConfig, Flag, InputZone,
        Timestamp, TimestampUnit, UserSettings, FLAG_PLACEHOLDER,
    };
    use stamp_wasm::zone::BrowserZone;
    use stamp_wasm::{gateway, logging, JsEngineConfig};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{console, Document, Element, HtmlInputElement, HtmlSelectElement, Window};
    use yew::events::InputEvent;
    use yew::prelude::*;
    use yew::TargetCast;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_namespace = ["navigator", "clipboard"], js_name = "writeText")]
        async fn clipboard_write_text(text: &str) -> Result<JsValue, JsValue>;
    }

    const COPY_LABEL: &str = "Copy Timestamp";
    const COPIED_LABEL: &str = "Copied!";
    const COPIED_RESET_MS: u32 = 1_000;

    #[derive(Properties, PartialEq)]
    pub struct PopupProps {
        pub url_pattern: String,
    }

    #[derive(Properties, PartialEq)]
    pub struct PanelProps {
        pub settings: UserSettings,
    }

    #[derive(Properties, PartialEq)]
    pub struct SettingsPanelProps {
        pub settings: UserSettings,
        pub on_change: Callback<UserSettings>,
    }

    #[function_component(Popup)]
    fn popup(props: &PopupProps) -> Html {
        use_effect_with((), |_| {
            if let Some(document) = current_document() {
                if let Err(err) = styles::ensure_styles(&document) {
                    console::error_1(&err);
                }
            }
            || ()
        });

        let settings = use_state(UserSettings::default);
        {
            let settings = settings.clone();
            use_effect_with((), move |_| {
                spawn_local(async move {
                    match gateway::load_settings().await {
                        Ok(loaded) => settings.set(loaded),
                        Err(err) => console::error_1(&err),
                    }
                });
                || ()
            });
        }

        // Mỗi thay đổi được lưu ngay, không có nút "Lưu".
        let on_settings_change = {
            let settings = settings.clone();
            let url_pattern = props.url_pattern.clone();
            Callback::from(move |next: UserSettings| {
                settings.set(next.clone());
                let url_pattern = url_pattern.clone();
                spawn_local(async move {
                    let Some(document) = current_document() else {
                        return;
                    };
                    if let Err(err) = gateway::save_settings(&document, &next, &url_pattern).await {
                        tracing::warn!(error = ?err, "không lưu được cấu hình");
                    }
                });
            })
        };

        let current = (*settings).clone();
        html! {
            <main class="stamp-popup">
                <TimestampPanel settings={current.clone()} />
                <DatePanel settings={current.clone()} />
                <SettingsPanel settings={current} on_change={on_settings_change} />
            </main>
        }
    }

    #[function_component(TimestampPanel)]
    fn timestamp_panel(props: &PanelProps) -> Html {
        let zone = use_memo((), |_| BrowserZone::detect());
        let unit = props.settings.timestamp_format;
        let input = use_state(|| unit.render(now_seconds()).to_string());

        // Cấu hình tải xong (hoặc đổi ở SettingsPanel) sau lần render đầu.
        {
            let input = input.clone();
            use_effect_with(unit, move |unit| {
                if let Some(value) = render_timestamp_input(&input, *unit) {
                    if value != *input {
                        input.set(value);
                    }
                }
                || ()
            });
        }

        let on_input = {
            let input = input.clone();
            Callback::from(move |event: InputEvent| {
                let field: HtmlInputElement = event.target_unchecked_into();
                input.set(field.value());
            })
        };

        let on_now = {
            let input = input.clone();
            Callback::from(move |_: MouseEvent| {
                input.set(unit.render(now_seconds()).to_string());
            })
        };

        let result = if input.trim().is_empty() {
            Html::default()
        } else {
            match parse_timestamp_input(&input) {
                Ok(timestamp) => render_conversion(timestamp, &props.settings, &zone),
                Err(err) => render_error(&err.to_string()),
            }
        };

        html! {
            <section class="popup-panel">
                <header class="panel-header">
                    <h2>{"Timestamp → Date"}</h2>
                    <button type="button" class="ghost-button" onclick={on_now}>{"Now"}</button>
                </header>
                <input
                    type="text"
                    inputmode="numeric"
                    class="panel-input"
                    value={(*input).clone()}
                    oninput={on_input}
                    aria-label="Unix timestamp"
                />
                { result }
            </section>
        }
    }

    #[function_component(DatePanel)]
    fn date_panel(props: &PanelProps) -> Html {
        let zone = use_memo((), |_| BrowserZone::detect());
        let use_utc = use_state(|| props.settings.use_utc_time);
        let input = {
            let zone = zone.clone();
            let utc = *use_utc;
            use_state(move || current_datetime(utc, &zone))
        };
        let copied = use_state(|| false);

        {
            let input = input.clone();
            let use_utc = use_utc.clone();
            let zone = zone.clone();
            use_effect_with(props.settings.use_utc_time, move |preferred| {
                let preferred = *preferred;
                if *use_utc != preferred {
                    rezone_input(&input, *use_utc, preferred, &zone);
                    use_utc.set(preferred);
                }
                || ()
            });
        }

        let unit = props.settings.timestamp_format;
        let parsed = parse_datetime_local(&input, input_zone(*use_utc), &*zone);

        let on_input = {
            let input = input.clone();
            let copied = copied.clone();
            Callback::from(move |event: InputEvent| {
                let field: HtmlInputElement = event.target_unchecked_into();
                input.set(field.value());
                copied.set(false);
            })
        };

        // Đổi công tắc giữ nguyên thời điểm, chỉ viết lại giá trị theo múi giờ mới.
        let on_toggle = {
            let input = input.clone();
            let use_utc = use_utc.clone();
            let zone = zone.clone();
            Callback::from(move |event: Event| {
                let field: HtmlInputElement = event.target_unchecked_into();
                let checked = field.checked();
                rezone_input(&input, *use_utc, checked, &zone);
                use_utc.set(checked);
            })
        };

        let on_now = {
            let input = input.clone();
            let zone = zone.clone();
            let utc = *use_utc;
            Callback::from(move |_: MouseEvent| {
                input.set(current_datetime(utc, &zone));
            })
        };

        let on_copy = {
            let copied = copied.clone();
            let text = parsed.as_ref().ok().map(|timestamp| unit.render(*timestamp).to_string());
            Callback::from(move |_: MouseEvent| {
                let Some(text) = text.clone() else {
                    return;
                };
                let copied = copied.clone();
                spawn_local(async move {
                    match clipboard_write_text(&text).await {
                        Ok(_) => {
                            copied.set(true);
                            let copied = copied.clone();
                            Timeout::new(COPIED_RESET_MS, move || copied.set(false)).forget();
                        }
                        Err(err) => console::error_1(&err),
                    }
                });
            })
        };

        let helper = if *use_utc {
            "Time is in UTC"
        } else {
            "Time is in your local timezone"
        };

        let result = match &parsed {
            Ok(timestamp) => html! {
                <>
                    <dl class="conversion">
                        <dt>{"🕓 Unix Timestamp"}</dt>
                        <dd class="conversion-timestamp">{ unit.render(*timestamp).to_string() }</dd>
                    </dl>
                    { render_conversion(*timestamp, &props.settings, &zone) }
                </>
            },
            Err(_) if input.trim().is_empty() => Html::default(),
            Err(err) => render_error(&err.to_string()),
        };

        html! {
            <section class="popup-panel">
                <header class="panel-header">
                    <h2>{"Date → Timestamp"}</h2>
                    <button type="button" class="ghost-button" onclick={on_now}>{"Now"}</button>
                </header>
                <input
                    type="datetime-local"
                    class="panel-input"
                    value={(*input).clone()}
                    oninput={on_input}
                    aria-label="Date and time"
                />
                <label class="settings-toggle">
                    <input type="checkbox" checked={*use_utc} onchange={on_toggle} />
                    <span>{"UTC"}</span>
                </label>
                <p class="helper-text">{ helper }</p>
                { result }
                <button
                    type="button"
                    class="primary-button"
                    disabled={parsed.is_err()}
                    onclick={on_copy}
                >
                    { if *copied { COPIED_LABEL } else { COPY_LABEL } }
                </button>
            </section>
        }
    }

    #[function_component(SettingsPanel)]
    fn settings_panel(props: &SettingsPanelProps) -> Html {
        let settings = &props.settings;

        let on_date_format = {
            let settings = settings.clone();
            let on_change = props.on_change.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                if let Some(format) = DateFormat::from_key(&select.value()) {
                    let mut next = settings.clone();
                    next.date_format = format;
                    on_change.emit(next);
                }
            })
        };

        let on_unit = {
            let settings = settings.clone();
            let on_change = props.on_change.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                if let Some(unit) = TimestampUnit::from_key(&select.value()) {
                    let mut next = settings.clone();
                    next.timestamp_format = unit;
                    on_change.emit(next);
                }
            })
        };

        html! {
            <section class="popup-panel settings-panel">
                <header class="panel-header">
                    <h2>{"Settings"}</h2>
                </header>
                <label class="settings-field">
                    <span>{"Date format"}</span>
                    <select onchange={on_date_format}>
                        {
                            for DateFormat::ALL.into_iter().map(|format| html! {
                                <option value={format.key()} selected={format == settings.date_format}>
                                    { date_format_label(format) }
                                </option>
                            })
                        }
                    </select>
                </label>
                <label class="settings-field">
                    <span>{"Timestamp unit"}</span>
                    <select onchange={on_unit}>
                        {
                            for TimestampUnit::ALL.into_iter().map(|unit| html! {
                                <option value={unit.key()} selected={unit == settings.timestamp_format}>
                                    { unit_label(unit) }
                                </option>
                            })
                        }
                    </select>
                </label>
                { render_toggle("Detect timestamps on page", settings.detect_timestamps, settings, &props.on_change, |next, value| next.detect_timestamps = value) }
                { render_toggle("Show tooltip in edit mode", settings.show_tooltip_in_edit_mode, settings, &props.on_change, |next, value| next.show_tooltip_in_edit_mode = value) }
                { render_toggle("Show time difference", settings.show_time_difference, settings, &props.on_change, |next, value| next.show_time_difference = value) }
                { render_toggle("Enter dates in UTC", settings.use_utc_time, settings, &props.on_change, |next, value| next.use_utc_time = value) }
            </section>
        }
    }

    fn render_toggle(
        label: &'static str,
        checked: bool,
        settings: &UserSettings,
        on_change: &Callback<UserSettings>,
        apply: fn(&mut UserSettings, bool),
    ) -> Html {
        let settings = settings.clone();
        let on_change = on_change.clone();
        let onchange = Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let mut next = settings.clone();
            apply(&mut next, input.checked());
            on_change.emit(next);
        });

        html! {
            <label class="settings-toggle">
                <input type="checkbox" {checked} {onchange} />
                <span>{ label }</span>
            </label>
        }
    }

    fn render_conversion(timestamp: Timestamp, settings: &UserSettings, zone: &BrowserZone) -> Html {
        match build_tooltip(timestamp, settings, zone, now_seconds()) {
            Ok(content) => html! {
                <dl class="conversion">
                    <dt>{"🌐 UTC"}</dt>
                    <dd>{ content.utc.clone() }</dd>
                    <dt>
                        { render_flag(&content.flag) }
                        { format!(" Local ({})", content.zone_label) }
                    </dt>
                    <dd>{ content.local.clone() }</dd>
                    {
                        content.difference.clone().map(|text| html! {
                            <>
                                <dt>{"⏱️ Time Difference"}</dt>
                                <dd>{ text }</dd>
                            </>
                        }).unwrap_or_default()
                    }
                </dl>
            },
            Err(err) => render_error(&err.to_string()),
        }
    }

    fn render_flag(flag: &Flag) -> Html {
        match flag.image_url() {
            Some(url) => html! { <img class="timestamp-flag" src={url} alt="" /> },
            None => html! { <span class="flag-placeholder">{ FLAG_PLACEHOLDER }</span> },
        }
    }

    fn render_error(message: &str) -> Html {
        html! { <p class="conversion-error">{ message.to_string() }</p> }
    }

    fn date_format_label(format: DateFormat) -> &'static str {
        match format {
            DateFormat::Default => "Default (Nov 14, 2023, 22:13:20)",
            DateFormat::Iso => "ISO 8601",
            DateFormat::Short => "Short (11/14/2023, 10:13 PM)",
            DateFormat::Long => "Long (Tuesday, November 14, 2023)",
        }
    }

    fn unit_label(unit: TimestampUnit) -> &'static str {
        match unit {
            TimestampUnit::Seconds => "Seconds",
            TimestampUnit::Milliseconds => "Milliseconds",
        }
    }

    fn rezone_input(input: &UseStateHandle<String>, from_utc: bool, to_utc: bool, zone: &BrowserZone) {
        match rezone_datetime_local(input, input_zone(from_utc), input_zone(to_utc), zone) {
            Ok(value) if value != **input => input.set(value),
            Ok(_) => {}
            Err(err) => tracing::debug!(error = %err, "không đổi được múi giờ ô nhập"),
        }
    }

    fn input_zone(utc: bool) -> InputZone {
        if utc {
            InputZone::Utc
        } else {
            InputZone::Local
        }
    }

    fn current_datetime(utc: bool, zone: &BrowserZone) -> String {
        datetime_local_string(now_seconds(), input_zone(utc), zone).unwrap_or_default()
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    #[wasm_bindgen]
    pub fn mount_popup(selector: &str, config: Option<JsValue>) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let js_config = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => from_value::<JsEngineConfig>(value)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
            _ => JsEngineConfig::default(),
        };
        logging::init(js_config.verbose);
        let config = EngineConfig::from(js_config);

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| {
                tracing::error!(selector, "không tìm thấy điểm gắn popup");
                JsValue::from_str("Không tìm thấy element theo selector")
            })?;

        yew::Renderer::<Popup>::with_root_and_props(
            target,
            PopupProps {
                url_pattern: config.host.url_pattern,
            },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_popup;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_popup(
    _: &str,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "stamp-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
