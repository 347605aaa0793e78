use stamp_core::{format_time_difference, TooltipModel};

const TS: i64 = 1_700_000_000;

#[test]
fn hidden_model_never_ticks() {
    let model = TooltipModel::default();
    assert!(!model.is_visible());
    assert_eq!(model.timestamp(), None);
    assert_eq!(model.tick(0, TS, true), None);
}

#[test]
fn tick_returns_only_the_difference_text() {
    let mut model = TooltipModel::default();
    let token = model.show(TS);

    assert!(model.is_visible());
    assert_eq!(model.timestamp(), Some(TS));

    let text = model.tick(token, TS - 7_200, true).expect("token hiện hành phải tick");
    assert_eq!(text, "in 2 hours");
    assert_eq!(text, format_time_difference(TS, TS - 7_200));
    assert!(!text.contains('<'));

    // Đồng hồ chạy tiếp, văn bản theo kịp.
    assert_eq!(model.tick(token, TS + 7_200, true).as_deref(), Some("2 hours ago"));
}

#[test]
fn new_show_makes_previous_token_stale() {
    let mut model = TooltipModel::default();
    let first = model.show(TS);
    let second = model.show(TS + 60);

    assert_ne!(first, second);
    assert_eq!(model.tick(first, TS, true), None);
    assert_eq!(model.timestamp(), Some(TS + 60));
    assert!(model.tick(second, TS, true).is_some());
}

#[test]
fn hide_clears_timestamp_and_stops_ticks() {
    let mut model = TooltipModel::default();
    let token = model.show(TS);
    model.hide();

    assert!(!model.is_visible());
    assert_eq!(model.timestamp(), None);
    assert_eq!(model.tick(token, TS, true), None);

    // Mở lại sau khi ẩn cấp token mới, token cũ vẫn vô hiệu.
    let reopened = model.show(TS);
    assert_ne!(reopened, token);
    assert_eq!(model.tick(token, TS, true), None);
    assert!(model.tick(reopened, TS, true).is_some());
}

#[test]
fn difference_toggle_off_suppresses_ticks() {
    let mut model = TooltipModel::default();
    let token = model.show(TS);

    assert_eq!(model.tick(token, TS - 7_200, false), None);
    assert!(model.is_visible());
    assert!(model.tick(token, TS - 7_200, true).is_some());
}
