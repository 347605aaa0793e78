use std::fs;

use stamp_core::{
    build_tooltip, error_markup, render_date, resolve_country, timezone_label, tooltip_markup,
    DateFormat, FixedZone, Flag, RenderZone, StampError, UserSettings, FLAG_PLACEHOLDER,
};

const TS: i64 = 1_700_000_000;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn paris() -> FixedZone {
    FixedZone::new(-60, Some("Europe/Paris"), &["fr-FR", "en-US"])
}

fn settings(format: DateFormat, show_difference: bool) -> UserSettings {
    UserSettings {
        date_format: format,
        show_time_difference: show_difference,
        ..UserSettings::default()
    }
}

#[test]
fn utc_layouts_per_date_format() {
    let cases = [
        (DateFormat::Default, "Nov 14, 2023, 22:13:20"),
        (DateFormat::Iso, "2023-11-14T22:13:20.000Z"),
        (DateFormat::Short, "11/14/2023, 10:13 PM"),
        (DateFormat::Long, "Tuesday, November 14, 2023 at 10:13:20 PM"),
    ];
    for (format, expected) in cases {
        let rendered = render_date(TS, format, RenderZone::Utc).expect("Không render được UTC");
        assert_eq!(rendered, expected, "{format:?}");
    }
}

#[test]
fn local_iso_carries_explicit_offset() {
    let zone = paris();
    let offset = stamp_core::LocalZone::fixed_offset_at(&zone, TS).expect("Offset không hợp lệ");
    let rendered =
        render_date(TS, DateFormat::Iso, RenderZone::Local(offset)).expect("Không render được");
    assert_eq!(rendered, "2023-11-14T23:13:20.000+01:00");
}

#[test]
fn timezone_labels_invert_platform_sign() {
    assert_eq!(timezone_label(0), "GMT+0");
    assert_eq!(timezone_label(-60), "GMT+1");
    assert_eq!(timezone_label(-330), "GMT+5:30");
    assert_eq!(timezone_label(180), "GMT-3");
    assert_eq!(timezone_label(570), "GMT-9:30");
}

#[test]
fn tooltip_matches_golden() {
    let markup = tooltip_markup(
        TS,
        &settings(DateFormat::Default, true),
        &paris(),
        TS - 7_200,
    );

    let expected = fs::read_to_string(fixture_path("tooltip_1700000000_paris.html"))
        .expect("Không đọc được golden tooltip");

    assert_eq!(markup, expected.trim_end());
}

#[test]
fn difference_toggle_controls_section_count() {
    let zone = paris();

    let two = build_tooltip(TS, &settings(DateFormat::Iso, false), &zone, TS)
        .expect("Không dựng được tooltip");
    assert_eq!(two.section_count(), 2);
    assert_eq!(two.to_markup().matches("data-section=").count(), 2);
    assert!(!two.to_markup().contains("time-difference"));

    let three = build_tooltip(TS, &settings(DateFormat::Iso, true), &zone, TS)
        .expect("Không dựng được tooltip");
    assert_eq!(three.section_count(), 3);
    let markup = three.to_markup();
    let utc = markup.find("data-section=\"utc\"").expect("thiếu UTC");
    let local = markup.find("data-section=\"local\"").expect("thiếu Local");
    let diff = markup.find("data-section=\"difference\"").expect("thiếu chênh lệch");
    assert!(utc < local && local < diff);
}

#[test]
fn flag_falls_back_to_language_region_then_placeholder() {
    let languages = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    assert_eq!(
        resolve_country(Some("Asia/Tokyo"), &languages(&["en-US"])),
        Some("JP".to_string())
    );
    assert_eq!(
        resolve_country(Some("Etc/Unknown"), &languages(&["vi", "zh-Hant-TW"])),
        Some("TW".to_string())
    );
    assert_eq!(resolve_country(None, &languages(&["de-de"])), Some("DE".to_string()));
    assert_eq!(resolve_country(None, &languages(&["fr", "ja"])), None);

    let zone = FixedZone::new(0, None, &["fr"]);
    let content = build_tooltip(TS, &UserSettings::default(), &zone, TS).expect("Không dựng được");
    assert_eq!(content.flag, Flag::Placeholder);
    assert_eq!(content.flag.image_url(), None);
    assert!(content.to_markup().contains(FLAG_PLACEHOLDER));

    let flag = Flag::Country("JP".to_string());
    let url = flag.image_url().expect("cờ quốc gia phải có ảnh");
    assert!(url.starts_with("https://") && url.ends_with("/JP.svg"));
    assert!(flag.to_markup().contains(&url));
}

#[test]
fn formatting_failures_become_error_markup() {
    let far_future = i64::MAX / 2;
    let err = build_tooltip(far_future, &UserSettings::default(), &FixedZone::utc(), TS)
        .expect_err("phải lỗi khi vượt phạm vi");
    assert_eq!(err, StampError::OutOfRange(far_future));

    let markup = tooltip_markup(far_future, &UserSettings::default(), &FixedZone::utc(), TS);
    assert_eq!(markup, error_markup(&err));
    assert!(markup.contains("data-section=\"error\""));
}
