use stamp_core::{
    classify, convert_datetime_local, datetime_local_string, parse_datetime_local,
    render_timestamp_input, rezone_datetime_local, tooltip_markup, FixedZone, InputZone,
    TimestampUnit, UserSettings,
};

#[test]
fn utc_input_parses_to_timestamp() {
    let zone = FixedZone::utc();
    assert_eq!(
        parse_datetime_local("2023-11-14T22:13", InputZone::Utc, &zone),
        Ok(1_699_999_980)
    );
    assert_eq!(
        parse_datetime_local("2023-11-14T22:13:20", InputZone::Utc, &zone),
        Ok(1_700_000_000)
    );
    assert!(parse_datetime_local("14/11/2023 22:13", InputZone::Utc, &zone).is_err());
}

#[test]
fn local_input_uses_platform_offset() {
    let saigon = FixedZone::new(-420, Some("Asia/Ho_Chi_Minh"), &["vi-VN"]);
    assert_eq!(
        parse_datetime_local("2023-11-15T05:13:20", InputZone::Local, &saigon),
        Ok(1_700_000_000)
    );

    let new_york = FixedZone::new(300, Some("America/New_York"), &["en-US"]);
    assert_eq!(
        datetime_local_string(1_700_000_000, InputZone::Local, &new_york).as_deref(),
        Ok("2023-11-14T17:13")
    );
}

#[test]
fn minute_precision_round_trips_in_both_zones() {
    let kolkata = FixedZone::new(-330, Some("Asia/Kolkata"), &["en-IN"]);
    let timestamp = 1_699_999_980;

    for zone in [InputZone::Utc, InputZone::Local] {
        let shown = datetime_local_string(timestamp, zone, &kolkata).expect("Không render được");
        assert_eq!(parse_datetime_local(&shown, zone, &kolkata), Ok(timestamp));
    }
}

#[test]
fn toggle_keeps_the_same_instant() {
    let paris = FixedZone::new(-60, Some("Europe/Paris"), &["fr-FR"]);

    let utc = convert_datetime_local("2023-11-14T23:13", InputZone::Utc, &paris)
        .expect("Không đổi được sang UTC");
    assert_eq!(utc, "2023-11-14T22:13");

    let local = convert_datetime_local(&utc, InputZone::Local, &paris)
        .expect("Không đổi được về giờ địa phương");
    assert_eq!(local, "2023-11-14T23:13");
}

#[test]
fn displayed_unix_value_parses_back_to_original() {
    let timestamp = 1_700_000_000;
    let markup = tooltip_markup(timestamp, &UserSettings::default(), &FixedZone::utc(), timestamp);
    assert!(markup.contains("Nov 14, 2023, 22:13:20"));

    let displayed = timestamp.to_string();
    assert_eq!(classify(&displayed), Some(timestamp));
}

#[test]
fn loaded_utc_preference_rewrites_the_date_input() {
    let paris = FixedZone::new(-60, Some("Europe/Paris"), &["fr-FR"]);

    // Ô được điền theo giờ địa phương trước khi cấu hình `useUtcTime` tải xong.
    let synced = rezone_datetime_local("2023-11-14T23:13", InputZone::Local, InputZone::Utc, &paris)
        .expect("Không đồng bộ được sang UTC");
    assert_eq!(synced, "2023-11-14T22:13");

    assert_eq!(
        rezone_datetime_local("2023-11-14T23:13", InputZone::Utc, InputZone::Utc, &paris).as_deref(),
        Ok("2023-11-14T23:13")
    );
    assert_eq!(
        rezone_datetime_local("", InputZone::Local, InputZone::Utc, &paris).as_deref(),
        Ok("")
    );
    assert!(rezone_datetime_local("garbage", InputZone::Local, InputZone::Utc, &paris).is_err());
}

#[test]
fn loaded_unit_preference_rewrites_the_timestamp_input() {
    assert_eq!(
        render_timestamp_input("1700000000", TimestampUnit::Milliseconds).as_deref(),
        Some("1700000000000")
    );
    assert_eq!(
        render_timestamp_input("1700000000123", TimestampUnit::Seconds).as_deref(),
        Some("1700000000")
    );
    assert_eq!(render_timestamp_input("17000abc", TimestampUnit::Seconds), None);
}
