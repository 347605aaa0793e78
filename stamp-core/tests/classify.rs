use stamp_core::{classify, parse_timestamp_input, TimestampUnit};

#[test]
fn ten_digits_are_seconds() {
    assert_eq!(classify("1700000000"), Some(1_700_000_000));
    assert_eq!(classify("0000000001"), Some(1));
    assert_eq!(classify("  1700000000\n"), Some(1_700_000_000));
}

#[test]
fn thirteen_digits_are_floored_milliseconds() {
    assert_eq!(classify("1700000000000"), Some(1_700_000_000));
    assert_eq!(classify("1700000000999"), Some(1_700_000_000));
    assert_eq!(classify("1700000000000"), classify("1700000000"));
}

#[test]
fn other_shapes_do_not_match() {
    for text in [
        "",
        "   ",
        "170000000",
        "17000000000",
        "170000000000",
        "17000000000000",
        "-170000000",
        "+1700000000",
        "1700000000.5",
        "1.700000000",
        "17000a0000",
        "1700 000000",
        "١٧٠٠٠٠٠٠٠٠",
    ] {
        assert_eq!(classify(text), None, "không được nhận diện: {text:?}");
    }
}

#[test]
fn popup_input_accepts_any_integer_as_seconds() {
    assert_eq!(parse_timestamp_input("1700000000000"), Ok(1_700_000_000));
    assert_eq!(parse_timestamp_input("42"), Ok(42));
    assert!(parse_timestamp_input("yesterday").is_err());
}

#[test]
fn display_unit_round_trips_through_classifier() {
    let timestamp = 1_700_000_000;
    for unit in [TimestampUnit::Seconds, TimestampUnit::Milliseconds] {
        let shown = unit.render(timestamp).to_string();
        assert_eq!(classify(&shown), Some(timestamp));
    }
}
