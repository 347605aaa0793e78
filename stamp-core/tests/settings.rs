use std::collections::HashMap;

use serde_json::json;
use stamp_core::{
    plan_settings_reaction, DateFormat, EngineConfig, PartialSettings, SettingsReaction,
    StorageChange, TimestampUnit, UserSettings,
};

fn change(new_value: Option<serde_json::Value>) -> StorageChange {
    StorageChange {
        new_value,
        old_value: None,
    }
}

#[test]
fn partial_records_resolve_to_complete_settings() {
    let settings = UserSettings::from_json(&json!({ "dateFormat": "iso" }))
        .expect("Không đọc được cấu hình");

    assert_eq!(settings.date_format, DateFormat::Iso);
    assert_eq!(settings.timestamp_format, TimestampUnit::Seconds);
    assert!(settings.detect_timestamps);
    assert!(settings.show_time_difference);
    assert!(!settings.use_utc_time);

    let round_trip = settings.to_json();
    for key in UserSettings::KEYS {
        assert!(round_trip.get(key).is_some(), "thiếu khóa {key}");
    }
}

#[test]
fn invalid_values_default_only_their_own_key() {
    let settings = UserSettings::from_json(&json!({
        "detectTimestamps": false,
        "dateFormat": "bogus",
        "useUtcTime": "yes",
        "timestampFormat": "milliseconds"
    }))
    .expect("Bản ghi object phải đọc được");

    assert!(!settings.detect_timestamps);
    assert_eq!(settings.timestamp_format, TimestampUnit::Milliseconds);
    assert_eq!(settings.date_format, DateFormat::Default);
    assert!(!settings.use_utc_time);

    assert!(UserSettings::from_json(&json!("not a record")).is_err());
}

#[test]
fn select_keys_match_serialized_names() {
    for format in DateFormat::ALL {
        let wire = serde_json::to_value(format).expect("serialize");
        assert_eq!(wire, json!(format.key()));
        assert_eq!(DateFormat::from_key(format.key()), Some(format));
    }
    for unit in TimestampUnit::ALL {
        assert_eq!(serde_json::to_value(unit).expect("serialize"), json!(unit.key()));
        assert_eq!(TimestampUnit::from_key(unit.key()), Some(unit));
    }
    assert_eq!(DateFormat::from_key("rfc2822"), None);
    assert_eq!(TimestampUnit::render(TimestampUnit::Milliseconds, 1_700_000_000), 1_700_000_000_000);
}

#[test]
fn merged_overrides_only_present_fields() {
    let partial: PartialSettings =
        serde_json::from_value(json!({ "showTimeDifference": false, "timestampFormat": "milliseconds" }))
            .expect("Không đọc được partial");
    let merged = UserSettings::default().merged(&partial);

    assert!(!merged.show_time_difference);
    assert_eq!(merged.timestamp_format, TimestampUnit::Milliseconds);
    assert_eq!(merged.date_format, DateFormat::Default);
    assert!(merged.detect_timestamps);
}

#[test]
fn storage_deltas_apply_reset_and_ignore_unknown_keys() {
    let mut settings = UserSettings::default();

    let mut changes = HashMap::new();
    changes.insert("dateFormat".to_string(), change(Some(json!("long"))));
    changes.insert("somethingElse".to_string(), change(Some(json!(1))));
    assert!(settings.apply_storage_changes(&changes));
    assert_eq!(settings.date_format, DateFormat::Long);

    let mut removed = HashMap::new();
    removed.insert("dateFormat".to_string(), change(None));
    assert!(settings.apply_storage_changes(&removed));
    assert_eq!(settings.date_format, DateFormat::Default);

    let mut unknown = HashMap::new();
    unknown.insert("theme".to_string(), change(Some(json!("dark"))));
    assert!(!settings.apply_storage_changes(&unknown));

    let mut bad = HashMap::new();
    bad.insert("detectTimestamps".to_string(), change(Some(json!("yes"))));
    assert!(!settings.apply_storage_changes(&bad));
    assert!(settings.detect_timestamps);
}

#[test]
fn malformed_key_in_delta_keeps_the_valid_ones() {
    let mut settings = UserSettings {
        date_format: DateFormat::Short,
        ..UserSettings::default()
    };

    let mut changes = HashMap::new();
    changes.insert("detectTimestamps".to_string(), change(Some(json!(false))));
    changes.insert("dateFormat".to_string(), change(Some(json!("bogus"))));

    assert!(settings.apply_storage_changes(&changes));
    assert!(!settings.detect_timestamps);
    assert_eq!(settings.date_format, DateFormat::Short);
}

#[test]
fn storage_delta_wire_shape_deserializes() {
    let changes: HashMap<String, StorageChange> = serde_json::from_value(json!({
        "detectTimestamps": { "newValue": false, "oldValue": true }
    }))
    .expect("Không đọc được delta");

    let mut settings = UserSettings::default();
    assert!(settings.apply_storage_changes(&changes));
    assert!(!settings.detect_timestamps);
}

#[test]
fn watcher_reactions_follow_detection_toggle() {
    let on = UserSettings::default();
    let off = UserSettings {
        detect_timestamps: false,
        ..UserSettings::default()
    };

    assert_eq!(
        plan_settings_reaction(&off, &on),
        SettingsReaction::Rescan {
            rebuild_observers: true
        }
    );
    assert_eq!(
        plan_settings_reaction(&on, &on),
        SettingsReaction::Rescan {
            rebuild_observers: false
        }
    );
    assert_eq!(plan_settings_reaction(&on, &off), SettingsReaction::Teardown);
    assert_eq!(plan_settings_reaction(&off, &off), SettingsReaction::Ignore);
}

#[test]
fn engine_config_defaults_and_partial_json() {
    let config: EngineConfig = serde_json::from_value(json!({ "debounceMs": 120 }))
        .expect("Không đọc được config");

    assert_eq!(config.debounce_ms, 120);
    assert_eq!(config.refresh_ms, 1000);
    assert_eq!(config.tooltip_width, 300.0);
    assert_eq!(config.host.main_root, "#console-main-content");
}
