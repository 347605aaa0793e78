use crate::UserSettings;

/// Phản ứng của bộ theo dõi DOM khi nhận cấu hình mới.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsReaction {
    /// Quét lại ngay (không debounce); dựng lại observer nếu trước đó đang tắt.
    Rescan { rebuild_observers: bool },
    /// Tắt nhận diện: ngắt mọi observer và gỡ chú thích.
    Teardown,
    /// Nhận diện vẫn tắt, không làm gì.
    Ignore,
}

pub fn plan_settings_reaction(previous: &UserSettings, next: &UserSettings) -> SettingsReaction {
    match (previous.detect_timestamps, next.detect_timestamps) {
        (false, true) => SettingsReaction::Rescan {
            rebuild_observers: true,
        },
        (true, true) => SettingsReaction::Rescan {
            rebuild_observers: false,
        },
        (true, false) => SettingsReaction::Teardown,
        (false, false) => SettingsReaction::Ignore,
    }
}
