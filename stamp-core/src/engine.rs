//! Engine quét và chú thích phần tử, độc lập với cài đặt DOM cụ thể.

use crate::classify::classify;
use crate::tooltip::{tooltip_markup, AnnotationState};
use crate::{LocalZone, Timestamp, UserSettings};

/// Con trỏ chuột áp lên phần tử đã chú thích.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Help,
    Text,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Help => "help",
            Cursor::Text => "text",
        }
    }
}

/// Dấu hiệu trực quan của một chú thích. Gạch chân chấm luôn được áp; con trỏ
/// và listener hover phụ thuộc chế độ chỉnh sửa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub cursor: Cursor,
    pub hover: bool,
}

impl Affordance {
    pub fn for_element(edit_mode: bool, settings: &UserSettings) -> Self {
        let hover = !edit_mode || settings.show_tooltip_in_edit_mode;
        Self {
            cursor: if hover { Cursor::Help } else { Cursor::Text },
            hover,
        }
    }
}

/// Các thao tác DOM mà engine cần. Cài đặt phải bảo đảm `set_hover` và
/// `ensure_change_listener` idempotent: gọi lặp lại không gắn thêm listener.
pub trait AnnotationHost {
    type Element: Clone;

    /// Ứng viên dưới `root` chưa mang marker đã xử lý.
    fn unprocessed_candidates(&self, root: &Self::Element) -> Vec<Self::Element>;

    /// Phần tử dưới `root` đang mang marker.
    fn processed_elements(&self, root: &Self::Element) -> Vec<Self::Element>;

    /// Văn bản hiển thị (ô bảng) hoặc giá trị hiện tại (ô nhập).
    fn display_text(&self, element: &Self::Element) -> Option<String>;

    fn is_input(&self, element: &Self::Element) -> bool;

    /// Nằm trong modal, form hoặc ô đang chỉnh sửa.
    fn in_edit_context(&self, element: &Self::Element) -> bool;

    fn is_connected(&self, element: &Self::Element) -> bool;

    fn read_state(&self, element: &Self::Element) -> Option<AnnotationState>;

    fn write_state(&self, element: &Self::Element, state: &AnnotationState, affordance: Affordance);

    fn clear_state(&self, element: &Self::Element);

    fn set_hover(&self, element: &Self::Element, enabled: bool);

    fn ensure_change_listener(&self, element: &Self::Element);
}

/// Kết quả xử lý một phần tử.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Annotated(Timestamp),
    Reverted,
    Unchanged,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub examined: usize,
    pub annotated: usize,
    pub reverted: usize,
    pub skipped: usize,
}

impl ScanReport {
    /// Cộng dồn báo cáo của một root khác.
    pub fn merge(&mut self, other: ScanReport) {
        self.examined += other.examined;
        self.annotated += other.annotated;
        self.reverted += other.reverted;
        self.skipped += other.skipped;
    }

    fn record(&mut self, transition: Transition) {
        self.examined += 1;
        match transition {
            Transition::Annotated(_) => self.annotated += 1,
            Transition::Reverted => self.reverted += 1,
            Transition::Unchanged | Transition::Skipped => self.skipped += 1,
        }
    }
}

/// Một lượt chú thích với cấu hình và đồng hồ cố định.
pub struct Annotator<'a, H: AnnotationHost> {
    host: &'a H,
    settings: &'a UserSettings,
    zone: &'a dyn LocalZone,
    now: Timestamp,
}

impl<'a, H: AnnotationHost> Annotator<'a, H> {
    pub fn new(
        host: &'a H,
        settings: &'a UserSettings,
        zone: &'a dyn LocalZone,
        now: Timestamp,
    ) -> Self {
        Self {
            host,
            settings,
            zone,
            now,
        }
    }

    /// Quét các ứng viên chưa xử lý dưới `root`. Phần tử đã có marker bị lọc bỏ,
    /// nên gọi lặp lại trên cây không đổi là no-op.
    pub fn scan(&self, root: &H::Element) -> ScanReport {
        let mut report = ScanReport::default();
        for element in self.host.unprocessed_candidates(root) {
            report.record(self.process(&element));
        }
        tracing::debug!(
            examined = report.examined,
            annotated = report.annotated,
            "quét timestamp xong"
        );
        report
    }

    /// Đường chỉnh sửa trực tiếp: phân loại lại giá trị hiện tại của một ô nhập.
    pub fn refresh_element(&self, element: &H::Element) -> Transition {
        let current = self.host.display_text(element).as_deref().and_then(classify);
        if let (Some(state), Some(timestamp)) = (self.host.read_state(element), current) {
            if state.raw_timestamp == timestamp {
                return Transition::Unchanged;
            }
        }
        self.process(element)
    }

    /// Định dạng lại mọi phần tử đã chú thích sau khi cấu hình thay đổi.
    pub fn reformat(&self, root: &H::Element) -> ScanReport {
        let mut report = ScanReport::default();
        for element in self.host.processed_elements(root) {
            report.record(self.process(&element));
        }
        report
    }

    /// Gỡ toàn bộ chú thích dưới `root`; trả về số phần tử đã gỡ.
    pub fn clear_all(&self, root: &H::Element) -> usize {
        let elements = self.host.processed_elements(root);
        for element in &elements {
            self.revert(element);
        }
        elements.len()
    }

    fn process(&self, element: &H::Element) -> Transition {
        let text = self.host.display_text(element).unwrap_or_default();
        let text = text.trim();

        match classify(text) {
            Some(timestamp) => self.annotate(element, timestamp),
            None if self.host.read_state(element).is_some() => self.revert(element),
            None => Transition::Skipped,
        }
    }

    fn annotate(&self, element: &H::Element, timestamp: Timestamp) -> Transition {
        if !self.host.is_connected(element) {
            return Transition::Skipped;
        }

        let is_input = self.host.is_input(element);
        let edit_mode = is_input || self.host.in_edit_context(element);
        let state = AnnotationState {
            raw_timestamp: timestamp,
            tooltip_content: tooltip_markup(timestamp, self.settings, self.zone, self.now),
            edit_mode,
        };
        let affordance = Affordance::for_element(edit_mode, self.settings);

        self.host.write_state(element, &state, affordance);
        self.host.set_hover(element, affordance.hover);
        if is_input {
            self.host.ensure_change_listener(element);
        }
        Transition::Annotated(timestamp)
    }

    fn revert(&self, element: &H::Element) -> Transition {
        self.host.clear_state(element);
        self.host.set_hover(element, false);
        Transition::Reverted
    }
}
