//! Đặt vị trí tooltip nổi sao cho nằm trong viewport.

use serde::{Deserialize, Serialize};

use crate::EngineConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Horizontal {
    /// Bắt đầu từ mép trái của phần tử neo và trải sang phải.
    Right,
    /// Kết thúc cách mép trái phần tử neo một khoảng.
    Left,
    /// Không bên nào đủ chỗ: trải hết viewport, chừa lề hai bên.
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Below,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

/// Chọn vị trí cho tooltip kích thước `size` (đo lúc còn ẩn) cạnh `anchor`
/// để nằm gọn trong `viewport`.
pub fn place_tooltip(
    anchor: Rect,
    size: (f64, f64),
    viewport: Viewport,
    config: &EngineConfig,
) -> Placement {
    let (width, height) = size;
    let gap_x = config.horizontal_gap;
    let gap_y = config.vertical_gap;

    let (horizontal, left, width) = if anchor.left + width + gap_x <= viewport.width {
        (Horizontal::Right, anchor.left, config.tooltip_width)
    } else if anchor.left - width - gap_x > 0.0 {
        (Horizontal::Left, anchor.left - width - gap_x, config.tooltip_width)
    } else {
        (
            Horizontal::Banner,
            gap_x,
            (viewport.width - gap_x * 2.0).max(0.0),
        )
    };

    let (vertical, top) = if anchor.bottom() + height + gap_y > viewport.height {
        (Vertical::Above, anchor.top - height - gap_y)
    } else {
        (Vertical::Below, anchor.bottom() + gap_y)
    };

    Placement {
        horizontal,
        vertical,
        left,
        top,
        width,
    }
}
