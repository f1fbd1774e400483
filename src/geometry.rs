//! Pixel geometry value types

use serde::{Deserialize, Serialize};

/// Pixel bounds of a webview within its window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from position and size
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Which edges of an attached webview track the window size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoResize {
    pub width: bool,
    pub height: bool,
    pub horizontal: bool,
    pub vertical: bool,
}

impl AutoResize {
    /// Track both dimensions of the window
    pub fn both() -> Self {
        Self {
            width: true,
            height: true,
            ..Default::default()
        }
    }
}
