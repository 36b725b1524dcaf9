//! Detection data model.
//!
//! Detections are produced externally, once per inference frame. The
//! renderer never owns them long-term: it holds a read-only snapshot for
//! the duration of one draw pass and discards the previous snapshot when a
//! new list arrives (no diffing, no retained history).

use serde::{Deserialize, Serialize};

/// One recognized object instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Detection {
    /// Class index into the model's label set and the palette.
    pub class_id: usize,
    /// Human-readable class label.
    pub label: String,
    /// Detection confidence in `0..=1`.
    pub confidence: f32,
    /// Bounding box in model input coordinates.
    pub rect: ModelRect,
}

impl Detection {
    pub fn new(class_id: usize, label: impl Into<String>, confidence: f32, rect: ModelRect) -> Self {
        Self {
            class_id,
            label: label.into(),
            confidence,
            rect,
        }
    }
}

/// Axis-aligned box in the fixed model input resolution (e.g. 416x416).
///
/// `left <= right` and `top <= bottom` are expected but not enforced here.
/// Violating rects map to degenerate screen rects; they never crash a draw
/// pass (see `mapper`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ModelRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Axis-aligned box in surface pixel coordinates.
///
/// Derived from a `ModelRect` per draw pass; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}
