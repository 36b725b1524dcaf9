//! Drawing surface seam.
//!
//! The renderer draws through `DrawSurface` and owns none of the pixels.
//! Implementations are responsible for clipping and blending: callers may
//! pass shapes that extend past the surface and an implementation must
//! clip rather than fail. Op errors are reported per call; the renderer
//! isolates them per detection.

use anyhow::Result;

use crate::detection::ScreenRect;
use crate::palette::{Color, ShapeStyle};

pub mod raster;

/// Fixed text paint for title labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
}

/// Drawing surface abstraction.
pub trait DrawSurface {
    /// Current surface size in pixels.
    ///
    /// Read fresh on every draw pass; the surface can resize between
    /// frames and implementations must not report stale dimensions.
    fn dimensions(&self) -> (f32, f32);

    /// Outline a rectangle.
    fn stroke_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()>;

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()>;

    /// Draw text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()>;
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    StrokeRect { rect: ScreenRect, style: ShapeStyle },
    FillRect { rect: ScreenRect, style: ShapeStyle },
    Text { text: String, x: f32, y: f32, style: TextStyle },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// For tests and headless hosts that only need the draw stream.
pub struct RecordingSurface {
    width: f32,
    height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Drop recorded ops, keeping the dimensions.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Simulate a host resize between frames.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

impl DrawSurface for RecordingSurface {
    fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn stroke_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()> {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            style: *style,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()> {
        self.ops.push(DrawOp::FillRect {
            rect,
            style: *style,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
        Ok(())
    }
}
