//! Raster surface over an RGBA image buffer.
//!
//! Shapes are alpha-blended onto the frame; stroke thickness is rendered
//! as nested one-pixel rings inset from the outer edge. Label text needs a
//! font supplied by the host; without one, text ops are skipped with a
//! debug log instead of failing the frame.

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, Blend};
use imageproc::rect::Rect;

use super::{DrawSurface, TextStyle};
use crate::detection::ScreenRect;
use crate::palette::ShapeStyle;

pub struct RasterSurface {
    canvas: Blend<RgbaImage>,
    font: Option<FontArc>,
}

impl RasterSurface {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            canvas: Blend(image),
            font: None,
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Read a TTF/OTF from disk.
    pub fn load_font(path: &Path) -> Result<FontArc> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        FontArc::try_from_vec(bytes).map_err(|e| anyhow!("invalid font {}: {}", path.display(), e))
    }

    /// Recover the composited frame.
    pub fn into_image(self) -> RgbaImage {
        self.canvas.0
    }

    /// Clip to the image and round to whole pixels.
    ///
    /// Non-finite or sub-pixel shapes are skipped entirely; clipping keeps
    /// the rect arithmetic inside i32 range for any clamped input.
    fn pixel_rect(&self, rect: &ScreenRect) -> Option<Rect> {
        if ![rect.left, rect.top, rect.right, rect.bottom]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }
        let (bounds_w, bounds_h) = self.canvas.0.dimensions();
        let left = rect.left.round().max(0.0).min(bounds_w as f32) as i64;
        let top = rect.top.round().max(0.0).min(bounds_h as f32) as i64;
        let right = rect.right.round().max(0.0).min(bounds_w as f32) as i64;
        let bottom = rect.bottom.round().max(0.0).min(bounds_h as f32) as i64;
        if right - left < 1 || bottom - top < 1 {
            return None;
        }
        Some(Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32))
    }
}

fn shape_rgba(style: &ShapeStyle) -> Rgba<u8> {
    // Saturating float-to-int cast keeps out-of-range opacity products safe.
    let alpha = (style.opacity * 255.0) as u8;
    Rgba([style.color.r, style.color.g, style.color.b, alpha])
}

impl DrawSurface for RasterSurface {
    fn dimensions(&self) -> (f32, f32) {
        let (w, h) = self.canvas.0.dimensions();
        (w as f32, h as f32)
    }

    fn stroke_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()> {
        let Some(outer) = self.pixel_rect(&rect) else {
            return Ok(());
        };
        let color = shape_rgba(style);
        let thickness = (style.stroke_width.round() as i32).max(1);
        for inset in 0..thickness {
            let w = outer.width() as i32 - 2 * inset;
            let h = outer.height() as i32 - 2 * inset;
            if w < 1 || h < 1 {
                break;
            }
            let ring = Rect::at(outer.left() + inset, outer.top() + inset)
                .of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut self.canvas, ring, color);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()> {
        let Some(pixels) = self.pixel_rect(&rect) else {
            return Ok(());
        };
        draw_filled_rect_mut(&mut self.canvas, pixels, shape_rgba(style));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        let Some(font) = &self.font else {
            log::debug!("no font configured, skipping label {:?}", text);
            return Ok(());
        };
        if !x.is_finite() || !y.is_finite() {
            return Ok(());
        }
        let color = Rgba([style.color.r, style.color.g, style.color.b, 255]);
        draw_text_mut(
            &mut self.canvas,
            color,
            x.round() as i32,
            y.round() as i32,
            PxScale::from(style.size),
            font,
            text,
        );
        Ok(())
    }
}
