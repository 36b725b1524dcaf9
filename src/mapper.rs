//! Model-space to screen-space coordinate mapping.
//!
//! The model runs at a fixed square resolution; the display surface is an
//! arbitrary size that can change between frames. `letterbox` computes the
//! uniform contain-fit transform into the drawable region below the
//! reserved header, and `map_box` applies it with a clamp-and-continue
//! policy: every finite input rect, including inverted or far-out-of-range
//! ones, maps to a rectangle inside the padded drawable region. Degenerate
//! surfaces yield degenerate rectangles, never a panic.

use crate::config::OverlayConfig;
use crate::detection::{ModelRect, ScreenRect};

/// Uniform letterbox transform for one draw pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Contain-fit transform from model input space into the drawable region.
///
/// Surface dimensions must be read fresh each pass; nothing here is cached.
pub fn letterbox(surface_w: f32, surface_h: f32, cfg: &OverlayConfig) -> Letterbox {
    let drawable_h = surface_h - cfg.header_height;
    let scale = (surface_w / cfg.model_input_size).min(drawable_h / cfg.model_input_size);
    let offset_x = (surface_w - cfg.model_input_size * scale) / 2.0;
    let offset_y = (drawable_h - cfg.model_input_size * scale) / 2.0 + cfg.header_height;
    Letterbox {
        scale,
        offset_x,
        offset_y,
    }
}

/// Map a model-space box into surface pixels.
///
/// Horizontal edges clamp into `[padding, surface_w - padding]`, vertical
/// edges into `[offset_y + padding, surface_h - padding]`.
pub fn map_box(rect: &ModelRect, surface_w: f32, surface_h: f32, cfg: &OverlayConfig) -> ScreenRect {
    let lb = letterbox(surface_w, surface_h, cfg);
    let pad = cfg.edge_padding;
    // max/min chains, not f32::clamp: a degenerate surface inverts the
    // bounds and clamp panics on lo > hi.
    let clamp_x = |v: f32| v.max(pad).min(surface_w - pad);
    let clamp_y = |v: f32| v.max(lb.offset_y + pad).min(surface_h - pad);
    ScreenRect {
        left: clamp_x(rect.left * lb.scale + lb.offset_x),
        top: clamp_y(rect.top * lb.scale + lb.offset_y),
        right: clamp_x(rect.right * lb.scale + lb.offset_x),
        bottom: clamp_y(rect.bottom * lb.scale + lb.offset_y),
    }
}

/// Place the title plate directly above a mapped box.
///
/// Plate width is `chars * title_char_width`, a monospace approximation
/// rather than measured text. Proportional fonts render narrower than the
/// plate; the plate geometry stays computable without a font.
pub fn map_title_box(screen: &ScreenRect, title: &str, cfg: &OverlayConfig) -> ScreenRect {
    let rise = cfg.title_plate_height + 2.0 * cfg.base_stroke_width;
    ScreenRect {
        left: screen.left,
        top: screen.top - rise,
        right: screen.left + title.chars().count() as f32 * cfg.title_char_width,
        bottom: screen.top,
    }
}
