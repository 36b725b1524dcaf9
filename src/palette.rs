//! Class color table and per-detection style derivation.
//!
//! The table is supplied at construction and read-only afterwards. Length
//! is validated against the model's class count up front, so an
//! out-of-range class id during a draw pass is a data error, not a
//! misconfiguration; what happens then is the caller's choice via
//! `MissingClassPolicy`.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;

/// sRGB color. Opacity is carried separately in `ShapeStyle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Fallback shape color.
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    /// Neutral title text color.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse "#rrggbb" (leading '#' optional), as used in config files.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow!("invalid hex color '{}', expected #rrggbb", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| anyhow!("invalid hex color '{}'", s))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// What to do when a draw pass asks for a class id the table does not
/// cover.
///
/// `Fallback` logs a warning and substitutes the default color so the
/// frame always completes; `Panic` fails loudly and is meant for
/// non-production builds. The caller decides at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingClassPolicy {
    #[default]
    Fallback,
    Panic,
}

/// Per-shape paint parameters, recomputed on every draw pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub color: Color,
    pub stroke_width: f32,
    /// `0..=1`; surfaces convert to their own alpha representation.
    pub opacity: f32,
}

/// Class id to display color table.
#[derive(Debug)]
pub struct Palette {
    colors: Vec<Color>,
    missing: MissingClassPolicy,
}

impl Palette {
    /// Build from an explicit color list.
    ///
    /// Fails when the table is shorter than the class count; this is
    /// checked at construction, never discovered at first draw.
    pub fn new(colors: Vec<Color>, class_count: usize) -> Result<Self> {
        if colors.len() < class_count {
            return Err(anyhow!(
                "color table covers {} classes, model has {}",
                colors.len(),
                class_count
            ));
        }
        Ok(Self {
            colors,
            missing: MissingClassPolicy::default(),
        })
    }

    /// Evenly spaced hue wheel, one color per class.
    pub fn generated(class_count: usize) -> Self {
        let colors = (0..class_count)
            .map(|i| {
                let hue = (i as f32 / class_count.max(1) as f32) * 360.0;
                hsv_to_rgb(hue, 0.8, 0.9)
            })
            .collect();
        Self {
            colors,
            missing: MissingClassPolicy::default(),
        }
    }

    pub fn with_missing_policy(mut self, policy: MissingClassPolicy) -> Self {
        self.missing = policy;
        self
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a class id, following the missing-entry policy.
    pub fn color_for(&self, class_id: usize) -> Color {
        match self.colors.get(class_id) {
            Some(color) => *color,
            None => match self.missing {
                MissingClassPolicy::Panic => panic!(
                    "class id {} has no color entry ({} registered)",
                    class_id,
                    self.colors.len()
                ),
                MissingClassPolicy::Fallback => {
                    log::warn!(
                        "class id {} has no color entry ({} registered), using default",
                        class_id,
                        self.colors.len()
                    );
                    Color::GREEN
                }
            },
        }
    }

    /// Derive the paint for one detection.
    ///
    /// Confidence weights both stroke width and opacity: higher confidence
    /// renders bolder and more opaque.
    pub fn style_for(&self, class_id: usize, confidence: f32, cfg: &OverlayConfig) -> ShapeStyle {
        ShapeStyle {
            color: self.color_for(class_id),
            stroke_width: confidence * cfg.base_stroke_width,
            opacity: confidence * cfg.max_opacity,
        }
    }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Color {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;
    let (r, g, b) = match hue as u32 {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Color {
        r: ((r + m) * 255.0) as u8,
        g: ((g + m) * 255.0) as u8,
        b: ((b + m) * 255.0) as u8,
    }
}
