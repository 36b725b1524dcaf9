use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::palette::{Color, Palette};

const DEFAULT_MODEL_INPUT_SIZE: f32 = 416.0;
const DEFAULT_HEADER_HEIGHT: f32 = 112.0;
const DEFAULT_BASE_STROKE_WIDTH: f32 = 10.0;
const DEFAULT_EDGE_PADDING: f32 = 5.0;
const DEFAULT_LABEL_FONT_SIZE: f32 = 16.0;
const DEFAULT_TITLE_PLATE_HEIGHT: f32 = 40.0;
const DEFAULT_TITLE_CHAR_WIDTH: f32 = 25.0;
const DEFAULT_MAX_OPACITY: f32 = 1.0;

/// Default label set (tiny-YOLO VOC class indexing).
const DEFAULT_LABELS: &[&str] = &[
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Geometry constants for one renderer instance.
///
/// An explicit object handed to `OverlayRenderer::new`; there is no
/// process-wide configuration state. Every field is host-overridable;
/// `Default` carries the reference constants.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Side length of the square model input (e.g. 416 for tiny-YOLO).
    pub model_input_size: f32,
    /// Vertical pixels reserved at the top of the surface for a host
    /// header/status region; detections draw below it.
    pub header_height: f32,
    /// Stroke width at confidence 1.0; scaled down by confidence per shape.
    pub base_stroke_width: f32,
    /// Inset keeping mapped shapes away from the surface edges.
    pub edge_padding: f32,
    /// Title text size in pixels.
    pub label_font_size: f32,
    /// Vertical extent of the title plate above a box, before stroke slack.
    pub title_plate_height: f32,
    /// Monospace-width approximation used to size title plates.
    pub title_char_width: f32,
    /// Opacity ceiling; per-shape opacity is `confidence * max_opacity`.
    pub max_opacity: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            model_input_size: DEFAULT_MODEL_INPUT_SIZE,
            header_height: DEFAULT_HEADER_HEIGHT,
            base_stroke_width: DEFAULT_BASE_STROKE_WIDTH,
            edge_padding: DEFAULT_EDGE_PADDING,
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
            title_plate_height: DEFAULT_TITLE_PLATE_HEIGHT,
            title_char_width: DEFAULT_TITLE_CHAR_WIDTH,
            max_opacity: DEFAULT_MAX_OPACITY,
        }
    }
}

impl OverlayConfig {
    /// Reject geometry that cannot produce a meaningful transform.
    ///
    /// Surface sizes are not validated here: they are read per draw pass
    /// and degenerate surfaces are clamped, not rejected.
    pub fn validate(&self) -> Result<()> {
        if !(self.model_input_size > 0.0) {
            return Err(anyhow!("model_input_size must be > 0"));
        }
        if self.header_height < 0.0 {
            return Err(anyhow!("header_height must be >= 0"));
        }
        if self.base_stroke_width < 0.0 {
            return Err(anyhow!("base_stroke_width must be >= 0"));
        }
        if self.edge_padding < 0.0 {
            return Err(anyhow!("edge_padding must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.max_opacity) {
            return Err(anyhow!("max_opacity must be within 0..=1"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
struct HudConfigFile {
    overlay: Option<OverlayConfigFile>,
    labels: Option<Vec<String>>,
    /// Hex colors ("#rrggbb"), one per class id.
    colors: Option<Vec<String>>,
    font_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    model_input_size: Option<f32>,
    header_height: Option<f32>,
    base_stroke_width: Option<f32>,
    edge_padding: Option<f32>,
    label_font_size: Option<f32>,
    title_plate_height: Option<f32>,
    title_char_width: Option<f32>,
    max_opacity: Option<f32>,
}

/// Binary-level configuration: geometry plus the class attribute table.
#[derive(Clone, Debug)]
pub struct HudConfig {
    pub overlay: OverlayConfig,
    pub labels: Vec<String>,
    /// Explicit per-class colors; `None` selects a generated wheel.
    pub colors: Option<Vec<Color>>,
    /// Optional TTF/OTF for raster label text.
    pub font_path: Option<PathBuf>,
}

impl HudConfig {
    /// Load from the `HUD_CONFIG` JSON file (when set), then apply `HUD_*`
    /// env overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("HUD_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: HudConfigFile) -> Result<Self> {
        let defaults = OverlayConfig::default();
        let overlay_file = file.overlay.unwrap_or_default();
        let overlay = OverlayConfig {
            model_input_size: overlay_file
                .model_input_size
                .unwrap_or(defaults.model_input_size),
            header_height: overlay_file.header_height.unwrap_or(defaults.header_height),
            base_stroke_width: overlay_file
                .base_stroke_width
                .unwrap_or(defaults.base_stroke_width),
            edge_padding: overlay_file.edge_padding.unwrap_or(defaults.edge_padding),
            label_font_size: overlay_file
                .label_font_size
                .unwrap_or(defaults.label_font_size),
            title_plate_height: overlay_file
                .title_plate_height
                .unwrap_or(defaults.title_plate_height),
            title_char_width: overlay_file
                .title_char_width
                .unwrap_or(defaults.title_char_width),
            max_opacity: overlay_file.max_opacity.unwrap_or(defaults.max_opacity),
        };
        let labels = file
            .labels
            .unwrap_or_else(|| DEFAULT_LABELS.iter().map(|s| s.to_string()).collect());
        let colors = match file.colors {
            Some(raw) => Some(
                raw.iter()
                    .map(|s| Color::from_hex(s))
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };
        Ok(Self {
            overlay,
            labels,
            colors,
            font_path: file.font_path,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(size) = std::env::var("HUD_MODEL_INPUT_SIZE") {
            self.overlay.model_input_size = size
                .parse()
                .map_err(|_| anyhow!("HUD_MODEL_INPUT_SIZE must be a number of pixels"))?;
        }
        if let Ok(height) = std::env::var("HUD_HEADER_HEIGHT") {
            self.overlay.header_height = height
                .parse()
                .map_err(|_| anyhow!("HUD_HEADER_HEIGHT must be a number of pixels"))?;
        }
        if let Ok(labels) = std::env::var("HUD_LABELS") {
            let parsed = split_csv(&labels);
            if !parsed.is_empty() {
                self.labels = parsed;
            }
        }
        if let Ok(path) = std::env::var("HUD_FONT_PATH") {
            if !path.trim().is_empty() {
                self.font_path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        self.overlay.validate()?;
        if self.labels.is_empty() {
            return Err(anyhow!("label set must not be empty"));
        }
        // Short color tables fail here, at load time, not at first draw.
        if let Some(colors) = &self.colors {
            if colors.len() < self.labels.len() {
                return Err(anyhow!(
                    "color table covers {} classes, label set has {}",
                    colors.len(),
                    self.labels.len()
                ));
            }
        }
        Ok(())
    }

    /// Build the class color table described by this config.
    pub fn palette(&self) -> Result<Palette> {
        match &self.colors {
            Some(colors) => Palette::new(colors.clone(), self.labels.len()),
            None => Ok(Palette::generated(self.labels.len())),
        }
    }
}

fn read_config_file(path: &Path) -> Result<HudConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_reference_constants() {
        let cfg = OverlayConfig::default();
        assert_eq!(cfg.model_input_size, 416.0);
        assert_eq!(cfg.header_height, 112.0);
        assert_eq!(cfg.base_stroke_width, 10.0);
        assert_eq!(cfg.edge_padding, 5.0);
        assert_eq!(cfg.label_font_size, 16.0);
        assert_eq!(cfg.title_plate_height, 40.0);
        assert_eq!(cfg.title_char_width, 25.0);
        assert_eq!(cfg.max_opacity, 1.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_model_input() {
        let cfg = OverlayConfig {
            model_input_size: 0.0,
            ..OverlayConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = OverlayConfig {
            model_input_size: -416.0,
            ..OverlayConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_opacity() {
        let cfg = OverlayConfig {
            max_opacity: 1.5,
            ..OverlayConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
