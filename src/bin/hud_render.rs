//! hud_render - draw a detections file over an input image
//!
//! Takes a frame image plus a JSON list of model-space detections and
//! writes the overlaid result. Detection JSON shape:
//!
//! ```json
//! [{"class_id": 14, "label": "person", "confidence": 0.87,
//!   "rect": {"left": 100.0, "top": 50.0, "right": 300.0, "bottom": 250.0}}]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use detection_hud::{Detection, HudConfig, OverlayRenderer, RasterSurface};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input frame image (any format the image crate decodes).
    image: PathBuf,
    /// Detections JSON file.
    detections: PathBuf,
    /// Output image path.
    #[arg(long, default_value = "hud_out.png")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = HudConfig::load()?;

    let raw = fs::read_to_string(&args.detections)
        .with_context(|| format!("failed to read {}", args.detections.display()))?;
    let detections: Vec<Detection> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid detections file {}", args.detections.display()))?;

    let frame = image::open(&args.image)
        .with_context(|| format!("failed to open {}", args.image.display()))?
        .into_rgba8();

    let renderer = OverlayRenderer::new(cfg.overlay.clone(), cfg.palette()?);
    let count = detections.len();
    renderer.set_detections(detections);

    let mut surface = RasterSurface::new(frame);
    if let Some(path) = &cfg.font_path {
        surface = surface.with_font(RasterSurface::load_font(path)?);
    }
    renderer.draw(&mut surface);

    surface
        .into_image()
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    log::info!("overlaid {} detections onto {}", count, args.out.display());
    Ok(())
}
