//! hud_demo - synthetic end-to-end overlay render
//!
//! Generates seeded random detections, renders them over a blank frame
//! (header band drawn by a pre-draw hook) and writes the result as PNG.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use detection_hud::{
    Color, Detection, DrawSurface, HudConfig, ModelRect, OverlayRenderer, RasterSurface,
    ScreenRect, ShapeStyle,
};

const FRAME_COLOR: Rgba<u8> = Rgba([40, 44, 52, 255]);
const HEADER_COLOR: Color = Color::rgb(24, 24, 32);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Surface height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Number of synthetic detections.
    #[arg(long, default_value_t = 4)]
    count: usize,
    /// Output PNG path.
    #[arg(long, default_value = "hud_demo.png")]
    out: PathBuf,
    /// Optional deterministic seed for the synthetic detections.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = HudConfig::load()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let detections = synthetic_detections(&mut rng, &cfg, args.count)?;

    let renderer = OverlayRenderer::new(cfg.overlay.clone(), cfg.palette()?);
    let header_height = cfg.overlay.header_height;
    renderer.register_pre_draw_hook(move |surface| {
        let (w, _) = surface.dimensions();
        let band = ScreenRect::new(0.0, 0.0, w, header_height);
        let style = ShapeStyle {
            color: HEADER_COLOR,
            stroke_width: 0.0,
            opacity: 0.9,
        };
        if let Err(e) = surface.fill_rect(band, &style) {
            log::warn!("header band not drawn: {:#}", e);
        }
    });
    renderer.set_detections(detections);

    let mut surface = RasterSurface::new(RgbaImage::from_pixel(args.width, args.height, FRAME_COLOR));
    if let Some(path) = &cfg.font_path {
        surface = surface.with_font(RasterSurface::load_font(path)?);
    } else {
        log::info!("no font_path configured, labels render as plates only");
    }

    if renderer.take_redraw_request() {
        renderer.draw(&mut surface);
    }

    let frame = surface.into_image();
    frame
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    log::info!(
        "wrote {}x{} overlay ({} detections) to {}",
        args.width,
        args.height,
        args.count,
        args.out.display()
    );
    Ok(())
}

fn synthetic_detections(rng: &mut StdRng, cfg: &HudConfig, count: usize) -> Result<Vec<Detection>> {
    if cfg.labels.is_empty() {
        return Err(anyhow!("label set must not be empty"));
    }
    let input = cfg.overlay.model_input_size;
    let mut detections = Vec::with_capacity(count);
    for _ in 0..count {
        let class_id = rng.gen_range(0..cfg.labels.len());
        let confidence = rng.gen_range(0.35..1.0);
        let left = rng.gen_range(0.0..input * 0.7);
        let top = rng.gen_range(0.0..input * 0.7);
        let width = rng.gen_range(input * 0.1..input * 0.3);
        let height = rng.gen_range(input * 0.1..input * 0.3);
        detections.push(Detection::new(
            class_id,
            cfg.labels[class_id].clone(),
            confidence,
            ModelRect::new(left, top, left + width, top + height),
        ));
    }
    Ok(detections)
}
