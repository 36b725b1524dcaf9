//! Per-frame overlay rendering.
//!
//! `OverlayRenderer` owns the geometry config and the color table, holds
//! the latest detection snapshot, and turns it into draw calls against a
//! caller-supplied surface once per display refresh.
//!
//! Two states exist: idle (no list ever supplied; a draw pass runs the
//! pre-draw hooks and stops) and has-results (hooks plus detections). An
//! empty list is a valid has-results state that draws zero shapes; there
//! is no reverse transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::config::OverlayConfig;
use crate::detection::Detection;
use crate::mapper;
use crate::palette::{Color, Palette};
use crate::surface::{DrawSurface, TextStyle};

/// Caller-supplied callback invoked with the surface before any detection
/// is drawn.
pub type PreDrawHook = Box<dyn Fn(&mut dyn DrawSurface) + Send + Sync>;

pub struct OverlayRenderer {
    config: OverlayConfig,
    palette: Palette,
    /// Append-only, invoked in registration order. No removal API.
    hooks: Mutex<Vec<PreDrawHook>>,
    /// `None` until the first `set_detections`; afterwards the latest
    /// immutable snapshot. Draw passes clone the `Arc` out and iterate
    /// their own copy, so a concurrent swap never touches a list that is
    /// being iterated.
    results: Mutex<Option<Arc<Vec<Detection>>>>,
    needs_redraw: AtomicBool,
}

impl OverlayRenderer {
    /// Explicit construction; configuration and colors are owned by the
    /// instance, never ambient.
    pub fn new(config: OverlayConfig, palette: Palette) -> Self {
        Self {
            config,
            palette,
            hooks: Mutex::new(Vec::new()),
            results: Mutex::new(None),
            needs_redraw: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Replace the current detection list and raise the redraw request.
    ///
    /// Never fails; an empty list is valid and means "draw nothing". The
    /// lock scope covers only the pointer swap.
    pub fn set_detections(&self, detections: Vec<Detection>) {
        let snapshot = Arc::new(detections);
        *lock_unpoisoned(&self.results) = Some(snapshot);
        self.needs_redraw.store(true, Ordering::Release);
    }

    /// Append a pre-draw hook. Hooks run in registration order on every
    /// draw pass, before detections.
    pub fn register_pre_draw_hook<F>(&self, hook: F)
    where
        F: Fn(&mut dyn DrawSurface) + Send + Sync + 'static,
    {
        lock_unpoisoned(&self.hooks).push(Box::new(hook));
    }

    /// True once per accepted detection list; the host polls this to
    /// decide whether a repaint is due.
    pub fn take_redraw_request(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::AcqRel)
    }

    /// Render one frame.
    ///
    /// Infallible by contract: a surface failure while drawing one
    /// detection is logged and the remaining detections still render;
    /// zero-sized surfaces produce degenerate, clipped shapes.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        {
            let hooks = lock_unpoisoned(&self.hooks);
            for hook in hooks.iter() {
                hook(surface);
            }
        }

        let Some(results) = self.snapshot() else {
            return;
        };

        // Read once per pass; the surface can resize between frames.
        let (surface_w, surface_h) = surface.dimensions();
        for detection in results.iter() {
            if let Err(e) = self.draw_detection(detection, surface, surface_w, surface_h) {
                log::warn!("skipping detection '{}': {:#}", detection.label, e);
            }
        }
    }

    fn snapshot(&self) -> Option<Arc<Vec<Detection>>> {
        lock_unpoisoned(&self.results).clone()
    }

    fn draw_detection(
        &self,
        detection: &Detection,
        surface: &mut dyn DrawSurface,
        surface_w: f32,
        surface_h: f32,
    ) -> Result<()> {
        let cfg = &self.config;
        let title = format!("{}:{:.2}", detection.label, detection.confidence * 100.0);
        let screen = mapper::map_box(&detection.rect, surface_w, surface_h, cfg);
        let plate = mapper::map_title_box(&screen, &title, cfg);
        let style = self
            .palette
            .style_for(detection.class_id, detection.confidence, cfg);

        surface.stroke_rect(screen, &style)?;
        surface.fill_rect(plate, &style)?;

        let inset = 2.0 * cfg.base_stroke_width;
        surface.draw_text(
            &title,
            plate.left + inset,
            screen.top - inset - cfg.label_font_size,
            &TextStyle {
                color: Color::BLACK,
                size: cfg.label_font_size,
            },
        )?;
        Ok(())
    }
}

/// Lock, recovering from poisoning.
///
/// A hook that panics mid-frame must not wedge every later frame; the
/// protected data (a pointer swap, an append-only vec) stays consistent
/// across any panic point.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
