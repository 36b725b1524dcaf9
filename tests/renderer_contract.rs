//! Per-frame draw contract, exercised through the recording surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Result};

use detection_hud::{
    Detection, DrawOp, DrawSurface, ModelRect, OverlayConfig, OverlayRenderer, Palette,
    RecordingSurface, ScreenRect, ShapeStyle, TextStyle,
};

fn renderer() -> OverlayRenderer {
    OverlayRenderer::new(OverlayConfig::default(), Palette::generated(20))
}

fn detection(class_id: usize, label: &str, confidence: f32) -> Detection {
    Detection::new(
        class_id,
        label,
        confidence,
        ModelRect::new(50.0, 50.0, 200.0, 200.0),
    )
}

fn frame_labels(ops: &[DrawOp]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn idle_draw_runs_hooks_in_order_and_nothing_else() {
    let renderer = renderer();
    for index in 0..3 {
        renderer.register_pre_draw_hook(move |surface| {
            let marker = format!("hook{}", index);
            let style = TextStyle {
                color: detection_hud::Color::BLACK,
                size: 16.0,
            };
            let _ = surface.draw_text(&marker, 0.0, 0.0, &style);
        });
    }

    let mut surface = RecordingSurface::new(800.0, 600.0);
    renderer.draw(&mut surface);

    // No set_detections yet: hooks only, in registration order.
    assert_eq!(frame_labels(&surface.ops), vec!["hook0", "hook1", "hook2"]);
    assert_eq!(surface.ops.len(), 3);
}

#[test]
fn hooks_precede_detections_every_frame() {
    let renderer = renderer();
    renderer.register_pre_draw_hook(|surface| {
        let style = ShapeStyle {
            color: detection_hud::Color::rgb(24, 24, 32),
            stroke_width: 0.0,
            opacity: 1.0,
        };
        let _ = surface.fill_rect(ScreenRect::new(0.0, 0.0, 800.0, 112.0), &style);
    });
    renderer.set_detections(vec![detection(14, "person", 0.9)]);

    let mut surface = RecordingSurface::new(800.0, 600.0);
    for _ in 0..2 {
        surface.clear();
        renderer.draw(&mut surface);
        assert!(matches!(surface.ops[0], DrawOp::FillRect { .. }));
        assert!(matches!(surface.ops[1], DrawOp::StrokeRect { .. }));
        assert_eq!(surface.ops.len(), 4);
    }
}

#[test]
fn detections_render_in_caller_order() {
    let renderer = renderer();
    renderer.set_detections(vec![
        detection(6, "car", 0.9),
        detection(14, "person", 0.4),
        detection(6, "car", 0.7),
    ]);

    let mut surface = RecordingSurface::new(800.0, 600.0);
    renderer.draw(&mut surface);

    assert_eq!(
        frame_labels(&surface.ops),
        vec!["car:90.00", "person:40.00", "car:70.00"]
    );
}

#[test]
fn later_list_fully_replaces_earlier_one() {
    let renderer = renderer();
    renderer.set_detections(vec![detection(6, "car", 0.9); 3]);
    renderer.set_detections(vec![detection(14, "person", 0.5)]);

    let mut surface = RecordingSurface::new(800.0, 600.0);
    renderer.draw(&mut surface);
    assert_eq!(frame_labels(&surface.ops), vec!["person:50.00"]);
}

/// Surface whose Nth stroke call fails; fill/text keep recording so
/// per-detection isolation is observable.
struct FlakySurface {
    inner: RecordingSurface,
    failing_stroke: usize,
}

impl DrawSurface for FlakySurface {
    fn dimensions(&self) -> (f32, f32) {
        self.inner.dimensions()
    }

    fn stroke_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()> {
        if self.failing_stroke == 0 {
            self.failing_stroke = usize::MAX;
            return Err(anyhow!("stroke rejected"));
        }
        self.failing_stroke -= 1;
        self.inner.stroke_rect(rect, style)
    }

    fn fill_rect(&mut self, rect: ScreenRect, style: &ShapeStyle) -> Result<()> {
        self.inner.fill_rect(rect, style)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        self.inner.draw_text(text, x, y, style)
    }
}

#[test]
fn one_failing_detection_does_not_abort_the_frame() {
    let renderer = renderer();
    renderer.set_detections(vec![
        detection(6, "car", 0.9),
        detection(14, "person", 0.4),
        detection(7, "cat", 0.7),
    ]);

    // Second detection's stroke fails; first and third render completely.
    let mut surface = FlakySurface {
        inner: RecordingSurface::new(800.0, 600.0),
        failing_stroke: 1,
    };
    renderer.draw(&mut surface);

    assert_eq!(
        frame_labels(&surface.inner.ops),
        vec!["car:90.00", "cat:70.00"]
    );
}

#[test]
fn frames_never_mix_two_detection_lists() {
    let alpha: Vec<Detection> = (0..64).map(|_| detection(6, "alpha", 0.9)).collect();
    let beta: Vec<Detection> = (0..64).map(|_| detection(14, "beta", 0.4)).collect();

    let renderer = Arc::new(renderer());
    renderer.set_detections(alpha.clone());

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let renderer = Arc::clone(&renderer);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut flip = false;
            while !stop.load(Ordering::Acquire) {
                renderer.set_detections(if flip { alpha.clone() } else { beta.clone() });
                flip = !flip;
            }
        })
    };

    let mut surface = RecordingSurface::new(800.0, 600.0);
    for _ in 0..100 {
        surface.clear();
        renderer.draw(&mut surface);
        let labels = frame_labels(&surface.ops);
        assert_eq!(labels.len(), 64);
        let first = labels[0].clone();
        assert!(
            labels.iter().all(|label| *label == first),
            "frame mixed two lists: {:?}",
            labels
        );
    }

    stop.store(true, Ordering::Release);
    writer.join().expect("writer thread");
}
