//! Detection HUD
//!
//! This crate renders object-detection results as an overlay atop a live
//! camera/video frame, scaled from a fixed-size model input space into the
//! coordinate space of an arbitrarily sized display surface.
//!
//! # Contract
//!
//! The renderer enforces five rules by construction:
//!
//! 1. **Letterboxed mapping**: model-space boxes are scaled uniformly into
//!    the drawable region below the reserved header; aspect ratio is
//!    preserved, never stretched.
//! 2. **Clamp, never crash**: degenerate input (inverted boxes, zero or
//!    negative surface sizes) produces degenerate-but-valid rectangles; no
//!    draw pass panics or returns an error for any finite geometry.
//! 3. **Snapshot draws**: a draw pass iterates an immutable snapshot of the
//!    detection list; a concurrent `set_detections` swaps the snapshot
//!    pointer and can never interleave shapes from two frames.
//! 4. **Hooks first**: caller-supplied pre-draw hooks run in registration
//!    order before any detection is drawn, on every pass.
//! 5. **Per-detection isolation**: a failure while drawing one detection is
//!    logged and never aborts the remaining detections of the same frame.
//!
//! # Module Structure
//!
//! - `mapper`: model-space to screen-space coordinate transform
//! - `renderer`: per-frame draw contract (`OverlayRenderer`)
//! - `detection`: detection data model
//! - `palette`: class color table and per-detection style derivation
//! - `surface`: drawing-surface seam (`DrawSurface`) plus raster and
//!   recording implementations
//! - `config`: explicit geometry configuration, no ambient globals

pub mod config;
pub mod detection;
pub mod mapper;
pub mod palette;
pub mod renderer;
pub mod surface;

pub use config::{HudConfig, OverlayConfig};
pub use detection::{Detection, ModelRect, ScreenRect};
pub use mapper::{letterbox, map_box, map_title_box, Letterbox};
pub use palette::{Color, MissingClassPolicy, Palette, ShapeStyle};
pub use renderer::{OverlayRenderer, PreDrawHook};
pub use surface::raster::RasterSurface;
pub use surface::{DrawOp, DrawSurface, RecordingSurface, TextStyle};
