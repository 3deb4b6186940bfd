// this_file: src/geometry.rs

//! Crop and overlay geometry.
//!
//! Both resolvers work in floating-point pixel space and are independent of
//! any image data: they only need dimensions and the per-photo descriptors.
//! The renderer snaps the returned rectangles to whole pixels.

use crate::batch::{CropDescriptor, PlacementDescriptor};

/// Smallest crop size accepted, in percent. Zero would collapse the window.
pub const MIN_CROP_SIZE: f64 = 0.01;

/// Axis-aligned rectangle in pixel units (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.w / self.h
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// True when the rectangle lies inside `[0,width]×[0,height]`.
    pub fn is_within(&self, width: f64, height: f64) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= width + EPS
            && self.bottom() <= height + EPS
    }
}

/// Resolve the source rectangle to sample for a cover-filled canvas.
///
/// The window takes the canvas aspect ratio; `crop_size` scales it relative to
/// the limiting source dimension, and `crop_x`/`crop_y` slide it through the
/// remaining slack (0 = top/left edge, 100 = bottom/right edge).
pub fn resolve_crop(
    source_w: u32,
    source_h: u32,
    canvas_aspect: f64,
    crop: &CropDescriptor,
) -> Rect {
    let crop = crop.clamped();
    let source_w = source_w as f64;
    let source_h = source_h as f64;
    let img_aspect = source_w / source_h;
    let fraction = crop.crop_size / 100.0;

    let (crop_w, crop_h) = if img_aspect > canvas_aspect {
        let h = fraction * source_h;
        (h * canvas_aspect, h)
    } else {
        let w = fraction * source_w;
        (w, w / canvas_aspect)
    };
    let crop_w = crop_w.min(source_w);
    let crop_h = crop_h.min(source_h);

    let max_offset_x = source_w - crop_w;
    let max_offset_y = source_h - crop_h;

    Rect::new(
        crop.crop_x / 100.0 * max_offset_x,
        crop.crop_y / 100.0 * max_offset_y,
        crop_w,
        crop_h,
    )
}

/// Resolve where the frame overlay lands on the canvas.
///
/// The frame is fitted inside the canvas on its limiting axis, scaled
/// uniformly by `frame_scale`, centred, then shifted by `frame_x`/`frame_y`
/// percent of the canvas size. The result may extend past the canvas.
pub fn resolve_placement(
    frame_w: u32,
    frame_h: u32,
    canvas_w: u32,
    canvas_h: u32,
    placement: &PlacementDescriptor,
) -> Rect {
    let placement = placement.clamped();
    let canvas_w = canvas_w as f64;
    let canvas_h = canvas_h as f64;
    let frame_aspect = frame_w as f64 / frame_h as f64;
    let canvas_aspect = canvas_w / canvas_h;

    let (base_w, base_h) = if frame_aspect > canvas_aspect {
        (canvas_w, canvas_w / frame_aspect)
    } else {
        (canvas_h * frame_aspect, canvas_h)
    };

    let dst_w = base_w * placement.frame_scale;
    let dst_h = base_h * placement.frame_scale;

    Rect::new(
        (canvas_w - dst_w) / 2.0 + placement.frame_x / 100.0 * canvas_w,
        (canvas_h - dst_h) / 2.0 + placement.frame_y / 100.0 * canvas_h,
        dst_w,
        dst_h,
    )
}
