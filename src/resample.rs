// this_file: src/resample.rs

//! Scaled drawing of one RGBA image onto another.
//!
//! Sampling is separable and streams one destination row at a time. Each row
//! needs a single vertically filtered scratch row of the source, so scaling a
//! photo or frame onto the surface allocates no second canvas-sized buffer.
//! Only destination pixels inside the target bitmap are sampled. Samples are
//! premultiplied and composited source-over.

use crate::config::ResizeFilter;
use crate::geometry::Rect;
use image::{Rgba, RgbaImage};
use std::ops::Range;

/// Source pixels and normalized weights for one destination pixel on one axis.
#[derive(Debug, Clone, PartialEq)]
struct Taps {
    start: u32,
    weights: Vec<f32>,
}

impl Taps {
    fn end(&self) -> u32 {
        self.start + self.weights.len() as u32
    }
}

/// Draw `src_rect` of `src` into `dst_rect` of `dst`.
///
/// `dst_rect` is snapped to whole pixels, at least one in each direction,
/// and clipped to `dst`. `src_rect` may be fractional.
pub fn draw_scaled(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    src_rect: Rect,
    dst_rect: Rect,
    filter: ResizeFilter,
) {
    if src.width() == 0 || src.height() == 0 {
        return;
    }

    let (dx, dw) = snap(dst_rect.x, dst_rect.right());
    let (dy, dh) = snap(dst_rect.y, dst_rect.bottom());
    let cols = visible(dx, dw, dst.width());
    let rows = visible(dy, dh, dst.height());
    if cols.is_empty() || rows.is_empty() {
        return;
    }

    let column_taps: Vec<Taps> = cols
        .clone()
        .map(|x| {
            taps(
                filter,
                src.width(),
                src_rect.x,
                src_rect.w,
                dw,
                (x - dx) as u32,
            )
        })
        .collect();
    let src_x0 = column_taps.iter().map(|t| t.start).min().unwrap_or(0);
    let src_x1 = column_taps.iter().map(Taps::end).max().unwrap_or(src_x0);
    let mut scratch = vec![[0.0f32; 4]; (src_x1 - src_x0) as usize];

    for y in rows {
        let row_taps = taps(
            filter,
            src.height(),
            src_rect.y,
            src_rect.h,
            dh,
            (y - dy) as u32,
        );

        for (offset, acc) in scratch.iter_mut().enumerate() {
            let sx = src_x0 + offset as u32;
            *acc = [0.0; 4];
            for (k, w) in row_taps.weights.iter().enumerate() {
                let p = src.get_pixel(sx, row_taps.start + k as u32);
                let coverage = *w * f32::from(p[3]) / 255.0;
                acc[0] += f32::from(p[0]) * coverage;
                acc[1] += f32::from(p[1]) * coverage;
                acc[2] += f32::from(p[2]) * coverage;
                acc[3] += f32::from(p[3]) * *w;
            }
        }

        for (x, col) in cols.clone().zip(&column_taps) {
            let base = (col.start - src_x0) as usize;
            let mut px = [0.0f32; 4];
            for (k, w) in col.weights.iter().enumerate() {
                let s = scratch[base + k];
                for (p, v) in px.iter_mut().zip(s) {
                    *p += v * *w;
                }
            }
            blend(dst.get_pixel_mut(x as u32, y as u32), px);
        }
    }
}

/// Composite a premultiplied sample over `dst`.
fn blend(dst: &mut Rgba<u8>, src: [f32; 4]) {
    let alpha = (src[3] / 255.0).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let keep = 1.0 - alpha;
    for c in 0..3 {
        dst[c] = to_u8(src[c] + f32::from(dst[c]) * keep);
    }
    dst[3] = to_u8(255.0 * alpha + f32::from(dst[3]) * keep);
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Round a float span to whole pixels, never shorter than one.
fn snap(start: f64, end: f64) -> (i64, u32) {
    let s = start.round() as i64;
    let e = (end.round() as i64).max(s + 1);
    (s, (e - s) as u32)
}

fn visible(start: i64, len: u32, limit: u32) -> Range<i64> {
    start.max(0)..(start + i64::from(len)).min(i64::from(limit))
}

/// Taps for destination pixel `index` of `dst_len` covering
/// `origin..origin + span` of a source axis `src_len` pixels long.
fn taps(
    filter: ResizeFilter,
    src_len: u32,
    origin: f64,
    span: f64,
    dst_len: u32,
    index: u32,
) -> Taps {
    let ratio = span / f64::from(dst_len);
    let center = origin + (f64::from(index) + 0.5) * ratio;
    let last = i64::from(src_len) - 1;

    let scale = ratio.max(1.0);
    let reach = filter.support() * scale;
    let left = ((center - reach).floor() as i64).clamp(0, last);
    let right = ((center + reach).ceil() as i64).clamp(left + 1, i64::from(src_len));

    let mut weights: Vec<f32> = (left..right)
        .map(|s| filter.weight((s as f64 + 0.5 - center) / scale) as f32)
        .collect();
    let sum: f32 = weights.iter().sum();
    if sum.abs() <= f32::EPSILON {
        let nearest = (center.floor() as i64).clamp(0, last) as u32;
        return Taps {
            start: nearest,
            weights: vec![1.0],
        };
    }
    weights.iter_mut().for_each(|w| *w /= sum);

    Taps {
        start: left as u32,
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(img: &RgbaImage) -> Rect {
        Rect::new(0.0, 0.0, img.width() as f64, img.height() as f64)
    }

    #[test]
    fn taps_are_normalized_and_inside_source() {
        for filter in [
            ResizeFilter::Nearest,
            ResizeFilter::Triangle,
            ResizeFilter::CatmullRom,
            ResizeFilter::Lanczos3,
        ] {
            for index in 0..7 {
                let t = taps(filter, 20, 3.5, 12.0, 7, index);
                assert!(t.end() <= 20, "{:?} {}", filter, index);
                let sum: f32 = t.weights.iter().sum();
                assert!((sum - 1.0).abs() < 1e-5, "{:?} {}", filter, index);
            }
        }
    }

    #[test]
    fn nearest_picks_single_pixel() {
        let t = taps(ResizeFilter::Nearest, 10, 0.0, 10.0, 5, 2);
        assert_eq!(t.weights.len(), 1);
        assert_eq!(t.start, 5);
    }

    #[test]
    fn solid_source_keeps_its_color() {
        let src = RgbaImage::from_pixel(30, 10, Rgba([200, 0, 0, 255]));
        let mut dst = RgbaImage::from_pixel(12, 12, Rgba([0, 0, 0, 255]));
        let dst_rect = full(&dst);
        draw_scaled(&mut dst, &src, full(&src), dst_rect, ResizeFilter::Lanczos3);
        assert!(dst.pixels().all(|p| *p == Rgba([200, 0, 0, 255])));
    }

    #[test]
    fn transparent_source_leaves_destination() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        let mut dst = RgbaImage::from_pixel(6, 6, Rgba([1, 2, 3, 255]));
        let dst_rect = full(&dst);
        draw_scaled(&mut dst, &src, full(&src), dst_rect, ResizeFilter::Triangle);
        assert!(dst.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn half_alpha_blends_evenly() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 128]));
        let mut dst = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let dst_rect = full(&dst);
        draw_scaled(&mut dst, &src, full(&src), dst_rect, ResizeFilter::Nearest);
        assert!(dst.pixels().all(|p| *p == Rgba([128, 128, 128, 255])));
    }

    #[test]
    fn clipped_target_draws_only_visible_part() {
        let src = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));
        let mut dst = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        // Lower-right quadrant only: the target starts at (5, 5) and runs off the bitmap.
        draw_scaled(
            &mut dst,
            &src,
            full(&src),
            Rect::new(5.0, 5.0, 20.0, 20.0),
            ResizeFilter::Triangle,
        );
        assert_eq!(*dst.get_pixel(4, 4), Rgba([9, 9, 9, 255]));
        assert_eq!(*dst.get_pixel(4, 9), Rgba([9, 9, 9, 255]));
        assert_eq!(*dst.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(*dst.get_pixel(9, 9), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn target_fully_outside_is_ignored() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255]));
        draw_scaled(
            &mut dst,
            &src,
            full(&src),
            Rect::new(-20.0, 1.0, 8.0, 2.0),
            ResizeFilter::Triangle,
        );
        assert!(dst.pixels().all(|p| *p == Rgba([7, 7, 7, 255])));
    }

    #[test]
    fn fractional_source_window_samples_that_region() {
        // Left half red, right half green; sampling only the right half gives green.
        let src = RgbaImage::from_fn(20, 4, |x, _| {
            if x < 10 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        });
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let dst_rect = full(&dst);
        draw_scaled(
            &mut dst,
            &src,
            Rect::new(12.0, 0.0, 8.0, 4.0),
            dst_rect,
            ResizeFilter::Triangle,
        );
        assert!(dst.pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }
}
