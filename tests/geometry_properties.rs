// this_file: tests/geometry_properties.rs
//! Crop and overlay geometry checked across descriptor ranges

use approx::assert_relative_eq;
use framekit::{
    resolve_crop, resolve_placement, CanvasMode, CropDescriptor, PlacementDescriptor, Rect,
};

const SOURCES: &[(u32, u32)] = &[
    (2000, 1500),
    (1500, 2000),
    (1080, 1080),
    (4032, 3024),
    (640, 4000),
    (5000, 300),
    (1, 1),
];

const MODES: &[CanvasMode] = &[
    CanvasMode::Square,
    CanvasMode::Portrait,
    CanvasMode::Landscape,
    CanvasMode::Story,
];

fn steps(min: f64, max: f64, n: usize) -> Vec<f64> {
    (0..=n)
        .map(|i| min + (max - min) * i as f64 / n as f64)
        .collect()
}

#[test]
fn test_crop_always_inside_source() {
    for &(w, h) in SOURCES {
        for mode in MODES {
            let aspect = mode.resolve(w, h).aspect();
            for x in steps(0.0, 100.0, 4) {
                for y in steps(0.0, 100.0, 4) {
                    for size in steps(1.0, 100.0, 5) {
                        let crop = CropDescriptor {
                            crop_x: x,
                            crop_y: y,
                            crop_size: size,
                        };
                        let rect = resolve_crop(w, h, aspect, &crop);
                        assert!(
                            rect.is_within(w as f64, h as f64),
                            "{:?} escapes {}x{} for {:?}",
                            rect,
                            w,
                            h,
                            crop
                        );
                        assert!(rect.w > 0.0 && rect.h > 0.0);
                    }
                }
            }
        }
    }
}

#[test]
fn test_crop_matches_canvas_aspect() {
    // Cover fill: the sampled window always has the canvas's shape.
    for &(w, h) in SOURCES {
        for mode in MODES {
            let aspect = mode.resolve(w, h).aspect();
            for size in steps(10.0, 100.0, 3) {
                let crop = CropDescriptor {
                    crop_x: 30.0,
                    crop_y: 70.0,
                    crop_size: size,
                };
                let rect = resolve_crop(w, h, aspect, &crop);
                assert_relative_eq!(rect.aspect(), aspect, max_relative = 1e-9);
            }
        }
    }
}

#[test]
fn test_original_mode_full_crop_is_whole_image() {
    let (w, h) = (4032, 3024);
    let aspect = CanvasMode::Original.resolve(w, h).aspect();
    let rect = resolve_crop(w, h, aspect, &CropDescriptor::default());
    assert_relative_eq!(rect.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(rect.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(rect.w, 4032.0, epsilon = 1e-9);
    assert_relative_eq!(rect.h, 3024.0, epsilon = 1e-9);
}

#[test]
fn test_crop_corners() {
    for &(w, h) in SOURCES {
        let crop_at = |x: f64, y: f64| CropDescriptor {
            crop_x: x,
            crop_y: y,
            crop_size: 60.0,
        };
        let top_left = resolve_crop(w, h, 1.0, &crop_at(0.0, 0.0));
        assert_eq!((top_left.x, top_left.y), (0.0, 0.0));

        let bottom_right = resolve_crop(w, h, 1.0, &crop_at(100.0, 100.0));
        assert_relative_eq!(bottom_right.right(), w as f64, epsilon = 1e-9);
        assert_relative_eq!(bottom_right.bottom(), h as f64, epsilon = 1e-9);

        // Every other position sits between the two corners.
        let middle = resolve_crop(w, h, 1.0, &crop_at(37.0, 81.0));
        assert!(middle.x >= top_left.x && middle.x <= bottom_right.x);
        assert!(middle.y >= top_left.y && middle.y <= bottom_right.y);
    }
}

#[test]
fn test_crop_scenario_landscape_to_square() {
    let crop = CropDescriptor {
        crop_x: 50.0,
        crop_y: 50.0,
        crop_size: 80.0,
    };
    let rect = resolve_crop(2000, 1500, CanvasMode::Square.resolve(0, 0).aspect(), &crop);
    assert_relative_eq!(rect.x, 400.0);
    assert_relative_eq!(rect.y, 150.0);
    assert_relative_eq!(rect.w, 1200.0);
    assert_relative_eq!(rect.h, 1200.0);
}

#[test]
fn test_overlay_scenario_wide_frame_on_square() {
    let rect = resolve_placement(1000, 500, 1080, 1080, &PlacementDescriptor::default());
    assert_eq!(rect, Rect::new(0.0, 270.0, 1080.0, 540.0));
}

#[test]
fn test_overlay_preserves_frame_aspect() {
    let frames = [(1000, 500), (500, 1000), (1080, 1080), (1200, 1500), (3, 7)];
    for &(fw, fh) in &frames {
        let native = fw as f64 / fh as f64;
        for mode in MODES {
            let canvas = mode.resolve(0, 0);
            for scale in steps(0.5, 2.0, 6) {
                for fx in steps(-50.0, 50.0, 4) {
                    for fy in steps(-50.0, 50.0, 4) {
                        let placement = PlacementDescriptor {
                            frame_scale: scale,
                            frame_x: fx,
                            frame_y: fy,
                        };
                        let rect = resolve_placement(fw, fh, canvas.width, canvas.height, &placement);
                        assert_relative_eq!(rect.aspect(), native, max_relative = 1e-9);
                    }
                }
            }
        }
    }
}

#[test]
fn test_overlay_unit_scale_fits_canvas() {
    for mode in MODES {
        let canvas = mode.resolve(0, 0);
        for &(fw, fh) in &[(1000, 500), (500, 1000), (1080, 1920)] {
            let rect = resolve_placement(fw, fh, canvas.width, canvas.height, &PlacementDescriptor::default());
            assert!(rect.is_within(canvas.width as f64, canvas.height as f64));
            // Touches the canvas on at least one axis.
            let touches_w = (rect.w - canvas.width as f64).abs() < 1e-9;
            let touches_h = (rect.h - canvas.height as f64).abs() < 1e-9;
            assert!(touches_w || touches_h, "{:?} on {}", rect, canvas);
        }
    }
}
