// this_file: benches/render.rs

use criterion::{criterion_group, criterion_main, Criterion};
use framekit::render::composite_photo;
use framekit::{CanvasMode, EngineOptions, PhotoJobItem, PlacementDescriptor};
use image::{Rgba, RgbaImage};

fn sample_item(mode: CanvasMode) -> PhotoJobItem {
    let mut item = PhotoJobItem::new("bench", "bench.jpg");
    item.canvas_mode = mode;
    item.crop.crop_size = 80.0;
    item.placement = PlacementDescriptor {
        frame_scale: 1.2,
        frame_x: 5.0,
        frame_y: -5.0,
    };
    item
}

fn bench_composite(c: &mut Criterion) {
    let photo = RgbaImage::from_fn(2000, 1500, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let frame = RgbaImage::from_pixel(1000, 500, Rgba([255, 255, 255, 96]));
    let options = EngineOptions::default();

    let mut group = c.benchmark_group("composite_photo");
    group.sample_size(10);
    for mode in [CanvasMode::Square, CanvasMode::Story] {
        let item = sample_item(mode);
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| composite_photo(1, &item, &photo, &frame, &options).unwrap());
        });
    }
    group.finish();
}

criterion_group!(render_benches, bench_composite);
criterion_main!(render_benches);
