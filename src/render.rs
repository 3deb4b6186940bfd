// this_file: src/render.rs

//! Decoding, compositing and JPEG encoding.
//!
//! Each output is built on a fresh RGBA surface: an opaque background, the
//! cropped photo stretched over the whole canvas, then the frame overlay at
//! its resolved rectangle, clipped to the canvas. The opaque surface is
//! written as JPEG.

use crate::batch::{CropDescriptor, PhotoJobItem, PlacementDescriptor};
use crate::canvas::CanvasSize;
use crate::config::EngineOptions;
use crate::error::{Error, Result};
use crate::geometry::{resolve_crop, resolve_placement, Rect};
use crate::resample::draw_scaled;
use crate::security::{MAX_DECODE_ALLOC, MAX_DECODE_DIMENSION};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, Limits, RgbaImage};
use std::io::Cursor;

/// Rendered RGBA canvas.
#[derive(Clone, Debug)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Allocate a surface filled with `options.background`.
    pub fn new(canvas: CanvasSize, options: &EngineOptions) -> Result<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(Error::InvalidParameter(
                "Surface dimensions must be non-zero".to_string(),
            ));
        }
        if canvas.width > MAX_DECODE_DIMENSION || canvas.height > MAX_DECODE_DIMENSION {
            return Err(Error::InvalidParameter(format!(
                "Surface {} exceeds {}px limit",
                canvas, MAX_DECODE_DIMENSION
            )));
        }
        Ok(Self {
            image: RgbaImage::from_pixel(canvas.width, canvas.height, options.background.to_rgba()),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Access the RGBA pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// One encoded output, keyed by its 1-based batch position.
#[derive(Clone, Debug)]
pub struct CompositeResult {
    pub index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

/// Decode encoded image bytes into RGBA, enforcing size limits.
pub fn decode_image(reference: &str, bytes: &[u8]) -> Result<RgbaImage> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::decode(reference, e.to_string()))?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DECODE_DIMENSION);
    limits.max_image_height = Some(MAX_DECODE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    reader.limits(limits);

    let decoded = reader
        .decode()
        .map_err(|e| Error::decode(reference, e.to_string()))?
        .to_rgba8();

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(Error::decode(reference, "image has zero size"));
    }
    Ok(decoded)
}

/// Composite one canvas. Either input may be absent.
///
/// Both inputs are sampled straight into the surface, so the surface is the
/// only canvas-sized buffer alive while rendering.
pub fn render(
    canvas: CanvasSize,
    photo: Option<&RgbaImage>,
    frame: Option<&RgbaImage>,
    crop: &CropDescriptor,
    placement: &PlacementDescriptor,
    options: &EngineOptions,
) -> Result<Surface> {
    let mut surface = Surface::new(canvas, options)?;
    let whole_canvas = Rect::new(0.0, 0.0, canvas.width as f64, canvas.height as f64);

    if let Some(photo) = photo {
        let window = resolve_crop(photo.width(), photo.height(), canvas.aspect(), crop);
        draw_scaled(&mut surface.image, photo, window, whole_canvas, options.filter);
    }

    if let Some(frame) = frame {
        let target = resolve_placement(
            frame.width(),
            frame.height(),
            canvas.width,
            canvas.height,
            placement,
        );
        let whole_frame = Rect::new(0.0, 0.0, frame.width() as f64, frame.height() as f64);
        draw_scaled(&mut surface.image, frame, whole_frame, target, options.filter);
    }

    Ok(surface)
}

/// Encode the surface as JPEG.
///
/// The surface is always opaque, so the encoder reads its RGB channels in
/// place.
pub fn encode_jpeg(surface: &Surface, quality: u8) -> Result<Vec<u8>> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode_image(surface.image())
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(jpeg)
}

/// Size the canvas for `item`, render it over `photo` with `frame`, encode.
pub fn composite_photo(
    index: usize,
    item: &PhotoJobItem,
    photo: &RgbaImage,
    frame: &RgbaImage,
    options: &EngineOptions,
) -> Result<CompositeResult> {
    let canvas = item.canvas_mode.resolve(photo.width(), photo.height());
    let surface = render(
        canvas,
        Some(photo),
        Some(frame),
        &item.crop,
        &item.placement,
        options,
    )?;
    let jpeg = encode_jpeg(&surface, options.jpeg_quality)?;

    Ok(CompositeResult {
        index,
        name: item.name.clone(),
        width: canvas.width,
        height: canvas.height,
        jpeg,
    })
}
