// this_file: src/batch.rs

//! Batch job description.
//!
//! This module defines the job format a host sends with `START`: one frame
//! reference plus an ordered list of independently configured photos. Field
//! names follow the host's camelCase convention (`cropX`, `frameScale`, ...).

use crate::canvas::CanvasMode;
use crate::error::{Error, Result};
use crate::geometry::MIN_CROP_SIZE;
use crate::security::MAX_PHOTOS_PER_JOB;
use serde::{Deserialize, Serialize};

/// One user-initiated export: a shared frame and the photos to frame.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BatchJob {
    /// Reference to the frame overlay image
    pub frame: String,
    /// Photos in output order
    #[serde(default)]
    pub photos: Vec<PhotoJobItem>,
}

/// Per-photo configuration produced by the editing UI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoJobItem {
    /// Reference to the photo bytes
    pub source: String,
    /// Display name, used verbatim in the archive entry name
    pub name: String,
    #[serde(flatten)]
    pub crop: CropDescriptor,
    #[serde(flatten)]
    pub placement: PlacementDescriptor,
    /// Carried for the host; rendering always covers
    #[serde(default)]
    pub fit_mode: FitMode,
    #[serde(default)]
    pub canvas_mode: CanvasMode,
}

/// Crop window in percent of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropDescriptor {
    /// Horizontal position of the window within the slack, 0..=100
    #[serde(default = "default_crop_position")]
    pub crop_x: f64,
    /// Vertical position of the window within the slack, 0..=100
    #[serde(default = "default_crop_position")]
    pub crop_y: f64,
    /// Window size relative to the limiting dimension, (0, 100]
    #[serde(default = "default_crop_size")]
    pub crop_size: f64,
}

/// Frame overlay zoom and offset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDescriptor {
    /// Uniform zoom on the fitted frame, 0.5..=2.0
    #[serde(default = "default_frame_scale")]
    pub frame_scale: f64,
    /// Horizontal offset from centre in percent of canvas width, -50..=50
    #[serde(default)]
    pub frame_x: f64,
    /// Vertical offset from centre in percent of canvas height, -50..=50
    #[serde(default)]
    pub frame_y: f64,
}

/// Fit mode selected in the editor.
///
/// Kept for round-tripping host configuration. The renderer does not consult
/// it; crops always fill the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Cover,
    Contain,
}

fn default_crop_position() -> f64 {
    50.0
}

fn default_crop_size() -> f64 {
    100.0
}

fn default_frame_scale() -> f64 {
    1.0
}

impl Default for CropDescriptor {
    fn default() -> Self {
        Self {
            crop_x: default_crop_position(),
            crop_y: default_crop_position(),
            crop_size: default_crop_size(),
        }
    }
}

impl CropDescriptor {
    /// Copy with every field forced into its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            crop_x: clamp_finite(self.crop_x, 0.0, 100.0, 50.0),
            crop_y: clamp_finite(self.crop_y, 0.0, 100.0, 50.0),
            crop_size: clamp_finite(self.crop_size, MIN_CROP_SIZE, 100.0, 100.0),
        }
    }
}

impl Default for PlacementDescriptor {
    fn default() -> Self {
        Self {
            frame_scale: default_frame_scale(),
            frame_x: 0.0,
            frame_y: 0.0,
        }
    }
}

impl PlacementDescriptor {
    /// Copy with every field forced into its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            frame_scale: clamp_finite(self.frame_scale, 0.5, 2.0, 1.0),
            frame_x: clamp_finite(self.frame_x, -50.0, 50.0, 0.0),
            frame_y: clamp_finite(self.frame_y, -50.0, 50.0, 0.0),
        }
    }
}

fn clamp_finite(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl PhotoJobItem {
    /// Photo with default crop, placement and canvas settings.
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            crop: CropDescriptor::default(),
            placement: PlacementDescriptor::default(),
            fit_mode: FitMode::default(),
            canvas_mode: CanvasMode::default(),
        }
    }
}

impl BatchJob {
    /// Parse a job from JSON without validating it.
    pub fn from_json(json: &str) -> Result<Self> {
        crate::security::validate_json_size(json)?;
        Ok(serde_json::from_str(json)?)
    }

    /// Validate structural constraints.
    ///
    /// Descriptor values are not range-checked here; they are clamped when
    /// resolved so a slightly off value from the editor never sinks a batch.
    pub fn validate(&self) -> Result<()> {
        self.validate_with_limit(MAX_PHOTOS_PER_JOB)
    }

    /// Validate with a caller-supplied photo limit.
    pub fn validate_with_limit(&self, max_photos: usize) -> Result<()> {
        if self.frame.trim().is_empty() {
            return Err(Error::invalid_job("Frame reference is empty"));
        }

        if self.photos.len() > max_photos {
            return Err(Error::invalid_job(format!(
                "Too many photos in job: {} (max: {})",
                self.photos.len(),
                max_photos
            )));
        }

        for (i, photo) in self.photos.iter().enumerate() {
            if photo.source.trim().is_empty() {
                return Err(Error::invalid_job(format!(
                    "Photo {} ('{}') has an empty source reference",
                    i + 1,
                    photo.name
                )));
            }
        }

        Ok(())
    }
}
