// this_file: src/config.rs
//! Engine options shared by the dispatcher and renderer

use crate::error::{Error, Result};
use crate::security::MAX_PHOTOS_PER_JOB;
use image::Rgba;
use std::fmt;
use std::str::FromStr;

/// JPEG quality used for shared outputs
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Options that apply to every photo of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// JPEG quality, 1..=100
    pub jpeg_quality: u8,
    /// Opaque fill drawn under every photo
    pub background: Background,
    /// Resampling filter for crops and frames
    pub filter: ResizeFilter,
    /// Upper bound on photos per job
    pub max_photos: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            background: Background::default(),
            filter: ResizeFilter::default(),
            max_photos: MAX_PHOTOS_PER_JOB,
        }
    }
}

impl EngineOptions {
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_max_photos(mut self, max_photos: usize) -> Self {
        self.max_photos = max_photos;
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::InvalidParameter(format!(
                "JPEG quality {} out of bounds (1-100)",
                self.jpeg_quality
            )));
        }
        if self.max_photos == 0 || self.max_photos > MAX_PHOTOS_PER_JOB {
            return Err(Error::InvalidParameter(format!(
                "Photo limit {} out of bounds (1-{})",
                self.max_photos, MAX_PHOTOS_PER_JOB
            )));
        }
        Ok(())
    }
}

/// Opaque RGB background color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background(pub [u8; 3]);

impl Default for Background {
    fn default() -> Self {
        Self([255, 255, 255])
    }
}

impl Background {
    /// Fully opaque pixel for surface fills.
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl FromStr for Background {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidParameter(format!(
                "Invalid background color '{}', expected #rrggbb",
                s
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| Error::InvalidParameter(format!("Invalid color '{}': {}", s, e)))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Resampling filter names accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    /// Kernel radius in source pixels at unit scale.
    pub fn support(self) -> f64 {
        match self {
            ResizeFilter::Nearest => 0.0,
            ResizeFilter::Triangle => 1.0,
            ResizeFilter::CatmullRom => 2.0,
            ResizeFilter::Lanczos3 => 3.0,
        }
    }

    /// Kernel weight at distance `x` from the sample center.
    pub fn weight(self, x: f64) -> f64 {
        let x = x.abs();
        match self {
            ResizeFilter::Nearest => {
                if x <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ResizeFilter::Triangle => (1.0 - x).max(0.0),
            // Catmull-Rom: cubic with B = 0, C = 0.5
            ResizeFilter::CatmullRom => {
                if x < 1.0 {
                    1.5 * x * x * x - 2.5 * x * x + 1.0
                } else if x < 2.0 {
                    -0.5 * x * x * x + 2.5 * x * x - 4.0 * x + 2.0
                } else {
                    0.0
                }
            }
            ResizeFilter::Lanczos3 => {
                if x < 3.0 {
                    sinc(x) * sinc(x / 3.0)
                } else {
                    0.0
                }
            }
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let a = x * std::f64::consts::PI;
        a.sin() / a
    }
}

impl FromStr for ResizeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(ResizeFilter::Nearest),
            "triangle" | "bilinear" => Ok(ResizeFilter::Triangle),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(ResizeFilter::CatmullRom),
            "lanczos3" | "lanczos" => Ok(ResizeFilter::Lanczos3),
            other => Err(Error::InvalidParameter(format!(
                "Unknown resize filter '{}', expected nearest/triangle/catmull-rom/lanczos3",
                other
            ))),
        }
    }
}
