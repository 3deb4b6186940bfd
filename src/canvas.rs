// this_file: src/canvas.rs

//! Output canvas sizing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named output canvas preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasMode {
    /// 1080×1080
    #[default]
    Square,
    /// The source photo's native size
    Original,
    /// 1080×1350
    Portrait,
    /// 1920×1080
    Landscape,
    /// 1080×1920
    Story,
}

/// Concrete output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

impl CanvasMode {
    /// Preset dimensions, or `None` for [`CanvasMode::Original`].
    pub fn fixed_size(self) -> Option<CanvasSize> {
        match self {
            CanvasMode::Square => Some(CanvasSize::new(1080, 1080)),
            CanvasMode::Portrait => Some(CanvasSize::new(1080, 1350)),
            CanvasMode::Landscape => Some(CanvasSize::new(1920, 1080)),
            CanvasMode::Story => Some(CanvasSize::new(1080, 1920)),
            CanvasMode::Original => None,
        }
    }

    /// Resolve to concrete dimensions given the decoded photo's native size.
    pub fn resolve(self, native_width: u32, native_height: u32) -> CanvasSize {
        self.fixed_size()
            .unwrap_or(CanvasSize::new(native_width, native_height))
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            CanvasMode::Square => "square",
            CanvasMode::Original => "original",
            CanvasMode::Portrait => "portrait",
            CanvasMode::Landscape => "landscape",
            CanvasMode::Story => "story",
        }
    }
}

impl fmt::Display for CanvasMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve_to_fixed_sizes() {
        assert_eq!(CanvasMode::Square.resolve(10, 20), CanvasSize::new(1080, 1080));
        assert_eq!(CanvasMode::Portrait.resolve(10, 20), CanvasSize::new(1080, 1350));
        assert_eq!(CanvasMode::Landscape.resolve(10, 20), CanvasSize::new(1920, 1080));
        assert_eq!(CanvasMode::Story.resolve(10, 20), CanvasSize::new(1080, 1920));
    }

    #[test]
    fn original_uses_native_size() {
        assert_eq!(CanvasMode::Original.fixed_size(), None);
        assert_eq!(
            CanvasMode::Original.resolve(4032, 3024),
            CanvasSize::new(4032, 3024)
        );
    }

    #[test]
    fn modes_parse_from_lowercase_names() {
        let mode: CanvasMode = serde_json::from_str("\"story\"").unwrap();
        assert_eq!(mode, CanvasMode::Story);
        assert!(serde_json::from_str::<CanvasMode>("\"Square\"").is_err());
        assert_eq!(CanvasMode::default(), CanvasMode::Square);
    }
}
