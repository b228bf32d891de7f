//! Normalized recognition output, identical in shape for every engine.

use serde::{Deserialize, Serialize};

/// Axis-aligned box as fractions of the image size, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Convert a normalized rect whose origin is the bottom-left corner
    /// (Vision's convention).
    pub fn from_bottom_left(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y: 1.0 - y - height,
            width,
            height,
        }
    }

    /// Convert a pixel rect with a top-left origin (WinRT's convention).
    /// A zero-sized image yields an empty box rather than NaNs.
    pub fn from_pixels(x: f64, y: f64, width: f64, height: f64, image_width: f64, image_height: f64) -> Self {
        if image_width <= 0.0 || image_height <= 0.0 {
            return Self::default();
        }
        Self {
            x: x / image_width,
            y: y / image_height,
            width: width / image_width,
            height: height / image_height,
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        BoundingBox {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// One recognized line, in the engine's reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRegion {
    pub text: String,
    /// `None` when the engine does not score its output (Windows).
    pub confidence: Option<f64>,
    pub bounds: BoundingBox,
}

/// Result of one recognition call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    /// All recognized lines joined with `\n`.
    pub text: String,
    /// Mean line confidence in `0.0..=1.0`, when the engine reports one.
    pub confidence: Option<f64>,
    /// Empty when regions were not requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<TextRegion>,
}

impl OcrResult {
    /// Build a result from lines in engine order.
    ///
    /// Blank lines are dropped; `keep_regions` controls whether the
    /// per-line data survives.
    pub fn from_regions(regions: Vec<TextRegion>, keep_regions: bool) -> Self {
        let regions: Vec<TextRegion> = regions
            .into_iter()
            .filter(|r| !r.text.trim().is_empty())
            .collect();

        let text = crate::normalize::join_lines(regions.iter().map(|r| r.text.as_str()));

        let scores: Vec<f64> = regions.iter().filter_map(|r| r.confidence).collect();
        let confidence = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Self {
            text,
            confidence,
            regions: if keep_regions { regions } else { Vec::new() },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
