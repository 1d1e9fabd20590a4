//! Region types produced by layout detection.
//!
//! A region is a rectangular area of a page with a semantic type tag and a
//! confidence score. Bounding boxes are axis-aligned (x1, y1, x2, y2) in
//! page pixel coordinates and are validated on construction: x1 < x2 and
//! y1 < y2 always hold for a box that exists.

use serde::{Deserialize, Serialize};

use crate::core::ExtractError;

/// Semantic type of a detected region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionType {
    /// Body text block.
    Text,
    /// Title or caption line.
    Title,
    /// Figure, chart, or image.
    Figure,
    /// Any type the pipeline does not handle.
    Other,
}

impl RegionType {
    /// Parses a label-map tag string. Tags other than the three recognized
    /// ones map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Text" => RegionType::Text,
            "Title" => RegionType::Title,
            "Figure" => RegionType::Figure,
            _ => RegionType::Other,
        }
    }
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionType::Text => write!(f, "Text"),
            RegionType::Title => write!(f, "Title"),
            RegionType::Figure => write!(f, "Figure"),
            RegionType::Other => write!(f, "Other"),
        }
    }
}

/// An axis-aligned bounding box in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting degenerate coordinates.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidBox` unless x1 < x2 and y1 < y2 and all
    /// coordinates are finite and non-negative.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, ExtractError> {
        let finite = [x1, y1, x2, y2].iter().all(|c| c.is_finite() && *c >= 0.0);
        if !finite || x1 >= x2 || y1 >= y2 {
            return Err(ExtractError::InvalidBox { x1, y1, x2, y2 });
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Width of the box in pixels.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Height of the box in pixels.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Expands the box by `margin` pixels on all four sides, clamping the
    /// result to the page bounds so no coordinate goes negative or past the
    /// page edge.
    pub fn padded(&self, margin: u32, page_width: u32, page_height: u32) -> Self {
        let margin = margin as f32;
        Self {
            x1: (self.x1 - margin).max(0.0),
            y1: (self.y1 - margin).max(0.0),
            x2: (self.x2 + margin).min(page_width as f32),
            y2: (self.y2 + margin).min(page_height as f32),
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// A detected layout region. Immutable once produced by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Semantic type of the region.
    pub region_type: RegionType,
    /// Bounding box in page pixel coordinates.
    pub bbox: BoundingBox,
    /// Detector confidence score in [0, 1].
    pub score: f32,
}

impl Region {
    /// Creates a region from a type tag, validated box, and score.
    pub fn new(region_type: RegionType, bbox: BoundingBox, score: f32) -> Self {
        Self {
            region_type,
            bbox,
            score,
        }
    }
}
