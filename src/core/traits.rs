//! Capability traits for the external collaborators.
//!
//! The pipeline depends on layout detection and text recognition only
//! through these two single-method contracts, so tests can substitute fakes
//! without pulling in model weights or a system OCR engine.

use image::RgbImage;

use crate::core::ExtractError;
use crate::domain::Region;

/// Detects typed layout regions in a page image.
///
/// Implementations return the detected regions in the model's output order;
/// the pipeline preserves that order through partitioning and extraction.
/// Construction-time failures (missing model file, session build failure)
/// belong to the implementation's constructor, not to `detect`.
pub trait RegionDetector {
    /// Runs layout detection on a page image.
    fn detect(&self, page: &RgbImage) -> Result<Vec<Region>, ExtractError>;
}

/// Recognizes text in a cropped region image.
pub trait TextRecognizer {
    /// Runs OCR on a sub-image and returns the recognized text, which may
    /// be empty if the region contains no legible text.
    fn recognize(&self, image: &RgbImage) -> Result<String, ExtractError>;
}
