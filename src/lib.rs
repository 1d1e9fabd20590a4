//! # figcap
//!
//! Extracts figure images and their captions from rendered document pages.
//!
//! The pipeline wraps a pretrained layout-detection model and an OCR engine:
//! a page image is segmented into typed regions (Text, Title, Figure), each
//! Figure region is geometrically associated with the nearest qualifying
//! Title region, the title region is OCRed, and the result is a list of
//! (caption text, figure image) pairs.
//!
//! ## Components
//!
//! * [`rasterizer`] - PDF to ordered page image files (pdfium)
//! * [`detector`] - ONNX layout detection behind the [`core::RegionDetector`] contract
//! * [`domain`] - regions, bounding boxes, and per-type block groups
//! * [`pipeline`] - title association and the per-page extraction state machine
//! * [`core`] - errors, configuration, and the collaborator traits
//!
//! Detection and OCR are consumed only through the [`core::RegionDetector`]
//! and [`core::TextRecognizer`] traits, so both can be replaced with fakes
//! in tests. The bundled Tesseract recognizer lives behind the `tesseract`
//! cargo feature.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use figcap::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # struct EchoRecognizer;
//! # impl TextRecognizer for EchoRecognizer {
//! #     fn recognize(&self, _: &image::RgbImage) -> Result<String, ExtractError> {
//! #         Ok(String::new())
//! #     }
//! # }
//! let label_map = LabelMap::new([
//!     (0, "Text".to_string()),
//!     (1, "Title".to_string()),
//!     (4, "Figure".to_string()),
//! ]);
//!
//! let detector = LayoutDetector::new("models/layout.onnx", label_map.clone(), 0.5)?;
//! let config = ExtractorConfig { label_map, ..Default::default() };
//! let mut extractor = PageExtractor::new(detector, EchoRecognizer, config)?;
//!
//! let rasterizer = PdfRasterizer::new()?;
//! for page_path in rasterizer.rasterize(Path::new("paper.pdf"), Path::new("pages"))? {
//!     extractor.load_page(&page_path)?;
//!     extractor.partition_regions()?;
//!     for pair in extractor.caption_figure_pairs()? {
//!         println!("{}: {}x{}", pair.caption, pair.figure.width(), pair.figure.height());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod detector;
pub mod domain;
pub mod pipeline;
pub mod rasterizer;
#[cfg(feature = "tesseract")]
pub mod recognizer;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{
        ConfigError, ConfigValidator, ExtractError, ExtractorConfig, LabelMap, RegionDetector,
        TextRecognizer,
    };
    pub use crate::detector::{LayoutDetector, LayoutDetectorConfig};
    pub use crate::domain::{BlockGroups, BoundingBox, Region, RegionType};
    pub use crate::pipeline::{
        CaptionFigurePair, MatchTolerances, PageExtractor, TitleMatch, find_title,
    };
    pub use crate::rasterizer::PdfRasterizer;
    #[cfg(feature = "tesseract")]
    pub use crate::recognizer::TesseractRecognizer;
    pub use crate::utils::load_image;
}
