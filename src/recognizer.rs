//! Tesseract-backed text recognizer (feature `tesseract`).
//!
//! Implements [`TextRecognizer`] over the system Tesseract engine via
//! leptess. The engine is probed once at construction so a missing language
//! pack fails before any page is processed. leptess consumes encoded image
//! data, so each crop is PNG-encoded in memory before recognition.

use image::RgbImage;
use leptess::LepTess;

use crate::core::{ExtractError, TextRecognizer};

/// Text recognizer backed by Tesseract.
#[derive(Debug)]
pub struct TesseractRecognizer {
    language: String,
}

impl TesseractRecognizer {
    /// Creates a recognizer for the given Tesseract language code
    /// (e.g. "eng", "eng+fra").
    ///
    /// # Errors
    ///
    /// Returns `Initialization` if Tesseract cannot be initialized with the
    /// requested language.
    pub fn new(language: &str) -> Result<Self, ExtractError> {
        // Probe once so a missing traineddata file fails here, not on the
        // first figure.
        LepTess::new(None, language).map_err(|e| {
            ExtractError::initialization(
                format!("initializing Tesseract for language '{language}'"),
                e,
            )
        })?;
        Ok(Self {
            language: language.to_string(),
        })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &RgbImage) -> Result<String, ExtractError> {
        let mut engine = LepTess::new(None, &self.language)
            .map_err(|e| ExtractError::recognition("creating Tesseract engine", e))?;

        let mut png = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| ExtractError::recognition("encoding region to PNG", e))?;

        engine
            .set_image_from_mem(png.get_ref())
            .map_err(|e| ExtractError::recognition("setting region image", e))?;

        let text = engine
            .get_utf8_text()
            .map_err(|e| ExtractError::recognition("reading recognized text", e))?;
        Ok(text)
    }
}
