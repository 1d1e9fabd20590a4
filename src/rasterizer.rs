//! PDF rasterization: document to ordered page images.
//!
//! [`PdfRasterizer`] converts a source document into one image file per
//! page, written to working storage with zero-indexed sequential names
//! (`page0.jpg`, `page1.jpg`, ...) so page order survives a round trip
//! through the filesystem. Conversion is fail-fast: a render or write
//! failure on any page aborts the whole run rather than returning a partial
//! page list.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::core::ExtractError;

/// PDF points per inch, the standard PostScript/PDF unit conversion factor.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Default render resolution. 150 DPI keeps small caption text legible for
/// OCR without oversized page files.
pub const DEFAULT_DPI: u32 = 150;

/// Renders PDF pages to JPEG files via pdfium.
pub struct PdfRasterizer {
    pdfium: Pdfium,
    dpi: u32,
}

impl PdfRasterizer {
    /// Creates a rasterizer at the default DPI.
    ///
    /// # Errors
    ///
    /// Returns `Initialization` if the pdfium library cannot be bound.
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_dpi(DEFAULT_DPI)
    }

    /// Creates a rasterizer rendering at the given DPI.
    pub fn with_dpi(dpi: u32) -> Result<Self, ExtractError> {
        if dpi == 0 {
            return Err(ExtractError::initialization_msg("render DPI must be non-zero"));
        }
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ExtractError::initialization("binding pdfium library", e))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            dpi,
        })
    }

    /// Converts a document into an ordered sequence of page image files.
    ///
    /// Writes `page0.jpg`, `page1.jpg`, ... into `output_dir` and returns
    /// the exact ordered list of paths written, one per page. No page is
    /// silently skipped.
    ///
    /// # Errors
    ///
    /// `NotFound` if the document is absent, `Conversion` if the PDF cannot
    /// be decoded or a page fails to render, `Io` if a page file cannot be
    /// written. Any per-page failure aborts the whole conversion.
    pub fn rasterize(
        &self,
        document_path: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractError> {
        if !document_path.exists() {
            return Err(ExtractError::not_found(document_path));
        }
        std::fs::create_dir_all(output_dir)?;

        let document = self
            .pdfium
            .load_pdf_from_file(document_path, None)
            .map_err(|e| {
                ExtractError::conversion(
                    format!("loading document {}", document_path.display()),
                    e,
                )
            })?;

        let dpi = self.dpi;
        let pages = document.pages();
        let rendered = pages.iter().enumerate().map(|(index, page)| {
            let width_pts = page.width().value;
            let height_pts = page.height().value;

            let render_config = PdfRenderConfig::new()
                .set_target_width((width_pts * dpi as f32 / PDF_POINTS_PER_INCH) as i32)
                .set_target_height((height_pts * dpi as f32 / PDF_POINTS_PER_INCH) as i32);

            page.render_with_config(&render_config)
                .map(|bitmap| bitmap.as_image().into_rgb8())
                .map_err(|e| {
                    ExtractError::conversion(
                        format!("rendering page {} of {}", index, document_path.display()),
                        e,
                    )
                })
        });

        let written = write_page_images(rendered, output_dir)?;

        info!(
            document = %document_path.display(),
            pages = written.len(),
            dpi = self.dpi,
            "document rasterized"
        );
        Ok(written)
    }
}

/// Writes rendered pages to `output_dir` under zero-indexed sequential
/// names, preserving iterator order.
///
/// Fail-fast: the first render or write failure aborts the run and is
/// returned as-is; pages already written stay on disk but no later page is
/// produced, so the returned list is never partial.
fn write_page_images(
    pages: impl IntoIterator<Item = Result<image::RgbImage, ExtractError>>,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ExtractError> {
    let mut written = Vec::new();
    for (index, page) in pages.into_iter().enumerate() {
        let page = page?;
        let path = output_dir.join(format!("page{index}.jpg"));
        page.save_with_format(&path, image::ImageFormat::Jpeg)
            .map_err(|e| ExtractError::conversion(format!("writing {}", path.display()), e))?;

        debug!(page = index, path = %path.display(), "page rendered");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SimpleError;
    use image::RgbImage;

    #[test]
    fn test_zero_dpi_rejected() {
        // Validated before any library binding happens.
        assert!(matches!(
            PdfRasterizer::with_dpi(0),
            Err(ExtractError::Initialization { .. })
        ));
    }

    #[test]
    fn test_pages_written_zero_indexed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![
            Ok(RgbImage::new(40, 60)),
            Ok(RgbImage::new(40, 60)),
            Ok(RgbImage::new(40, 60)),
        ];

        let written = write_page_images(pages, dir.path()).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["page0.jpg", "page1.jpg", "page2.jpg"]);
        for path in &written {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_page_failure_aborts_whole_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![
            Ok(RgbImage::new(40, 60)),
            Err(ExtractError::conversion(
                "rendering page 1",
                SimpleError::new("decode failure"),
            )),
            Ok(RgbImage::new(40, 60)),
        ];

        let result = write_page_images(pages, dir.path());
        assert!(matches!(result, Err(ExtractError::Conversion { .. })));
        // Fail-fast: nothing past the failing page is produced.
        assert!(dir.path().join("page0.jpg").exists());
        assert!(!dir.path().join("page2.jpg").exists());
    }
}
