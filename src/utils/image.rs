//! Image loading and cropping helpers.

use std::path::Path;

use image::{DynamicImage, RgbImage, imageops};

use crate::core::ExtractError;
use crate::domain::BoundingBox;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RGB.
///
/// # Errors
///
/// Returns `ExtractError::ImageLoad` if the file cannot be decoded.
pub fn load_image(path: &Path) -> Result<RgbImage, ExtractError> {
    let img = image::open(path).map_err(ExtractError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Crops a bounding box out of a page image.
///
/// Coordinates are rounded to whole pixels and clamped to the page bounds.
/// A box that rounds to zero area or starts past the page edge is an error;
/// the caller decides whether that aborts the run or skips one figure.
pub fn crop_box(page: &RgbImage, bbox: &BoundingBox) -> Result<RgbImage, ExtractError> {
    let (page_width, page_height) = page.dimensions();

    let x = bbox.x1.round().max(0.0) as u32;
    let y = bbox.y1.round().max(0.0) as u32;
    if x >= page_width || y >= page_height {
        return Err(ExtractError::InvalidBox {
            x1: bbox.x1,
            y1: bbox.y1,
            x2: bbox.x2,
            y2: bbox.y2,
        });
    }

    let width = (bbox.x2.round() as u32).min(page_width) - x;
    let height = (bbox.y2.round() as u32).min(page_height) - y;
    if width == 0 || height == 0 {
        return Err(ExtractError::InvalidBox {
            x1: bbox.x1,
            y1: bbox.y1,
            x2: bbox.x2,
            y2: bbox.y2,
        });
    }

    Ok(imageops::crop_imm(page, x, y, width, height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_box_dimensions() {
        let page = RgbImage::new(200, 100);
        let bbox = BoundingBox::new(10.0, 20.0, 60.0, 50.0).unwrap();
        let cropped = crop_box(&page, &bbox).unwrap();
        assert_eq!(cropped.dimensions(), (50, 30));
    }

    #[test]
    fn test_crop_box_clamps_to_page_edge() {
        let page = RgbImage::new(100, 100);
        let bbox = BoundingBox::new(80.0, 80.0, 120.0, 130.0).unwrap();
        let cropped = crop_box(&page, &bbox).unwrap();
        assert_eq!(cropped.dimensions(), (20, 20));
    }

    #[test]
    fn test_crop_box_outside_page_is_error() {
        let page = RgbImage::new(100, 100);
        let bbox = BoundingBox::new(150.0, 20.0, 180.0, 40.0).unwrap();
        assert!(crop_box(&page, &bbox).is_err());
    }

    #[test]
    fn test_load_image_missing_file_is_error() {
        let result = load_image(Path::new("/nonexistent/page0.jpg"));
        assert!(result.is_err());
    }
}
