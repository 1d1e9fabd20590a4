//! ONNX-backed layout detector.
//!
//! [`LayoutDetector`] wraps a layout-detection model (PicoDet / PP-DocLayout
//! style export) behind the [`RegionDetector`] contract. The model is loaded
//! once at construction; a missing model file or a session build failure
//! surfaces before any page is processed. Detection resizes the page to the
//! model's input size, normalizes it, runs one forward pass, and parses the
//! compact output rows `[class_id, score, x1, y1, x2, y2]` back into page
//! pixel coordinates.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{RgbImage, imageops};
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ExtractError, LabelMap, RegionDetector, SimpleError};
use crate::domain::{BoundingBox, Region};

/// Input tensor names the detector probes for when the model does not use
/// the conventional "x".
const COMMON_INPUT_NAMES: [&str; 5] = ["x", "input", "images", "data", "image"];

/// Preprocessing parameters for the detection model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDetectorConfig {
    /// Model input width in pixels (default: 800).
    pub input_width: u32,
    /// Model input height in pixels (default: 608).
    pub input_height: u32,
    /// Per-channel normalization mean.
    pub mean: [f32; 3],
    /// Per-channel normalization standard deviation.
    pub std: [f32; 3],
}

impl Default for LayoutDetectorConfig {
    fn default() -> Self {
        Self {
            input_width: 800,
            input_height: 608,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Layout detection model wrapper implementing [`RegionDetector`].
#[derive(Debug)]
pub struct LayoutDetector {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
    label_map: LabelMap,
    confidence_threshold: f32,
    config: LayoutDetectorConfig,
}

impl LayoutDetector {
    /// Loads the detection model and prepares a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the model file is absent, or `Initialization`
    /// if the session cannot be built from it.
    pub fn new(
        model_path: impl AsRef<Path>,
        label_map: LabelMap,
        confidence_threshold: f32,
    ) -> Result<Self, ExtractError> {
        Self::with_config(
            model_path,
            label_map,
            confidence_threshold,
            LayoutDetectorConfig::default(),
        )
    }

    /// Loads the detection model with explicit preprocessing parameters.
    pub fn with_config(
        model_path: impl AsRef<Path>,
        label_map: LabelMap,
        confidence_threshold: f32,
        config: LayoutDetectorConfig,
    ) -> Result<Self, ExtractError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(ExtractError::not_found(path));
        }

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                ExtractError::initialization(
                    format!("failed to build ONNX session for {}", path.display()),
                    e,
                )
            })?;

        let input_name = Self::resolve_input_name(&session)?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                ExtractError::initialization_msg(format!(
                    "model {} declares no outputs",
                    path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            label_map,
            confidence_threshold,
            config,
        })
    }

    /// The path of the loaded model, for logging and error context.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Picks the model's input tensor name: a known conventional name if
    /// present, otherwise the model's sole input.
    fn resolve_input_name(session: &Session) -> Result<String, ExtractError> {
        let available: Vec<&str> = session.inputs.iter().map(|i| i.name.as_str()).collect();

        for name in COMMON_INPUT_NAMES {
            if available.contains(&name) {
                return Ok(name.to_string());
            }
        }

        match available.as_slice() {
            [only] => Ok((*only).to_string()),
            _ => Err(ExtractError::initialization_msg(format!(
                "cannot determine input tensor name, model declares: {:?}",
                available
            ))),
        }
    }

    /// Resizes and normalizes the page into an NCHW f32 tensor.
    fn preprocess(&self, page: &RgbImage) -> Array4<f32> {
        let resized = imageops::resize(
            page,
            self.config.input_width,
            self.config.input_height,
            imageops::FilterType::Triangle,
        );

        let (width, height) = (self.config.input_width as usize, self.config.input_height as usize);
        let mut tensor = Array4::<f32>::zeros((1, 3, height, width));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                let value = pixel.0[channel] as f32 / 255.0;
                tensor[[0, channel, y as usize, x as usize]] =
                    (value - self.config.mean[channel]) / self.config.std[channel];
            }
        }
        tensor
    }

    /// Parses the model output into regions in page pixel coordinates.
    fn parse_predictions(
        &self,
        shape: &[i64],
        data: &[f32],
        page_width: u32,
        page_height: u32,
    ) -> Result<Vec<Region>, ExtractError> {
        let scale_x = page_width as f32 / self.config.input_width as f32;
        let scale_y = page_height as f32 / self.config.input_height as f32;
        parse_compact_rows(
            shape,
            data,
            self.confidence_threshold,
            &self.label_map,
            scale_x,
            scale_y,
            page_width,
            page_height,
        )
        .map_err(|e| {
            ExtractError::detection(
                format!("parsing output of {}", self.model_path.display()),
                e,
            )
        })
    }
}

/// Parses compact prediction rows `[class_id, score, x1, y1, x2, y2]` into
/// regions, filtering by the confidence threshold and scaling the boxes from
/// model input space back to page pixels.
#[allow(clippy::too_many_arguments)]
fn parse_compact_rows(
    shape: &[i64],
    data: &[f32],
    confidence_threshold: f32,
    label_map: &LabelMap,
    scale_x: f32,
    scale_y: f32,
    page_width: u32,
    page_height: u32,
) -> Result<Vec<Region>, SimpleError> {
    let feature_dim = match shape.last() {
        Some(&dim) if dim >= 6 => dim as usize,
        _ => {
            return Err(SimpleError::new(format!(
                "unexpected output shape {:?}, expected rows of [class_id, score, x1, y1, x2, y2]",
                shape
            )));
        }
    };

    let mut regions = Vec::new();
    for row in data.chunks_exact(feature_dim) {
        let class_id = row[0];
        let score = row[1];
        if !(0.0..=1.0).contains(&score) || score < confidence_threshold {
            continue;
        }
        if class_id < 0.0 || class_id.fract() != 0.0 {
            continue;
        }

        let bbox = BoundingBox::new(
            (row[2] * scale_x).max(0.0),
            (row[3] * scale_y).max(0.0),
            (row[4] * scale_x).min(page_width as f32),
            (row[5] * scale_y).min(page_height as f32),
        );
        // Degenerate boxes are model noise, not an error.
        let Ok(bbox) = bbox else { continue };

        let region_type = label_map.region_type(class_id as u32);
        regions.push(Region::new(region_type, bbox, score));
    }

    Ok(regions)
}

impl RegionDetector for LayoutDetector {
    fn detect(&self, page: &RgbImage) -> Result<Vec<Region>, ExtractError> {
        let (page_width, page_height) = page.dimensions();
        let tensor = self.preprocess(page);

        let input = TensorRef::from_array_view(tensor.view()).map_err(|e| {
            ExtractError::detection(
                format!("failed to build input tensor for {}", self.model_path.display()),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input];

        let mut session = self.session.lock().map_err(|_| {
            ExtractError::detection(
                format!("session lock poisoned for {}", self.model_path.display()),
                SimpleError::new("a previous detection panicked"),
            )
        })?;

        let outputs = session.run(inputs).map_err(|e| {
            ExtractError::detection(
                format!("forward pass failed for {}", self.model_path.display()),
                e,
            )
        })?;

        let (shape, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ExtractError::detection(
                    format!(
                        "failed to extract output '{}' as f32 from {}",
                        self.output_name,
                        self.model_path.display()
                    ),
                    e,
                )
            })?;

        let regions = self.parse_predictions(shape, data, page_width, page_height)?;
        debug!(
            model = %self.model_path.display(),
            regions = regions.len(),
            "layout detection complete"
        );
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegionType;

    fn label_map() -> LabelMap {
        LabelMap::new([
            (0, "Text".to_string()),
            (1, "Title".to_string()),
            (4, "Figure".to_string()),
        ])
    }

    #[test]
    fn test_missing_model_file_is_not_found() {
        let result = LayoutDetector::new("/nonexistent/layout.onnx", LabelMap::default(), 0.5);
        assert!(matches!(result, Err(ExtractError::NotFound { .. })));
    }

    #[test]
    fn test_parse_rows_filters_by_threshold() {
        let data = [
            4.0, 0.9, 10.0, 10.0, 100.0, 80.0, // kept
            1.0, 0.3, 10.0, 90.0, 60.0, 110.0, // below threshold
        ];
        let regions =
            parse_compact_rows(&[2, 6], &data, 0.5, &label_map(), 1.0, 1.0, 800, 608).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].region_type, RegionType::Figure);
    }

    #[test]
    fn test_parse_rows_scales_to_page_pixels() {
        let data = [1.0, 0.8, 100.0, 100.0, 200.0, 150.0];
        let regions =
            parse_compact_rows(&[1, 6], &data, 0.5, &label_map(), 2.0, 0.5, 1600, 304).unwrap();
        let bbox = regions[0].bbox;
        assert_eq!(bbox.x1, 200.0);
        assert_eq!(bbox.y1, 50.0);
        assert_eq!(bbox.x2, 400.0);
        assert_eq!(bbox.y2, 75.0);
    }

    #[test]
    fn test_parse_rows_maps_unknown_class_to_other() {
        let data = [7.0, 0.8, 10.0, 10.0, 50.0, 50.0];
        let regions =
            parse_compact_rows(&[1, 6], &data, 0.5, &label_map(), 1.0, 1.0, 800, 608).unwrap();
        assert_eq!(regions[0].region_type, RegionType::Other);
    }

    #[test]
    fn test_parse_rows_drops_degenerate_boxes() {
        let data = [1.0, 0.8, 50.0, 10.0, 50.0, 40.0];
        let regions =
            parse_compact_rows(&[1, 6], &data, 0.5, &label_map(), 1.0, 1.0, 800, 608).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_parse_rows_rejects_malformed_shape() {
        let data = [1.0, 0.8, 50.0, 10.0];
        let result = parse_compact_rows(&[1, 4], &data, 0.5, &label_map(), 1.0, 1.0, 800, 608);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_matches_picodet_input() {
        let config = LayoutDetectorConfig::default();
        assert_eq!(config.input_width, 800);
        assert_eq!(config.input_height, 608);
    }
}
