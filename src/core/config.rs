//! Configuration for the extraction pipeline.
//!
//! This module provides the configuration structures consumed by the
//! pipeline and the bundled collaborators, a validation trait that turns bad
//! parameters into typed errors, and the label map that translates numeric
//! detector class ids into region type tags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RegionType;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the invalid value.
        message: String,
    },
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration, returning a ConfigError on the first
    /// invalid parameter.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;
}

/// Maps numeric detector class ids to region type tag strings.
///
/// The detector reports classes as integers; the label map translates them
/// into the tags the pipeline recognizes ("Text", "Title", "Figure"). Ids
/// absent from the map, and tags other than the three recognized ones,
/// resolve to [`RegionType::Other`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: HashMap<u32, String>,
}

impl LabelMap {
    /// Creates a label map from (class id, tag) pairs.
    pub fn new(labels: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }

    /// Returns the tag string for a class id, if the id is mapped.
    pub fn tag(&self, class_id: u32) -> Option<&str> {
        self.labels.get(&class_id).map(String::as_str)
    }

    /// Resolves a class id to a region type. Unmapped ids and unrecognized
    /// tags resolve to `Other`.
    pub fn region_type(&self, class_id: u32) -> RegionType {
        self.tag(class_id)
            .map(RegionType::from_tag)
            .unwrap_or(RegionType::Other)
    }

    /// Number of mapped class ids.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Configuration for the caption/figure extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Detector confidence threshold in [0, 1] (default: 0.5).
    pub confidence_threshold: f32,
    /// Maps detector class ids to region type tags.
    pub label_map: LabelMap,
    /// Horizontal tolerance for title matching (default: 0.2).
    pub x_tolerance: f32,
    /// Vertical tolerance for title matching (default: 0.2).
    pub y_tolerance: f32,
    /// Margin in pixels added around a matched title box before OCR,
    /// clamped to page bounds (default: 5).
    pub title_padding: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            label_map: LabelMap::default(),
            x_tolerance: 0.2,
            y_tolerance: 0.2,
            title_padding: 5,
        }
    }
}

impl ConfigValidator for ExtractorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "confidence_threshold must be in [0, 1], got {}",
                    self.confidence_threshold
                ),
            });
        }

        if !self.x_tolerance.is_finite() || self.x_tolerance < 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("x_tolerance must be non-negative, got {}", self.x_tolerance),
            });
        }

        if !self.y_tolerance.is_finite() || self.y_tolerance < 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("y_tolerance must be non-negative, got {}", self.y_tolerance),
            });
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = ExtractorConfig {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = ExtractorConfig {
            x_tolerance: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_label_map_resolves_recognized_tags() {
        let map = LabelMap::new([
            (0, "Text".to_string()),
            (1, "Title".to_string()),
            (4, "Figure".to_string()),
        ]);
        assert_eq!(map.region_type(0), RegionType::Text);
        assert_eq!(map.region_type(1), RegionType::Title);
        assert_eq!(map.region_type(4), RegionType::Figure);
    }

    #[test]
    fn test_label_map_falls_back_to_other() {
        let map = LabelMap::new([(2, "Table".to_string())]);
        assert_eq!(map.region_type(2), RegionType::Other);
        assert_eq!(map.region_type(99), RegionType::Other);
    }

    #[test]
    fn test_label_map_len_tracks_entries() {
        assert!(LabelMap::default().is_empty());
        let map = LabelMap::new([(0, "Text".to_string())]);
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_label_map_serde_round_trip() {
        let map = LabelMap::new([(0, "Text".to_string()), (1, "Title".to_string())]);
        let json = serde_json::to_string(&map).unwrap();
        let parsed: LabelMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.region_type(1), RegionType::Title);
    }
}
