//! Error types for the figure/caption extraction pipeline.
//!
//! This module defines the error taxonomy used across the pipeline:
//! initialization failures, missing input files, precondition violations
//! (calling a step before the step it depends on), and wrapped failures from
//! the external collaborators (layout detector, rasterizer, OCR engine).
//! It also provides utility constructors that attach operation context to
//! collaborator errors.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::ConfigError;

/// Errors produced by the extraction pipeline.
///
/// Collaborator failures (detection, conversion, recognition, extraction)
/// carry a context string describing the operation and page/figure they
/// occurred in, plus the underlying error as a source.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Model or engine construction failed. Fatal, surfaced before any page
    /// is processed.
    #[error("initialization failed: {message}")]
    Initialization {
        /// What was being initialized.
        message: String,
        /// The underlying error, if one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A referenced input file (document, page image, model) does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A pipeline step was invoked before its prerequisite step ran.
    #[error("{operation} called before {prerequisite}")]
    NotInitialized {
        /// The operation that was attempted.
        operation: &'static str,
        /// The step that must run first.
        prerequisite: &'static str,
    },

    /// A crop was requested while no page image is loaded.
    #[error("{operation} requires a loaded page; call load_page first")]
    NotLoaded {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The layout detector failed during an otherwise-valid call.
    #[error("layout detection failed: {context}")]
    Detection {
        /// What was being detected.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Document-to-image conversion failed.
    #[error("document conversion failed: {context}")]
    Conversion {
        /// What was being converted.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The OCR collaborator failed on a cropped region.
    #[error("text recognition failed: {context}")]
    Recognition {
        /// What was being recognized.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Caption/figure extraction failed outside the per-figure loop.
    #[error("extraction failed: {context}")]
    Extraction {
        /// What was being extracted.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A bounding box with degenerate coordinates was constructed or used.
    #[error("invalid bounding box: ({x1}, {y1}, {x2}, {y2})")]
    InvalidBox {
        /// Left edge.
        x1: f32,
        /// Top edge.
        y1: f32,
        /// Right edge.
        x2: f32,
        /// Bottom edge.
        y2: f32,
    },

    /// A page image could not be decoded.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Configuration validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Creates an initialization error with context and an underlying cause.
    pub fn initialization(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Initialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an initialization error with context only.
    pub fn initialization_msg(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a not-found error for a path.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a detection error with operation context.
    pub fn detection(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Detection {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a conversion error with operation context.
    pub fn conversion(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Conversion {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a recognition error with operation context.
    pub fn recognition(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Recognition {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates an extraction error with operation context.
    pub fn extraction(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Extraction {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// A minimal string-backed error used when a collaborator reports a failure
/// without a typed error value.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new SimpleError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_message_names_both_steps() {
        let err = ExtractError::NotInitialized {
            operation: "caption_figure_pairs",
            prerequisite: "partition_regions",
        };
        let msg = err.to_string();
        assert!(msg.contains("caption_figure_pairs"));
        assert!(msg.contains("partition_regions"));
    }

    #[test]
    fn test_detection_error_preserves_source() {
        let err = ExtractError::detection("page 3", SimpleError::new("session failure"));
        let source = std::error::Error::source(&err).expect("source should be set");
        assert_eq!(source.to_string(), "session failure");
    }

    #[test]
    fn test_not_found_displays_path() {
        let err = ExtractError::not_found("/tmp/missing.pdf");
        assert!(err.to_string().contains("/tmp/missing.pdf"));
    }
}
