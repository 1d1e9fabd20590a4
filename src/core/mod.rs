//! Core error handling, configuration, and collaborator contracts.

pub mod config;
pub mod errors;
pub mod traits;

pub use config::{ConfigError, ConfigValidator, ExtractorConfig, LabelMap};
pub use errors::{ExtractError, SimpleError};
pub use traits::{RegionDetector, TextRecognizer};
