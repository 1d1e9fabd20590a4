//! Page extraction pipeline: title matching and orchestration.

pub mod extractor;
pub mod matching;

pub use extractor::{CaptionFigurePair, PageExtractor};
pub use matching::{MatchTolerances, TitleMatch, find_title};
