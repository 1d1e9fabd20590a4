//! Per-page caption/figure extraction.
//!
//! [`PageExtractor`] orchestrates a page through its three states: empty,
//! page loaded (detection has produced a region set), and partitioned
//! (regions bucketed into typed block groups). Each public method guards its
//! precondition and fails with a typed error instead of dereferencing
//! missing state.
//!
//! Failure isolation is per figure: a figure whose title cannot be found,
//! cropped, or recognized is logged and dropped from the result, and the
//! batch continues. Failures before the per-figure loop are fatal.

use std::path::Path;

use image::RgbImage;
use tracing::{debug, warn};

use crate::core::{
    ConfigValidator, ExtractError, ExtractorConfig, RegionDetector, TextRecognizer,
};
use crate::domain::{BlockGroups, Region};
use crate::pipeline::matching::{MatchTolerances, TitleMatch, find_title};
use crate::utils::image::{crop_box, load_image};

/// A caption and the figure image it belongs to.
#[derive(Debug, Clone)]
pub struct CaptionFigurePair {
    /// OCR text of the matched title region. May be empty.
    pub caption: String,
    /// Cropped figure image.
    pub figure: RgbImage,
}

/// Explicit pipeline state for one page.
#[derive(Debug)]
enum PageState {
    /// No page loaded yet.
    Empty,
    /// A page has been loaded and detection has produced its region set.
    PageLoaded {
        page: RgbImage,
        regions: Vec<Region>,
    },
    /// The region set has been partitioned into typed block groups.
    Partitioned { page: RgbImage, blocks: BlockGroups },
}

/// Extracts (caption, figure image) pairs from document pages.
///
/// Generic over the two collaborator contracts so detection and OCR can be
/// substituted with fakes in tests. The pipeline is synchronous and
/// single-threaded; the loaded page image is read-only after load and shared
/// by all per-figure crops.
#[derive(Debug)]
pub struct PageExtractor<D, R> {
    detector: D,
    recognizer: R,
    config: ExtractorConfig,
    state: PageState,
}

impl<R: TextRecognizer> PageExtractor<crate::detector::LayoutDetector, R> {
    /// Creates an extractor backed by the bundled ONNX layout detector.
    ///
    /// Loads the model at `model_path` with the config's label map and
    /// confidence threshold. A missing or unloadable model fails here,
    /// before any page is processed.
    pub fn initialize(
        model_path: impl AsRef<Path>,
        recognizer: R,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractError> {
        config.validate()?;
        let detector = crate::detector::LayoutDetector::new(
            model_path,
            config.label_map.clone(),
            config.confidence_threshold,
        )?;
        Self::new(detector, recognizer, config)
    }
}

impl<D: RegionDetector, R: TextRecognizer> PageExtractor<D, R> {
    /// Creates an extractor from its collaborators and configuration.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Config` if the configuration fails validation.
    pub fn new(detector: D, recognizer: R, config: ExtractorConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        if config.label_map.is_empty() {
            warn!("label map is empty; every detected class resolves to Other");
        }
        Ok(Self {
            detector,
            recognizer,
            config,
            state: PageState::Empty,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Loads a page image and runs layout detection on it.
    ///
    /// Replaces any previously loaded page. Detection runs here so the
    /// region set always belongs to the current page.
    ///
    /// # Errors
    ///
    /// `NotFound` if the image file is absent, `ImageLoad` if it cannot be
    /// decoded, or the detector's error if detection fails. On error the
    /// extractor reverts to the empty state.
    pub fn load_page(&mut self, image_path: &Path) -> Result<(), ExtractError> {
        if !image_path.exists() {
            return Err(ExtractError::not_found(image_path));
        }

        self.state = PageState::Empty;
        let page = load_image(image_path)?;
        let regions = self.detector.detect(&page)?;
        debug!(
            path = %image_path.display(),
            regions = regions.len(),
            "page loaded and segmented"
        );

        self.state = PageState::PageLoaded { page, regions };
        Ok(())
    }

    /// Partitions the current page's region set into typed block groups.
    ///
    /// Idempotent once partitioned; the groups are derived data recomputed
    /// per page.
    ///
    /// # Errors
    ///
    /// `NotInitialized` if no page has been loaded.
    pub fn partition_regions(&mut self) -> Result<(), ExtractError> {
        match std::mem::replace(&mut self.state, PageState::Empty) {
            PageState::Empty => Err(ExtractError::NotInitialized {
                operation: "partition_regions",
                prerequisite: "load_page",
            }),
            PageState::PageLoaded { page, regions } => {
                let blocks = BlockGroups::partition(regions);
                debug!(
                    text = blocks.text.len(),
                    figures = blocks.figures.len(),
                    titles = blocks.titles.len(),
                    "regions partitioned"
                );
                self.state = PageState::Partitioned { page, blocks };
                Ok(())
            }
            partitioned @ PageState::Partitioned { .. } => {
                self.state = partitioned;
                Ok(())
            }
        }
    }

    /// The current page's block groups, if partitioning has run.
    pub fn blocks(&self) -> Option<&BlockGroups> {
        match &self.state {
            PageState::Partitioned { blocks, .. } => Some(blocks),
            _ => None,
        }
    }

    /// Extracts (caption, figure) pairs for every figure on the current
    /// page, in detected order.
    ///
    /// A figure whose title match, crop, or OCR fails is skipped with a
    /// warning; the remaining figures are still processed. The result length
    /// is therefore at most the figure count.
    ///
    /// # Errors
    ///
    /// `NotInitialized` if `partition_regions` has not run for the current
    /// page. Per-figure failures are never surfaced as an error.
    pub fn caption_figure_pairs(&self) -> Result<Vec<CaptionFigurePair>, ExtractError> {
        let PageState::Partitioned { page, blocks } = &self.state else {
            return Err(ExtractError::NotInitialized {
                operation: "caption_figure_pairs",
                prerequisite: "partition_regions",
            });
        };

        let tolerances = MatchTolerances {
            x: self.config.x_tolerance,
            y: self.config.y_tolerance,
        };

        let mut pairs = Vec::new();
        for (index, figure) in blocks.figures.iter().enumerate() {
            match find_title(&figure.bbox, &blocks.titles, tolerances) {
                TitleMatch::NotFound => {
                    warn!(
                        figure = index,
                        bbox = %figure.bbox,
                        "figure found without corresponding title, skipping"
                    );
                }
                TitleMatch::Found(title) => {
                    match self.extract_pair(page, figure, title) {
                        Ok(pair) => pairs.push(pair),
                        Err(error) => {
                            warn!(
                                figure = index,
                                error = %error,
                                "failed to process figure/title pair, skipping"
                            );
                        }
                    }
                }
            }
        }

        debug!(
            figures = blocks.figures.len(),
            pairs = pairs.len(),
            "caption/figure extraction complete"
        );
        Ok(pairs)
    }

    /// Crops one figure/title pair out of the page and recognizes the title
    /// text. Any failure here is isolated to this figure by the caller.
    fn extract_pair(
        &self,
        page: &RgbImage,
        figure: &Region,
        title: &Region,
    ) -> Result<CaptionFigurePair, ExtractError> {
        let (page_width, page_height) = page.dimensions();
        let padded = title
            .bbox
            .padded(self.config.title_padding, page_width, page_height);

        let title_image = crop_box(page, &padded)
            .map_err(|e| ExtractError::extraction(format!("cropping title at {padded}"), e))?;
        let caption = self
            .recognizer
            .recognize(&title_image)
            .map_err(|e| match e {
                recognition @ ExtractError::Recognition { .. } => recognition,
                other => ExtractError::recognition(format!("title at {}", title.bbox), other),
            })?;
        let figure_image = crop_box(page, &figure.bbox)
            .map_err(|e| ExtractError::extraction(format!("cropping figure at {}", figure.bbox), e))?;

        Ok(CaptionFigurePair {
            caption: caption.trim().to_string(),
            figure: figure_image,
        })
    }

    /// Crops an arbitrary region's bounding box from the current page.
    ///
    /// # Errors
    ///
    /// `NotLoaded` if no page is loaded, or `InvalidBox` if the region falls
    /// outside the page.
    pub fn crop_region(&self, region: &Region) -> Result<RgbImage, ExtractError> {
        let page = match &self.state {
            PageState::Empty => {
                return Err(ExtractError::NotLoaded {
                    operation: "crop_region",
                });
            }
            PageState::PageLoaded { page, .. } | PageState::Partitioned { page, .. } => page,
        };
        crop_box(page, &region.bbox)
    }
}
