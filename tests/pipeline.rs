//! End-to-end pipeline tests with fake detection and OCR collaborators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbImage;

use figcap::prelude::*;

/// Detector fake that returns a scripted region set for every page.
struct ScriptedDetector {
    regions: Vec<Region>,
}

impl RegionDetector for ScriptedDetector {
    fn detect(&self, _page: &RgbImage) -> Result<Vec<Region>, ExtractError> {
        Ok(self.regions.clone())
    }
}

/// Recognizer fake that labels each call in order: "caption 0", "caption 1", ...
struct CountingRecognizer {
    calls: AtomicUsize,
}

impl CountingRecognizer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl TextRecognizer for CountingRecognizer {
    fn recognize(&self, _image: &RgbImage) -> Result<String, ExtractError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("caption {call}"))
    }
}

fn region(region_type: RegionType, x1: f32, y1: f32, x2: f32, y2: f32) -> Region {
    Region::new(
        region_type,
        BoundingBox::new(x1, y1, x2, y2).unwrap(),
        0.95,
    )
}

fn write_page(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("page0.png");
    RgbImage::new(width, height).save(&path).unwrap();
    path
}

fn extractor(
    regions: Vec<Region>,
) -> PageExtractor<ScriptedDetector, CountingRecognizer> {
    PageExtractor::new(
        ScriptedDetector { regions },
        CountingRecognizer::new(),
        ExtractorConfig::default(),
    )
    .unwrap()
}

#[test]
fn pairs_follow_figure_order_and_skip_unmatched() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), 800, 900);

    // Three figures in detection order; the middle one has no qualifying
    // title (nothing below it within tolerance).
    let regions = vec![
        region(RegionType::Figure, 100.0, 60.0, 300.0, 95.0),
        region(RegionType::Title, 100.0, 100.0, 220.0, 120.0),
        region(RegionType::Figure, 100.0, 150.0, 300.0, 260.0),
        region(RegionType::Figure, 100.0, 400.0, 300.0, 500.0),
        region(RegionType::Title, 105.0, 505.0, 240.0, 525.0),
        region(RegionType::Text, 400.0, 60.0, 700.0, 500.0),
    ];

    let mut extractor = extractor(regions);
    extractor.load_page(&page).unwrap();
    extractor.partition_regions().unwrap();

    let pairs = extractor.caption_figure_pairs().unwrap();
    assert_eq!(pairs.len(), 2);
    // Figures are processed in detected order, so captions come back in
    // recognizer call order.
    assert_eq!(pairs[0].caption, "caption 0");
    assert_eq!(pairs[1].caption, "caption 1");
    assert_eq!(pairs[0].figure.dimensions(), (200, 35));
    assert_eq!(pairs[1].figure.dimensions(), (200, 100));
}

#[test]
fn unrecognized_regions_never_reach_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), 400, 400);

    let regions = vec![
        region(RegionType::Other, 0.0, 0.0, 400.0, 400.0),
        region(RegionType::Figure, 100.0, 60.0, 300.0, 95.0),
        region(RegionType::Title, 100.0, 100.0, 220.0, 114.0),
    ];

    let mut extractor = extractor(regions);
    extractor.load_page(&page).unwrap();
    extractor.partition_regions().unwrap();

    let blocks = extractor.blocks().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(extractor.caption_figure_pairs().unwrap().len(), 1);
}

#[test]
fn reloading_a_page_resets_partition_state() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), 400, 400);

    let regions = vec![
        region(RegionType::Figure, 100.0, 60.0, 300.0, 95.0),
        region(RegionType::Title, 100.0, 100.0, 220.0, 114.0),
    ];

    let mut extractor = extractor(regions);
    extractor.load_page(&page).unwrap();
    extractor.partition_regions().unwrap();
    extractor.caption_figure_pairs().unwrap();

    // After loading a new page the old partition must not leak through.
    extractor.load_page(&page).unwrap();
    let err = extractor.caption_figure_pairs().unwrap_err();
    assert!(matches!(err, ExtractError::NotInitialized { .. }));
}

#[test]
fn title_padding_is_clamped_at_page_corner() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), 400, 400);

    // Figure hugging the left edge with a title at the page corner below
    // it would push the 5 px pad negative without clamping.
    let regions = vec![
        region(RegionType::Figure, 1.0, 10.0, 200.0, 50.0),
        region(RegionType::Title, 1.0, 50.0, 120.0, 60.0),
    ];

    let mut extractor = extractor(regions);
    extractor.load_page(&page).unwrap();
    extractor.partition_regions().unwrap();

    let pairs = extractor.caption_figure_pairs().unwrap();
    assert_eq!(pairs.len(), 1);
}

#[test]
fn batch_survives_figure_whose_crop_leaves_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(dir.path(), 400, 400);

    // The detector reports a figure entirely off the page (model noise);
    // its crop fails and only that figure is dropped.
    let regions = vec![
        region(RegionType::Figure, 500.0, 60.0, 700.0, 95.0),
        region(RegionType::Title, 450.0, 100.0, 600.0, 114.0),
        region(RegionType::Figure, 100.0, 60.0, 300.0, 95.0),
        region(RegionType::Title, 100.0, 100.0, 220.0, 114.0),
    ];

    let mut extractor = extractor(regions);
    extractor.load_page(&page).unwrap();
    extractor.partition_regions().unwrap();

    let pairs = extractor.caption_figure_pairs().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].figure.dimensions(), (200, 35));
}
