//! Figure/Caption Extraction Example
//!
//! Rasterizes a PDF, runs layout detection on each page, and writes every
//! extracted figure image next to a text file holding its OCR caption.
//!
//! # Usage
//!
//! ```bash
//! cargo run --features tesseract --example extract_figures -- \
//!     --model models/layout.onnx \
//!     --output-dir out \
//!     paper.pdf
//! ```

use std::path::PathBuf;

use clap::Parser;
#[cfg(feature = "tesseract")]
use tracing::{info, warn};

#[cfg(feature = "tesseract")]
use figcap::prelude::*;

/// Command-line arguments
#[allow(dead_code)]
#[derive(Parser)]
#[command(name = "extract_figures")]
#[command(about = "Extract figure images and their captions from a PDF")]
struct Args {
    /// Path to the input PDF document
    document: PathBuf,

    /// Path to the layout detection ONNX model
    #[arg(long)]
    model: PathBuf,

    /// Directory for page images and extracted figures
    #[arg(long, default_value = "out")]
    output_dir: PathBuf,

    /// Detector confidence threshold
    #[arg(long, default_value_t = 0.5)]
    confidence: f32,

    /// Render resolution in DPI
    #[arg(long, default_value_t = 150)]
    dpi: u32,

    /// Tesseract language code
    #[arg(long, default_value = "eng")]
    language: String,
}

#[cfg(feature = "tesseract")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // PubLayNet class ids.
    let label_map = LabelMap::new([
        (0, "Text".to_string()),
        (1, "Title".to_string()),
        (2, "List".to_string()),
        (3, "Table".to_string()),
        (4, "Figure".to_string()),
    ]);

    let detector = LayoutDetector::new(&args.model, label_map.clone(), args.confidence)?;
    let recognizer = TesseractRecognizer::new(&args.language)?;
    let config = ExtractorConfig {
        confidence_threshold: args.confidence,
        label_map,
        ..Default::default()
    };
    let mut extractor = PageExtractor::new(detector, recognizer, config)?;

    let rasterizer = PdfRasterizer::with_dpi(args.dpi)?;
    let pages = rasterizer.rasterize(&args.document, &args.output_dir)?;
    info!(pages = pages.len(), "document rasterized");

    let mut total = 0usize;
    for (page_index, page_path) in pages.iter().enumerate() {
        extractor.load_page(page_path)?;
        extractor.partition_regions()?;

        let pairs = extractor.caption_figure_pairs()?;
        if pairs.is_empty() {
            warn!(page = page_index, "no captioned figures on page");
            continue;
        }

        for (figure_index, pair) in pairs.iter().enumerate() {
            let stem = format!("page{page_index}_figure{figure_index}");
            let image_path = args.output_dir.join(format!("{stem}.png"));
            pair.figure.save(&image_path)?;
            std::fs::write(args.output_dir.join(format!("{stem}.txt")), &pair.caption)?;
            info!(
                page = page_index,
                figure = figure_index,
                caption = %pair.caption,
                "figure extracted"
            );
            total += 1;
        }
    }

    info!(figures = total, "extraction complete");
    Ok(())
}

#[cfg(not(feature = "tesseract"))]
fn main() {
    eprintln!("this example requires the `tesseract` feature:");
    eprintln!("  cargo run --features tesseract --example extract_figures -- --help");
}
