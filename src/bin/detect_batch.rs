//! detect_batch - batch object-presence detection over a directory of frames

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use framesift::batch::{list_image_files, BatchProcessor};
use framesift::{DetectorBackend, FrameDetector, PipelineConfig};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory of timestamped frames to process.
    #[arg(long, default_value = "./converted")]
    image_dir: PathBuf,
    /// Directory for annotated output frames. Defaults to
    /// `<image-dir>/detections`.
    #[arg(long)]
    results_dir: Option<PathBuf>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

#[cfg(feature = "backend-tract")]
fn build_backend(cfg: &PipelineConfig) -> Result<Box<dyn DetectorBackend>> {
    let backend = framesift::TractBackend::new(
        &cfg.detector.model_path,
        cfg.detector.input_width,
        cfg.detector.input_height,
    )?
    .with_threshold(cfg.detector.confidence);
    Ok(Box::new(backend))
}

#[cfg(not(feature = "backend-tract"))]
fn build_backend(_cfg: &PipelineConfig) -> Result<Box<dyn DetectorBackend>> {
    log::warn!("built without backend-tract; using the stub backend (no detections)");
    Ok(Box::new(framesift::StubBackend::new()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty, !stdout_is_tty);

    let cfg = PipelineConfig::load()?;
    let results_dir = args
        .results_dir
        .unwrap_or_else(|| args.image_dir.join("detections"));

    // Start from a clean results directory; leftovers from an earlier run
    // would be indistinguishable from this run's artifacts.
    if results_dir.exists() {
        std::fs::remove_dir_all(&results_dir)?;
    }

    let mut processor = {
        let _stage = ui.stage("Load detector");
        let backend = build_backend(&cfg)?;
        let detector = FrameDetector::new(
            backend,
            &cfg.classes,
            cfg.detector.scratch_dir.clone(),
            results_dir,
        )?;
        BatchProcessor::new(detector)
    };

    let total = list_image_files(&args.image_dir)?.len() as u64;
    let summary = {
        let progress = ui.counted("Detect frames", total);
        processor.run_with_progress(&args.image_dir, |_| progress.advance())?
    };

    println!(
        "saved {} rows to {} ({} files skipped)",
        summary.processed,
        summary.table_path.display(),
        summary.skipped
    );
    Ok(())
}
