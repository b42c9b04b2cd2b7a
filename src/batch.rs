//! Directory processor: drives the frame detector over every image in a
//! directory and assembles the results table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::detect::FrameDetector;
use crate::table::{ResultsTable, RESULTS_FILE_NAME};
use crate::timestamp::parse_timestamp;

/// Extensions treated as frames, matched case-insensitively.
const RECOGNIZED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Outcome of one batch run.
#[derive(Clone, Debug)]
pub struct BatchSummary {
    /// Frames that produced a table row.
    pub processed: usize,
    /// Frames skipped because their filename encodes no known timestamp.
    pub skipped: usize,
    /// Where the table was written.
    pub table_path: PathBuf,
}

/// Sequential batch driver around a `FrameDetector`.
pub struct BatchProcessor {
    detector: FrameDetector,
}

impl BatchProcessor {
    pub fn new(detector: FrameDetector) -> Self {
        Self { detector }
    }

    /// Process every recognized image file in `image_dir`.
    ///
    /// Files are visited in filename order so repeated runs over an unchanged
    /// directory produce byte-identical tables. Per file: parse the capture
    /// timestamp (a `FormatError` logs a skip notice and moves on), run
    /// detection, append `[timestamp, presence bits]` to the table. Any other
    /// failure aborts the batch before the table is written.
    ///
    /// The finished table lands at `image_dir/detection_results.npy`; a batch
    /// with zero processed frames still writes a zero-row table of the
    /// catalog's width.
    pub fn run(&mut self, image_dir: &Path) -> Result<BatchSummary> {
        self.run_with_progress(image_dir, |_| {})
    }

    /// Same as `run`, invoking `progress` with each filename once it has been
    /// handled (processed or skipped). The CLI hangs its progress bar here.
    pub fn run_with_progress(
        &mut self,
        image_dir: &Path,
        mut progress: impl FnMut(&str),
    ) -> Result<BatchSummary> {
        let files = list_image_files(image_dir)?;
        log::info!(
            "processing {} frames in {} with {} backend",
            files.len(),
            image_dir.display(),
            self.detector.backend_name()
        );

        let mut table = ResultsTable::new(self.detector.catalog().len());
        let mut skipped = 0usize;

        for path in &files {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();

            let timestamp = match parse_timestamp(file_name) {
                Ok(timestamp) => timestamp,
                Err(err) => {
                    log::warn!("skipping {}: {}", file_name, err);
                    skipped += 1;
                    progress(file_name);
                    continue;
                }
            };

            let detected = self
                .detector
                .process(path)
                .with_context(|| format!("failed to process {}", path.display()))?;
            let vector = self.detector.catalog().presence_vector(&detected);

            log::info!("processed {}: {:?}", file_name, vector);
            table.push(timestamp, &vector);
            progress(file_name);
        }

        let table_path = image_dir.join(RESULTS_FILE_NAME);
        table.save(&table_path)?;
        log::info!(
            "saved {} rows to {}",
            table.num_rows(),
            table_path.display()
        );

        Ok(BatchSummary {
            processed: table.num_rows(),
            skipped,
            table_path,
        })
    }
}

/// Recognized image files in `dir`, sorted by filename.
pub fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read image dir {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && has_recognized_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            RECOGNIZED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
