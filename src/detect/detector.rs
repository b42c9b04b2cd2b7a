use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::catalog::ClassCatalog;

use super::backend::DetectorBackend;

/// Per-frame detection context.
///
/// Holds the backend, the catalog resolved against the backend vocabulary,
/// and the scratch/results directories. Constructed once at startup and
/// passed into every call, which keeps the "load the model once, reuse it for
/// the whole batch" behavior without any process-global state.
pub struct FrameDetector {
    backend: Box<dyn DetectorBackend>,
    catalog: ClassCatalog,
    scratch_dir: PathBuf,
    results_dir: PathBuf,
}

impl FrameDetector {
    /// Resolve `classes` against the backend vocabulary and set up the
    /// results directory. Catalog resolution failure is fatal; it aborts
    /// before any frame is processed.
    pub fn new(
        backend: Box<dyn DetectorBackend>,
        classes: &[String],
        scratch_dir: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let catalog = ClassCatalog::resolve(classes, backend.labels())?;
        let results_dir = results_dir.into();
        fs::create_dir_all(&results_dir).with_context(|| {
            format!("failed to create results dir {}", results_dir.display())
        })?;
        Ok(Self {
            backend,
            catalog,
            scratch_dir: scratch_dir.into(),
            results_dir,
        })
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run detection on one frame.
    ///
    /// Clears the scratch location (stale artifacts from an earlier run would
    /// otherwise be relocated as if they were fresh), runs the backend, keeps
    /// only catalog classes, and moves the annotated artifact into the
    /// results directory under the original filename. A missing artifact is
    /// an I/O error and propagates: the batch must not finish with a results
    /// directory that disagrees with the table.
    pub fn process(&mut self, image_path: &Path) -> Result<HashSet<String>> {
        let file_name = image_path
            .file_name()
            .ok_or_else(|| anyhow!("image path {} has no file name", image_path.display()))?;

        if self.scratch_dir.exists() {
            fs::remove_dir_all(&self.scratch_dir).with_context(|| {
                format!("failed to clear scratch dir {}", self.scratch_dir.display())
            })?;
        }
        fs::create_dir_all(&self.scratch_dir).with_context(|| {
            format!("failed to create scratch dir {}", self.scratch_dir.display())
        })?;

        let detections = self.backend.detect_file(image_path, &self.scratch_dir)?;

        let labels = self.backend.labels();
        let mut detected = HashSet::new();
        for detection in &detections {
            let name = labels.get(detection.class_id).ok_or_else(|| {
                anyhow!(
                    "backend {} returned class id {} outside its vocabulary",
                    self.backend.name(),
                    detection.class_id
                )
            })?;
            if self.catalog.contains(name) {
                detected.insert(name.clone());
            }
        }

        let artifact = self.scratch_dir.join(file_name);
        let destination = self.results_dir.join(file_name);
        relocate(&artifact, &destination).with_context(|| {
            format!(
                "failed to move annotated frame {} to {}",
                artifact.display(),
                destination.display()
            )
        })?;

        Ok(detected)
    }
}

/// Move a file, falling back to copy+remove when rename crosses filesystems
/// (the scratch dir usually lives under /tmp).
fn relocate(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}
