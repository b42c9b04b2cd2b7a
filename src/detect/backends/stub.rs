use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::detect::backend::{BoundingBox, Detection, DetectorBackend};
use crate::detect::draw_detections;
use crate::detect::labels::coco_labels;

/// Scripted backend for tests and dry runs.
///
/// Detections are keyed by file stem; files without a script entry yield no
/// detections. The image is still decoded and an annotated copy is written to
/// the scratch directory, so the artifact-relocation path behaves exactly as
/// it does with a real model.
pub struct StubBackend {
    labels: Vec<String>,
    script: HashMap<String, Vec<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            labels: coco_labels(),
            script: HashMap::new(),
        }
    }

    /// Script the classes to "detect" for a given file stem.
    pub fn with_detections(mut self, file_stem: &str, classes: &[&str]) -> Self {
        self.script.insert(
            file_stem.to_string(),
            classes.iter().map(|class| class.to_string()).collect(),
        );
        self
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn detect_file(&mut self, image_path: &Path, scratch_dir: &Path) -> Result<Vec<Detection>> {
        let file_name = image_path
            .file_name()
            .ok_or_else(|| anyhow!("image path {} has no file name", image_path.display()))?;
        let stem = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();

        let mut annotated = image::open(image_path)
            .with_context(|| format!("failed to decode {}", image_path.display()))?
            .to_rgb8();
        let (width, height) = annotated.dimensions();

        let scripted = self.script.get(stem).cloned().unwrap_or_default();
        let mut detections = Vec::with_capacity(scripted.len());
        for (index, class) in scripted.iter().enumerate() {
            let class_id = self
                .labels
                .iter()
                .position(|label| label == class)
                .ok_or_else(|| anyhow!("scripted class {:?} is not a COCO label", class))?;
            // Spread boxes diagonally so overlapping scripted classes stay visible.
            let offset = (index as f32 * 0.1).min(0.5);
            detections.push(Detection {
                class_id,
                confidence: 0.9,
                bbox: BoundingBox {
                    x: offset * width as f32,
                    y: offset * height as f32,
                    w: width as f32 * 0.4,
                    h: height as f32 * 0.4,
                },
            });
        }

        draw_detections(&mut annotated, &detections);
        let artifact = scratch_dir.join(file_name);
        annotated
            .save(&artifact)
            .with_context(|| format!("failed to write artifact {}", artifact.display()))?;

        Ok(detections)
    }
}
