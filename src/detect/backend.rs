use std::path::Path;

use anyhow::Result;

/// Axis-aligned box in original-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One detected object: a class id into the backend vocabulary, a confidence,
/// and a box. The batch pipeline only consumes the class id; confidence and
/// box feed the annotated artifact.
#[derive(Clone, Debug)]
pub struct Detection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Detector backend trait.
///
/// The detection model is an external collaborator; this trait is the whole
/// of its contract with the pipeline:
///
/// - `labels` is the model's label vocabulary, indexed by class id. The class
///   catalog is resolved against it once at startup.
/// - `detect_file` runs inference on one image file and, as a side artifact,
///   MUST write an annotated copy of the image into `scratch_dir` under the
///   original filename. The caller relocates that artifact afterwards; a
///   backend that produces no artifact fails the batch at the relocation
///   step.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Label vocabulary, indexed by class id.
    fn labels(&self) -> &[String];

    /// Run detection on one image file, writing the annotated artifact into
    /// `scratch_dir` under the original filename.
    fn detect_file(&mut self, image_path: &Path, scratch_dir: &Path) -> Result<Vec<Detection>>;
}
