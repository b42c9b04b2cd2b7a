#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::backend::{BoundingBox, Detection, DetectorBackend};
use crate::detect::draw_detections;
use crate::detect::labels::coco_labels;

const DEFAULT_CONFIDENCE: f32 = 0.5;
const NMS_IOU: f32 = 0.45;

/// Tract-based backend for COCO-trained YOLO-family ONNX models.
///
/// Loads a local model file once and runs it on resized RGB frames. The model
/// output is expected in the `(1, 4 + num_classes, anchors)` layout used by
/// recent YOLO exports: four box rows (center x/y, width, height in input
/// pixels) followed by one score row per class.
pub struct TractBackend {
    model: TypedSimplePlan<TypedModel>,
    labels: Vec<String>,
    input_width: u32,
    input_height: u32,
    confidence_threshold: f32,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, input_width: u32, input_height: u32) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, input_height as usize, input_width as usize),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            labels: coco_labels(),
            input_width,
            input_height,
            confidence_threshold: DEFAULT_CONFIDENCE,
        })
    }

    /// Override the default confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    fn build_input(&self, rgb: &image::RgbImage) -> Tensor {
        let width = self.input_width as usize;
        let height = self.input_height as usize;
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, height, width),
            |(_, channel, y, x)| rgb.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
        );
        input.into_tensor()
    }

    fn decode_output(
        &self,
        outputs: TVec<TValue>,
        scale_x: f32,
        scale_y: f32,
    ) -> Result<Vec<Detection>> {
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let shape = view.shape();
        if shape.len() != 3 || shape[0] != 1 || shape[1] != 4 + self.labels.len() {
            return Err(anyhow!(
                "unexpected model output shape {:?}, wanted (1, {}, anchors)",
                shape,
                4 + self.labels.len()
            ));
        }

        let preds = view.index_axis(tract_ndarray::Axis(0), 0);
        let anchors = shape[2];
        let mut candidates = Vec::new();
        for anchor in 0..anchors {
            let mut best_class = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for class_id in 0..self.labels.len() {
                let score = preds[[4 + class_id, anchor]];
                if score > best_score {
                    best_score = score;
                    best_class = class_id;
                }
            }
            if best_score < self.confidence_threshold {
                continue;
            }
            let cx = preds[[0, anchor]];
            let cy = preds[[1, anchor]];
            let w = preds[[2, anchor]];
            let h = preds[[3, anchor]];
            candidates.push(Detection {
                class_id: best_class,
                confidence: best_score,
                bbox: BoundingBox {
                    x: (cx - w / 2.0) * scale_x,
                    y: (cy - h / 2.0) * scale_y,
                    w: w * scale_x,
                    h: h * scale_y,
                },
            });
        }

        Ok(non_max_suppression(candidates, NMS_IOU))
    }
}

impl DetectorBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn detect_file(&mut self, image_path: &Path, scratch_dir: &Path) -> Result<Vec<Detection>> {
        let file_name = image_path
            .file_name()
            .ok_or_else(|| anyhow!("image path {} has no file name", image_path.display()))?;

        let original = image::open(image_path)
            .with_context(|| format!("failed to decode {}", image_path.display()))?
            .to_rgb8();
        let (orig_width, orig_height) = original.dimensions();
        let resized = image::imageops::resize(
            &original,
            self.input_width,
            self.input_height,
            image::imageops::FilterType::Triangle,
        );

        let input = self.build_input(&resized);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        let detections = self.decode_output(
            outputs,
            orig_width as f32 / self.input_width as f32,
            orig_height as f32 / self.input_height as f32,
        )?;

        let mut annotated = original;
        draw_detections(&mut annotated, &detections);
        let artifact = scratch_dir.join(file_name);
        annotated
            .save(&artifact)
            .with_context(|| format!("failed to write artifact {}", artifact.display()))?;

        Ok(detections)
    }
}

/// Greedy per-class NMS. Keeps the highest-confidence box, drops overlaps.
fn non_max_suppression(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|existing| {
            existing.class_id == candidate.class_id
                && iou(&existing.bbox, &candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = (a.x + a.w).min(b.x + b.w);
    let bottom = (a.y + a.h).min(b.y + b.h);
    let intersection = (right - left).max(0.0) * (bottom - top).max(0.0);
    let union = a.w * a.h + b.w * b.h - intersection;
    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, conf: f32, class_id: usize) -> Detection {
        Detection {
            class_id,
            confidence: conf,
            bbox: BoundingBox {
                x,
                y,
                w: 10.0,
                h: 10.0,
            },
        }
    }

    #[test]
    fn nms_drops_same_class_overlaps() {
        let kept = non_max_suppression(
            vec![boxed(0.0, 0.0, 0.6, 2), boxed(1.0, 1.0, 0.9, 2)],
            0.45,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn nms_keeps_overlaps_of_different_classes() {
        let kept = non_max_suppression(
            vec![boxed(0.0, 0.0, 0.6, 2), boxed(1.0, 1.0, 0.9, 7)],
            0.45,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BoundingBox {
            x: 0.0,
            y: 0.0,
            w: 5.0,
            h: 5.0,
        };
        let b = BoundingBox {
            x: 100.0,
            y: 100.0,
            w: 5.0,
            h: 5.0,
        };
        assert_eq!(iou(&a, &b), 0.0);
    }
}
