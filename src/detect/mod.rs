//! Detector boundary: backend trait, bundled backends, and the per-frame
//! detection context.

mod backend;
mod backends;
mod detector;
mod labels;

pub use backend::{BoundingBox, Detection, DetectorBackend};
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use detector::FrameDetector;
pub use labels::{coco_labels, COCO_LABELS};

use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const BOX_COLOR: Rgb<u8> = Rgb([255, 64, 64]);

/// Overlay hollow boxes for each detection on an RGB frame.
///
/// Boxes are clamped to at least 1x1; `draw_hollow_rect_mut` clips anything
/// that runs past the frame edge.
pub(crate) fn draw_detections(canvas: &mut image::RgbImage, detections: &[Detection]) {
    for detection in detections {
        let rect = Rect::at(detection.bbox.x as i32, detection.bbox.y as i32).of_size(
            (detection.bbox.w as u32).max(1),
            (detection.bbox.h as u32).max(1),
        );
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }
}
