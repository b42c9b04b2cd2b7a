use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use image::RgbImage;

use super::source::FrameSource;

/// Filename for a frame captured at `stamp_ns`: `YYYY-MM-DD_HH-MM-SS.jpg`,
/// UTC, second resolution. Two frames inside the same second collide and the
/// later one wins; at typical camera topic rates the extractor is expected to
/// be fed a decimated topic, matching the original export convention.
pub fn frame_file_name(stamp_ns: u64) -> Result<String> {
    let secs = (stamp_ns / 1_000_000_000) as i64;
    let dt = DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| anyhow!("frame stamp {} ns is out of datetime range", stamp_ns))?;
    Ok(format!("{}.jpg", dt.format("%Y-%m-%d_%H-%M-%S")))
}

/// Drain a frame source into `export_dir`, one JPEG per frame.
///
/// Creates the directory if needed and returns the number of frames written.
pub fn export_frames(source: &mut dyn FrameSource, export_dir: &Path) -> Result<usize> {
    fs::create_dir_all(export_dir)
        .with_context(|| format!("failed to create export dir {}", export_dir.display()))?;

    let mut written = 0usize;
    while let Some(frame) = source.next_frame()? {
        let image = RgbImage::from_raw(frame.width, frame.height, frame.pixels).ok_or_else(
            || {
                anyhow!(
                    "frame at {} ns: pixel buffer does not match {}x{}",
                    frame.stamp_ns,
                    frame.width,
                    frame.height
                )
            },
        )?;
        let path = export_dir.join(frame_file_name(frame.stamp_ns)?);
        image
            .save(&path)
            .with_context(|| format!("failed to write frame {}", path.display()))?;
        log::debug!("exported {}", path.display());
        written += 1;
    }

    log::info!(
        "exported {} frames from {} source to {}",
        written,
        source.name(),
        export_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SyntheticSource;

    #[test]
    fn file_name_encodes_utc_capture_time() {
        // 2025-02-21 15:46:30 UTC
        let name = frame_file_name(1_740_152_790_000_000_000).unwrap();
        assert_eq!(name, "2025-02-21_15-46-30.jpg");
    }

    #[test]
    fn export_writes_one_decodable_jpeg_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = SyntheticSource::new(1_740_152_790_000_000_000, 1_000_000_000, 2);

        let written = export_frames(&mut source, dir.path()).unwrap();
        assert_eq!(written, 2);

        let first = dir.path().join("2025-02-21_15-46-30.jpg");
        let second = dir.path().join("2025-02-21_15-46-31.jpg");
        assert!(first.exists() && second.exists());

        let decoded = image::open(&first).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (64, 48));
    }
}
