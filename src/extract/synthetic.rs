use anyhow::Result;

use super::source::{DecodedFrame, FrameSource};

/// Deterministic in-process source for tests and `stub://` demo runs.
///
/// Emits a fixed number of gradient frames at a fixed period starting from a
/// configured epoch. Pixel content varies per frame so downstream consumers
/// can tell frames apart.
pub struct SyntheticSource {
    start_ns: u64,
    period_ns: u64,
    total: u64,
    width: u32,
    height: u32,
    emitted: u64,
}

impl SyntheticSource {
    pub fn new(start_ns: u64, period_ns: u64, total: u64) -> Self {
        Self {
            start_ns,
            period_ns,
            total,
            width: 64,
            height: 48,
            emitted: 0,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let pixel_count = (self.width * self.height * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.emitted * 7) % 256) as u8;
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn next_frame(&mut self) -> Result<Option<DecodedFrame>> {
        if self.emitted >= self.total {
            return Ok(None);
        }
        let frame = DecodedFrame {
            stamp_ns: self.start_ns + self.emitted * self.period_ns,
            width: self.width,
            height: self.height,
            pixels: self.generate_pixels(),
        };
        self.emitted += 1;
        Ok(Some(frame))
    }
}
