use anyhow::Result;

/// One decoded image message from a sensor-log archive.
#[derive(Clone, Debug)]
pub struct DecodedFrame {
    /// Capture time in nanoseconds since epoch (archive message stamp).
    pub stamp_ns: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major RGB8 pixels, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

/// Ordered frame source over one image topic of an archive.
///
/// Implementations adapt an archive reader (an external collaborator) to this
/// boundary. Frames come back in log order; `None` means end of archive.
pub trait FrameSource {
    /// Source identifier.
    fn name(&self) -> &'static str;

    /// Next frame in log order.
    fn next_frame(&mut self) -> Result<Option<DecodedFrame>>;
}
