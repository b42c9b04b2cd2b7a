//! Frame extraction stage.
//!
//! Turns one image topic of a robot sensor-log archive into a directory of
//! JPEG files whose names encode the capture timestamp
//! (`YYYY-MM-DD_HH-MM-SS.jpg`, UTC). The batch detector consumes that
//! directory in a separate run; the filesystem convention is the only
//! coupling between the two stages.
//!
//! The archive reader and message deserializer are external collaborators.
//! `FrameSource` is the typed boundary they are adapted to; the crate ships a
//! synthetic source for tests and demos.

mod source;
mod synthetic;
mod writer;

pub use source::{DecodedFrame, FrameSource};
pub use synthetic::SyntheticSource;
pub use writer::{export_frames, frame_file_name};
