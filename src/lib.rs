//! framesift
//!
//! Offline analysis of recorded robot camera data: extract frames from a
//! sensor-log archive, run object detection over the resulting directory, and
//! assemble a time-ordered table of per-frame class presence.
//!
//! # Pipeline
//!
//! Two independent stages, run separately and coupled only through a
//! directory of timestamped image files:
//!
//! 1. **Extraction** (`extract_frames`): one image topic of an archive is
//!    decoded into JPEG files named `YYYY-MM-DD_HH-MM-SS.jpg` (UTC).
//! 2. **Batch detection** (`detect_batch`): every recognized image in the
//!    directory is timestamp-parsed, run through a detector backend, and
//!    reduced to a binary presence vector over the class catalog. Rows of
//!    `[timestamp, presence bits]` are saved as `detection_results.npy` in
//!    the input directory; annotated frames land in a results subdirectory.
//!
//! # Module structure
//!
//! - `timestamp`: filename → epoch seconds, ordered format priority list
//! - `catalog`: class catalog resolution and presence-vector encoding
//! - `detect`: backend trait, bundled backends, per-frame detection context
//! - `batch`: directory processor and results-table assembly
//! - `table`: `.npy` persistence of the results table
//! - `extract`: archive → frame-directory stage
//! - `config`: startup configuration (file + env overrides)

pub mod batch;
pub mod catalog;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod table;
pub mod timestamp;

pub use batch::{BatchProcessor, BatchSummary};
pub use catalog::ClassCatalog;
pub use config::{DetectorSettings, PipelineConfig};
pub use detect::{BoundingBox, Detection, DetectorBackend, FrameDetector, StubBackend};
#[cfg(feature = "backend-tract")]
pub use detect::TractBackend;
pub use error::{ConfigError, FormatError};
pub use extract::{DecodedFrame, FrameSource, SyntheticSource};
pub use table::{read_npy, write_npy, ResultsTable, RESULTS_FILE_NAME};
pub use timestamp::parse_timestamp;
