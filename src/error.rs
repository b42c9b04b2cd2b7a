//! Error taxonomy for the batch pipeline.
//!
//! Only two failure classes get dedicated types, because only two need to be
//! told apart by callers:
//!
//! - `FormatError`: a filename that encodes no recognizable timestamp. Per-file
//!   and recoverable; the directory processor logs it and moves on.
//! - `ConfigError`: the catalog or detector settings are unusable. Fatal at
//!   startup, before any frame is touched.
//!
//! Everything else (I/O, decode, inference) propagates as `anyhow::Error` with
//! context and aborts the batch.

use thiserror::Error;

/// A filename that matches none of the known timestamp formats.
///
/// Carries the offending filename verbatim so skip notices can name it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("filename {filename:?} does not match any known timestamp format")]
pub struct FormatError {
    pub filename: String,
}

impl FormatError {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// Fatal startup validation failure. No partial run happens after one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("class catalog must not be empty")]
    EmptyCatalog,

    #[error("class {name:?} is not in the detector vocabulary ({vocabulary_size} labels)")]
    UnknownClass { name: String, vocabulary_size: usize },

    #[error("confidence threshold must be within (0, 1], got {value}")]
    InvalidConfidence { value: f32 },
}
