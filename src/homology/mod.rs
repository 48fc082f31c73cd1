//! Running the external aligner and turning its output into scored results.
//!
//! - [`last`]: the LAST (`lastal`) search orchestrator and its configuration
//! - [`scoring`]: bit-score conversion and per-alignment statistics
//!
//! Every failure is reported as a [`HomologyError`] so callers can match on
//! the kind of failure rather than on message text.

pub mod last;
pub mod scoring;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomologyError {
    /// Unreadable or invalid database descriptor, or bad temp directory setup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The aligner could not be started or exited with a non-zero status
    #[error("Error running {program}: {stderr}")]
    Subprocess {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The aligner ran longer than the configured timeout and was killed
    #[error("Timed out after {seconds}s waiting for {program} to run")]
    Timeout { program: String, seconds: u64 },

    /// The aligner output did not follow the expected tabular layout
    #[error("Malformed aligner output: {0}")]
    MalformedOutput(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HomologyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
