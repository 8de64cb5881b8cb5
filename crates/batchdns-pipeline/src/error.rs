//! Pipeline-fatal errors.
//!
//! Per-item failures (an unopenable source, a failed lookup) are absorbed by
//! their owning worker and never surface here; these variants are the
//! failures that abort the run before any worker starts, plus flushing the
//! sink at teardown.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to open output {path:?}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush output: {0}")]
    OutputFlush(#[source] io::Error),
}
