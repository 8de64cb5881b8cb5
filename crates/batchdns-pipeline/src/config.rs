//! Pipeline configuration and validation.

use std::path::PathBuf;
use std::thread;

use crate::error::PipelineError;

/// Default capacity of the pending-hostname queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Default upper bound on a single hostname token, in bytes.
pub const DEFAULT_MAX_HOSTNAME_LEN: usize = 1024;

/// Default cap on addresses recorded per hostname.
pub const DEFAULT_MAX_ADDRESSES: usize = 30;

/// Default marker written when resolution fails or returns nothing.
pub const DEFAULT_SENTINEL: &str = "none";

/// Default resolver pool size: one worker per available processing unit.
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Everything the orchestrator needs to run one pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input files, one hostname token per line
    pub sources: Vec<PathBuf>,
    /// Output destination, shared by all resolver workers
    pub output: PathBuf,
    /// Resolver pool size
    pub workers: usize,
    /// Capacity of the pending-hostname queue
    pub queue_capacity: usize,
    /// Upper bound on a single hostname token, in bytes
    pub max_hostname_len: usize,
    /// Cap on addresses recorded per hostname
    pub max_addresses: usize,
    /// Marker written when resolution fails or returns nothing
    pub sentinel: String,
}

impl PipelineConfig {
    /// Config with defaults for everything but the endpoints.
    pub fn new(sources: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            sources,
            output,
            workers: default_worker_count(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_hostname_len: DEFAULT_MAX_HOSTNAME_LEN,
            max_addresses: DEFAULT_MAX_ADDRESSES,
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.sources.is_empty() {
            return Err(PipelineError::Config(
                "at least one input source is required".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(PipelineError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.max_hostname_len == 0 {
            return Err(PipelineError::Config(
                "hostname length bound must be at least 1".to_string(),
            ));
        }
        if self.max_addresses == 0 {
            return Err(PipelineError::Config(
                "address cap must be at least 1".to_string(),
            ));
        }
        if self.sentinel.is_empty() {
            return Err(PipelineError::Config(
                "sentinel must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
