//! batchdns pipeline
//!
//! Bounded-buffer, multi-producer/multi-consumer hostname resolution with:
//! - One reader thread per input source feeding a bounded FIFO
//! - A fixed pool of resolver workers draining it
//! - Race-free self-termination once every source is exhausted
//! - A lock-serialized sink writing one atomic record per hostname

mod config;
mod consumer;
mod error;
mod orchestrator;
mod producer;
mod queue;
mod report;
mod sink;
mod tracker;

pub use config::{
    default_worker_count, PipelineConfig, DEFAULT_MAX_ADDRESSES, DEFAULT_MAX_HOSTNAME_LEN,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SENTINEL,
};
pub use error::PipelineError;
pub use orchestrator::Pipeline;
pub use queue::BoundedQueue;
pub use report::{PipelineSummary, Report, SourceId, SourceReport, WorkerReport};
pub use sink::{ResolutionResult, ResultSink};
pub use tracker::CompletionTracker;
