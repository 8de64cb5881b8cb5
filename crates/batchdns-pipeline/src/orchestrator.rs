//! Pipeline orchestration.
//!
//! Builds the shared state (queue, tracker, sink, report channel), starts
//! every reader concurrently, then the resolver pool, joins readers, joins
//! workers, flushes the sink, and folds the worker reports into a summary.
//! Workers self-terminate through the tracker predicate; the orchestrator
//! never forcibly stops them.

use std::sync::Arc;

use batchdns_resolve::Resolve;
use crossbeam_channel::unbounded;
use tracing::{debug, error, info};

use crate::config::PipelineConfig;
use crate::consumer::{spawn_worker, WorkerShared};
use crate::error::PipelineError;
use crate::producer::spawn_reader;
use crate::queue::BoundedQueue;
use crate::report::{PipelineSummary, SourceId};
use crate::sink::ResultSink;
use crate::tracker::CompletionTracker;

/// A configured resolution pipeline, ready to run.
pub struct Pipeline {
    config: PipelineConfig,
    resolver: Arc<dyn Resolve>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, resolver: Arc<dyn Resolve>) -> Self {
        Self { config, resolver }
    }

    /// Run the pipeline to completion.
    ///
    /// Fatal errors (bad configuration, unopenable output) surface here
    /// before any worker thread starts. Per-source and per-hostname failures
    /// are absorbed by their workers and show up in the summary counts.
    pub fn run(self) -> Result<PipelineSummary, PipelineError> {
        let config = self.config;
        config.validate()?;

        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        let tracker = Arc::new(CompletionTracker::new(config.sources.len(), queue.clone()));
        let sink = Arc::new(ResultSink::open(&config.output, config.sentinel.clone())?);
        let (report_tx, report_rx) = unbounded();

        info!(
            sources = config.sources.len(),
            workers = config.workers,
            capacity = config.queue_capacity,
            "starting pipeline"
        );

        // All readers first, all spawned before any is joined so their
        // lifetimes overlap.
        let readers: Vec<_> = config
            .sources
            .iter()
            .enumerate()
            .map(|(i, path)| {
                spawn_reader(
                    SourceId(i),
                    path.clone(),
                    config.max_hostname_len,
                    queue.clone(),
                    tracker.clone(),
                    report_tx.clone(),
                )
            })
            .collect();

        let shared = Arc::new(WorkerShared {
            queue,
            tracker,
            sink: sink.clone(),
            resolver: self.resolver,
            max_addresses: config.max_addresses,
        });
        let workers: Vec<_> = (0..config.workers)
            .map(|i| spawn_worker(i, shared.clone(), report_tx.clone()))
            .collect();
        drop(report_tx);

        for reader in readers {
            if reader.join().is_err() {
                error!("reader thread panicked");
            }
        }
        debug!("all readers joined");

        for worker in workers {
            if worker.join().is_err() {
                error!("resolver thread panicked");
            }
        }
        debug!("all resolver workers joined");

        sink.flush().map_err(PipelineError::OutputFlush)?;

        let mut summary = PipelineSummary::default();
        for report in report_rx.try_iter() {
            summary.absorb(&report);
        }
        info!(
            hostnames = summary.hostnames_read,
            records = summary.records_written,
            failed = summary.failed_lookups,
            "pipeline finished"
        );
        Ok(summary)
    }
}
