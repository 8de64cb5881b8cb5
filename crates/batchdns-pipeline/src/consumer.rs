//! Resolver worker pool.
//!
//! Each worker loops: atomically pop-or-park on the queue, resolve the
//! hostname through the collaborator, submit one record to the sink. Workers
//! self-terminate when the queue is empty and every source is done. No
//! pipeline lock is held across the resolve call, so lookups from different
//! workers overlap freely.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use batchdns_resolve::Resolve;
use crossbeam_channel::Sender;
use tracing::{debug, error, warn};

use crate::queue::BoundedQueue;
use crate::report::{Report, WorkerReport};
use crate::sink::{ResolutionResult, ResultSink};
use crate::tracker::CompletionTracker;

/// State shared by every resolver worker.
pub(crate) struct WorkerShared {
    pub queue: Arc<BoundedQueue>,
    pub tracker: Arc<CompletionTracker>,
    pub sink: Arc<ResultSink>,
    pub resolver: Arc<dyn Resolve>,
    pub max_addresses: usize,
}

/// Spawn one resolver worker.
pub(crate) fn spawn_worker(
    worker: usize,
    shared: Arc<WorkerShared>,
    reports: Sender<Report>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("resolver-{worker}"))
        .spawn(move || {
            debug!("resolver worker {worker} started");
            let report = run_worker(worker, &shared);
            let _ = reports.send(Report::Worker(report));
            debug!("resolver worker {worker} finished");
        })
        .expect("failed to spawn resolver thread")
}

fn run_worker(worker: usize, shared: &WorkerShared) -> WorkerReport {
    let mut report = WorkerReport {
        worker,
        consumed: 0,
        failed_lookups: 0,
        write_errors: 0,
    };

    while let Some(hostname) = shared
        .queue
        .pop_or_wait(|| shared.tracker.is_all_done())
    {
        report.consumed += 1;
        let result = resolve_one(&*shared.resolver, &hostname, shared.max_addresses);
        if result.addresses.is_empty() {
            report.failed_lookups += 1;
        }

        // A write failure loses this record but must not take the worker
        // down with it: the queue still has to drain for the pipeline to
        // terminate.
        if let Err(e) = shared.sink.write(&result) {
            error!("worker {worker}: failed to write record for {hostname:?}: {e}");
            report.write_errors += 1;
        }
    }

    report
}

/// Resolve one hostname, absorbing failures and panics into an empty address
/// list (the sink substitutes the sentinel). At most `max_addresses`
/// addresses are kept; the rest are discarded.
fn resolve_one(resolver: &dyn Resolve, hostname: &str, max_addresses: usize) -> ResolutionResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| resolver.resolve(hostname)));

    let mut addresses: Vec<String> = match outcome {
        Ok(Ok(addrs)) => addrs.iter().map(|a| a.to_string()).collect(),
        Ok(Err(e)) => {
            warn!("lookup failed for {hostname:?}: {e}");
            Vec::new()
        }
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            error!("resolver panicked on {hostname:?}: {message}");
            Vec::new()
        }
    };

    if addresses.len() > max_addresses {
        debug!(
            hostname,
            discarded = addresses.len() - max_addresses,
            "truncating address list"
        );
        addresses.truncate(max_addresses);
    }

    ResolutionResult {
        hostname: hostname.to_string(),
        addresses,
    }
}
