//! Report messages sent from worker threads back to the orchestrator.

use std::fmt;
use std::path::PathBuf;

/// Index of an input source, fixed by CLI argument order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {}", self.0)
    }
}

/// Worker → orchestrator messages, sent once per worker as it exits.
#[derive(Debug, Clone)]
pub enum Report {
    /// A reader finished its source
    Source(SourceReport),
    /// A resolver worker drained out and terminated
    Worker(WorkerReport),
}

/// Final accounting from one reader thread.
#[derive(Debug, Clone)]
pub struct SourceReport {
    /// Which source this reader owned
    pub source: SourceId,
    /// Path of the source
    pub path: PathBuf,
    /// Whether the source could be opened at all
    pub opened: bool,
    /// Hostnames pushed into the queue
    pub accepted: u64,
    /// Tokens rejected for exceeding the hostname length bound
    pub rejected: u64,
}

/// Final accounting from one resolver worker.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Worker index within the pool
    pub worker: usize,
    /// Entries popped and processed
    pub consumed: u64,
    /// Records that fell back to the sentinel
    pub failed_lookups: u64,
    /// Records lost to output write errors
    pub write_errors: u64,
}

/// Aggregated outcome of a whole pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    /// Hostnames read across all sources
    pub hostnames_read: u64,
    /// Records written to the output
    pub records_written: u64,
    /// Records written with the sentinel (failed or empty lookups)
    pub failed_lookups: u64,
    /// Sources that could not be opened
    pub sources_failed: u64,
    /// Tokens rejected for exceeding the hostname length bound
    pub rejected_tokens: u64,
    /// Records lost to output write errors
    pub write_errors: u64,
}

impl PipelineSummary {
    /// Fold one worker report into the totals.
    pub(crate) fn absorb(&mut self, report: &Report) {
        match report {
            Report::Source(r) => {
                self.hostnames_read += r.accepted;
                self.rejected_tokens += r.rejected;
                if !r.opened {
                    self.sources_failed += 1;
                }
            }
            Report::Worker(r) => {
                self.records_written += r.consumed - r.write_errors;
                self.failed_lookups += r.failed_lookups;
                self.write_errors += r.write_errors;
            }
        }
    }

    /// True when every hostname read produced exactly one output record.
    pub fn conserved(&self) -> bool {
        self.records_written == self.hostnames_read
    }
}
