//! Reader threads: one per input source, streaming hostnames into the queue.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::queue::BoundedQueue;
use crate::report::{Report, SourceId, SourceReport};
use crate::tracker::CompletionTracker;

/// Spawn the reader thread for one source.
///
/// The reader pushes every accepted token into the queue, marks its source
/// done exactly once (even when the source cannot be opened), sends its
/// report, and exits. An unopenable source contributes zero entries and is
/// not fatal to the pipeline.
pub(crate) fn spawn_reader(
    source: SourceId,
    path: PathBuf,
    max_hostname_len: usize,
    queue: Arc<BoundedQueue>,
    tracker: Arc<CompletionTracker>,
    reports: Sender<Report>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("reader-{}", source.0))
        .spawn(move || {
            debug!("{source} reader started: {}", path.display());
            let report = read_source(source, &path, max_hostname_len, &queue);
            tracker.mark_source_done();
            let _ = reports.send(Report::Source(report));
            debug!("{source} reader finished");
        })
        .expect("failed to spawn reader thread")
}

fn read_source(
    source: SourceId,
    path: &Path,
    max_hostname_len: usize,
    queue: &BoundedQueue,
) -> SourceReport {
    let mut report = SourceReport {
        source,
        path: path.to_owned(),
        opened: false,
        accepted: 0,
        rejected: 0,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("{source}: cannot open {}: {e}", path.display());
            return report;
        }
    };
    report.opened = true;

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("{source}: read error in {}: {e}", path.display());
                break;
            }
        };
        for token in line.split_whitespace() {
            if token.len() > max_hostname_len {
                warn!(
                    "{source}: rejecting token of {} bytes (bound is {max_hostname_len})",
                    token.len()
                );
                report.rejected += 1;
                continue;
            }
            queue.push(token.to_string());
            report.accepted += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run_reader(path: PathBuf, max_len: usize, capacity: usize) -> (Vec<String>, SourceReport) {
        let queue = Arc::new(BoundedQueue::new(capacity));
        let tracker = Arc::new(CompletionTracker::new(1, queue.clone()));
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = spawn_reader(
            SourceId(0),
            path,
            max_len,
            queue.clone(),
            tracker.clone(),
            tx,
        );
        handle.join().unwrap();

        assert!(tracker.is_all_done());
        let report = match rx.recv().unwrap() {
            Report::Source(report) => report,
            other => panic!("unexpected report: {other:?}"),
        };

        let mut entries = Vec::new();
        while let Some(entry) = queue.try_pop() {
            entries.push(entry);
        }
        (entries, report)
    }

    #[test]
    fn test_reads_tokens_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "alpha.example").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "   ").unwrap();
        writeln!(file, "beta.example gamma.example").unwrap();
        file.flush().unwrap();

        let (entries, report) = run_reader(file.path().to_owned(), 1024, 16);
        assert_eq!(entries, ["alpha.example", "beta.example", "gamma.example"]);
        assert!(report.opened);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn test_rejects_over_long_tokens() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", "x".repeat(64)).unwrap();
        writeln!(file, "short.example").unwrap();
        file.flush().unwrap();

        let (entries, report) = run_reader(file.path().to_owned(), 32, 16);
        assert_eq!(entries, ["short.example"]);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn test_unopenable_source_marks_done_with_zero_entries() {
        let (entries, report) = run_reader(PathBuf::from("/definitely/not/here.txt"), 1024, 16);
        assert!(entries.is_empty());
        assert!(!report.opened);
        assert_eq!(report.accepted, 0);
    }
}
