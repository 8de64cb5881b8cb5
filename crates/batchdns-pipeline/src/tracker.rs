//! Tracks how many input sources have reached end-of-input.
//!
//! The tracker answers one question for the consumer pool: will any more
//! entries ever be produced? Its count lives under its own lock, separate
//! from the queue lock, but every completion also wakes consumers parked on
//! the empty queue. Without that cross-signal the last reader can finish
//! after a consumer has already observed an empty queue and parked, and that
//! consumer would sleep forever.
//!
//! Lock order: the tracker lock is always released before touching the queue
//! lock. The queue's `pop_or_wait` calls [`CompletionTracker::is_all_done`]
//! with the queue lock held, so holding the tracker lock across a queue-lock
//! acquisition would deadlock.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::queue::BoundedQueue;

/// Shared completed-source count with a fixed total.
pub struct CompletionTracker {
    total: usize,
    completed: Mutex<usize>,
    queue: Arc<BoundedQueue>,
}

impl CompletionTracker {
    /// Create a tracker for `total` sources feeding `queue`.
    pub fn new(total: usize, queue: Arc<BoundedQueue>) -> Self {
        Self {
            total,
            completed: Mutex::new(0),
            queue,
        }
    }

    /// Record that one source has been exhausted, then wake any consumer
    /// parked on the empty queue so it can re-check termination.
    pub fn mark_source_done(&self) {
        let completed = {
            let mut completed = self.completed.lock().unwrap();
            debug_assert!(
                *completed < self.total,
                "more sources marked done than exist"
            );
            if *completed < self.total {
                *completed += 1;
            }
            *completed
        };
        debug!(completed, total = self.total, "source finished");

        // Tracker lock is released; only now touch the queue's lock domain.
        self.queue.notify_poppers();
    }

    /// True once every source has been exhausted.
    pub fn is_all_done(&self) -> bool {
        *self.completed.lock().unwrap() == self.total
    }

    /// Number of sources exhausted so far.
    pub fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }

    /// Total number of sources, fixed at construction.
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_all_done_only_at_total() {
        let queue = Arc::new(BoundedQueue::new(4));
        let tracker = CompletionTracker::new(3, queue);

        assert!(!tracker.is_all_done());
        tracker.mark_source_done();
        tracker.mark_source_done();
        assert_eq!(tracker.completed(), 2);
        assert!(!tracker.is_all_done());
        tracker.mark_source_done();
        assert!(tracker.is_all_done());
    }

    #[test]
    fn test_zero_sources_is_immediately_done() {
        let queue = Arc::new(BoundedQueue::new(4));
        let tracker = CompletionTracker::new(0, queue);
        assert!(tracker.is_all_done());
    }

    #[test]
    fn test_last_completion_wakes_parked_consumer() {
        // Regression for the missed-wake deadlock: a consumer parked on an
        // empty queue must be woken when the final source finishes even
        // though nothing was pushed.
        let queue = Arc::new(BoundedQueue::new(4));
        let tracker = Arc::new(CompletionTracker::new(1, queue.clone()));

        let (tx, rx) = crossbeam_channel::unbounded();
        let q = queue.clone();
        let t = tracker.clone();
        thread::spawn(move || {
            let result = q.pop_or_wait(|| t.is_all_done());
            tx.send(result).unwrap();
        });

        // Give the consumer time to park.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        tracker.mark_source_done();
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result, None);
    }
}
