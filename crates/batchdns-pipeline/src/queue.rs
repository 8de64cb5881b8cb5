//! Bounded FIFO queue of pending hostnames.
//!
//! One mutex guards the buffer; two condition variables carry the "not full"
//! and "not empty" wait conditions. Popping is exposed as
//! [`BoundedQueue::pop_or_wait`], which folds the empty-check, the caller's
//! termination check, and the suspension into a single critical section so
//! that a wake-up can never be lost between checking and parking.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Thread-safe bounded FIFO of hostname entries.
pub struct BoundedQueue {
    inner: Mutex<VecDeque<String>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl BoundedQueue {
    /// Create a queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Append an entry at the tail, blocking while the queue is full.
    pub fn push(&self, entry: String) {
        let mut queue = self.inner.lock().unwrap();
        while queue.len() == self.capacity {
            queue = self.not_full.wait(queue).unwrap();
        }
        queue.push_back(entry);
        drop(queue);
        self.not_empty.notify_one();
    }

    /// Pop the head entry, or decide to stop.
    ///
    /// Under one held lock: returns the head entry if present; otherwise, if
    /// `done()` reports that no more entries will ever arrive, returns
    /// `None`; otherwise parks until woken by a push or by
    /// [`notify_poppers`](Self::notify_poppers) and re-checks.
    ///
    /// `done` is called with the queue lock held, so it must not acquire any
    /// lock that can be held while taking the queue lock.
    pub fn pop_or_wait<F>(&self, done: F) -> Option<String>
    where
        F: Fn() -> bool,
    {
        let mut queue = self.inner.lock().unwrap();
        loop {
            if let Some(entry) = queue.pop_front() {
                drop(queue);
                self.not_full.notify_one();
                return Some(entry);
            }
            if done() {
                return None;
            }
            queue = self.not_empty.wait(queue).unwrap();
        }
    }

    /// Pop the head entry without blocking.
    pub fn try_pop(&self) -> Option<String> {
        let entry = self.inner.lock().unwrap().pop_front();
        if entry.is_some() {
            self.not_full.notify_one();
        }
        entry
    }

    /// Wake every thread parked in [`pop_or_wait`](Self::pop_or_wait).
    ///
    /// Takes the queue lock before notifying: a popper is either still
    /// holding the lock ahead of its termination check (and will observe the
    /// changed state itself) or already parked (and will receive this
    /// notification). There is no window in between.
    pub fn notify_poppers(&self) {
        let _queue = self.inner.lock().unwrap();
        self.not_empty.notify_all();
    }

    /// Current number of queued entries.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
