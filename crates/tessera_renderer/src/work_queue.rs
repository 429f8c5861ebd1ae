//! Shared single-pass work queue.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A pre-filled queue that many workers drain concurrently.
///
/// Items come out in the order they went in. Nothing is ever pushed after
/// construction, so `pop` never waits: it either hands out the front item
/// or reports exhaustion.
pub struct WorkQueue<T> {
    pending: Mutex<VecDeque<T>>,
}

impl<T> WorkQueue<T> {
    /// Create a queue; iteration order is pop order.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            pending: Mutex::new(items.into_iter().collect()),
        }
    }

    /// Take the front item.
    ///
    /// When the queue is empty, `on_empty` runs (outside the lock) and
    /// `None` is returned. Every worker that finds the queue drained runs
    /// its own callback, so callbacks must tolerate running more than once.
    pub fn pop<F: FnOnce()>(&self, on_empty: F) -> Option<T> {
        let item = self.pending.lock().pop_front();
        if item.is_none() {
            on_empty();
        }
        item
    }

    /// Number of items still pending.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
