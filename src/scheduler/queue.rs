/*!
 * Tick Queue
 * FIFO deferred-callback scheduler ("next tick")
 *
 * # Draining
 *
 * `drain` pops the head, releases the queue lock, invokes the callback,
 * and re-checks emptiness before the next pop. A task enqueued by a
 * running task becomes the new tail and runs in the same drain pass, after
 * everything queued before it. A self-requeueing task without a stop
 * condition keeps `drain` from returning.
 *
 * A failing task is already dequeued when its error is returned; the rest
 * of the queue is left for the next `drain` call.
 *
 * `halt` is terminal: pending tasks are dropped, and a later enqueue gets a
 * handle but its callback is dropped at once and counted as discarded.
 */

use super::stats::AtomicSchedulerStats;
use super::types::{
    DeferredTask, SchedulerError, SchedulerResult, SchedulerStats, TaskFailure, TaskHandle,
};
use crate::core::limits::{DEFAULT_TICK_QUEUE_CAPACITY, TICK_QUEUE_INITIAL_CAPACITY};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Deferred-callback scheduler
///
/// Cloning yields another handle to the same queue, so tasks can capture
/// a handle and enqueue follow-up work.
#[derive(Clone)]
pub struct TickScheduler {
    queue: Arc<Mutex<VecDeque<DeferredTask>>>,
    next_sequence: Arc<AtomicU64>,
    capacity: usize,
    halted: Arc<AtomicBool>,
    stats: Arc<AtomicSchedulerStats>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TICK_QUEUE_CAPACITY)
    }

    /// Create a scheduler whose queue fails fast past `capacity` pending tasks
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Arc::new(Mutex::new(VecDeque::with_capacity(
                TICK_QUEUE_INITIAL_CAPACITY.min(capacity),
            ))),
            next_sequence: Arc::new(AtomicU64::new(1)),
            capacity,
            halted: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(AtomicSchedulerStats::default()),
        }
    }

    /// Append a task to the tail of the queue
    pub fn enqueue<F>(&self, callback: F) -> SchedulerResult<TaskHandle>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let mut queue = self.queue.lock();
        if self.is_halted() {
            let handle = TaskHandle(self.next_sequence.fetch_add(1, Ordering::SeqCst));
            self.stats.add_discarded(1);
            drop(queue);
            // Captures are released outside the queue lock
            drop(callback);
            debug!(task = %handle, "Dropped task enqueued after halt");
            return Ok(handle);
        }
        if queue.len() >= self.capacity {
            warn!(capacity = self.capacity, "Tick queue saturated");
            return Err(SchedulerError::Saturated {
                capacity: self.capacity,
            });
        }

        // Sequence is taken under the queue lock so the queue stays sorted
        let handle = TaskHandle(self.next_sequence.fetch_add(1, Ordering::SeqCst));
        queue.push_back(DeferredTask {
            handle,
            callback: Box::new(callback),
        });
        self.stats.inc_enqueued();

        debug!(task = %handle, pending = queue.len(), "Enqueued deferred task");
        Ok(handle)
    }

    /// Run tasks until the queue is observed empty
    ///
    /// Returns the number of tasks invoked.
    pub fn drain(&self) -> SchedulerResult<usize> {
        let mut invoked = 0;

        loop {
            if self.is_halted() {
                break;
            }
            let Some(task) = self.queue.lock().pop_front() else {
                break;
            };

            invoked += 1;
            self.stats.inc_executed();

            if let Err(e) = (task.callback)() {
                self.stats.inc_failed();
                let failure = TaskFailure {
                    task: task.handle,
                    message: format!("{:#}", e),
                };
                error!(task = %task.handle, error = %failure.message, "Deferred task failed");
                return Err(SchedulerError::TaskFailed(failure));
            }
        }

        if invoked > 0 {
            debug!(invoked, "Tick queue drained");
        }
        Ok(invoked)
    }

    /// Remove a task that has not run yet; other handles are unaffected
    pub fn cancel(&self, handle: TaskHandle) -> bool {
        let mut queue = self.queue.lock();
        match queue.binary_search_by_key(&handle, |task| task.handle) {
            Ok(index) => {
                queue.remove(index);
                self.stats.inc_cancelled();
                debug!(task = %handle, "Cancelled deferred task");
                true
            }
            Err(_) => false,
        }
    }

    /// Drop every pending task without running it
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut queue = self.queue.lock();
            std::mem::take(&mut *queue)
        };

        let count = dropped.len();
        if count > 0 {
            self.stats.add_discarded(count as u64);
            debug!(count, "Discarded pending deferred tasks");
        }
        count
    }

    /// Stop draining for good and drop pending tasks
    pub fn halt(&self) -> usize {
        self.halted.store(true, Ordering::Release);
        self.clear()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot(self.pending())
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("pending", &self.pending())
            .field("capacity", &self.capacity)
            .field("halted", &self.is_halted())
            .finish()
    }
}
