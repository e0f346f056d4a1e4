/*!
 * Scheduler Types
 * Deferred tasks, handles, failures, and statistics
 */

use crate::core::types::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Zero-argument deferred callback; returning `Err` is the task "throwing"
pub type TaskFn = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// Scheduler errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerError {
    #[error("Tick queue saturated: capacity {capacity} reached")]
    Saturated { capacity: usize },

    #[error("{0}")]
    TaskFailed(TaskFailure),
}

/// Handle to a queued task, ordered by enqueue sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskHandle(pub(crate) Sequence);

impl TaskHandle {
    #[inline]
    pub fn sequence(&self) -> Sequence {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// A task that returned an error while draining
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub task: TaskHandle,
    pub message: String,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deferred task {} failed: {}", self.task, self.message)
    }
}

/// A pending deferred task; owned by the queue until invoked or cancelled
pub(crate) struct DeferredTask {
    pub(crate) handle: TaskHandle,
    pub(crate) callback: TaskFn,
}

/// Scheduler statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub enqueued: u64,
    /// Tasks invoked, failed ones included
    pub executed: u64,
    pub failed: u64,
    pub cancelled: u64,
    /// Tasks dropped unrun by `clear`
    pub discarded: u64,
    pub pending: usize,
}
