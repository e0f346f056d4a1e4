/*!
 * Scheduler Module
 * Deferred-callback ("next tick") queue with strict FIFO draining
 */

mod queue;
mod stats;
pub mod types;

// Re-export public API
pub use queue::TickScheduler;
pub use types::{SchedulerError, SchedulerResult, SchedulerStats, TaskFailure, TaskFn, TaskHandle};
