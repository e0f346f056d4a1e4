/*!
 * Limits and Constants
 *
 * Centralized location for process-core limits, reserved names, and
 * environment keys. Grouped by domain.
 */

// =============================================================================
// DEFERRED TASK QUEUE
// =============================================================================

/// Default capacity ceiling for the tick queue (1M pending tasks)
/// Enqueue past this fails fast with `SchedulerError::Saturated`
pub const DEFAULT_TICK_QUEUE_CAPACITY: usize = 1024 * 1024;

/// Initial VecDeque allocation for the tick queue
pub const TICK_QUEUE_INITIAL_CAPACITY: usize = 64;

// =============================================================================
// LIFECYCLE EVENTS
// =============================================================================

/// Emitted exactly once while the process is `Exiting`
pub const EVENT_EXIT: &str = "exit";

/// Emitted by the run loop when the tick queue is exhausted
pub const EVENT_BEFORE_EXIT: &str = "beforeExit";

/// Emitted by `Process::emit_warning`
pub const EVENT_WARNING: &str = "warning";

/// Receives deferred-task failures raised inside the run loop
pub const EVENT_UNCAUGHT_EXCEPTION: &str = "uncaughtException";

/// Exit code used when the run loop ends on an unhandled task failure
pub const UNCAUGHT_EXCEPTION_EXIT_CODE: i32 = 1;

// =============================================================================
// STREAMS
// =============================================================================

/// Input endpoint event carrying one decoded frame
pub const EVENT_DATA: &str = "data";

/// Input endpoint event emitted once at end of input
pub const EVENT_END: &str = "end";

/// Default chunk size for chunk-framed input (64KB)
pub const DEFAULT_INPUT_CHUNK_SIZE: usize = 64 * 1024;

// =============================================================================
// IDENTITY AND ENVIRONMENT
// =============================================================================

/// Default program title
pub const DEFAULT_TITLE: &str = "process-core";

/// Runtime-injected environment key holding the crate version
pub const ENV_RUNTIME_VERSION: &str = "PROCESS_CORE_VERSION";

/// Runtime-injected environment key holding the platform tag
pub const ENV_RUNTIME_PLATFORM: &str = "PROCESS_CORE_PLATFORM";

/// Config override for the tick queue capacity
pub const ENV_TICK_QUEUE_CAPACITY: &str = "PROCESS_TICK_QUEUE_CAPACITY";

/// Config override switching stdout to buffered writes
pub const ENV_STDOUT_BUFFERED: &str = "PROCESS_STDOUT_BUFFERED";

/// Enables JSON tracing output
pub const ENV_TRACE_JSON: &str = "PROCESS_TRACE_JSON";

// =============================================================================
// TIME
// =============================================================================

/// Nanoseconds per second
pub const NANOS_PER_SEC: u32 = 1_000_000_000;
