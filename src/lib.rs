/*!
 * Process Core Library
 * Process facility of a script-execution runtime exposed as a library
 */

pub mod clock;
pub mod core;
pub mod events;
pub mod host;
pub mod monitoring;
pub mod process;
pub mod resources;
pub mod scheduler;
pub mod streams;

// Re-exports
pub use clock::{ManualClock, MonotonicClock, SystemClock, TimingSample};
pub use self::core::{
    CoreResult, EventArg, ExitCode, Pid, ProcessConfig, ProcessCoreError, ProcessIdentity,
};
pub use events::{EmitOutcome, EventEmitter, EventError, ListenerFailure, ListenerId};
pub use host::{
    EnvironmentStore, IdentityProvider, OsIdentity, OsWorkingDirectory, SnapshotEnvironment,
    StaticIdentity, WorkingDirectory, WorkingDirectoryError,
};
pub use monitoring::init_tracing;
pub use process::{
    ExitReport, LifecycleController, LifecycleError, LifecycleState, Process, ProcessBuilder,
    ProcessState,
};
pub use resources::{MemorySample, MemorySampler, OsMemorySampler, SamplerError};
pub use scheduler::{SchedulerError, SchedulerStats, TaskHandle, TickScheduler};
pub use streams::{InputFraming, InputStream, OutputStream, PumpOutcome, StreamError, WriteMode};
