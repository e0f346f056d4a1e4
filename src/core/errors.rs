/*!
 * Error Types
 * Unified process-core error with miette diagnostics
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::events::EventError;
pub use crate::host::WorkingDirectoryError;
pub use crate::process::LifecycleError;
pub use crate::resources::SamplerError;
pub use crate::scheduler::SchedulerError;
pub use crate::streams::StreamError;

/// Unified process-core error
#[derive(Error, Debug, Diagnostic)]
pub enum ProcessCoreError {
    #[error("Scheduler error: {0}")]
    #[diagnostic(
        code(process_core::scheduler),
        help("A deferred task failed or the tick queue is full. Remaining tasks run on the next drain.")
    )]
    Scheduler(#[from] SchedulerError),

    #[error("Event error: {0}")]
    #[diagnostic(
        code(process_core::listener_failure),
        help("Sibling listeners still ran; only the first failure is reported here.")
    )]
    Event(#[from] EventError),

    #[error("Lifecycle error: {0}")]
    #[diagnostic(
        code(process_core::invalid_lifecycle_transition),
        help("Termination runs once; later requests are rejected.")
    )]
    Lifecycle(#[from] LifecycleError),

    #[error("Stream error: {0}")]
    #[diagnostic(code(process_core::stream))]
    Stream(#[from] StreamError),

    #[error("Working directory error: {0}")]
    #[diagnostic(
        code(process_core::working_directory),
        help("Check that the directory exists and is accessible.")
    )]
    WorkingDirectory(#[from] WorkingDirectoryError),

    #[error("Sampler error: {0}")]
    #[diagnostic(code(process_core::sampler))]
    Sampler(#[from] SamplerError),
}
