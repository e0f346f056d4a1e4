/*!
 * Process Module
 * Lifecycle control and the process API surface
 */

mod builder;
mod controller;
mod handle;
pub mod types;

// Re-export public API
pub use builder::ProcessBuilder;
pub use controller::LifecycleController;
pub use handle::Process;
pub use types::{ExitReport, LifecycleError, LifecycleResult, LifecycleState, ProcessState};
