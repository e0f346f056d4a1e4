/*!
 * Process Types
 * Lifecycle states, process state snapshot, and exit reports
 */

use crate::clock::TimingSample;
use crate::core::types::{ExitCode, ProcessIdentity};
use crate::events::ListenerFailure;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle operation result
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Lifecycle errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleError {
    #[error("Invalid lifecycle transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}

/// Process lifecycle state
///
/// `Running -> Exiting -> Terminated`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LifecycleState {
    Running = 0,
    /// `exit` listeners are being dispatched
    Exiting = 1,
    Terminated = 2,
}

impl LifecycleState {
    #[inline]
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Running,
            1 => LifecycleState::Exiting,
            _ => LifecycleState::Terminated,
        }
    }
}

/// Snapshot of process-wide state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessState {
    pub identity: ProcessIdentity,
    /// Monotonic origin of `uptime`
    pub start: TimingSample,
    pub state: LifecycleState,
}

/// Outcome of the terminal sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExitReport {
    pub code: ExitCode,
    /// Listener failures recorded during `beforeExit` and `exit` dispatch
    pub listener_failures: Vec<ListenerFailure>,
    /// Deferred tasks dropped unrun at termination
    pub discarded_tasks: usize,
    /// An `exit` listener asked to end the OS process; the host should do
    /// so with `code` once it has the report
    pub exit_requested: bool,
    pub uptime: TimingSample,
}

impl ExitReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.listener_failures.is_empty()
    }
}
