/*!
 * Event Types
 * Listener handles, callbacks, and dispatch failures
 */

use crate::core::types::{EventArg, Sequence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Event operation result
pub type EventResult<T> = Result<T, EventError>;

/// Listener callback; returning `Err` is the listener "throwing"
pub type ListenerFn = Arc<dyn Fn(&[EventArg]) -> anyhow::Result<()> + Send + Sync>;

/// Event errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventError {
    #[error("{0}")]
    ListenerFailed(ListenerFailure),
}

/// Stable handle to a registered listener
///
/// Handles are issued in registration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub(crate) Sequence);

impl ListenerId {
    #[inline]
    pub fn sequence(&self) -> Sequence {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A listener that returned an error during `emit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerFailure {
    pub event: String,
    pub listener: ListenerId,
    pub message: String,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Listener {} failed for event '{}': {}",
            self.listener, self.event, self.message
        )
    }
}

/// Result of a dispatch that keeps every failure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOutcome {
    /// Listeners invoked, failed ones included
    pub invoked: usize,
    /// Failures in dispatch order
    pub failures: Vec<ListenerFailure>,
}

impl EmitOutcome {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Continue-then-surface: the first failure, if any
    pub fn into_result(self) -> EventResult<usize> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(EventError::ListenerFailed(failure)),
            None => Ok(self.invoked),
        }
    }
}
