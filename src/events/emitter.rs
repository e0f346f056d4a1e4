/*!
 * Event Emitter
 * Named events with ordered, synchronous listener fan-out
 *
 * # Dispatch
 *
 * `emit` snapshots the listener list for the event, releases the registry
 * lock, then invokes each listener in registration order on the caller's
 * thread. Listeners may therefore call `on`/`off`/`emit` re-entrantly;
 * mutations take effect for the next `emit`, never the one in progress.
 *
 * A listener returning `Err` does not stop its siblings. Every failure is
 * logged and the first one is returned once all listeners have run.
 */

use super::types::{EmitOutcome, EventResult, ListenerFailure, ListenerFn, ListenerId};
use crate::core::types::EventArg;
use ahash::RandomState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    callback: ListenerFn,
    once: bool,
}

/// Event emitter core
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct EventEmitter {
    listeners: Arc<Mutex<HashMap<String, Vec<ListenerEntry>, RandomState>>>,
    next_id: Arc<AtomicU64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(HashMap::with_hasher(RandomState::new()))),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a listener for `event`
    pub fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[EventArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(event, Arc::new(callback), false)
    }

    /// Register a listener that is removed before its first invocation
    pub fn once<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[EventArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(event, Arc::new(callback), true)
    }

    fn register(&self, event: &str, callback: ListenerFn, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));

        self.listeners
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(ListenerEntry { id, callback, once });

        debug!(event, listener = %id, once, "Registered listener");
        id
    }

    /// Remove a listener; returns false if it was already gone
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(entries) = listeners.get_mut(event) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;

        if entries.is_empty() {
            listeners.remove(event);
        }
        if removed {
            debug!(event, listener = %id, "Removed listener");
        }
        removed
    }

    /// Remove every listener for `event`
    pub fn remove_all_listeners(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .remove(event)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Dispatch `event` and surface the first listener failure
    pub fn emit(&self, event: &str, args: &[EventArg]) -> EventResult<usize> {
        self.emit_collect(event, args).into_result()
    }

    /// Dispatch `event`, keeping every listener failure
    pub fn emit_collect(&self, event: &str, args: &[EventArg]) -> EmitOutcome {
        let snapshot = self.snapshot(event);
        if snapshot.is_empty() {
            return EmitOutcome::default();
        }

        debug!(event, listeners = snapshot.len(), "Emitting event");

        let mut outcome = EmitOutcome::default();
        for entry in snapshot {
            outcome.invoked += 1;
            if let Err(e) = (entry.callback)(args) {
                let failure = ListenerFailure {
                    event: event.to_string(),
                    listener: entry.id,
                    message: format!("{:#}", e),
                };
                error!(event, listener = %entry.id, error = %failure.message, "Listener failed");
                outcome.failures.push(failure);
            }
        }
        outcome
    }

    /// Copy the listener list, dropping `once` entries from the registry
    fn snapshot(&self, event: &str) -> Vec<ListenerEntry> {
        let mut listeners = self.listeners.lock();
        let Some(entries) = listeners.get_mut(event) else {
            return Vec::new();
        };

        let snapshot = entries.clone();
        entries.retain(|entry| !entry.once);
        if entries.is_empty() {
            listeners.remove(event);
        }
        snapshot
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .get(event)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Names of events with at least one listener, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.listeners.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.event_names())
            .finish()
    }
}
