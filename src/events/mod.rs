/*!
 * Events Module
 * Synchronous named-event dispatch
 */

mod emitter;
pub mod types;

pub use emitter::EventEmitter;
pub use types::{EmitOutcome, EventError, EventResult, ListenerFailure, ListenerFn, ListenerId};
