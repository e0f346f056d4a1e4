/*!
 * Event Emitter Tests
 * Registration order, listener isolation, and snapshot dispatch
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use process_core::events::{EventEmitter, EventError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_listeners_run_in_registration_order_with_payload() {
    let emitter = EventEmitter::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    for name in ["L1", "L2", "L3"] {
        let log = log.clone();
        emitter.on("data", move |args| {
            log.lock().push((name, args.to_vec()));
            Ok(())
        });
    }

    let invoked = emitter.emit("data", &[json!("x")]).unwrap();

    assert_eq!(invoked, 3);
    assert_eq!(
        *log.lock(),
        vec![
            ("L1", vec![json!("x")]),
            ("L2", vec![json!("x")]),
            ("L3", vec![json!("x")]),
        ]
    );
}

#[test]
fn test_failing_listener_does_not_stop_siblings() {
    let emitter = EventEmitter::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let failing = emitter.on("e", |_| Err(anyhow::anyhow!("listener exploded")));
    {
        let calls = calls.clone();
        emitter.on("e", move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    }

    let err = emitter.emit("e", &[]).unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let EventError::ListenerFailed(failure) = err;
    assert_eq!(failure.event, "e");
    assert_eq!(failure.listener, failing);
    assert!(failure.message.contains("listener exploded"));
}

#[test]
fn test_emit_collect_keeps_every_failure() {
    let emitter = EventEmitter::new();
    emitter.on("e", |_| Err(anyhow::anyhow!("first")));
    emitter.on("e", |_| Ok(()));
    emitter.on("e", |_| Err(anyhow::anyhow!("second")));

    let outcome = emitter.emit_collect("e", &[]);

    assert_eq!(outcome.invoked, 3);
    let messages: Vec<_> = outcome.failures.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn test_listener_added_during_emit_waits_for_next_emit() {
    let emitter = EventEmitter::new();
    let late_calls = Arc::new(AtomicUsize::new(0));

    {
        let registry = emitter.clone();
        let late_calls = late_calls.clone();
        emitter.once("e", move |_| {
            let late_calls = late_calls.clone();
            registry.on("e", move |_| {
                late_calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            Ok(())
        });
    }

    assert_eq!(emitter.emit("e", &[]).unwrap(), 1);
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    assert_eq!(emitter.emit("e", &[]).unwrap(), 1);
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_listener_removed_during_emit_still_runs_this_time() {
    let emitter = EventEmitter::new();
    let second_calls = Arc::new(AtomicUsize::new(0));
    let second_id = Arc::new(Mutex::new(None));

    {
        let registry = emitter.clone();
        let second_id = second_id.clone();
        emitter.on("e", move |_| {
            if let Some(id) = second_id.lock().take() {
                registry.off("e", id);
            }
            Ok(())
        });
    }
    {
        let second_calls = second_calls.clone();
        let id = emitter.on("e", move |_| {
            second_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        *second_id.lock() = Some(id);
    }

    emitter.emit("e", &[]).unwrap();
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(emitter.listener_count("e"), 1);

    emitter.emit("e", &[]).unwrap();
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reentrant_emit_from_listener() {
    let emitter = EventEmitter::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    {
        let inner = emitter.clone();
        let log = log.clone();
        emitter.on("outer", move |_| {
            log.lock().push("outer:before");
            inner.emit("inner", &[])?;
            log.lock().push("outer:after");
            Ok(())
        });
    }
    {
        let log = log.clone();
        emitter.on("inner", move |_| {
            log.lock().push("inner");
            Ok(())
        });
    }

    emitter.emit("outer", &[]).unwrap();
    assert_eq!(*log.lock(), vec!["outer:before", "inner", "outer:after"]);
}

#[test]
fn test_same_callback_registered_twice_runs_twice() {
    let emitter = EventEmitter::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let callback = {
        let calls = calls.clone();
        move |_: &[Value]| -> anyhow::Result<()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    };

    emitter.on("e", callback.clone());
    emitter.on("e", callback);

    assert_eq!(emitter.emit("e", &[]).unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_remove_all_listeners() {
    let emitter = EventEmitter::new();
    emitter.on("a", |_| Ok(()));
    emitter.on("a", |_| Ok(()));
    emitter.on("b", |_| Ok(()));

    assert_eq!(emitter.remove_all_listeners("a"), 2);
    assert_eq!(emitter.event_names(), vec!["b".to_string()]);
    assert_eq!(emitter.emit("a", &[]).unwrap(), 0);
}
