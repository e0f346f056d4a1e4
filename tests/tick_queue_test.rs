/*!
 * Tick Queue Tests
 * FIFO ordering, nested scheduling, failure isolation, and cancellation
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use process_core::scheduler::{SchedulerError, TickScheduler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(
    log: &Arc<Mutex<Vec<&'static str>>>,
    label: &'static str,
) -> impl FnOnce() -> anyhow::Result<()> + Send + 'static {
    let log = log.clone();
    move || {
        log.lock().push(label);
        Ok(())
    }
}

#[test]
fn test_fifo_order() {
    let scheduler = TickScheduler::new();
    let log = recorder();

    scheduler.enqueue(push(&log, "A")).unwrap();
    scheduler.enqueue(push(&log, "B")).unwrap();
    scheduler.enqueue(push(&log, "C")).unwrap();

    assert_eq!(scheduler.drain().unwrap(), 3);
    assert_eq!(*log.lock(), vec!["A", "B", "C"]);
}

#[test]
fn test_nested_enqueue_runs_after_existing_tail() {
    let scheduler = TickScheduler::new();
    let log = recorder();

    scheduler.enqueue(push(&log, "A")).unwrap();
    {
        let log = log.clone();
        let inner = scheduler.clone();
        scheduler
            .enqueue(move || {
                log.lock().push("B");
                inner.enqueue(push(&log, "D"))?;
                Ok(())
            })
            .unwrap();
    }
    scheduler.enqueue(push(&log, "C")).unwrap();

    scheduler.drain().unwrap();

    assert_eq!(*log.lock(), vec!["A", "B", "C", "D"]);
    assert!(scheduler.is_empty());
}

#[test]
fn test_drain_is_exhaustive_across_nesting_levels() {
    let scheduler = TickScheduler::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    {
        let log = log.clone();
        let level1 = scheduler.clone();
        scheduler
            .enqueue(move || {
                log.lock().push(1);
                let log2 = log.clone();
                let level2 = level1.clone();
                level1.enqueue(move || {
                    log2.lock().push(3);
                    let log3 = log2.clone();
                    level2.enqueue(move || {
                        log3.lock().push(4);
                        Ok(())
                    })?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
    }
    {
        let log = log.clone();
        scheduler
            .enqueue(move || {
                log.lock().push(2);
                Ok(())
            })
            .unwrap();
    }

    assert_eq!(scheduler.drain().unwrap(), 4);
    assert_eq!(*log.lock(), vec![1, 2, 3, 4]);
}

#[test]
fn test_bounded_self_requeue_completes() {
    fn step(scheduler: TickScheduler, remaining: usize, runs: Arc<AtomicUsize>) {
        let next = scheduler.clone();
        scheduler
            .enqueue(move || {
                runs.fetch_add(1, Ordering::SeqCst);
                if remaining > 1 {
                    step(next, remaining - 1, runs);
                }
                Ok(())
            })
            .unwrap();
    }

    let scheduler = TickScheduler::new();
    let runs = Arc::new(AtomicUsize::new(0));
    step(scheduler.clone(), 100, runs.clone());

    assert_eq!(scheduler.drain().unwrap(), 100);
    assert_eq!(runs.load(Ordering::SeqCst), 100);
}

#[test]
fn test_failing_task_leaves_rest_queued() {
    let scheduler = TickScheduler::new();
    let log = recorder();

    scheduler.enqueue(push(&log, "A")).unwrap();
    let failing = scheduler
        .enqueue(|| Err(anyhow::anyhow!("boom")))
        .unwrap();
    scheduler.enqueue(push(&log, "C")).unwrap();

    match scheduler.drain() {
        Err(SchedulerError::TaskFailed(failure)) => {
            assert_eq!(failure.task, failing);
            assert!(failure.message.contains("boom"));
        }
        other => panic!("expected task failure, got {:?}", other),
    }
    assert_eq!(*log.lock(), vec!["A"]);
    assert_eq!(scheduler.pending(), 1);

    scheduler.drain().unwrap();
    assert_eq!(*log.lock(), vec!["A", "C"]);

    let stats = scheduler.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.executed, 3);
}

#[test]
fn test_cancel_before_run() {
    let scheduler = TickScheduler::new();
    let log = recorder();

    scheduler.enqueue(push(&log, "A")).unwrap();
    let b = scheduler.enqueue(push(&log, "B")).unwrap();
    scheduler.enqueue(push(&log, "C")).unwrap();

    assert!(scheduler.cancel(b));
    assert!(!scheduler.cancel(b));

    scheduler.drain().unwrap();
    assert_eq!(*log.lock(), vec!["A", "C"]);
    assert_eq!(scheduler.stats().cancelled, 1);
}

#[test]
fn test_drain_on_empty_queue() {
    let scheduler = TickScheduler::new();
    assert_eq!(scheduler.drain().unwrap(), 0);
}

#[test]
fn test_saturated_queue_rejects() {
    let scheduler = TickScheduler::with_capacity(2);
    scheduler.enqueue(|| Ok(())).unwrap();
    scheduler.enqueue(|| Ok(())).unwrap();

    let err = scheduler.enqueue(|| Ok(())).unwrap_err();
    assert_eq!(err, SchedulerError::Saturated { capacity: 2 });
}
