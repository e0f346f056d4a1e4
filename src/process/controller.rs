/*!
 * Lifecycle Controller
 *
 * Owns the process state and drives the terminal sequence.
 *
 * # Termination
 *
 * `terminate(code)`:
 * 1. `Running -> Exiting` (compare-and-swap; any other state is rejected,
 *    so `exit` can never be emitted twice or re-entered from a listener)
 * 2. Emit `exit` with the code, synchronously; listener failures are
 *    recorded in the report and never stop the sequence
 * 3. Drop deferred tasks still queued, including ones enqueued by `exit`
 *    listeners
 * 4. `Exiting -> Terminated`
 *
 * An OS exit requested from an `exit` listener does not cut the sequence
 * short. It is recorded with `request_exit` and surfaces as
 * `ExitReport::exit_requested`; the code stays the one the sequence
 * started with.
 *
 * # Run Loop
 *
 * `run()` drains the tick queue, emits `beforeExit` whenever the queue is
 * found empty, and terminates with the exit-code register once a
 * `beforeExit` dispatch leaves no new work. Task failures go to
 * `uncaughtException` listeners when there are any; otherwise the loop
 * terminates with code 1.
 */

use super::types::{ExitReport, LifecycleError, LifecycleResult, LifecycleState, ProcessState};
use crate::clock::{MonotonicClock, TimingSample};
use crate::core::limits::{
    EVENT_BEFORE_EXIT, EVENT_EXIT, EVENT_UNCAUGHT_EXCEPTION, UNCAUGHT_EXCEPTION_EXIT_CODE,
};
use crate::core::types::{EventArg, ExitCode, ProcessIdentity};
use crate::events::{EventEmitter, ListenerFailure};
use crate::scheduler::{SchedulerError, SchedulerResult, TickScheduler};
use parking_lot::Mutex;
use serde_json::json;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Process lifecycle controller
#[derive(Clone)]
pub struct LifecycleController {
    identity: Arc<ProcessIdentity>,
    start: TimingSample,
    state: Arc<AtomicU8>,
    exit_code: Arc<AtomicI32>,
    exit_requested: Arc<AtomicBool>,
    clock: Arc<dyn MonotonicClock>,
    events: EventEmitter,
    scheduler: TickScheduler,
    failures: Arc<Mutex<Vec<ListenerFailure>>>,
    report: Arc<Mutex<Option<ExitReport>>>,
}

impl LifecycleController {
    pub fn new(
        identity: ProcessIdentity,
        clock: Arc<dyn MonotonicClock>,
        events: EventEmitter,
        scheduler: TickScheduler,
    ) -> Self {
        let start = clock.now();
        info!(%identity, "Process lifecycle started");

        Self {
            identity: Arc::new(identity),
            start,
            state: Arc::new(AtomicU8::new(LifecycleState::Running as u8)),
            exit_code: Arc::new(AtomicI32::new(0)),
            exit_requested: Arc::new(AtomicBool::new(false)),
            clock,
            events,
            scheduler,
            failures: Arc::new(Mutex::new(Vec::new())),
            report: Arc::new(Mutex::new(None)),
        }
    }

    #[inline]
    pub fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    pub fn process_state(&self) -> ProcessState {
        ProcessState {
            identity: (*self.identity).clone(),
            start: self.start,
            state: self.state(),
        }
    }

    /// Monotonic time since the controller was created
    #[inline]
    pub fn uptime(&self) -> TimingSample {
        self.clock.elapsed(self.start)
    }

    #[inline]
    pub fn exit_code(&self) -> ExitCode {
        self.exit_code.load(Ordering::Acquire)
    }

    /// Code used when the run loop ends on exhausted work
    pub fn set_exit_code(&self, code: ExitCode) {
        self.exit_code.store(code, Ordering::Release);
    }

    /// Drain deferred tasks; a no-op once termination has begun
    pub fn drain(&self) -> SchedulerResult<usize> {
        if !self.is_running() {
            debug!(state = ?self.state(), "Skipping drain outside Running");
            return Ok(0);
        }
        self.scheduler.drain()
    }

    /// Run the terminal sequence with `code`
    pub fn terminate(&self, code: ExitCode) -> LifecycleResult<ExitReport> {
        self.state
            .compare_exchange(
                LifecycleState::Running as u8,
                LifecycleState::Exiting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| {
                let from = LifecycleState::from_u8(current);
                warn!(code, state = ?from, "Termination requested outside Running");
                LifecycleError::InvalidTransition {
                    from,
                    to: LifecycleState::Exiting,
                }
            })?;

        self.exit_code.store(code, Ordering::Release);
        info!(code, "Process exiting");

        let outcome = self.events.emit_collect(EVENT_EXIT, &[EventArg::from(code)]);
        if !outcome.is_ok() {
            warn!(
                failures = outcome.failures.len(),
                "Exit listeners failed, continuing termination"
            );
        }
        self.failures.lock().extend(outcome.failures);

        let discarded_tasks = self.scheduler.halt();
        self.state
            .store(LifecycleState::Terminated as u8, Ordering::Release);

        let report = ExitReport {
            code,
            listener_failures: self.failures.lock().clone(),
            discarded_tasks,
            exit_requested: self.exit_requested(),
            uptime: self.uptime(),
        };
        *self.report.lock() = Some(report.clone());

        info!(
            code,
            discarded_tasks,
            uptime = %report.uptime,
            "Process terminated"
        );
        Ok(report)
    }

    /// Record an OS exit requested while `exit` listeners are running
    pub fn request_exit(&self, code: ExitCode) {
        warn!(
            code,
            exit_code = self.exit_code(),
            "OS exit requested during exit dispatch, deferred until Terminated"
        );
        self.exit_requested.store(true, Ordering::Release);
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }

    /// Report of a completed termination
    pub fn exit_report(&self) -> Option<ExitReport> {
        self.report.lock().clone()
    }

    /// Drive deferred work to exhaustion, then terminate
    pub fn run(&self) -> LifecycleResult<ExitReport> {
        if !self.is_running() {
            return Err(LifecycleError::InvalidTransition {
                from: self.state(),
                to: LifecycleState::Exiting,
            });
        }

        loop {
            if let Err(err) = self.scheduler.drain() {
                if let Some(code) = self.handle_task_error(err) {
                    return self.finish(code);
                }
            }

            // A task may have called terminate
            if let Some(report) = self.exit_report() {
                return Ok(report);
            }

            if !self.scheduler.is_empty() {
                continue;
            }

            let code = self.exit_code();
            debug!(code, "Tick queue exhausted, emitting beforeExit");
            let outcome = self
                .events
                .emit_collect(EVENT_BEFORE_EXIT, &[EventArg::from(code)]);
            if !outcome.is_ok() {
                warn!(
                    failures = outcome.failures.len(),
                    "beforeExit listeners failed, continuing run loop"
                );
            }
            self.failures.lock().extend(outcome.failures);

            if let Some(report) = self.exit_report() {
                return Ok(report);
            }
            if self.scheduler.is_empty() {
                return self.finish(self.exit_code());
            }
        }
    }

    /// Route a failed task; returns the exit code if the loop must end
    fn handle_task_error(&self, err: SchedulerError) -> Option<ExitCode> {
        let failure = match err {
            SchedulerError::TaskFailed(failure) => failure,
            other => {
                error!(error = %other, "Tick queue failure");
                return Some(UNCAUGHT_EXCEPTION_EXIT_CODE);
            }
        };

        if !self.events.has_listeners(EVENT_UNCAUGHT_EXCEPTION) {
            error!(error = %failure, "Uncaught deferred task failure");
            return Some(UNCAUGHT_EXCEPTION_EXIT_CODE);
        }

        let args = [
            json!(failure.message),
            json!({ "task": failure.task.sequence() }),
        ];
        let outcome = self.events.emit_collect(EVENT_UNCAUGHT_EXCEPTION, &args);
        if outcome.is_ok() {
            None
        } else {
            error!("uncaughtException listener failed");
            self.failures.lock().extend(outcome.failures);
            Some(UNCAUGHT_EXCEPTION_EXIT_CODE)
        }
    }

    fn finish(&self, code: ExitCode) -> LifecycleResult<ExitReport> {
        match self.terminate(code) {
            Ok(report) => Ok(report),
            Err(e) => self.exit_report().ok_or(e),
        }
    }
}

impl fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("identity", &self.identity)
            .field("state", &self.state())
            .field("exit_code", &self.exit_code())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn controller() -> (LifecycleController, ManualClock) {
        let clock = ManualClock::new();
        let controller = LifecycleController::new(
            ProcessIdentity::new(42, 1),
            Arc::new(clock.clone()),
            EventEmitter::new(),
            TickScheduler::new(),
        );
        (controller, clock)
    }

    #[test]
    fn test_uptime_follows_clock() {
        let (controller, clock) = controller();
        clock.advance(Duration::from_millis(1_500));
        assert_eq!(controller.uptime(), TimingSample::new(1, 500_000_000));
    }

    #[test]
    fn test_state_snapshot() {
        let (controller, _) = controller();
        let state = controller.process_state();
        assert_eq!(state.identity.pid, 42);
        assert_eq!(state.state, LifecycleState::Running);

        controller.terminate(3).unwrap();
        assert_eq!(controller.process_state().state, LifecycleState::Terminated);
        assert_eq!(controller.exit_code(), 3);
    }

    #[test]
    fn test_before_exit_failures_reach_report() {
        let (controller, _) = controller();
        controller
            .events
            .on(EVENT_BEFORE_EXIT, |_| Err(anyhow::anyhow!("flush failed")));

        let report = controller.run().unwrap();

        assert_eq!(report.code, 0);
        assert_eq!(report.listener_failures.len(), 1);
        assert_eq!(report.listener_failures[0].event, EVENT_BEFORE_EXIT);
        assert!(!report.exit_requested);
    }

    #[test]
    fn test_run_rejected_after_termination() {
        let (controller, _) = controller();
        controller.terminate(0).unwrap();
        assert_eq!(
            controller.run(),
            Err(LifecycleError::InvalidTransition {
                from: LifecycleState::Terminated,
                to: LifecycleState::Exiting,
            })
        );
    }
}
