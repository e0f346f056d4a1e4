/*!
 * Process Handle
 * The process API surface exposed to the host program
 */

use super::builder::ProcessBuilder;
use super::controller::LifecycleController;
use super::types::{ExitReport, LifecycleError, LifecycleResult, LifecycleState};
use crate::clock::{MonotonicClock, TimingSample};
use crate::core::config::ProcessConfig;
use crate::core::limits::EVENT_WARNING;
use crate::core::types::{EventArg, ExitCode, Pid, ProcessIdentity};
use crate::events::{EventEmitter, EventResult, ListenerId};
use crate::host::{EnvironmentStore, WorkingDirectory, WorkingDirectoryResult};
use crate::resources::{MemorySample, MemorySampler};
use crate::scheduler::{SchedulerResult, SchedulerStats, TaskHandle, TickScheduler};
use crate::streams::{InputStream, OutputStream};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

/// Process facility of a script-execution runtime
///
/// Cloning yields another handle to the same process; callbacks capture a
/// clone to schedule follow-up work or emit events.
#[derive(Clone)]
pub struct Process {
    pub(super) lifecycle: LifecycleController,
    pub(super) events: EventEmitter,
    pub(super) scheduler: TickScheduler,
    pub(super) clock: Arc<dyn MonotonicClock>,
    pub(super) sampler: Arc<dyn MemorySampler>,
    pub(super) env: Arc<dyn EnvironmentStore>,
    pub(super) cwd: Arc<dyn WorkingDirectory>,
    pub(super) argv: Arc<Vec<String>>,
    pub(super) stdout: OutputStream,
    pub(super) stderr: OutputStream,
    pub(super) stdin: InputStream,
    pub(super) config: Arc<ProcessConfig>,
}

impl Process {
    /// Process with OS-backed collaborators and default config
    pub fn new() -> Self {
        ProcessBuilder::new().build()
    }

    pub fn builder() -> ProcessBuilder {
        ProcessBuilder::new()
    }

    // =========================================================================
    // Identity and environment
    // =========================================================================

    #[inline]
    pub fn identity(&self) -> &ProcessIdentity {
        self.lifecycle.identity()
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.identity().pid
    }

    #[inline]
    pub fn ppid(&self) -> Pid {
        self.identity().parent_pid
    }

    #[inline]
    pub fn platform(&self) -> &str {
        &self.identity().platform
    }

    #[inline]
    pub fn arch(&self) -> &str {
        &self.identity().architecture
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.identity().version
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.identity().title
    }

    pub fn versions(&self) -> &[(String, String)] {
        &self.identity().versions
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Environment variable lookup; `None` when absent
    pub fn env(&self, name: &str) -> Option<String> {
        self.env.get(name)
    }

    pub fn env_keys(&self) -> Vec<String> {
        self.env.keys()
    }

    pub fn cwd(&self) -> WorkingDirectoryResult<PathBuf> {
        self.cwd.cwd()
    }

    pub fn chdir(&self, path: impl AsRef<Path>) -> WorkingDirectoryResult<()> {
        self.cwd.chdir(path.as_ref())
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    // =========================================================================
    // Deferred tasks
    // =========================================================================

    /// Schedule `callback` on the tick queue
    pub fn next_tick<F>(&self, callback: F) -> SchedulerResult<TaskHandle>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.scheduler.enqueue(callback)
    }

    pub fn cancel_tick(&self, handle: TaskHandle) -> bool {
        self.scheduler.cancel(handle)
    }

    /// Drain the tick queue; a no-op once termination has begun
    pub fn drain_ticks(&self) -> SchedulerResult<usize> {
        self.lifecycle.drain()
    }

    pub fn tick_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[EventArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.events.on(event, callback)
    }

    pub fn once<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[EventArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.events.once(event, callback)
    }

    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.events.off(event, id)
    }

    /// Synchronously dispatch `event`; returns the first listener failure
    pub fn emit(&self, event: &str, args: &[EventArg]) -> EventResult<usize> {
        self.events.emit(event, args)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.events.listener_count(event)
    }

    /// Emit `warning` with `message`
    pub fn emit_warning(&self, message: &str) -> EventResult<usize> {
        warn!(warning = message, "Process warning");
        self.events.emit(EVENT_WARNING, &[EventArg::from(message)])
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    // =========================================================================
    // Timing and resources
    // =========================================================================

    #[inline]
    pub fn now(&self) -> TimingSample {
        self.clock.now()
    }

    #[inline]
    pub fn elapsed(&self, since: TimingSample) -> TimingSample {
        self.clock.elapsed(since)
    }

    /// `now()`, or the time elapsed since `previous`
    pub fn hrtime(&self, previous: Option<TimingSample>) -> TimingSample {
        match previous {
            Some(since) => self.elapsed(since),
            None => self.now(),
        }
    }

    pub fn hrtime_bigint(&self) -> u128 {
        self.now().as_nanos()
    }

    /// Seconds since process start
    pub fn uptime(&self) -> f64 {
        self.lifecycle.uptime().as_secs_f64()
    }

    /// Point-in-time memory estimate
    pub fn memory_usage(&self) -> MemorySample {
        self.sampler.sample()
    }

    // =========================================================================
    // Streams
    // =========================================================================

    pub fn stdout(&self) -> &OutputStream {
        &self.stdout
    }

    pub fn stderr(&self) -> &OutputStream {
        &self.stderr
    }

    pub fn stdin(&self) -> &InputStream {
        &self.stdin
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn exit_code(&self) -> ExitCode {
        self.lifecycle.exit_code()
    }

    pub fn set_exit_code(&self, code: ExitCode) {
        self.lifecycle.set_exit_code(code)
    }

    /// Run the terminal sequence without ending the OS process
    pub fn terminate(&self, code: ExitCode) -> LifecycleResult<ExitReport> {
        self.lifecycle.terminate(code)
    }

    /// Drive deferred work to exhaustion, then terminate
    pub fn run(&self) -> LifecycleResult<ExitReport> {
        self.lifecycle.run()
    }

    /// Terminate and end the OS process with the resulting code
    ///
    /// Called from an `exit` listener, the request is recorded and
    /// `InvalidTransition` is returned so the running sequence can finish;
    /// the report then carries `exit_requested`. Called after termination,
    /// the OS process ends with the recorded code.
    pub fn exit(&self, code: ExitCode) -> LifecycleResult<Infallible> {
        let code = match self.terminate(code) {
            Ok(report) => report.code,
            Err(
                e @ LifecycleError::InvalidTransition {
                    from: LifecycleState::Exiting,
                    ..
                },
            ) => {
                self.lifecycle.request_exit(code);
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Exit requested after termination");
                self.lifecycle
                    .exit_report()
                    .map(|report| report.code)
                    .unwrap_or(code)
            }
        };

        for stream in [&self.stdout, &self.stderr] {
            if let Err(e) = stream.flush() {
                error!(stream = stream.name(), error = %e, "Flush before exit failed");
            }
        }
        std::process::exit(code)
    }
}

impl Default for Process {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("lifecycle", &self.lifecycle)
            .field("scheduler", &self.scheduler)
            .field("events", &self.events)
            .finish()
    }
}
