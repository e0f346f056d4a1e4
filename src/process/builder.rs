/*!
 * Process Builder
 * Builder pattern for Process construction
 */

use super::controller::LifecycleController;
use super::handle::Process;
use crate::clock::{MonotonicClock, SystemClock};
use crate::core::config::ProcessConfig;
use crate::events::EventEmitter;
use crate::host::{
    EnvironmentStore, IdentityProvider, OsIdentity, OsWorkingDirectory, SnapshotEnvironment,
    WorkingDirectory,
};
use crate::resources::{MemorySampler, OsMemorySampler};
use crate::scheduler::TickScheduler;
use crate::streams::{InputStream, OutputStream};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// Builder for Process
///
/// Collaborators that are not injected fall back to the OS-backed defaults.
#[derive(Default)]
pub struct ProcessBuilder {
    config: ProcessConfig,
    clock: Option<Arc<dyn MonotonicClock>>,
    sampler: Option<Arc<dyn MemorySampler>>,
    env: Option<Arc<dyn EnvironmentStore>>,
    cwd: Option<Arc<dyn WorkingDirectory>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    argv: Option<Vec<String>>,
    stdout: Option<Box<dyn Write + Send>>,
    stderr: Option<Box<dyn Write + Send>>,
    stdin: Option<Box<dyn BufRead + Send>>,
}

impl ProcessBuilder {
    /// Create a new Process builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn MonotonicClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_sampler(mut self, sampler: Arc<dyn MemorySampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn with_env(mut self, env: Arc<dyn EnvironmentStore>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_cwd(mut self, cwd: Arc<dyn WorkingDirectory>) -> Self {
        self.cwd = Some(cwd);
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_argv<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv = Some(argv.into_iter().map(Into::into).collect());
        self
    }

    /// Byte sink behind `stdout`
    pub fn with_stdout(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.stdout = Some(sink);
        self
    }

    /// Byte sink behind `stderr`
    pub fn with_stderr(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.stderr = Some(sink);
        self
    }

    /// Byte source behind `stdin`
    pub fn with_stdin(mut self, source: Box<dyn BufRead + Send>) -> Self {
        self.stdin = Some(source);
        self
    }

    /// Build the Process
    pub fn build(self) -> Process {
        let config = self.config;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(OsIdentity::new().with_title(config.title.clone())))
            .identity();

        let env = self.env.unwrap_or_else(|| {
            let snapshot = SnapshotEnvironment::from_os();
            if config.inject_runtime_env {
                Arc::new(snapshot.with_runtime_vars())
            } else {
                Arc::new(snapshot)
            }
        });

        let stdout = match self.stdout {
            Some(sink) => OutputStream::new("stdout", config.stdout_mode, sink),
            None => OutputStream::stdout(config.stdout_mode),
        };
        let stderr = match self.stderr {
            Some(sink) => OutputStream::new("stderr", config.stderr_mode, sink),
            None => OutputStream::stderr(config.stderr_mode),
        };
        let stdin = match self.stdin {
            Some(source) => InputStream::new(config.stdin_framing, source),
            None => InputStream::stdin(config.stdin_framing),
        };

        let events = EventEmitter::new();
        let scheduler = TickScheduler::with_capacity(config.tick_queue_capacity);
        let lifecycle =
            LifecycleController::new(identity, clock.clone(), events.clone(), scheduler.clone());

        info!(
            pid = lifecycle.identity().pid,
            tick_queue_capacity = config.tick_queue_capacity,
            "Process initialized"
        );

        Process {
            lifecycle,
            events,
            scheduler,
            clock,
            sampler: self.sampler.unwrap_or_else(|| Arc::new(OsMemorySampler::new())),
            env,
            cwd: self.cwd.unwrap_or_else(|| Arc::new(OsWorkingDirectory::new())),
            argv: Arc::new(self.argv.unwrap_or_else(|| std::env::args().collect())),
            stdout,
            stderr,
            stdin,
            config: Arc::new(config),
        }
    }
}
