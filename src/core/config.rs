/*!
 * Process Configuration
 * Tunables for the process core, with environment overrides
 */

use super::limits::{
    DEFAULT_TICK_QUEUE_CAPACITY, DEFAULT_TITLE, ENV_STDOUT_BUFFERED, ENV_TICK_QUEUE_CAPACITY,
};
use crate::streams::{InputFraming, WriteMode};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for process construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessConfig {
    /// Pending-task ceiling for the tick queue
    pub tick_queue_capacity: usize,
    pub stdout_mode: WriteMode,
    pub stderr_mode: WriteMode,
    pub stdin_framing: InputFraming,
    /// Inject the runtime's own keys into the environment snapshot
    pub inject_runtime_env: bool,
    pub title: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            tick_queue_capacity: DEFAULT_TICK_QUEUE_CAPACITY,
            stdout_mode: WriteMode::ImmediateFlush,
            stderr_mode: WriteMode::ImmediateFlush,
            stdin_framing: InputFraming::Lines,
            inject_runtime_env: true,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ProcessConfig {
    /// Defaults overlaid with `PROCESS_TICK_QUEUE_CAPACITY` and
    /// `PROCESS_STDOUT_BUFFERED`
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup; malformed values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TICK_QUEUE_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => self.tick_queue_capacity = capacity,
                _ => warn!(
                    key = ENV_TICK_QUEUE_CAPACITY,
                    value = %raw,
                    "Ignoring invalid tick queue capacity"
                ),
            }
        }

        if let Some(raw) = lookup(ENV_STDOUT_BUFFERED) {
            match raw.trim() {
                "1" | "true" => self.stdout_mode = WriteMode::Buffered,
                "0" | "false" => self.stdout_mode = WriteMode::ImmediateFlush,
                _ => warn!(
                    key = ENV_STDOUT_BUFFERED,
                    value = %raw,
                    "Ignoring invalid stdout buffering flag"
                ),
            }
        }

        self
    }

    /// Set the pending-task ceiling; zero is raised to one
    #[inline]
    #[must_use]
    pub fn with_tick_queue_capacity(mut self, capacity: usize) -> Self {
        self.tick_queue_capacity = capacity.max(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_stdout_mode(mut self, mode: WriteMode) -> Self {
        self.stdout_mode = mode;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_stderr_mode(mut self, mode: WriteMode) -> Self {
        self.stderr_mode = mode;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_stdin_framing(mut self, framing: InputFraming) -> Self {
        self.stdin_framing = framing;
        self
    }

    #[inline]
    #[must_use]
    pub fn without_runtime_env(mut self) -> Self {
        self.inject_runtime_env = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
