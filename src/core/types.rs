/*!
 * Core Types
 * Common types used across the process core
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// OS process ID type
pub type Pid = u32;

/// Process exit code
pub type ExitCode = i32;

/// Monotonic sequence number assigned to queued tasks and listeners
pub type Sequence = u64;

/// Positional argument passed to event listeners
pub type EventArg = serde_json::Value;

/// Common result type for process core operations
pub type CoreResult<T> = Result<T, super::errors::ProcessCoreError>;

/// Static identity of the running process
///
/// Supplied once at startup by an identity provider and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessIdentity {
    pub pid: Pid,
    pub parent_pid: Pid,
    /// Platform tag (`linux`, `darwin`, `win32`, ...)
    pub platform: String,
    /// Architecture tag (`x64`, `arm64`, `arm`, `x86`, ...)
    pub architecture: String,
    /// Runtime version tag, e.g. `v0.1.0`
    pub version: String,
    /// Program title
    pub title: String,
    /// Component name -> version
    pub versions: Vec<(String, String)>,
}

impl ProcessIdentity {
    pub fn new(pid: Pid, parent_pid: Pid) -> Self {
        Self {
            pid,
            parent_pid,
            platform: String::from("unknown"),
            architecture: String::from("unknown"),
            version: String::from("v0.0.0"),
            title: String::from(crate::core::limits::DEFAULT_TITLE),
            versions: Vec::new(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>, architecture: impl Into<String>) -> Self {
        self.platform = platform.into();
        self.architecture = architecture.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_component(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.push((name.into(), version.into()));
        self
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (pid {}, ppid {}, {}-{}, {})",
            self.title, self.pid, self.parent_pid, self.platform, self.architecture, self.version
        )
    }
}
