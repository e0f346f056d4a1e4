/*!
 * Process Identity
 * pid, parent pid, and platform tags from the OS
 */

use super::traits::IdentityProvider;
use crate::core::limits::DEFAULT_TITLE;
use crate::core::types::{Pid, ProcessIdentity};

/// Platform tag in the runtime's naming convention
pub fn platform_tag() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// Architecture tag in the runtime's naming convention
pub fn architecture_tag() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "arm" => "arm",
        "x86" => "x86",
        _ => "unknown",
    }
}

/// Runtime version tag, `v<crate version>`
pub fn version_tag() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(unix)]
fn os_pids() -> (Pid, Pid) {
    use nix::unistd::{getpid, getppid};

    (getpid().as_raw() as Pid, getppid().as_raw() as Pid)
}

// No parent pid lookup off unix; report our own pid
#[cfg(not(unix))]
fn os_pids() -> (Pid, Pid) {
    let pid = std::process::id();
    (pid, pid)
}

/// Identity provider reading the current OS process
#[derive(Debug, Clone)]
pub struct OsIdentity {
    title: String,
}

impl OsIdentity {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for OsIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for OsIdentity {
    fn identity(&self) -> ProcessIdentity {
        let (pid, parent_pid) = os_pids();
        ProcessIdentity::new(pid, parent_pid)
            .with_platform(platform_tag(), architecture_tag())
            .with_version(version_tag())
            .with_title(self.title.clone())
            .with_component(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Identity provider returning a fixed identity
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub ProcessIdentity);

impl IdentityProvider for StaticIdentity {
    fn identity(&self) -> ProcessIdentity {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_identity_matches_std() {
        let identity = OsIdentity::new().with_title("probe").identity();
        assert_eq!(identity.pid, std::process::id());
        assert_eq!(identity.title, "probe");
        assert_eq!(identity.version, version_tag());
        assert_eq!(identity.platform, platform_tag());
        assert!(identity
            .versions
            .iter()
            .any(|(name, _)| name == env!("CARGO_PKG_NAME")));
    }

    #[test]
    fn test_version_tag_prefix() {
        assert!(version_tag().starts_with('v'));
    }
}
