/*!
 * Host Collaborator Traits
 * Narrow contracts for the services the process core consumes
 */

use super::types::WorkingDirectoryResult;
use crate::core::types::ProcessIdentity;
use std::path::{Path, PathBuf};

/// Read-only environment variable store
pub trait EnvironmentStore: Send + Sync {
    /// Value for `name`; absence is a valid result, not an error
    fn get(&self, name: &str) -> Option<String>;

    /// All variable names, sorted
    fn keys(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Working-directory service
pub trait WorkingDirectory: Send + Sync {
    fn cwd(&self) -> WorkingDirectoryResult<PathBuf>;

    fn chdir(&self, path: &Path) -> WorkingDirectoryResult<()>;
}

/// Supplies the process identity at startup
pub trait IdentityProvider: Send + Sync {
    fn identity(&self) -> ProcessIdentity;
}
