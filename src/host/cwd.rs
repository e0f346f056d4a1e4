/*!
 * Working Directory
 * OS-backed cwd / chdir
 */

use super::traits::WorkingDirectory;
use super::types::{WorkingDirectoryError, WorkingDirectoryResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Working-directory service over the OS process cwd
#[derive(Debug, Clone, Copy, Default)]
pub struct OsWorkingDirectory;

impl OsWorkingDirectory {
    pub fn new() -> Self {
        Self
    }
}

impl WorkingDirectory for OsWorkingDirectory {
    fn cwd(&self) -> WorkingDirectoryResult<PathBuf> {
        std::env::current_dir().map_err(|e| WorkingDirectoryError::Io(e.to_string()))
    }

    fn chdir(&self, path: &Path) -> WorkingDirectoryResult<()> {
        std::env::set_current_dir(path).map_err(|e| WorkingDirectoryError::from_io(path, e))?;
        info!(path = %path.display(), "Changed working directory");
        Ok(())
    }
}
