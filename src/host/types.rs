/*!
 * Host Types
 * Errors raised by external collaborators
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Working-directory operation result
pub type WorkingDirectoryResult<T> = Result<T, WorkingDirectoryError>;

/// Working-directory errors, propagated unchanged to the host program
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkingDirectoryError {
    #[error("No such directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Working directory I/O error: {0}")]
    Io(String),
}

impl WorkingDirectoryError {
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => WorkingDirectoryError::NotFound(path.to_path_buf()),
            _ => WorkingDirectoryError::Io(err.to_string()),
        }
    }
}
