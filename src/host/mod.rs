/*!
 * Host Module
 * External collaborators: environment, working directory, identity
 */

mod cwd;
mod env;
mod identity;
pub mod traits;
pub mod types;

pub use cwd::OsWorkingDirectory;
pub use env::SnapshotEnvironment;
pub use identity::{architecture_tag, platform_tag, version_tag, OsIdentity, StaticIdentity};
pub use traits::{EnvironmentStore, IdentityProvider, WorkingDirectory};
pub use types::{WorkingDirectoryError, WorkingDirectoryResult};
