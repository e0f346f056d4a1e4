/*!
 * Environment Store
 * Startup snapshot of the OS environment plus runtime-provided keys
 */

use super::identity::platform_tag;
use super::traits::EnvironmentStore;
use crate::core::limits::{ENV_RUNTIME_PLATFORM, ENV_RUNTIME_VERSION};
use std::collections::BTreeMap;
use tracing::debug;

/// Immutable environment snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotEnvironment {
    vars: BTreeMap<String, String>,
}

impl SnapshotEnvironment {
    /// Capture the OS environment; non-UTF-8 entries are decoded lossily
    pub fn from_os() -> Self {
        let vars: BTreeMap<String, String> = std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect();

        debug!(count = vars.len(), "Captured environment snapshot");
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Add the runtime's own version and platform keys
    #[must_use]
    pub fn with_runtime_vars(mut self) -> Self {
        self.vars.insert(
            ENV_RUNTIME_VERSION.to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        self.vars
            .insert(ENV_RUNTIME_PLATFORM.to_string(), platform_tag().to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvironmentStore for SnapshotEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}
