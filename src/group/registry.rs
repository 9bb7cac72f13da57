use super::coordinator::Group;

use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, LazyLock};

/// Mapping of group names to instances.
///
/// The process-wide instance behind [`new_group`]/[`get_group`] serves the HTTP
/// dispatch; separate instances can be constructed for tests or embedding.
/// Lookups take the lock shared and run concurrently; registrations are rare
/// and take it exclusively.
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a group under its name.
    ///
    /// Names must be unique; re-registering a name replaces the previous group
    /// and is logged, since callers are expected to prevent it.
    pub fn register(&self, group: Arc<Group>) {
        let replaced = self
            .groups
            .write()
            .insert(group.name().to_string(), group.clone());
        if replaced.is_some() {
            tracing::warn!("Group {} registered more than once, replacing", group.name());
        } else {
            tracing::info!("Registered group {}", group.name());
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Creates a group and registers it in the process-wide registry.
///
/// `max_bytes = 0` leaves the group unbounded.
pub fn new_group<F, Fut>(name: &str, max_bytes: usize, loader: F) -> Arc<Group>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    let group = Group::new(name, max_bytes, loader);
    GLOBAL.register(group.clone());
    group
}

/// Looks up a group in the process-wide registry.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GLOBAL.get(name)
}
