//! Registry Module
//!
//! Process-scoped table of named cache instances.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::CacheInstance;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Shared handle to a registered cache instance.
pub type CacheHandle<K, V> = Arc<CacheInstance<K, V>>;

// == Registry ==
/// Name → cache instance table guarded by a single reader/writer lock.
///
/// The registry is an ordinary value: construct one with [`Registry::new`] at
/// startup and share it (typically in an `Arc`) with whoever creates or looks
/// up caches. Instances never refer back to it.
///
/// The lock is held only for the table access itself. Operations on a cache
/// go straight to its handle.
///
/// # Example
/// ```ignore
/// let registry: Registry<String, u64> = Registry::new();
/// let sessions = registry.create("sessions", Duration::ZERO, Duration::from_secs(60))?;
/// sessions.set("user:1".to_string(), 42, Ttl::Default)?;
/// registry.delete("sessions");
/// ```
#[derive(Debug)]
pub struct Registry<K, V>
where
    K: Eq + Hash,
{
    caches: RwLock<HashMap<String, CacheHandle<K, V>>>,
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
        }
    }

    // == Create ==
    /// Creates, starts and registers a new cache instance.
    ///
    /// # Arguments
    /// * `name` - Unique cache name
    /// * `sweep_interval` - Sweep period, zero for [`DEFAULT_SWEEP_INTERVAL`](crate::DEFAULT_SWEEP_INTERVAL)
    /// * `ttl` - Instance default TTL, zero for [`DEFAULT_EXPIRATION`](crate::DEFAULT_EXPIRATION)
    ///
    /// # Errors
    /// - [`CacheError::AlreadyExists`] if the name is taken
    /// - [`CacheError::NoRuntime`] outside a tokio runtime; nothing is registered
    pub fn create(
        &self,
        name: &str,
        sweep_interval: Duration,
        ttl: Duration,
    ) -> Result<CacheHandle<K, V>> {
        self.create_with_config(name, CacheConfig::new(sweep_interval, ttl))
    }

    /// Same as [`create`](Self::create) with a prepared configuration.
    pub fn create_with_config(&self, name: &str, config: CacheConfig) -> Result<CacheHandle<K, V>> {
        let config = CacheConfig::new(config.sweep_interval, config.default_ttl);

        // Check, start and insert under one write lock so a name never maps to two instances
        let mut caches = self.caches.write();
        if caches.contains_key(name) {
            return Err(CacheError::AlreadyExists(name.to_string()));
        }

        let cache = Arc::new(CacheInstance::new(name, config));
        cache.start_sweep()?;
        caches.insert(name.to_string(), cache.clone());

        info!(
            cache = name,
            "Cache created: sweep_interval={:?}, default_ttl={:?}",
            config.sweep_interval,
            config.default_ttl
        );
        Ok(cache)
    }

    // == Get ==
    /// Looks up a cache by name. A missing name is not an error.
    pub fn get(&self, name: &str) -> Option<CacheHandle<K, V>> {
        self.caches.read().get(name).cloned()
    }

    // == List ==
    /// Returns the names of all registered caches, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }

    // == Delete ==
    /// Stops a cache's sweep task and unregisters it. No-op if the name is absent.
    ///
    /// Handles obtained earlier stay usable, without background eviction.
    pub fn delete(&self, name: &str) {
        // Table access only; the sweep is stopped after the lock is released
        let removed = self.caches.write().remove(name);
        match removed {
            Some(cache) => {
                cache.stop_sweep();
                info!(cache = name, "Cache deleted");
            }
            None => debug!(cache = name, "Delete of unknown cache ignored"),
        }
    }

    /// Returns true if a cache with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.caches.read().contains_key(name)
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    /// Returns true if no cache is registered.
    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }
}

impl<K, V> Default for Registry<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
