//! Cache Store Module
//!
//! Cache instance engine: sharded concurrent storage with TTL expiration and a
//! background sweep task.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::stats::SweepCounters;
use crate::cache::{CacheItem, CacheStats, Ttl};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::Sweeper;

// == Shared State ==
/// State reachable from both the instance and its sweep task.
#[derive(Debug)]
struct Shared<K, V>
where
    K: Eq + Hash,
{
    items: DashMap<K, CacheItem<V>>,
    counters: SweepCounters,
}

impl<K, V> Shared<K, V>
where
    K: Eq + Hash,
{
    /// Removes expired items one shard at a time.
    ///
    /// Expiry is evaluated under each shard's lock, so an item rewritten with a
    /// fresh deadline while the pass is running is kept.
    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.items.retain(|_, item| {
            if item.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });

        self.counters.record_sweep(removed);
        removed
    }
}

// == Active Sweeper Guard ==
/// Keeps the live sweep-task count accurate; dropped together with the task.
struct ActiveSweep(Arc<AtomicUsize>);

impl ActiveSweep {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self(active.clone())
    }
}

impl Drop for ActiveSweep {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// == Cache Instance ==
/// A single cache: key/value storage with per-item TTL and a background sweep.
///
/// Values are opaque to the cache. Point operations lock only the shard that
/// owns the key, so writers on different keys do not contend with each other
/// or with a running sweep.
///
/// Presence and liveness are tracked separately: [`add`](Self::add) and
/// [`update`](Self::update) look at whether a key occupies a slot, while
/// [`get`](Self::get) only returns items whose deadline has not passed.
#[derive(Debug)]
pub struct CacheInstance<K, V>
where
    K: Eq + Hash,
{
    name: String,
    shared: Arc<Shared<K, V>>,
    config: CacheConfig,
    sweeper: Mutex<Option<Sweeper>>,
    active_sweepers: Arc<AtomicUsize>,
}

impl<K, V> CacheInstance<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty instance. The sweep task is not started.
    ///
    /// # Arguments
    /// * `name` - Label used in log output
    /// * `config` - Sweep interval and default TTL
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(Shared {
                items: DashMap::new(),
                counters: SweepCounters::default(),
            }),
            config,
            sweeper: Mutex::new(None),
            active_sweepers: Arc::new(AtomicUsize::new(0)),
        }
    }

    // == Add ==
    /// Stores a value only if the key is not present.
    ///
    /// An expired item that has not been swept yet still occupies its slot and
    /// makes this fail.
    ///
    /// # Errors
    /// [`CacheError::AlreadyExists`] if the key is present.
    pub fn add(&self, key: K, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let item = CacheItem::new(value, ttl.into(), self.config.default_ttl);

        match self.shared.items.entry(key) {
            Entry::Occupied(entry) => Err(CacheError::AlreadyExists(format!("{:?}", entry.key()))),
            Entry::Vacant(entry) => {
                entry.insert(item);
                Ok(())
            }
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing item for the key.
    ///
    /// # Arguments
    /// * `ttl` - [`Ttl::After`] for an explicit lifetime, [`Ttl::Default`] for the
    ///   instance default, [`Ttl::Never`] for no expiration
    pub fn set(&self, key: K, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let item = CacheItem::new(value, ttl.into(), self.config.default_ttl);
        self.shared.items.insert(key, item);
        Ok(())
    }

    // == Update ==
    /// Replaces the item for a key that is already present.
    ///
    /// Presence is checked, not liveness: an expired but unswept item is replaced.
    ///
    /// # Errors
    /// [`CacheError::NotFound`] if the key is absent. The key is not created.
    pub fn update(&self, key: K, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let item = CacheItem::new(value, ttl.into(), self.config.default_ttl);

        match self.shared.items.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.insert(item);
                Ok(())
            }
            Entry::Vacant(entry) => Err(CacheError::NotFound(format!("{:?}", entry.key()))),
        }
    }

    // == Get ==
    /// Looks up several keys at once.
    ///
    /// The returned map holds exactly the requested keys that have a live item;
    /// a key is found if and only if it is in the map.
    pub fn get<'q, Q, I>(&self, keys: I) -> HashMap<K, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        let now = Instant::now();
        let keys = keys.into_iter();
        let mut found = HashMap::with_capacity(keys.size_hint().0);

        for key in keys {
            if let Some(item) = self.shared.items.get(key) {
                if !item.is_expired_at(now) {
                    found.insert(item.key().clone(), item.value.clone());
                }
            }
        }

        found
    }

    /// Looks up a single key, returning its value if the item is live.
    pub fn get_one<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared
            .items
            .get(key)
            .filter(|item| !item.is_expired())
            .map(|item| item.value.clone())
    }

    /// Returns true if the key occupies a slot, live or not.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.items.contains_key(key)
    }

    // == Purge Expired ==
    /// Runs one sweep pass inline.
    ///
    /// Returns the number of items removed.
    pub fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }

    // == Sweep Lifecycle ==
    /// Starts the background sweep, replacing any sweep already running.
    ///
    /// The previous task is signalled to stop before the new one is spawned and
    /// exits at its next wakeup, leaving a single sweep for this instance.
    ///
    /// # Errors
    /// [`CacheError::NoRuntime`] outside of a tokio runtime. Any previous sweep
    /// has been stopped by then.
    pub fn start_sweep(&self) -> Result<()> {
        let mut slot = self.sweeper.lock();

        if let Some(previous) = slot.take() {
            previous.stop();
            debug!(cache = %self.name, "Restarting sweep task");
        }

        let weak: Weak<Shared<K, V>> = Arc::downgrade(&self.shared);
        let guard = ActiveSweep::enter(&self.active_sweepers);
        let name = self.name.clone();

        let sweeper = Sweeper::spawn(self.config.sweep_interval, move || {
            let _active = &guard;
            // The instance is gone once every handle is dropped
            let Some(shared) = weak.upgrade() else {
                return ControlFlow::Break(());
            };

            let removed = shared.purge_expired();
            if removed > 0 {
                info!(cache = %name, "Sweep: removed {} expired items", removed);
            } else {
                debug!(cache = %name, "Sweep: no expired items found");
            }
            ControlFlow::Continue(())
        })?;

        info!(
            cache = %self.name,
            "Starting sweep task with interval of {:?}",
            self.config.sweep_interval
        );
        *slot = Some(sweeper);
        Ok(())
    }

    /// Stops the background sweep. Safe to call when no sweep is running.
    ///
    /// Items stay readable and writable afterwards; they just stop being evicted.
    pub fn stop_sweep(&self) {
        if let Some(sweeper) = self.sweeper.lock().take() {
            sweeper.stop();
            info!(cache = %self.name, "Sweep task stopped");
        }
    }

    /// Returns true while a sweep task is registered and still running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    // == Accessors ==
    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Period of the background sweep.
    pub fn sweep_interval(&self) -> Duration {
        self.config.sweep_interval
    }

    /// TTL applied to [`Ttl::Default`] writes.
    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }

    // == Stats ==
    /// Returns current instance statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_items: self.shared.items.len(),
            sweeps: self.shared.counters.sweeps(),
            evicted: self.shared.counters.evicted(),
            active_sweepers: self.active_sweepers.load(Ordering::SeqCst),
        }
    }

    // == Length ==
    /// Returns the number of occupied slots, including expired but unswept items.
    pub fn len(&self) -> usize {
        self.shared.items.len()
    }

    // == Is Empty ==
    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.shared.items.is_empty()
    }
}
