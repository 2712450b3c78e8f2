//! POLYKV - Database Slot
//! One independent key/entry namespace. The backing map is allocated on first
//! use and then shared for the lifetime of the manager.

use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;

use crate::types::{Entry, Key};

/// Entry handle as stored in, and returned from, a database.
pub type SharedEntry = Arc<Entry>;

/// A lazily-initialized concurrent map from [`Key`] to [`Entry`].
///
/// Concurrent first access runs the initializer once; every thread then
/// observes the same map. Keys on different shards never contend.
pub struct Database {
    index: u16,
    entries: OnceLock<DashMap<Key, SharedEntry>>,
}

impl Database {
    /// Create an empty, uninitialized slot.
    pub fn new(index: u16) -> Self {
        Self {
            index,
            entries: OnceLock::new(),
        }
    }

    /// Whether the backing map has been allocated yet.
    pub fn is_initialized(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Number of keys. Does not allocate the map.
    pub fn len(&self) -> usize {
        self.entries.get().map_or(0, DashMap::len)
    }

    /// Whether the database holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn map(&self) -> &DashMap<Key, SharedEntry> {
        self.entries.get_or_init(|| {
            log::debug!("Database {} initialized", self.index);
            DashMap::new()
        })
    }

    /// Insert `entry` only if `key` is absent. Returns `false` if it was present.
    pub fn try_insert(&self, key: Key, entry: SharedEntry) -> bool {
        match self.map().entry(key) {
            Slot::Occupied(_) => false,
            Slot::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Replace the value at `key` with `new` only if it is still `current`.
    ///
    /// Identity is pointer identity: a value written by anyone else since
    /// `current` was read makes this fail, even if it compares equal.
    pub fn compare_exchange(&self, key: &str, current: &SharedEntry, new: SharedEntry) -> bool {
        if let Some(mut slot) = self.map().get_mut(key) {
            if Arc::ptr_eq(slot.value(), current) {
                *slot = new;
                return true;
            }
        }
        false
    }

    /// Install `entry` under `key` unconditionally.
    ///
    /// When replacing, the incoming entry inherits the existing creation time
    /// and has its modification time stamped. Read and write happen under the
    /// same shard lock.
    pub fn upsert(&self, key: Key, mut entry: Entry) -> SharedEntry {
        match self.map().entry(key) {
            Slot::Occupied(mut slot) => {
                entry.set_created_on(slot.get().created_on());
                entry.touch();
                let entry = Arc::new(entry);
                slot.insert(Arc::clone(&entry));
                entry
            }
            Slot::Vacant(slot) => {
                let entry = Arc::new(entry);
                slot.insert(Arc::clone(&entry));
                entry
            }
        }
    }

    /// Get a handle to the entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<SharedEntry> {
        self.map().get(key).map(|slot| Arc::clone(slot.value()))
    }

    /// Remove `key`. Returns whether anything was removed.
    pub fn remove(&self, key: &str) -> bool {
        self.map().remove(key).is_some()
    }
}
