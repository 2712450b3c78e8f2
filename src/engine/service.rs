//! POLYKV - Service Facade
//! Narrow, shareable front for the database manager.
//!
//! Callers above the engine (REPL, network handlers) only get `set`, `get`
//! and `delete`; `insert` and `update` stay on the manager.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Entry, Key};

use super::database::SharedEntry;
use super::DatabaseManager;

/// Operations exposed to upstream callers.
///
/// `&self` everywhere so one service can be cloned into many threads.
pub trait Service: Clone + Send + Sync + 'static {
    /// Insert or replace the entry for `key`, returning the stored entry.
    fn set(&self, db: u16, key: Key, entry: impl Into<Option<Entry>>) -> Result<SharedEntry>;

    /// Get the entry for `key`, or `None` if it does not exist.
    fn get(&self, db: u16, key: &Key) -> Result<Option<SharedEntry>>;

    /// Delete `key`, returning whether anything was removed.
    fn delete(&self, db: u16, key: &Key) -> Result<bool>;
}

/// Stateless pass-through to a shared [`DatabaseManager`].
///
/// ## Example
/// ```
/// use polykv::config::Config;
/// use polykv::engine::service::{RegistryService, Service};
/// use polykv::types::{Entry, Key};
///
/// let service = RegistryService::open(&Config::default());
/// service.set(0, Key::new("greeting"), Entry::string("hello")).unwrap();
///
/// let entry = service.get(0, &Key::new("greeting")).unwrap().unwrap();
/// assert_eq!(entry.get_string(), "hello");
/// ```
#[derive(Clone)]
pub struct RegistryService {
    manager: Arc<DatabaseManager>,
}

impl RegistryService {
    /// Wrap an existing manager.
    pub fn new(manager: Arc<DatabaseManager>) -> Self {
        Self { manager }
    }

    /// Create a fresh manager from `config` and wrap it.
    pub fn open(config: &Config) -> Self {
        Self::new(Arc::new(DatabaseManager::new(config)))
    }

    /// The manager behind this service.
    pub fn manager(&self) -> &DatabaseManager {
        &self.manager
    }
}

impl Service for RegistryService {
    fn set(&self, db: u16, key: Key, entry: impl Into<Option<Entry>>) -> Result<SharedEntry> {
        self.manager.upsert(db, key, entry)
    }

    fn get(&self, db: u16, key: &Key) -> Result<Option<SharedEntry>> {
        self.manager.get(db, key)
    }

    fn delete(&self, db: u16, key: &Key) -> Result<bool> {
        self.manager.delete(db, key)
    }
}
