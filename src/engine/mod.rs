//! POLYKV - Database Manager
//! Owns a fixed set of independent databases and implements the
//! insert/update/upsert/get/delete contract on top of them.

pub mod database;
pub mod metrics;
pub mod service;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::types::{Entry, Key};

use self::database::{Database, SharedEntry};
use self::metrics::EngineMetrics;

/// The database manager.
///
/// The number of databases is fixed at construction. Each database is
/// allocated on first use and independently synchronized, so operations on
/// different indices never block each other.
///
/// Every operation validates the database index first, then the entry.
pub struct DatabaseManager {
    databases: Box<[Database]>,
    metrics: EngineMetrics,
}

impl DatabaseManager {
    /// Create a manager sized from `config`.
    pub fn new(config: &Config) -> Self {
        let count = config.database_count();
        let databases = (0..count).map(Database::new).collect();

        log::info!("Database manager created with {} databases", count);

        Self {
            databases,
            metrics: EngineMetrics::new(),
        }
    }

    /// The number of databases available.
    pub fn count(&self) -> u16 {
        self.databases.len() as u16
    }

    /// Operation counters for this manager.
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    fn database(&self, db: u16) -> Result<&Database> {
        self.databases
            .get(usize::from(db))
            .ok_or_else(|| StoreError::OutOfRange {
                index: db,
                count: self.count(),
            })
    }

    fn require_entry(entry: impl Into<Option<Entry>>) -> Result<Entry> {
        entry.into().ok_or(StoreError::InvalidArgument("entry"))
    }

    /// Insert `entry` for `key` if the key does not already exist.
    ///
    /// Returns `false` if the key is already present.
    pub fn insert(&self, db: u16, key: Key, entry: impl Into<Option<Entry>>) -> Result<bool> {
        let database = self.database(db)?;
        let entry = Self::require_entry(entry)?;

        let inserted = database.try_insert(key, Arc::new(entry));
        self.metrics.record_insert(inserted);
        Ok(inserted)
    }

    /// Replace the entry for `key` if the key already exists.
    ///
    /// The replacement is conditioned on the value being unchanged since it
    /// was read. Returns `false` if the key is absent or a concurrent writer
    /// got there first; no retry is attempted.
    pub fn update(&self, db: u16, key: &Key, entry: impl Into<Option<Entry>>) -> Result<bool> {
        let database = self.database(db)?;
        let mut entry = Self::require_entry(entry)?;

        let Some(current) = database.get(key.text()) else {
            self.metrics.record_update(false);
            return Ok(false);
        };

        entry.touch();
        let updated = database.compare_exchange(key.text(), &current, Arc::new(entry));
        if !updated {
            self.metrics.record_update_conflict();
        }
        self.metrics.record_update(updated);
        Ok(updated)
    }

    /// Insert `entry` for `key`, or replace the existing entry.
    ///
    /// On replacement the stored entry keeps the original creation time and
    /// gets a fresh modification time. Returns the entry now stored.
    pub fn upsert(
        &self,
        db: u16,
        key: Key,
        entry: impl Into<Option<Entry>>,
    ) -> Result<SharedEntry> {
        let database = self.database(db)?;
        let entry = Self::require_entry(entry)?;

        let stored = database.upsert(key, entry);
        self.metrics.record_upsert();
        Ok(stored)
    }

    /// Get the entry for `key`, or `None` if the key does not exist.
    pub fn get(&self, db: u16, key: &Key) -> Result<Option<SharedEntry>> {
        let entry = self.database(db)?.get(key.text());
        self.metrics.record_get(entry.is_some());
        Ok(entry)
    }

    /// Delete `key`. Returns whether a removal actually occurred.
    pub fn delete(&self, db: u16, key: &Key) -> Result<bool> {
        let removed = self.database(db)?.remove(key.text());
        self.metrics.record_delete(removed);
        Ok(removed)
    }

    /// Number of keys in database `db`.
    pub fn len(&self, db: u16) -> Result<usize> {
        Ok(self.database(db)?.len())
    }

    /// Whether database `db` holds no keys.
    pub fn is_empty(&self, db: u16) -> Result<bool> {
        Ok(self.database(db)?.is_empty())
    }

    /// Whether database `db` has been touched by an operation yet.
    pub fn is_initialized(&self, db: u16) -> Result<bool> {
        Ok(self.database(db)?.is_initialized())
    }
}

impl Default for DatabaseManager {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::Duration;

    fn manager() -> DatabaseManager {
        DatabaseManager::new(&Config::default())
    }

    fn key(text: &str) -> Key {
        Key::with_type(text, DataType::String)
    }

    #[test]
    fn test_count_from_config() {
        let m = DatabaseManager::new(&Config::new().with_number_of_databases(9));
        assert_eq!(m.count(), 9);
    }

    #[test]
    fn test_count_falls_back_for_zero_and_one() {
        for requested in [0, 1] {
            let m = DatabaseManager::new(&Config::new().with_number_of_databases(requested));
            assert_eq!(m.count(), 4);
        }
    }

    #[test]
    fn test_insert_then_get() {
        let m = manager();
        let expected = Entry::string("value");

        assert!(m.insert(0, key("k"), expected.clone()).unwrap());
        assert_eq!(*m.get(0, &key("k")).unwrap().unwrap(), expected);
    }

    #[test]
    fn test_insert_existing_declined() {
        let m = manager();
        assert!(m.insert(0, key("k"), Entry::string("x")).unwrap());
        assert!(!m.insert(0, key("k"), Entry::string("y")).unwrap());
        assert_eq!(m.get(0, &key("k")).unwrap().unwrap().get_string(), "x");
    }

    #[test]
    fn test_update_present_key() {
        let m = manager();
        m.insert(0, key("k"), Entry::string("old")).unwrap();

        assert!(m.update(0, &key("k"), Entry::string("new")).unwrap());
        assert_eq!(m.get(0, &key("k")).unwrap().unwrap().get_string(), "new");
    }

    #[test]
    fn test_update_stamps_incoming_entry() {
        let m = manager();
        let old = Entry::string("old");
        let old_created = old.created_on();
        m.insert(0, key("k"), old).unwrap();
        thread::sleep(Duration::from_millis(2));

        let incoming = Entry::string("new");
        let incoming_created = incoming.created_on();
        thread::sleep(Duration::from_millis(2));

        assert!(m.update(0, &key("k"), incoming).unwrap());

        let stored = m.get(0, &key("k")).unwrap().unwrap();
        assert_eq!(stored.created_on(), incoming_created);
        assert_ne!(stored.created_on(), old_created);
        assert!(stored.modified_on() > stored.created_on());
    }

    #[test]
    fn test_update_absent_key_declined() {
        let m = manager();
        assert!(!m.update(0, &key("k"), Entry::string("new")).unwrap());
        assert_eq!(m.get(0, &key("k")).unwrap(), None);
        assert!(m.is_empty(0).unwrap());
    }

    #[test]
    fn test_upsert_absent_key_keeps_fresh_timestamps() {
        let m = manager();
        let stored = m.upsert(0, key("k"), Entry::string("v")).unwrap();
        assert_eq!(stored.created_on(), stored.modified_on());
    }

    #[test]
    fn test_upsert_preserves_created_on() {
        let m = manager();
        let original = Entry::string("x");
        let created = original.created_on();
        m.insert(0, key("k"), original).unwrap();

        let before = crate::types::now_micros();
        let stored = m.upsert(0, key("k"), Entry::string("z")).unwrap();

        assert_eq!(stored.created_on(), created);
        assert!(stored.modified_on() >= created);
        assert!(stored.modified_on() >= before);
        assert_eq!(stored.get_string(), "z");
        assert_eq!(m.get(0, &key("k")).unwrap().unwrap(), stored);
    }

    #[test]
    fn test_delete() {
        let m = manager();
        m.insert(0, key("k"), Entry::string("x")).unwrap();
        assert!(m.delete(0, &key("k")).unwrap());
        assert_eq!(m.get(0, &key("k")).unwrap(), None);
        assert!(!m.delete(0, &key("k")).unwrap());
    }

    #[test]
    fn test_out_of_range_on_every_operation() {
        let m = manager();
        for db in [4, 5, u16::MAX] {
            assert!(matches!(
                m.insert(db, key("k"), Entry::string("x")),
                Err(StoreError::OutOfRange { .. })
            ));
            assert!(matches!(
                m.update(db, &key("k"), Entry::string("x")),
                Err(StoreError::OutOfRange { .. })
            ));
            assert!(matches!(
                m.upsert(db, key("k"), Entry::string("x")),
                Err(StoreError::OutOfRange { .. })
            ));
            assert!(matches!(m.get(db, &key("k")), Err(StoreError::OutOfRange { .. })));
            assert!(matches!(m.delete(db, &key("k")), Err(StoreError::OutOfRange { .. })));
            assert!(matches!(m.len(db), Err(StoreError::OutOfRange { .. })));
        }
    }

    #[test]
    fn test_missing_entry_rejected() {
        let m = manager();
        assert!(matches!(
            m.insert(0, key("k"), None::<Entry>),
            Err(StoreError::InvalidArgument("entry"))
        ));
        assert!(matches!(
            m.update(0, &key("k"), None::<Entry>),
            Err(StoreError::InvalidArgument("entry"))
        ));
        assert!(matches!(
            m.upsert(0, key("k"), None::<Entry>),
            Err(StoreError::InvalidArgument("entry"))
        ));
        assert!(m.is_empty(0).unwrap());
    }

    #[test]
    fn test_index_checked_before_entry() {
        let m = manager();
        assert!(matches!(
            m.insert(4, key("k"), None::<Entry>),
            Err(StoreError::OutOfRange { index: 4, count: 4 })
        ));
    }

    #[test]
    fn test_invalid_entry_does_not_allocate() {
        let m = manager();
        let _ = m.upsert(2, key("k"), None::<Entry>);
        assert!(!m.is_initialized(2).unwrap());
    }

    #[test]
    fn test_databases_are_independent_and_lazy() {
        let m = manager();
        m.insert(1, key("k"), Entry::string("one")).unwrap();

        assert!(m.is_initialized(1).unwrap());
        assert!(!m.is_initialized(0).unwrap());
        assert!(!m.is_initialized(2).unwrap());
        assert_eq!(m.get(0, &key("k")).unwrap(), None);
        assert_eq!(m.len(1).unwrap(), 1);
    }

    #[test]
    fn test_declared_type_does_not_split_keys() {
        let m = manager();
        m.insert(0, Key::with_type("k", DataType::List), Entry::list(["a"]))
            .unwrap();
        assert!(!m
            .insert(0, Key::with_type("k", DataType::String), Entry::string("s"))
            .unwrap());

        let stored = m.get(0, &Key::new("k")).unwrap().unwrap();
        assert_eq!(stored.data_type(), DataType::List);
        assert_eq!(stored.get_string(), "");
    }

    #[test]
    fn test_upsert_may_change_variant() {
        let m = manager();
        m.insert(0, key("k"), Entry::string("s")).unwrap();
        let stored = m
            .upsert(0, Key::with_type("k", DataType::Set), Entry::set(["a"]))
            .unwrap();
        assert_eq!(stored.data_type(), DataType::Set);
    }

    #[test]
    fn test_concurrent_insert_single_winner() {
        let m = Arc::new(manager());
        let mut handles = vec![];

        for i in 0..16 {
            let m = Arc::clone(&m);
            handles.push(thread::spawn(move || {
                let won = m.insert(0, key("race"), Entry::string(format!("v{}", i))).unwrap();
                (i, won)
            }));
        }

        let winners: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|(_, won)| *won)
            .map(|(i, _)| i)
            .collect();

        assert_eq!(winners.len(), 1);
        let stored = m.get(0, &key("race")).unwrap().unwrap();
        assert_eq!(stored.get_string(), format!("v{}", winners[0]));
    }

    #[test]
    fn test_concurrent_upserts_same_key_keep_created_on() {
        let m = Arc::new(manager());
        let original = Entry::string("seed");
        let created = original.created_on();
        m.insert(0, key("k"), original).unwrap();
        thread::sleep(Duration::from_millis(2));

        let mut handles = vec![];
        for t in 0..16 {
            let m = Arc::clone(&m);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    let stored = m
                        .upsert(0, key("k"), Entry::string(format!("{}_{}", t, i)))
                        .unwrap();
                    assert_eq!(stored.created_on(), created);
                    assert!(stored.modified_on() >= created);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let stored = m.get(0, &key("k")).unwrap().unwrap();
        assert_eq!(stored.created_on(), created);
        assert_eq!(m.len(0).unwrap(), 1);
    }

    #[test]
    fn test_concurrent_updates_apply_when_retried() {
        let m = Arc::new(manager());
        m.insert(0, key("counter"), Entry::string("0")).unwrap();
        let mut handles = vec![];

        for i in 0..8 {
            let m = Arc::clone(&m);
            handles.push(thread::spawn(move || {
                while !m.update(0, &key("counter"), Entry::string(format!("{}", i))).unwrap() {}
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let conflicts = m.metrics().update_conflicts.load(Ordering::Relaxed);
        assert_eq!(m.metrics().updates.load(Ordering::Relaxed), 8 + conflicts);
        assert_eq!(m.len(0).unwrap(), 1);
    }
}
