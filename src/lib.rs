//! POLYKV - Multi-Database In-Memory Key-Value Store
//!
//! A fixed set of independent databases, each mapping textual keys to
//! timestamped, typed entries.
//!
//! ## Features
//! - **Typed entries**: string, list, set and sorted set values with total accessors
//! - **Lazy databases**: each database map is allocated on first use
//! - **Concurrency**: sharded concurrent maps, one per database, no global lock
//! - **Optimistic updates**: compare-and-swap update that never retries on its own
//! - **Upsert bookkeeping**: creation time survives replacement
//! - **Metrics**: Lock-free atomic counters for observability
//!
//! ## Example
//! ```
//! use polykv::{config::Config, engine::DatabaseManager, types::{Entry, Key}};
//!
//! let manager = DatabaseManager::new(&Config::default());
//!
//! assert!(manager.insert(0, Key::new("a"), Entry::string("x")).unwrap());
//! assert!(!manager.insert(0, Key::new("a"), Entry::string("y")).unwrap());
//! assert_eq!(manager.get(0, &Key::new("a")).unwrap().unwrap().get_string(), "x");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod reply;
pub mod types;
