//! POLYKV - Custom Error Types
//! Defines the error hierarchy for the database manager.

use thiserror::Error;

/// Custom Result type for the store.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types raised by the store.
///
/// Declined operations (key already present, key absent) are not errors:
/// they come back as `false` or `None`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database index is not below the configured database count.
    #[error("Database index [{index}] is not within range of 0 to {}.", .count.saturating_sub(1))]
    OutOfRange { index: u16, count: u16 },

    /// A required argument was missing.
    #[error("Value cannot be null. (Parameter '{0}')")]
    InvalidArgument(&'static str),

    /// I/O errors while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
