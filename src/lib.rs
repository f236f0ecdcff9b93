//! # Promptstash
//!
//! State and interchange engine for a personal prompt library.
//!
//! Promptstash manages a collection of reusable text templates ("prompts")
//! with metadata, tags, a category taxonomy, version snapshots, and usage
//! statistics. The whole application state is an immutable value: every
//! operation reads the current [`AppState`](models::AppState), computes a new
//! one, and publishes it as a whole-object replacement that is persisted to a
//! single JSON slot.
//!
//! ## Features
//!
//! - Intent-based state transitions (create, update, delete, pin, reorder)
//! - Append-only version history per prompt
//! - Schema migration for previously-persisted blobs, never fatal to startup
//! - Delimited-text (CSV) and tagged-text (Markdown frontmatter) codecs for
//!   backup and import with per-field degradation on malformed input
//!
//! ## Example
//!
//! ```rust
//! use promptstash::engine::{Intent, Store};
//! use promptstash::storage::MemoryRepository;
//!
//! let mut store = Store::open(Box::new(MemoryRepository::new()))?;
//! store.dispatch(Intent::AddCategory)?;
//! # promptstash::Result::Ok(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod engine;
pub mod history;
pub mod io;
pub mod migrate;
pub mod models;
pub mod ordering;
pub mod storage;
pub mod taxonomy;

// Re-exports for convenience
pub use engine::{Intent, Store};
pub use io::{Format, ImportReport};
pub use models::{AppState, Prompt, PromptId, PromptPatch, PromptVersion, SortMode};
pub use storage::{JsonFileRepository, MemoryRepository, StateRepository};

/// Error type for promptstash operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// Core state transitions are infallible pure functions; errors only surface
/// at the I/O boundaries (persisted slot, backup files).
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - An unknown export format name is given
    /// - A referenced prompt id does not exist where one is required
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The persisted slot cannot be written
    /// - A backup file cannot be read or written
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for promptstash operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Centralized so every mutating save stamps `updated_at` the same way.
/// Uses `SystemTime::now()` with fallback to 0 if the system clock is before
/// the Unix epoch.
#[must_use]
pub fn current_timestamp_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
