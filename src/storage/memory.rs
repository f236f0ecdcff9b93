//! In-memory persistence backend.
//!
//! Holds the serialized slot in memory. Useful for tests and as the
//! reference for the slot contract: what `save` writes is exactly what
//! `load` migrates.

use super::StateRepository;
use crate::models::AppState;
use crate::{Error, Result, migrate};

/// In-memory state repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    slot: Option<String>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Creates a repository pre-seeded with a raw blob.
    #[must_use]
    pub const fn with_blob(blob: String) -> Self {
        Self { slot: Some(blob) }
    }

    /// Returns the raw slot content, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl StateRepository for MemoryRepository {
    fn load(&self) -> Result<AppState> {
        Ok(self
            .slot
            .as_deref()
            .map_or_else(AppState::default, migrate::migrate_state))
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        let raw = serde_json::to_string(state).map_err(|e| Error::OperationFailed {
            operation: "serialize_state".to_string(),
            cause: e.to_string(),
        })?;
        self.slot = Some(raw);
        Ok(())
    }
}
