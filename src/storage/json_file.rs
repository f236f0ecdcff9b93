//! File-based persistence backend.
//!
//! Stores the whole state as one JSON document in a fixed slot file under
//! the platform data directory. A missing or unreadable file loads as the
//! default state; startup is never blocked by a corrupt slot.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::warn;

use super::StateRepository;
use crate::models::AppState;
use crate::{Error, Result, migrate};

/// The fixed slot file name.
const SLOT_FILE: &str = "promptstash_v1_data.json";

/// JSON-file state repository.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Creates a repository over an explicit slot file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a repository over the platform-default slot file.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be resolved.
    pub fn default_slot() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "promptstash").ok_or_else(|| {
            Error::OperationFailed {
                operation: "resolve_data_dir".to_string(),
                cause: "no home directory available".to_string(),
            }
        })?;
        Ok(Self::new(dirs.data_dir().join(SLOT_FILE)))
    }

    /// Returns the slot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateRepository for JsonFileRepository {
    fn load(&self) -> Result<AppState> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(migrate::migrate_state(&raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppState::default()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "slot unreadable, starting fresh");
                Ok(AppState::default())
            }
        }
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_data_dir".to_string(),
                cause: e.to_string(),
            })?;
        }
        let raw = serde_json::to_string(state).map_err(|e| Error::OperationFailed {
            operation: "serialize_state".to_string(),
            cause: e.to_string(),
        })?;
        fs::write(&self.path, raw).map_err(|e| Error::OperationFailed {
            operation: "write_slot".to_string(),
            cause: e.to_string(),
        })
    }
}
