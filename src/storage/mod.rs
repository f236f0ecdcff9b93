//! Persistence for the application state.
//!
//! The whole state lives in a single JSON slot. Backends are the injected
//! load/save boundary of the engine: loading runs the schema migrator and is
//! never fatal, saving overwrites the slot with the complete state.

mod json_file;
mod memory;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::Result;
use crate::models::AppState;

/// Trait for state persistence backends.
///
/// The slot is the authoritative source of truth for the whole application
/// state; there is no partial-field write path.
pub trait StateRepository {
    /// Loads the persisted state.
    ///
    /// An absent or malformed slot loads as the default state; failures to
    /// read are treated the same way so startup is never blocked.
    ///
    /// # Errors
    ///
    /// Reserved for backends with unrecoverable transport failures; the
    /// bundled backends never fail a load.
    fn load(&self) -> Result<AppState>;

    /// Overwrites the slot with the complete state.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    fn save(&mut self, state: &AppState) -> Result<()>;
}
