//! Backup codecs and import plumbing.
//!
//! Two text formats cover backup and interchange: a delimited-text (CSV)
//! codec and a tagged-text (Markdown frontmatter) codec. Both serialize the
//! whole prompt collection and both degrade gracefully on malformed input —
//! per field where possible, per row or block otherwise, never aborting a
//! whole import.

pub mod delimited;
mod import;
pub mod tagged;

pub use import::{ImportReport, ImportedPrompt, merge_into_state};

use crate::models::AppState;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Supported backup file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Delimited text, `.csv`.
    Csv,
    /// Tagged text with frontmatter blocks, `.md`.
    Markdown,
}

impl Format {
    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Markdown]
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Markdown => "md",
        }
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Markdown => "text/markdown",
        }
    }

    /// Detects format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized.
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("md" | "markdown") => Ok(Self::Markdown),
            Some(ext) => Err(Error::InvalidInput(format!(
                "unsupported file extension: .{ext}"
            ))),
            None => Err(Error::InvalidInput(
                "cannot determine format: file has no extension".to_string(),
            )),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(Error::InvalidInput(format!("unknown format: {s}"))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Builds the dated backup filename for a format.
#[must_use]
pub fn backup_filename(format: Format) -> String {
    backup_filename_on(chrono::Local::now().date_naive(), format)
}

/// Builds the backup filename for a specific date.
#[must_use]
pub fn backup_filename_on(date: NaiveDate, format: Format) -> String {
    format!(
        "PromptStash_Backup_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Serializes the whole prompt collection in the given format.
#[must_use]
pub fn export_collection(state: &AppState, format: Format) -> String {
    match format {
        Format::Csv => delimited::export(&state.prompts),
        Format::Markdown => tagged::export(&state.prompts),
    }
}

/// Decodes a backup text and merges it into the state.
///
/// Decoded prompts are prepended to the collection (no id-based merge);
/// unseen categories join the taxonomy. Malformed rows or blocks are skipped
/// and do not count toward the accepted total.
#[must_use]
pub fn import_collection(state: &AppState, format: Format, text: &str) -> (AppState, ImportReport) {
    let imported = match format {
        Format::Csv => delimited::import(text),
        Format::Markdown => tagged::import(text),
    };
    merge_into_state(state, imported)
}
