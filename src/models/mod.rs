//! Data models for promptstash.
//!
//! This module contains the core data structures used throughout the system.

mod prompt;
mod state;

pub use prompt::{
    Prompt, PromptId, PromptPatch, PromptVersion, extract_variables, generate_token,
    substitute_variables,
};
pub use state::{
    AppState, ColorTheme, DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH, DEFAULT_TEXT_SCALE, SortMode,
    Theme, ViewMode,
};
