//! Application state and display preferences.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::prompt::{Prompt, PromptId};
use crate::taxonomy;

/// Default text scale factor.
pub const DEFAULT_TEXT_SCALE: f64 = 0.95;
/// Default card width factor.
pub const DEFAULT_CARD_WIDTH: f64 = 1.0;
/// Default card height factor.
pub const DEFAULT_CARD_HEIGHT: f64 = 1.0;

/// Light/dark theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl Theme {
    /// Returns the theme as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Parses a theme from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accent palette preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Blue accent.
    #[default]
    Ocean,
    /// Green accent.
    Emerald,
    /// Orange accent.
    Sunset,
    /// Neutral accent.
    Slate,
}

impl ColorTheme {
    /// Returns the palette name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Emerald => "emerald",
            Self::Sunset => "sunset",
            Self::Slate => "slate",
        }
    }

    /// Parses a palette from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ocean" => Some(Self::Ocean),
            "emerald" => Some(Self::Emerald),
            "sunset" => Some(Self::Sunset),
            "slate" => Some(Self::Slate),
            _ => None,
        }
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Collection rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Card grid.
    Grid,
    /// Vertical list.
    #[default]
    List,
}

impl ViewMode {
    /// Returns the view mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    /// Parses a view mode from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort-mode resolution for the prompt collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Pinned first, then by `updated_at` descending.
    #[default]
    Recent,
    /// Pinned first, then by `click_count` descending, ties by `updated_at`.
    Click,
    /// The literal order of the collection is authoritative.
    Manual,
}

impl SortMode {
    /// Returns all sort modes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Recent, Self::Click, Self::Manual]
    }

    /// Returns the sort mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Click => "click",
            Self::Manual => "manual",
        }
    }

    /// Parses a sort mode from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "recent" => Some(Self::Recent),
            "click" => Some(Self::Click),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The root aggregate: the whole persisted application state.
///
/// The order of `prompts` is the manual-sort order and the import-prepend
/// order. `categories` entries are unique and always include the universal
/// label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// The prompt collection, head-insertion order.
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    /// The category taxonomy, ordered, unique.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Currently selected prompt, if any.
    #[serde(default)]
    pub selected_prompt_id: Option<PromptId>,
    /// Live search filter text.
    #[serde(default)]
    pub search_query: String,
    /// Category filter; the universal label means "no filter".
    #[serde(default)]
    pub active_category: String,
    /// Tag filter, if any.
    #[serde(default)]
    pub active_tag: Option<String>,
    /// Light/dark preference.
    #[serde(default)]
    pub theme: Theme,
    /// Accent palette preference.
    #[serde(default)]
    pub color_theme: ColorTheme,
    /// Collection rendering mode.
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Text scale factor.
    #[serde(default)]
    pub text_scale: f64,
    /// Active sort mode.
    #[serde(default)]
    pub sort_mode: SortMode,
    /// Card width factor.
    #[serde(default)]
    pub card_width: f64,
    /// Card height factor.
    #[serde(default)]
    pub card_height: f64,
}

impl AppState {
    /// Looks up a prompt by id.
    #[must_use]
    pub fn prompt(&self, id: &PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| &p.id == id)
    }

    /// Returns the index of a prompt in the collection.
    #[must_use]
    pub fn position(&self, id: &PromptId) -> Option<usize> {
        self.prompts.iter().position(|p| &p.id == id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
            categories: taxonomy::default_categories(),
            selected_prompt_id: None,
            search_query: String::new(),
            active_category: taxonomy::UNIVERSAL_CATEGORY.to_string(),
            active_tag: None,
            theme: Theme::System,
            color_theme: ColorTheme::Ocean,
            view_mode: ViewMode::List,
            text_scale: DEFAULT_TEXT_SCALE,
            sort_mode: SortMode::Recent,
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
        }
    }
}
