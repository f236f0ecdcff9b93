//! Prompt records and version snapshots.
//!
//! A [`Prompt`] is the central entity of the library: a titled template body
//! with metadata, tags, a usage counter, and an append-only [`PromptVersion`]
//! history. Placeholders in the body use `{{name}}` markers and are extracted
//! into the derived `variables` field on every save.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Creates a compile-time verified regex wrapped in [`LazyLock`].
///
/// # Safety
///
/// The regex pattern is verified at compile time and cannot fail at runtime.
/// The `unreachable!()` branch exists only for type checking.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Regex pattern for template placeholders: `{{variable_name}}`.
///
/// The inner capture tolerates surrounding whitespace; names are trimmed
/// after extraction.
static VARIABLE_PATTERN: LazyLock<Regex> = lazy_regex!(r"\{\{([^{}]+)\}\}");

/// Unique identifier for a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    /// Creates a prompt ID from an existing token.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh short opaque ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_token())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PromptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PromptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Generates a short opaque unique token.
///
/// Eight hex characters drawn from a v4 UUID; short enough for display,
/// random enough that a personal library never collides.
#[must_use]
pub fn generate_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(8);
    token
}

/// An immutable snapshot of a prompt body at a point in time.
///
/// Never mutated or removed once appended to a prompt's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptVersion {
    /// Unique snapshot identifier.
    pub id: String,
    /// Capture timestamp (Unix epoch milliseconds).
    pub timestamp: u64,
    /// The body text at capture time.
    pub content: String,
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A stored prompt template.
///
/// Field names serialize in camelCase to stay compatible with previously
/// persisted blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier, immutable once created.
    pub id: PromptId,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// The template body.
    #[serde(default)]
    pub content: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Exactly one taxonomy label.
    #[serde(default)]
    pub category: String,
    /// Short labels; insertion order preserved for display.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Derived placeholder names, recomputed from `content` on every save.
    #[serde(default)]
    pub variables: Vec<String>,
    /// Usage counter.
    #[serde(default)]
    pub click_count: u64,
    /// Optional card color hint for the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_color: Option<String>,
    /// Last usage timestamp (Unix epoch milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<u64>,
    /// Creation timestamp (Unix epoch milliseconds).
    #[serde(default)]
    pub created_at: u64,
    /// Last mutating-save timestamp (Unix epoch milliseconds).
    #[serde(default)]
    pub updated_at: u64,
    /// Pinned prompts float to the top under non-manual sort.
    #[serde(default)]
    pub pinned: bool,
    /// True only between creation and first explicit save.
    #[serde(default)]
    pub is_draft: bool,
    /// Append-only snapshot log, oldest first.
    #[serde(default)]
    pub history: Vec<PromptVersion>,
}

impl Prompt {
    /// Creates an empty draft prompt in the given category.
    ///
    /// Drafts live only between creation and first explicit save; a draft
    /// closed without modification is deleted, never persisted.
    #[must_use]
    pub fn draft(category: impl Into<String>, now: u64) -> Self {
        Self {
            id: PromptId::generate(),
            title: String::new(),
            content: String::new(),
            description: String::new(),
            category: category.into(),
            tags: Vec::new(),
            variables: Vec::new(),
            click_count: 0,
            card_color: None,
            last_used_at: None,
            created_at: now,
            updated_at: now,
            pinned: false,
            is_draft: true,
            history: Vec::new(),
        }
    }
}

/// A partial update to a prompt, as issued by the presentation layer.
///
/// Absent fields are left untouched. `variables` is intentionally not
/// patchable: it is derived state and recomputed from the merged body.
#[derive(Debug, Clone, Default)]
pub struct PromptPatch {
    /// New title.
    pub title: Option<String>,
    /// New template body.
    pub content: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category label.
    pub category: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement card color hint.
    pub card_color: Option<String>,
    /// Extended history, as carried by the editor's save payload.
    ///
    /// Applied only when it extends the current history; the snapshot log is
    /// append-only.
    pub history: Option<Vec<PromptVersion>>,
}

impl PromptPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Extracts distinct placeholder names from a template body.
///
/// Placeholders are delimited by double braces (`{{name}}`). Names are
/// trimmed, deduplicated, and returned in first-seen order.
#[must_use]
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for cap in VARIABLE_PATTERN.captures_iter(content) {
        if let Some(name_match) = cap.get(1) {
            let name = name_match.as_str().trim().to_string();
            if !name.is_empty() && seen.insert(name.clone()) {
                variables.push(name);
            }
        }
    }

    variables
}

/// Substitutes placeholder values into a template body.
///
/// Occurrences of `{{name}}` whose trimmed name appears in `values` are
/// replaced; unknown placeholders are left intact.
#[must_use]
pub fn substitute_variables(content: &str, values: &[(String, String)]) -> String {
    VARIABLE_PATTERN
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str()).trim();
            values
                .iter()
                .find(|(key, _)| key.as_str() == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.clone())
        })
        .into_owned()
}
