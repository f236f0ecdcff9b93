//! Schema migration for previously-persisted blobs.
//!
//! The persisted slot carries no version field; schema evolution is detected
//! structurally. Every field is treated as optional on input regardless of
//! the target schema, and filled with its current default. A blob that does
//! not parse at all is logged and treated as "no prior state" — loading is
//! never fatal to startup.

use serde_json::Value;
use tracing::warn;

use crate::models::{
    AppState, ColorTheme, DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH, DEFAULT_TEXT_SCALE, Prompt,
    PromptId, PromptVersion, SortMode, Theme, ViewMode,
};
use crate::taxonomy;

/// Normalizes a raw persisted blob into a valid [`AppState`].
///
/// Falls back to the default state when the blob is unparsable.
#[must_use]
pub fn migrate_state(raw: &str) -> AppState {
    match serde_json::from_str::<Value>(raw) {
        Ok(blob) => migrate_value(&blob),
        Err(e) => {
            warn!(error = %e, "discarding unparsable persisted state");
            AppState::default()
        }
    }
}

/// Normalizes a deserialized blob into a valid [`AppState`].
///
/// Applied rules, in order: display-preference defaults, per-prompt field
/// defaults (drafts never survive a reload), the legacy category remap, a
/// first-seen-order dedup of the category list, and the default-taxonomy
/// fallback for an empty list.
#[must_use]
pub fn migrate_value(blob: &Value) -> AppState {
    let prompts = blob
        .get("prompts")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(migrate_prompt).collect())
        .unwrap_or_default();

    let categories: Vec<String> = blob
        .get("categories")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(|label| taxonomy::remap_legacy(label).to_string())
                .collect()
        })
        .unwrap_or_default();
    let mut categories = taxonomy::dedup_preserving_order(categories);
    if categories.is_empty() {
        categories = taxonomy::default_categories();
    }

    let active_category = str_field(blob, "activeCategory", taxonomy::UNIVERSAL_CATEGORY);
    let active_category = taxonomy::remap_legacy(&active_category).to_string();

    AppState {
        prompts,
        categories,
        selected_prompt_id: blob
            .get("selectedPromptId")
            .and_then(Value::as_str)
            .map(PromptId::new),
        search_query: str_field(blob, "searchQuery", ""),
        active_category,
        active_tag: blob
            .get("activeTag")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        theme: blob
            .get("theme")
            .and_then(Value::as_str)
            .and_then(Theme::parse)
            .unwrap_or_default(),
        color_theme: blob
            .get("colorTheme")
            .and_then(Value::as_str)
            .and_then(ColorTheme::parse)
            .unwrap_or_default(),
        view_mode: blob
            .get("viewMode")
            .and_then(Value::as_str)
            .and_then(ViewMode::parse)
            .unwrap_or_default(),
        text_scale: f64_field(blob, "textScale", DEFAULT_TEXT_SCALE),
        sort_mode: blob
            .get("sortMode")
            .and_then(Value::as_str)
            .and_then(SortMode::parse)
            .unwrap_or_default(),
        card_width: f64_field(blob, "cardWidth", DEFAULT_CARD_WIDTH),
        card_height: f64_field(blob, "cardHeight", DEFAULT_CARD_HEIGHT),
    }
}

/// Normalizes one persisted prompt entry.
///
/// Returns `None` for entries that are not objects; everything else is
/// accepted with defaults. `is_draft` is forced to false — a draft can never
/// survive a reload, it is dead state from an interrupted session.
fn migrate_prompt(entry: &Value) -> Option<Prompt> {
    entry.as_object()?;

    let category = str_field(entry, "category", "");
    let category = taxonomy::remap_legacy(&category).to_string();

    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(PromptId::generate, PromptId::new);

    Some(Prompt {
        id,
        title: str_field(entry, "title", ""),
        content: str_field(entry, "content", ""),
        description: str_field(entry, "description", ""),
        category,
        tags: string_array(entry.get("tags")),
        variables: string_array(entry.get("variables")),
        click_count: entry
            .get("clickCount")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        card_color: entry
            .get("cardColor")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        last_used_at: entry.get("lastUsedAt").and_then(Value::as_u64),
        created_at: entry.get("createdAt").and_then(Value::as_u64).unwrap_or(0),
        updated_at: entry.get("updatedAt").and_then(Value::as_u64).unwrap_or(0),
        pinned: entry
            .get("pinned")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        is_draft: false,
        history: entry
            .get("history")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(migrate_version).collect())
            .unwrap_or_default(),
    })
}

/// Normalizes one persisted history entry.
fn migrate_version(entry: &Value) -> Option<PromptVersion> {
    entry.as_object()?;
    Some(PromptVersion {
        id: str_field(entry, "id", ""),
        timestamp: entry.get("timestamp").and_then(Value::as_u64).unwrap_or(0),
        content: str_field(entry, "content", ""),
        description: entry
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    })
}

fn str_field(blob: &Value, key: &str, default: &str) -> String {
    blob.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn f64_field(blob: &Value, key: &str, default: f64) -> f64 {
    blob.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
