//! Tagged-text (Markdown frontmatter) codec.
//!
//! Each prompt exports as a delimiter-bounded block: a `---` marker line,
//! `key: value` metadata lines, a closing marker line, the raw body, then a
//! blank-line separator. Import splits on marker lines and consumes segments
//! in metadata/body pairs; a trailing metadata segment without a body is
//! discarded, and a block lacking a `title` key is skipped entirely.
//!
//! Array-typed fields (`tags`, `history`) are decoded as JSON arrays only
//! when the trimmed value starts with `[`; otherwise `tags` comma-splits and
//! `history` empties. Metadata parse failures degrade per block, never
//! aborting the import.

use std::collections::HashMap;

use tracing::debug;

use crate::current_timestamp_millis;
use crate::io::import::ImportedPrompt;
use crate::models::{Prompt, PromptVersion};

/// The block marker, a horizontal-rule-like token on its own line.
pub const BLOCK_MARKER: &str = "---";

/// Serializes the prompt collection as tagged text.
#[must_use]
pub fn export(prompts: &[Prompt]) -> String {
    let mut out = String::new();
    for prompt in prompts {
        let tags = serde_json::to_string(&prompt.tags).unwrap_or_else(|_| "[]".to_string());
        let history = serde_json::to_string(&prompt.history).unwrap_or_else(|_| "[]".to_string());
        out.push_str(BLOCK_MARKER);
        out.push('\n');
        out.push_str(&format!("title: {}\n", prompt.title));
        out.push_str(&format!("category: {}\n", prompt.category));
        out.push_str(&format!("description: {}\n", prompt.description));
        out.push_str(&format!("id: {}\n", prompt.id));
        out.push_str(&format!("createdAt: {}\n", prompt.created_at));
        out.push_str(&format!("updatedAt: {}\n", prompt.updated_at));
        out.push_str(&format!("tags: {tags}\n"));
        out.push_str(&format!("history: {history}\n"));
        out.push_str(BLOCK_MARKER);
        out.push('\n');
        out.push_str(&prompt.content);
        out.push_str("\n\n");
    }
    out
}

/// One decoded metadata block.
#[derive(Debug, Default)]
pub struct TaggedBlock {
    fields: HashMap<String, String>,
}

impl TaggedBlock {
    /// Parses metadata lines, splitting each on the first colon.
    ///
    /// Lines without a colon are ignored.
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        let mut fields = HashMap::new();
        for line in segment.lines() {
            if let Some((key, value)) = line.split_once(':') {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { fields }
    }

    /// Returns whether the block carries a `title` key.
    #[must_use]
    pub fn has_title(&self) -> bool {
        self.fields.contains_key("title")
    }

    /// Returns a metadata value, empty when absent.
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.fields.get(key).map_or("", String::as_str)
    }

    /// Parses a timestamp value, falling back to `now`.
    #[must_use]
    pub fn timestamp(&self, key: &str, now: u64) -> u64 {
        self.text(key).parse().unwrap_or(now)
    }

    /// Decodes the `tags` value.
    ///
    /// JSON-array decoding applies only when the value starts with `[`;
    /// otherwise the value comma-splits. A failed JSON decode degrades to no
    /// tags.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let raw = self.text("tags");
        if raw.is_empty() {
            return Vec::new();
        }
        if raw.starts_with('[') {
            serde_json::from_str(raw).unwrap_or_else(|e| {
                debug!(error = %e, "tags metadata failed to parse, dropping");
                Vec::new()
            })
        } else {
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect()
        }
    }

    /// Decodes the `history` value; anything but a valid JSON array empties.
    #[must_use]
    pub fn history(&self) -> Vec<PromptVersion> {
        let raw = self.text("history");
        if !raw.starts_with('[') {
            return Vec::new();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            debug!(error = %e, "history metadata failed to parse, dropping");
            Vec::new()
        })
    }
}

/// Splits raw text into segments bounded by marker lines.
///
/// A leading empty segment (text starting with the marker) is dropped so
/// that even indices are metadata and odd indices are bodies.
fn split_segments(input: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for line in input.lines() {
        if line.trim() == BLOCK_MARKER {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    segments.push(current);

    if segments.first().is_some_and(|s| s.trim().is_empty()) {
        segments.remove(0);
    }
    segments
}

/// Decodes tagged text into importable prompts.
///
/// Segments pair up as metadata/body; an odd leftover segment is discarded.
#[must_use]
pub fn import(input: &str) -> Vec<ImportedPrompt> {
    let now = current_timestamp_millis();
    let segments = split_segments(input);

    segments
        .chunks(2)
        .filter_map(|pair| {
            let [metadata, body] = pair else {
                // Odd trailing segment without a body pair.
                return None;
            };
            let block = TaggedBlock::parse(metadata);
            if !block.has_title() {
                return None;
            }
            Some(ImportedPrompt {
                id: Some(block.text("id").to_string()),
                title: block.text("title").to_string(),
                content: body.trim().to_string(),
                description: block.text("description").to_string(),
                category: Some(block.text("category").to_string()),
                tags: block.tags(),
                click_count: 0,
                pinned: false,
                created_at: Some(block.timestamp("createdAt", now)),
                updated_at: Some(block.timestamp("updatedAt", now)),
                history: block.history(),
            })
        })
        .collect()
}
