//! Delimited-text (CSV) codec.
//!
//! Exports the prompt collection as a fixed-order header row followed by one
//! row per prompt. A field is quoted, with internal double quotes doubled,
//! if and only if it contains a comma, a double quote, or a newline. The
//! `tags` and `history` columns embed JSON arrays inside a single field.
//!
//! Import uses a hand-rolled character-by-character parser: quoted fields
//! may span commas and newlines, doubled quotes inside quoted fields decode
//! to a literal quote, bare fields pass through, `\r` is skipped, and a
//! trailing row without a final newline is still detected. The declared
//! header order is honored; missing trailing columns default to empty.
//! Malformed metadata degrades per field and never aborts the import.

use std::collections::HashMap;

use tracing::debug;

use crate::current_timestamp_millis;
use crate::io::import::ImportedPrompt;
use crate::models::{Prompt, PromptVersion};

/// Export column order.
pub const HEADER: [&str; 11] = [
    "id",
    "title",
    "category",
    "description",
    "content",
    "tags",
    "createdAt",
    "updatedAt",
    "copyCount",
    "pinned",
    "history",
];

/// Serializes the prompt collection as delimited text.
#[must_use]
pub fn export(prompts: &[Prompt]) -> String {
    let mut lines = Vec::with_capacity(prompts.len() + 1);
    lines.push(HEADER.join(","));

    for prompt in prompts {
        let tags = serde_json::to_string(&prompt.tags).unwrap_or_else(|_| "[]".to_string());
        let history = serde_json::to_string(&prompt.history).unwrap_or_else(|_| "[]".to_string());
        let cells = [
            prompt.id.as_str().to_string(),
            prompt.title.clone(),
            prompt.category.clone(),
            prompt.description.clone(),
            prompt.content.clone(),
            tags,
            prompt.created_at.to_string(),
            prompt.updated_at.to_string(),
            prompt.click_count.to_string(),
            if prompt.pinned { "1" } else { "0" }.to_string(),
            history,
        ];
        let row: Vec<String> = cells.iter().map(|cell| escape_cell(cell)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Quotes a cell only when it contains a comma, double quote, or newline.
fn escape_cell(value: &str) -> String {
    if value.contains('"') || value.contains(',') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Splits raw delimited text into rows of fields.
///
/// Character-by-character state machine; quotes toggle quoted mode, doubled
/// quotes inside quoted mode emit a literal quote, and `\r` is dropped
/// everywhere. The trailing row is flushed even without a final newline.
#[must_use]
pub fn parse_rows(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut value = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' && in_quotes && chars.peek() == Some(&'"') {
            value.push('"');
            chars.next();
            continue;
        }
        if c == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if c == ',' && !in_quotes {
            current.push(std::mem::take(&mut value));
            continue;
        }
        if c == '\n' && !in_quotes {
            current.push(std::mem::take(&mut value));
            rows.push(std::mem::take(&mut current));
            continue;
        }
        if c == '\r' {
            continue;
        }
        value.push(c);
    }
    if !value.is_empty() || !current.is_empty() {
        current.push(value);
        rows.push(current);
    }

    rows
}

/// One data row addressed by the declared header order.
#[derive(Debug)]
pub struct DelimitedRow {
    fields: HashMap<String, String>,
}

impl DelimitedRow {
    /// Builds a row mapping from the header and a positional field list.
    ///
    /// Missing trailing columns default to the empty string; surplus fields
    /// beyond the header are dropped.
    #[must_use]
    pub fn new(header: &[String], fields: &[String]) -> Self {
        let fields = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), fields.get(i).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Returns a text column, empty when absent.
    #[must_use]
    pub fn text(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    /// Parses a timestamp column, falling back to `now` on non-numeric input.
    #[must_use]
    pub fn timestamp(&self, column: &str, now: u64) -> u64 {
        self.text(column).trim().parse().unwrap_or(now)
    }

    /// Parses a counter column, falling back to 0 on non-numeric input.
    #[must_use]
    pub fn count(&self, column: &str) -> u64 {
        self.text(column).trim().parse().unwrap_or(0)
    }

    /// Decodes the `tags` column.
    ///
    /// JSON-array encoding first; on failure, comma-split keeping non-empty
    /// entries.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let raw = self.text("tags");
        if raw.is_empty() {
            return Vec::new();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            debug!(error = %e, "tags column is not a JSON array, comma-splitting");
            raw.split(',')
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect()
        })
    }

    /// Decodes the `history` column, empty on any parse failure.
    #[must_use]
    pub fn history(&self) -> Vec<PromptVersion> {
        let raw = self.text("history");
        if raw.is_empty() {
            return Vec::new();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            debug!(error = %e, "history column failed to parse, dropping");
            Vec::new()
        })
    }

    /// Decodes the `pinned` column.
    #[must_use]
    pub fn pinned(&self) -> bool {
        self.text("pinned") == "1"
    }
}

/// Decodes delimited text into importable prompts.
///
/// Rows missing both `title` and `content` are skipped silently.
#[must_use]
pub fn import(input: &str) -> Vec<ImportedPrompt> {
    let rows = parse_rows(input);
    if rows.len() < 2 {
        return Vec::new();
    }

    let now = current_timestamp_millis();
    let header: Vec<String> = rows[0].iter().map(|h| h.trim().to_string()).collect();

    rows[1..]
        .iter()
        .filter_map(|fields| {
            let row = DelimitedRow::new(&header, fields);
            if row.text("title").is_empty() && row.text("content").is_empty() {
                return None;
            }
            Some(ImportedPrompt {
                id: Some(row.text("id").to_string()),
                title: row.text("title").to_string(),
                content: row.text("content").to_string(),
                description: row.text("description").to_string(),
                category: Some(row.text("category").to_string()),
                tags: row.tags(),
                click_count: row.count("copyCount"),
                pinned: row.pinned(),
                created_at: Some(row.timestamp("createdAt", now)),
                updated_at: Some(row.timestamp("updatedAt", now)),
                history: row.history(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptId;

    fn sample_prompt() -> Prompt {
        Prompt {
            id: PromptId::new("abc12345"),
            title: "Review, with comma".to_string(),
            content: "line one\nline two with \"quotes\"".to_string(),
            description: "plain".to_string(),
            category: "编程".to_string(),
            tags: vec!["rust".to_string(), "review".to_string()],
            variables: Vec::new(),
            click_count: 4,
            card_color: None,
            last_used_at: None,
            created_at: 1000,
            updated_at: 2000,
            pinned: true,
            is_draft: false,
            history: vec![PromptVersion {
                id: "v1".to_string(),
                timestamp: 1500,
                content: "old body".to_string(),
                description: None,
            }],
        }
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_parse_rows_quoted_fields() {
        let rows = parse_rows("a,\"b,c\",d\ne,\"f\ng\",h");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b,c", "d"]);
        assert_eq!(rows[1], vec!["e", "f\ng", "h"]);
    }

    #[test]
    fn test_parse_rows_doubled_quotes() {
        let rows = parse_rows("\"say \"\"hi\"\"\",x");
        assert_eq!(rows[0], vec!["say \"hi\"", "x"]);
    }

    #[test]
    fn test_parse_rows_trailing_row_without_newline() {
        let rows = parse_rows("a,b\nc,d");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c", "d"]);
    }

    #[test]
    fn test_parse_rows_skips_carriage_returns() {
        let rows = parse_rows("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let prompt = sample_prompt();
        let text = export(std::slice::from_ref(&prompt));
        let imported = import(&text);

        assert_eq!(imported.len(), 1);
        let got = &imported[0];
        assert_eq!(got.title, prompt.title);
        assert_eq!(got.content, prompt.content);
        assert_eq!(got.category.as_deref(), Some("编程"));
        assert_eq!(got.tags, prompt.tags);
        assert_eq!(got.history.len(), 1);
        assert_eq!(got.history[0].content, "old body");
        assert_eq!(got.click_count, 4);
        assert!(got.pinned);
        assert_eq!(got.created_at, Some(1000));
    }

    #[test]
    fn test_import_skips_rows_missing_title_and_content() {
        let text = "id,title,content\nx1,,\nx2,kept,body";
        let imported = import(text);
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].title, "kept");
    }

    #[test]
    fn test_import_header_only_yields_nothing() {
        assert!(import("id,title,content").is_empty());
        assert!(import("").is_empty());
    }

    #[test]
    fn test_import_honors_declared_header_order() {
        let text = "content,title,category\nthe body,the title,写作";
        let imported = import(text);
        assert_eq!(imported[0].title, "the title");
        assert_eq!(imported[0].content, "the body");
        assert_eq!(imported[0].category.as_deref(), Some("写作"));
    }

    #[test]
    fn test_tags_comma_split_fallback() {
        // The field is quoted so the embedded comma stays inside one cell;
        // it is not valid JSON, so the comma-split fallback applies.
        let text = "title,content,tags\nt,c,\"urgent,review\"";
        let imported = import(text);
        assert_eq!(imported[0].tags, vec!["urgent", "review"]);
    }

    #[test]
    fn test_malformed_history_degrades_to_empty() {
        let text = "title,content,history\nt,c,\"[{broken\"";
        let imported = import(text);
        assert_eq!(imported.len(), 1);
        assert!(imported[0].history.is_empty());
    }

    #[test]
    fn test_non_numeric_counters_degrade() {
        let text = "title,content,copyCount,createdAt\nt,c,many,yesterday";
        let imported = import(text);
        assert_eq!(imported[0].click_count, 0);
        // Falls back to import time.
        assert!(imported[0].created_at.is_some_and(|ts| ts > 1_577_836_800_000));
    }

    #[test]
    fn test_missing_trailing_columns_default_empty() {
        let text = "title,content,tags\nonly-title";
        let imported = import(text);
        assert_eq!(imported[0].title, "only-title");
        assert!(imported[0].content.is_empty());
        assert!(imported[0].tags.is_empty());
    }
}
