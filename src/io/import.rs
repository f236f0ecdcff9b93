//! Intermediate import representation and collection merge.

use crate::current_timestamp_millis;
use crate::models::{AppState, Prompt, PromptId, PromptVersion};

/// Intermediate representation for a decoded prompt.
///
/// Both codecs decode into this shape before merging. Optional fields allow
/// partial data with defaults applied at merge time.
///
/// # Field Mapping
///
/// | Field | Required | Default |
/// |-------|----------|---------|
/// | `title`/`content` | one of | rows/blocks with neither are skipped |
/// | `id` | No | generated |
/// | `category` | No | the default category |
/// | `tags`, `history` | No | empty |
/// | `created_at`, `updated_at` | No | import time |
#[derive(Debug, Clone, Default)]
pub struct ImportedPrompt {
    /// Original id, when the source carried one.
    pub id: Option<String>,
    /// Display title.
    pub title: String,
    /// Template body.
    pub content: String,
    /// Free-text description.
    pub description: String,
    /// Category label, when the source carried one.
    pub category: Option<String>,
    /// Tag labels.
    pub tags: Vec<String>,
    /// Usage counter.
    pub click_count: u64,
    /// Pinned flag.
    pub pinned: bool,
    /// Creation timestamp, when the source carried a parsable one.
    pub created_at: Option<u64>,
    /// Update timestamp, when the source carried a parsable one.
    pub updated_at: Option<u64>,
    /// Version history.
    pub history: Vec<PromptVersion>,
}

impl ImportedPrompt {
    /// Converts into a stored prompt, filling defaults.
    ///
    /// `variables` starts empty; it is derived state and recomputed on the
    /// next explicit save.
    #[must_use]
    pub fn into_prompt(self, now: u64) -> Prompt {
        let category = self
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| crate::taxonomy::DEFAULT_CATEGORY.to_string());
        Prompt {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .map_or_else(PromptId::generate, PromptId::new),
            title: self.title,
            content: self.content,
            description: self.description,
            category,
            tags: self.tags,
            variables: Vec::new(),
            click_count: self.click_count,
            card_color: None,
            last_used_at: None,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
            pinned: self.pinned,
            is_draft: false,
            history: self.history,
        }
    }
}

/// Result of an import operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of prompts accepted into the collection.
    pub accepted: usize,
}

/// Merges decoded prompts into the state.
///
/// Accepted prompts are prepended in source order; unseen category labels
/// are appended to the taxonomy in first-encounter order.
#[must_use]
pub fn merge_into_state(
    state: &AppState,
    imported: Vec<ImportedPrompt>,
) -> (AppState, ImportReport) {
    let now = current_timestamp_millis();
    let mut next = state.clone();

    let incoming: Vec<Prompt> = imported.into_iter().map(|p| p.into_prompt(now)).collect();
    let report = ImportReport {
        accepted: incoming.len(),
    };

    for prompt in &incoming {
        if !next.categories.contains(&prompt.category) {
            next.categories.push(prompt.category.clone());
        }
    }

    let mut prompts = incoming;
    prompts.append(&mut next.prompts);
    next.prompts = prompts;

    (next, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy;

    #[test]
    fn test_into_prompt_defaults() {
        let imported = ImportedPrompt {
            title: "t".to_string(),
            ..ImportedPrompt::default()
        };
        let prompt = imported.into_prompt(99);
        assert_eq!(prompt.category, taxonomy::DEFAULT_CATEGORY);
        assert_eq!(prompt.created_at, 99);
        assert_eq!(prompt.updated_at, 99);
        assert!(!prompt.is_draft);
        assert!(prompt.variables.is_empty());
        assert_eq!(prompt.id.as_str().len(), 8);
    }

    #[test]
    fn test_into_prompt_keeps_source_id() {
        let imported = ImportedPrompt {
            id: Some("keep1234".to_string()),
            title: "t".to_string(),
            ..ImportedPrompt::default()
        };
        assert_eq!(imported.into_prompt(0).id.as_str(), "keep1234");
    }

    #[test]
    fn test_merge_prepends_and_extends_taxonomy() {
        let mut state = AppState::default();
        let mut existing = Prompt::draft("通用", 1);
        existing.title = "existing".to_string();
        existing.is_draft = false;
        state.prompts.push(existing);

        let imported = vec![
            ImportedPrompt {
                title: "first".to_string(),
                category: Some("写作".to_string()),
                ..ImportedPrompt::default()
            },
            ImportedPrompt {
                title: "second".to_string(),
                category: Some("通用".to_string()),
                ..ImportedPrompt::default()
            },
        ];

        let (next, report) = merge_into_state(&state, imported);

        assert_eq!(report.accepted, 2);
        let titles: Vec<_> = next.prompts.iter().map(|p| p.title.clone()).collect();
        assert_eq!(titles, vec!["first", "second", "existing"]);
        assert!(next.categories.contains(&"写作".to_string()));
        // No duplicate for an already-known label.
        assert_eq!(
            next.categories.iter().filter(|c| *c == "通用").count(),
            1
        );
    }
}
