//! Intent dispatch and the state container.
//!
//! Every mutation is a pure function `(AppState, Intent) -> AppState`; the
//! [`Store`] owns the current state and an injected [`StateRepository`],
//! persisting the whole state after each transition. There is no partial
//! write path: the slot always holds a complete, self-consistent snapshot.

use tracing::debug;

use crate::io::{Format, ImportReport, export_collection, import_collection};
use crate::models::{AppState, Prompt, PromptId, PromptPatch, extract_variables};
use crate::storage::StateRepository;
use crate::{Result, current_timestamp_millis, history, ordering, taxonomy};

/// A state transition requested by the presentation layer.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Create a draft prompt at the head of the collection and select it.
    AddPrompt,
    /// Merge a partial update into a prompt; the first save clears the
    /// draft flag.
    UpdatePrompt {
        /// Target prompt.
        id: PromptId,
        /// Fields to change.
        patch: PromptPatch,
    },
    /// Remove a prompt by id.
    DeletePrompt(PromptId),
    /// Flip a prompt's pinned flag.
    TogglePin(PromptId),
    /// Count one use of a prompt.
    IncrementUsage(PromptId),
    /// Select a prompt; selecting the selected prompt deselects it.
    SelectPrompt(PromptId),
    /// Move a prompt immediately before another.
    Reorder {
        /// The prompt being moved.
        source: PromptId,
        /// The prompt it lands before.
        target: PromptId,
    },
    /// Append a generated category label.
    AddCategory,
    /// Relabel a category, cascading to prompts and the active filter.
    RenameCategory {
        /// Current label.
        old: String,
        /// Replacement label.
        new: String,
    },
    /// Remove a category, reassigning its prompts to the default label.
    DeleteCategory(String),
    /// Snapshot a prompt's in-progress edit buffer into its history.
    CreateSnapshot {
        /// Target prompt.
        id: PromptId,
        /// The edit buffer content to capture.
        buffer: String,
    },
}

/// Computes the next state for an intent.
///
/// Pure: the input state is never mutated, and unknown ids degrade to a
/// no-op rather than an error.
#[must_use]
pub fn apply(state: &AppState, intent: &Intent) -> AppState {
    match intent {
        Intent::AddPrompt => add_prompt(state),
        Intent::UpdatePrompt { id, patch } => update_prompt(state, id, patch),
        Intent::DeletePrompt(id) => delete_prompt(state, id),
        Intent::TogglePin(id) => toggle_pin(state, id),
        Intent::IncrementUsage(id) => increment_usage(state, id),
        Intent::SelectPrompt(id) => select_prompt(state, id),
        Intent::Reorder { source, target } => ordering::reorder(state, source, target),
        Intent::AddCategory => taxonomy::add_category(state),
        Intent::RenameCategory { old, new } => taxonomy::rename_category(state, old, new),
        Intent::DeleteCategory(category) => taxonomy::delete_category(state, category),
        Intent::CreateSnapshot { id, buffer } => history::create_snapshot(state, id, buffer),
    }
}

fn add_prompt(state: &AppState) -> AppState {
    let category = if state.active_category == taxonomy::UNIVERSAL_CATEGORY {
        taxonomy::DEFAULT_CATEGORY.to_string()
    } else {
        state.active_category.clone()
    };
    let draft = Prompt::draft(category, current_timestamp_millis());

    let mut next = state.clone();
    next.selected_prompt_id = Some(draft.id.clone());
    next.prompts.insert(0, draft);
    next
}

fn update_prompt(state: &AppState, id: &PromptId, patch: &PromptPatch) -> AppState {
    let now = current_timestamp_millis();
    let mut next = state.clone();
    for prompt in &mut next.prompts {
        if &prompt.id != id {
            continue;
        }
        if let Some(title) = &patch.title {
            prompt.title = title.clone();
        }
        if let Some(content) = &patch.content {
            prompt.content = content.clone();
        }
        if let Some(description) = &patch.description {
            prompt.description = description.clone();
        }
        if let Some(category) = &patch.category {
            prompt.category = category.clone();
        }
        if let Some(tags) = &patch.tags {
            prompt.tags = tags.clone();
        }
        if let Some(card_color) = &patch.card_color {
            prompt.card_color = Some(card_color.clone());
        }
        if let Some(history) = &patch.history {
            // The snapshot log is append-only; a shorter payload is stale.
            if history.len() >= prompt.history.len() {
                prompt.history = history.clone();
            } else {
                debug!(id = %prompt.id, "ignoring history patch shorter than the stored log");
            }
        }
        prompt.variables = extract_variables(&prompt.content);
        prompt.updated_at = now;
        prompt.is_draft = false;
        break;
    }
    next
}

fn delete_prompt(state: &AppState, id: &PromptId) -> AppState {
    let mut next = state.clone();
    next.prompts.retain(|p| &p.id != id);
    next.selected_prompt_id = None;
    next
}

fn toggle_pin(state: &AppState, id: &PromptId) -> AppState {
    let mut next = state.clone();
    for prompt in &mut next.prompts {
        if &prompt.id == id {
            prompt.pinned = !prompt.pinned;
            break;
        }
    }
    next
}

fn increment_usage(state: &AppState, id: &PromptId) -> AppState {
    let now = current_timestamp_millis();
    let mut next = state.clone();
    for prompt in &mut next.prompts {
        if &prompt.id == id {
            prompt.click_count += 1;
            prompt.last_used_at = Some(now);
            break;
        }
    }
    next
}

fn select_prompt(state: &AppState, id: &PromptId) -> AppState {
    let mut next = state.clone();
    if next.selected_prompt_id.as_ref() == Some(id) {
        next.selected_prompt_id = None;
    } else {
        next.selected_prompt_id = Some(id.clone());
    }
    next
}

/// The state container.
///
/// Owns the current [`AppState`] and the injected load/save boundary. Every
/// dispatched intent publishes the computed state atomically and writes the
/// whole state to the persisted slot.
pub struct Store {
    state: AppState,
    repository: Box<dyn StateRepository>,
}

impl Store {
    /// Opens a store, loading (and migrating) any prior state.
    ///
    /// # Errors
    ///
    /// Returns an error only when the repository itself fails; a malformed
    /// or absent slot loads as the default state.
    pub fn open(repository: Box<dyn StateRepository>) -> Result<Self> {
        let state = repository.load()?;
        Ok(Self { state, repository })
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies an intent and persists the resulting state.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted slot cannot be written.
    pub fn dispatch(&mut self, intent: Intent) -> Result<&AppState> {
        debug!(?intent, "applying intent");
        self.state = apply(&self.state, &intent);
        self.repository.save(&self.state)?;
        Ok(&self.state)
    }

    /// Serializes the whole collection in the given format.
    #[must_use]
    pub fn export_collection(&self, format: Format) -> String {
        export_collection(&self.state, format)
    }

    /// Decodes a backup text, merges it in, and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted slot cannot be written.
    pub fn import_collection(&mut self, format: Format, text: &str) -> Result<ImportReport> {
        let (next, report) = import_collection(&self.state, format, text);
        self.state = next;
        self.repository.save(&self.state)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;

    fn open_store() -> Store {
        Store::open(Box::new(MemoryRepository::new())).unwrap()
    }

    fn saved_prompt(store: &mut Store, title: &str) -> PromptId {
        store.dispatch(Intent::AddPrompt).unwrap();
        let id = store.state().prompts[0].id.clone();
        store
            .dispatch(Intent::UpdatePrompt {
                id: id.clone(),
                patch: PromptPatch::new().with_title(title).with_content("body"),
            })
            .unwrap();
        id
    }

    #[test]
    fn test_add_prompt_creates_selected_draft() {
        let state = AppState::default();
        let next = apply(&state, &Intent::AddPrompt);

        assert_eq!(next.prompts.len(), 1);
        let draft = &next.prompts[0];
        assert!(draft.is_draft);
        assert_eq!(draft.category, taxonomy::DEFAULT_CATEGORY);
        assert_eq!(next.selected_prompt_id, Some(draft.id.clone()));
    }

    #[test]
    fn test_add_prompt_uses_active_category() {
        let state = AppState {
            active_category: "编程".to_string(),
            ..AppState::default()
        };
        let next = apply(&state, &Intent::AddPrompt);
        assert_eq!(next.prompts[0].category, "编程");
    }

    #[test]
    fn test_update_clears_draft_and_recomputes_variables() {
        let state = apply(&AppState::default(), &Intent::AddPrompt);
        let id = state.prompts[0].id.clone();

        let patch = PromptPatch::new()
            .with_title("T")
            .with_content("Use {{tone}} for {{audience}}");
        let next = apply(&state, &Intent::UpdatePrompt { id, patch });

        let prompt = &next.prompts[0];
        assert!(!prompt.is_draft);
        assert_eq!(prompt.variables, vec!["tone", "audience"]);
        assert!(prompt.updated_at >= prompt.created_at);
    }

    #[test]
    fn test_update_ignores_stale_history() {
        let state = apply(&AppState::default(), &Intent::AddPrompt);
        let id = state.prompts[0].id.clone();
        let state = apply(
            &state,
            &Intent::CreateSnapshot {
                id: id.clone(),
                buffer: "v1".to_string(),
            },
        );

        let patch = PromptPatch {
            history: Some(Vec::new()),
            ..PromptPatch::default()
        };
        let next = apply(&state, &Intent::UpdatePrompt { id, patch });
        assert_eq!(next.prompts[0].history.len(), 1);
    }

    #[test]
    fn test_delete_prompt_clears_selection() {
        let state = apply(&AppState::default(), &Intent::AddPrompt);
        let id = state.prompts[0].id.clone();

        let next = apply(&state, &Intent::DeletePrompt(id));
        assert!(next.prompts.is_empty());
        assert!(next.selected_prompt_id.is_none());
    }

    #[test]
    fn test_toggle_pin_and_usage() {
        let state = apply(&AppState::default(), &Intent::AddPrompt);
        let id = state.prompts[0].id.clone();

        let next = apply(&state, &Intent::TogglePin(id.clone()));
        assert!(next.prompts[0].pinned);
        let next = apply(&next, &Intent::TogglePin(id.clone()));
        assert!(!next.prompts[0].pinned);

        let next = apply(&next, &Intent::IncrementUsage(id));
        assert_eq!(next.prompts[0].click_count, 1);
        assert!(next.prompts[0].last_used_at.is_some());
    }

    #[test]
    fn test_select_toggles_off_when_reselected() {
        let state = apply(&AppState::default(), &Intent::AddPrompt);
        let id = state.prompts[0].id.clone();

        // AddPrompt already selected the draft.
        let next = apply(&state, &Intent::SelectPrompt(id.clone()));
        assert!(next.selected_prompt_id.is_none());

        let next = apply(&next, &Intent::SelectPrompt(id.clone()));
        assert_eq!(next.selected_prompt_id, Some(id));
    }

    #[test]
    fn test_store_persists_after_dispatch() {
        let mut store = open_store();
        let id = saved_prompt(&mut store, "kept");

        assert_eq!(store.state().prompts[0].id, id);
        assert_eq!(store.state().prompts[0].title, "kept");
    }

    #[test]
    fn test_store_roundtrip_import_counts_accepted() {
        let mut store = open_store();
        saved_prompt(&mut store, "original");

        let text = store.export_collection(Format::Csv);
        let report = store.import_collection(Format::Csv, &text).unwrap();

        assert_eq!(report.accepted, 1);
        assert_eq!(store.state().prompts.len(), 2);
    }
}
