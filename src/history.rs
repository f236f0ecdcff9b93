//! Version-history management.
//!
//! Each prompt carries an append-only log of [`PromptVersion`] snapshots,
//! oldest first. Snapshots capture the in-progress edit buffer, not the last
//! saved body, so a half-edited draft can be checkpointed without closing the
//! edit session. No operation removes entries; the log only grows.

use chrono::Local;

use crate::current_timestamp_millis;
use crate::models::{AppState, PromptId, PromptVersion, generate_token};

/// Appends a snapshot of the in-progress edit buffer to a prompt's history.
///
/// This is a partial save: only `history` and `updated_at` change, and the
/// edit session stays open. Unknown ids leave the state untouched.
#[must_use]
pub fn create_snapshot(state: &AppState, id: &PromptId, buffer: &str) -> AppState {
    let now = current_timestamp_millis();
    let version = PromptVersion {
        id: generate_token(),
        timestamp: now,
        content: buffer.to_string(),
        description: Some(format!("Snapshot at {}", Local::now().format("%H:%M:%S"))),
    };

    let mut next = state.clone();
    for prompt in &mut next.prompts {
        if &prompt.id == id {
            prompt.history.push(version);
            prompt.updated_at = now;
            break;
        }
    }
    next
}

/// Returns the body a restored version places into the edit buffer.
///
/// Restoring touches neither the history log nor persisted state; nothing is
/// written until the user explicitly saves.
#[must_use]
pub fn restore_version(version: &PromptVersion) -> String {
    version.content.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prompt;

    fn state_with_prompt(content: &str) -> (AppState, PromptId) {
        let mut prompt = Prompt::draft("通用", 1);
        prompt.content = content.to_string();
        prompt.is_draft = false;
        let id = prompt.id.clone();
        let state = AppState {
            prompts: vec![prompt],
            ..AppState::default()
        };
        (state, id)
    }

    #[test]
    fn test_snapshot_appends_from_buffer() {
        let (state, id) = state_with_prompt("saved body");

        let next = create_snapshot(&state, &id, "in-progress body");

        let history = &next.prompts[0].history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "in-progress body");
        assert!(history[0].description.as_deref().is_some_and(|d| d.starts_with("Snapshot at ")));
    }

    #[test]
    fn test_snapshot_history_only_grows() {
        let (state, id) = state_with_prompt("body");

        let mut next = state;
        for i in 0..3 {
            next = create_snapshot(&next, &id, &format!("rev {i}"));
        }

        let history = &next.prompts[0].history;
        assert_eq!(history.len(), 3);
        // Oldest first.
        assert_eq!(history[0].content, "rev 0");
        assert_eq!(history[2].content, "rev 2");
    }

    #[test]
    fn test_snapshot_does_not_touch_other_fields() {
        let (state, id) = state_with_prompt("body");
        let before = state.prompts[0].clone();

        let next = create_snapshot(&state, &id, "buffer");
        let after = &next.prompts[0];

        assert_eq!(after.title, before.title);
        assert_eq!(after.content, before.content);
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.click_count, before.click_count);
    }

    #[test]
    fn test_snapshot_unknown_id_is_noop() {
        let (state, _) = state_with_prompt("body");
        let next = create_snapshot(&state, &PromptId::new("missing"), "buffer");
        assert_eq!(next.prompts[0].history.len(), 0);
    }

    #[test]
    fn test_snapshot_then_restore_leaves_content_unchanged() {
        let (state, id) = state_with_prompt("the body");

        let next = create_snapshot(&state, &id, "the body");
        let prompt = &next.prompts[0];
        assert_eq!(prompt.history.len(), 1);

        let buffer = restore_version(&prompt.history[0]);
        assert_eq!(buffer, "the body");
        assert_eq!(prompt.content, "the body");
    }
}
