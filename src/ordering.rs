//! Sort-mode resolution and manual reordering.
//!
//! Non-manual sort modes are computed views: the stored collection order is
//! never rewritten by sorting. Manual mode makes the literal order
//! authoritative, mutated only by explicit [`reorder`] moves.

use std::cmp::Reverse;

use crate::models::{AppState, Prompt, PromptId, SortMode};

/// Resolves the display order for a slice of prompts.
///
/// `recent`: pinned first, then `updated_at` descending. `click`: pinned
/// first, then `click_count` descending, ties broken by `updated_at`
/// descending. `manual`: the literal order.
#[must_use]
pub fn sorted_view(prompts: &[Prompt], mode: SortMode) -> Vec<&Prompt> {
    let mut view: Vec<&Prompt> = prompts.iter().collect();
    match mode {
        SortMode::Manual => {}
        SortMode::Recent => {
            view.sort_by_key(|p| (Reverse(p.pinned), Reverse(p.updated_at)));
        }
        SortMode::Click => {
            view.sort_by_key(|p| (Reverse(p.pinned), Reverse(p.click_count), Reverse(p.updated_at)));
        }
    }
    view
}

/// Moves a prompt immediately before the target's position.
///
/// The source is removed first; the insertion index is the target's position
/// after removal. No-op when either id is missing or both are the same.
/// Reordering is only meaningful in manual mode, but mode-gating is a
/// presentation concern — the operation itself is unconditional.
#[must_use]
pub fn reorder(state: &AppState, source: &PromptId, target: &PromptId) -> AppState {
    if source == target {
        return state.clone();
    }
    let Some(source_index) = state.position(source) else {
        return state.clone();
    };
    if state.position(target).is_none() {
        return state.clone();
    }

    let mut next = state.clone();
    let moved = next.prompts.remove(source_index);
    let insert_at = next
        .position(target)
        .unwrap_or(next.prompts.len());
    next.prompts.insert(insert_at, moved);
    next
}
