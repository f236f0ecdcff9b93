//! Category taxonomy management.
//!
//! Categories are plain labels with one reserved pseudo-category: the
//! universal label, which means "no filter" and can be neither renamed nor
//! deleted. Rename and delete cascade to every prompt referencing the
//! affected label.
//!
//! Labels are localized; the legacy English labels of early releases are
//! remapped back to their localized forms at load time (see
//! [`remap_legacy`]).

use crate::models::AppState;
use std::collections::HashSet;

/// The universal pseudo-category, meaning "no filter".
pub const UNIVERSAL_CATEGORY: &str = "全部";

/// The default category prompts fall back to when theirs is deleted.
pub const DEFAULT_CATEGORY: &str = "通用";

/// Base name for generated categories; collisions get a numeric suffix.
pub const GENERATED_CATEGORY_BASE: &str = "新分类";

/// The default taxonomy set.
const DEFAULT_CATEGORIES: [&str; 6] = ["全部", "通用", "编程", "科研", "创意写作", "生产力"];

/// One-time reverse remap from legacy English labels to localized ones.
///
/// Only legacy keys match, so relabeling an already-migrated value is a
/// no-op.
const LEGACY_CATEGORY_MAP: [(&str, &str); 6] = [
    ("All", "全部"),
    ("General", "通用"),
    ("Coding", "编程"),
    ("Research", "科研"),
    ("Creative", "创意写作"),
    ("Productivity", "生产力"),
];

/// Returns the default taxonomy as an owned list.
#[must_use]
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect()
}

/// Maps a legacy English label to its localized form, or returns the input.
#[must_use]
pub fn remap_legacy(label: &str) -> &str {
    LEGACY_CATEGORY_MAP
        .iter()
        .find(|(legacy, _)| *legacy == label)
        .map_or(label, |(_, localized)| localized)
}

/// Deduplicates a label list, preserving first-seen order.
#[must_use]
pub fn dedup_preserving_order(labels: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Picks the first generated category name not colliding with `existing`.
///
/// Tries the base name first, then appends an incrementing numeric suffix.
#[must_use]
pub fn next_generated_name(existing: &[String]) -> String {
    let mut name = GENERATED_CATEGORY_BASE.to_string();
    let mut counter = 1;
    while existing.iter().any(|c| c == &name) {
        name = format!("{GENERATED_CATEGORY_BASE} {counter}");
        counter += 1;
    }
    name
}

/// Appends a freshly generated category label. No other state changes.
#[must_use]
pub fn add_category(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.categories.push(next_generated_name(&state.categories));
    next
}

/// Renames a category, cascading to `active_category` and every prompt.
///
/// No-op when the new label is empty or the old label is the universal
/// pseudo-category.
#[must_use]
pub fn rename_category(state: &AppState, old: &str, new: &str) -> AppState {
    if new.is_empty() || old == UNIVERSAL_CATEGORY {
        return state.clone();
    }

    let mut next = state.clone();
    for category in &mut next.categories {
        if category == old {
            *category = new.to_string();
        }
    }
    if next.active_category == old {
        next.active_category = new.to_string();
    }
    for prompt in &mut next.prompts {
        if prompt.category == old {
            prompt.category = new.to_string();
        }
    }
    next
}

/// Deletes a category, reassigning its prompts to the default category.
///
/// Deleting the universal pseudo-category is ignored. If the deleted label
/// was the active filter, the filter resets to the universal label.
#[must_use]
pub fn delete_category(state: &AppState, category: &str) -> AppState {
    if category == UNIVERSAL_CATEGORY {
        return state.clone();
    }

    let mut next = state.clone();
    next.categories.retain(|c| c != category);
    if next.active_category == category {
        next.active_category = UNIVERSAL_CATEGORY.to_string();
    }
    for prompt in &mut next.prompts {
        if prompt.category == category {
            prompt.category = DEFAULT_CATEGORY.to_string();
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prompt;

    fn state_with_categories(categories: &[&str]) -> AppState {
        AppState {
            categories: categories.iter().map(ToString::to_string).collect(),
            ..AppState::default()
        }
    }

    #[test]
    fn test_remap_legacy() {
        assert_eq!(remap_legacy("All"), "全部");
        assert_eq!(remap_legacy("General"), "通用");
        // Already localized or unknown labels pass through.
        assert_eq!(remap_legacy("全部"), "全部");
        assert_eq!(remap_legacy("自定义"), "自定义");
    }

    #[test]
    fn test_dedup_preserving_order() {
        let labels = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ];
        assert_eq!(dedup_preserving_order(labels), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_category_generates_unique_names() {
        let mut state = state_with_categories(&["全部", "通用", GENERATED_CATEGORY_BASE]);

        for _ in 0..3 {
            state = add_category(&state);
        }

        let unique: std::collections::HashSet<_> = state.categories.iter().collect();
        assert_eq!(unique.len(), state.categories.len());
        assert!(state.categories.contains(&format!("{GENERATED_CATEGORY_BASE} 1")));
        assert!(state.categories.contains(&format!("{GENERATED_CATEGORY_BASE} 2")));
        assert!(state.categories.contains(&format!("{GENERATED_CATEGORY_BASE} 3")));
    }

    #[test]
    fn test_rename_category_cascades() {
        let mut state = state_with_categories(&["全部", "通用", "编程"]);
        state.active_category = "编程".to_string();
        let mut prompt = Prompt::draft("编程", 1);
        prompt.is_draft = false;
        state.prompts.push(prompt);

        let next = rename_category(&state, "编程", "开发");

        assert!(next.categories.contains(&"开发".to_string()));
        assert!(!next.categories.contains(&"编程".to_string()));
        assert_eq!(next.active_category, "开发");
        assert_eq!(next.prompts[0].category, "开发");
    }

    #[test]
    fn test_rename_rejects_empty_and_universal() {
        let state = state_with_categories(&["全部", "通用"]);
        assert_eq!(rename_category(&state, "通用", ""), state);
        assert_eq!(rename_category(&state, UNIVERSAL_CATEGORY, "别的"), state);
    }

    #[test]
    fn test_delete_category_reassigns_prompts() {
        let mut state = state_with_categories(&["全部", "通用", "科研"]);
        state.active_category = "科研".to_string();
        for _ in 0..3 {
            let mut prompt = Prompt::draft("科研", 1);
            prompt.is_draft = false;
            state.prompts.push(prompt);
        }

        let next = delete_category(&state, "科研");

        assert!(!next.categories.contains(&"科研".to_string()));
        assert_eq!(next.active_category, UNIVERSAL_CATEGORY);
        assert!(next.prompts.iter().all(|p| p.category == DEFAULT_CATEGORY));
        assert!(!next.prompts.iter().any(|p| p.category == "科研"));
    }

    #[test]
    fn test_delete_universal_is_ignored() {
        let state = state_with_categories(&["全部", "通用"]);
        let next = delete_category(&state, UNIVERSAL_CATEGORY);
        assert_eq!(next, state);
    }
}
