//! Round-trip and degradation tests for the backup codecs.

// Tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use promptstash::io::{Format, delimited, export_collection, import_collection, tagged};
use promptstash::models::{AppState, Prompt, PromptId, PromptVersion};

fn prompt(title: &str, content: &str, tags: &[&str], history_len: usize) -> Prompt {
    Prompt {
        id: PromptId::generate(),
        title: title.to_string(),
        content: content.to_string(),
        description: "d".to_string(),
        category: "通用".to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        variables: Vec::new(),
        click_count: 2,
        card_color: None,
        last_used_at: None,
        created_at: 1111,
        updated_at: 2222,
        pinned: false,
        is_draft: false,
        history: (0..history_len)
            .map(|i| PromptVersion {
                id: format!("v{i}"),
                timestamp: 100 + i as u64,
                content: format!("revision {i}"),
                description: None,
            })
            .collect(),
    }
}

fn state_with(prompts: Vec<Prompt>) -> AppState {
    AppState {
        prompts,
        ..AppState::default()
    }
}

#[test]
fn test_csv_roundtrip_through_state() {
    let state = state_with(vec![
        prompt("one, with comma", "body\nlines and \"quotes\"", &["a", "b"], 2),
        prompt("two", "plain", &[], 0),
    ]);

    let text = export_collection(&state, Format::Csv);
    let (next, report) = import_collection(&AppState::default(), Format::Csv, &text);

    assert_eq!(report.accepted, 2);
    for (got, want) in next.prompts.iter().zip(&state.prompts) {
        assert_eq!(got.title, want.title);
        assert_eq!(got.content, want.content);
        assert_eq!(got.category, want.category);
        assert_eq!(got.tags, want.tags);
        assert_eq!(got.history.len(), want.history.len());
    }
}

#[test]
fn test_markdown_roundtrip_through_state() {
    let state = state_with(vec![
        prompt("first", "multi\nline body", &["x"], 1),
        prompt("second", "short", &["y", "z"], 3),
    ]);

    let text = export_collection(&state, Format::Markdown);
    let (next, report) = import_collection(&AppState::default(), Format::Markdown, &text);

    assert_eq!(report.accepted, 2);
    for (got, want) in next.prompts.iter().zip(&state.prompts) {
        assert_eq!(got.title, want.title);
        assert_eq!(got.content, want.content);
        assert_eq!(got.category, want.category);
        assert_eq!(got.tags, want.tags);
        assert_eq!(got.history.len(), want.history.len());
    }
}

#[test]
fn test_import_extends_taxonomy_with_unseen_categories() {
    let mut exotic = prompt("t", "c", &[], 0);
    exotic.category = "从未见过".to_string();
    let text = export_collection(&state_with(vec![exotic]), Format::Csv);

    let (next, _) = import_collection(&AppState::default(), Format::Csv, &text);
    assert!(next.categories.contains(&"从未见过".to_string()));
}

#[test]
fn test_import_prepends_without_dedup_by_id() {
    let original = state_with(vec![prompt("existing", "body", &[], 0)]);
    let text = export_collection(&original, Format::Csv);

    // Importing a state's own backup duplicates its prompts by design.
    let (next, report) = import_collection(&original, Format::Csv, &text);
    assert_eq!(report.accepted, 1);
    assert_eq!(next.prompts.len(), 2);
    assert_eq!(next.prompts[0].id, next.prompts[1].id);
}

#[test]
fn test_csv_quoted_tags_fallback_scenario() {
    // The tags field carries the literal text `urgent,review`, quoted so the
    // embedded comma stays inside the cell. It is not a JSON array, so the
    // comma-split fallback yields two tags.
    let text = "title,content,tags\nTriage,body,\"urgent,review\"";
    let (next, report) = import_collection(&AppState::default(), Format::Csv, text);

    assert_eq!(report.accepted, 1);
    assert_eq!(next.prompts[0].tags, vec!["urgent", "review"]);
}

#[test]
fn test_csv_rows_missing_identity_are_not_counted() {
    let text = "id,title,content\nrow1,,\nrow2,named,body\n";
    let (_, report) = import_collection(&AppState::default(), Format::Csv, text);
    assert_eq!(report.accepted, 1);
}

#[test]
fn test_markdown_degrades_without_aborting() {
    let text = concat!(
        "---\n",
        "category: 通用\n", // no title key: skipped
        "---\n",
        "orphan body\n",
        "\n",
        "---\n",
        "title: survivor\n",
        "tags: [not json\n",
        "history: {also bad}\n",
        "---\n",
        "kept body\n",
        "\n",
        "---\n",
        "title: no body pair\n", // odd leftover: discarded
    );
    let (next, report) = import_collection(&AppState::default(), Format::Markdown, text);

    assert_eq!(report.accepted, 1);
    let got = &next.prompts[0];
    assert_eq!(got.title, "survivor");
    assert_eq!(got.content, "kept body");
    assert!(got.tags.is_empty());
    assert!(got.history.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: any `\r`-free title/body round-trips through the delimited
    /// codec, including commas, quotes, and newlines.
    #[test]
    fn prop_csv_roundtrip(
        title in "[ -~]{1,24}",
        content in "[ -~\n]{0,64}",
        tags in proptest::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let mut p = prompt(&title, &content, &[], 1);
        p.tags = tags.clone();

        let imported = delimited::import(&delimited::export(&[p]));

        prop_assert_eq!(imported.len(), 1);
        prop_assert_eq!(&imported[0].title, &title);
        prop_assert_eq!(&imported[0].content, &content);
        prop_assert_eq!(&imported[0].tags, &tags);
        prop_assert_eq!(imported[0].history.len(), 1);
    }

    /// Property: single-line metadata and marker-free bodies round-trip
    /// through the tagged codec.
    #[test]
    fn prop_markdown_roundtrip(
        title in "[a-zA-Z0-9][a-zA-Z0-9 :]{0,20}[a-zA-Z0-9]",
        body in "[a-zA-Z0-9 ]{1,30}(\n[a-zA-Z0-9 ]{1,30}){0,3}",
    ) {
        let p = prompt(&title, &body, &["tag"], 2);

        let imported = tagged::import(&tagged::export(std::slice::from_ref(&p)));

        prop_assert_eq!(imported.len(), 1);
        prop_assert_eq!(&imported[0].title, &title);
        prop_assert_eq!(imported[0].content.as_str(), body.trim());
        prop_assert_eq!(imported[0].history.len(), 2);
    }

    /// Property: the row parser never panics on arbitrary input.
    #[test]
    fn prop_row_parser_total(input in "[ -~\n\r\"]{0,200}") {
        let _rows = delimited::parse_rows(&input);
    }
}
