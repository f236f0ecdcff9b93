//! CLI command implementations.
//!
//! A thin presentation collaborator over the engine: every command reads the
//! current state, dispatches intents, and renders whatever comes back. All
//! mutation flows through [`Store::dispatch`].

#![allow(clippy::print_stdout)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{Intent, Store};
use crate::io::{Format, backup_filename};
use crate::models::{PromptId, PromptPatch, SortMode};
use crate::ordering::sorted_view;
use crate::{Error, Result};

/// Lists prompts in the resolved sort order.
pub fn cmd_list(store: &Store, category: Option<&str>, sort: Option<SortMode>) -> Result<()> {
    let state = store.state();
    let mode = sort.unwrap_or(state.sort_mode);

    for prompt in sorted_view(&state.prompts, mode) {
        if let Some(filter) = category {
            if prompt.category != filter {
                continue;
            }
        }
        let pin = if prompt.pinned { "*" } else { " " };
        println!(
            "{pin} {}  [{}] {}  ({} uses)",
            prompt.id, prompt.category, prompt.title, prompt.click_count
        );
    }
    Ok(())
}

/// Prints one prompt in full.
pub fn cmd_show(store: &Store, id: &str) -> Result<()> {
    let id = PromptId::new(id);
    let prompt = store
        .state()
        .prompt(&id)
        .ok_or_else(|| Error::InvalidInput(format!("no prompt with id {id}")))?;

    println!("id:          {}", prompt.id);
    println!("title:       {}", prompt.title);
    println!("category:    {}", prompt.category);
    println!("description: {}", prompt.description);
    println!("tags:        {}", prompt.tags.join(", "));
    println!("variables:   {}", prompt.variables.join(", "));
    println!("uses:        {}", prompt.click_count);
    println!("snapshots:   {}", prompt.history.len());
    println!();
    println!("{}", prompt.content);
    Ok(())
}

/// Arguments for creating a prompt.
#[derive(Debug, Clone)]
pub struct AddArgs {
    /// Display title.
    pub title: String,
    /// Template body.
    pub content: String,
    /// Category label; defaults to the active category.
    pub category: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Comma-separated tags.
    pub tags: Option<String>,
}

/// Creates a prompt: a draft first, then the saving update that clears it.
pub fn cmd_add(store: &mut Store, args: AddArgs) -> Result<()> {
    store.dispatch(Intent::AddPrompt)?;
    let id = store
        .state()
        .selected_prompt_id
        .clone()
        .ok_or_else(|| Error::InvalidInput("draft creation left nothing selected".to_string()))?;

    let mut patch = PromptPatch::new()
        .with_title(args.title)
        .with_content(args.content);
    if let Some(category) = args.category {
        patch = patch.with_category(category);
    }
    if let Some(description) = args.description {
        patch = patch.with_description(description);
    }
    if let Some(tags) = args.tags {
        patch = patch.with_tags(
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect(),
        );
    }

    store.dispatch(Intent::UpdatePrompt {
        id: id.clone(),
        patch,
    })?;
    println!("created {id}");
    Ok(())
}

/// Prints a prompt body and counts the use.
pub fn cmd_copy(store: &mut Store, id: &str) -> Result<()> {
    let id = PromptId::new(id);
    let content = store
        .state()
        .prompt(&id)
        .map(|p| p.content.clone())
        .ok_or_else(|| Error::InvalidInput(format!("no prompt with id {id}")))?;

    println!("{content}");
    store.dispatch(Intent::IncrementUsage(id))?;
    Ok(())
}

/// Flips a prompt's pinned flag.
pub fn cmd_pin(store: &mut Store, id: &str) -> Result<()> {
    let id = PromptId::new(id);
    if store.state().prompt(&id).is_none() {
        return Err(Error::InvalidInput(format!("no prompt with id {id}")));
    }
    store.dispatch(Intent::TogglePin(id.clone()))?;
    let pinned = store.state().prompt(&id).is_some_and(|p| p.pinned);
    println!("{id}: pinned = {pinned}");
    Ok(())
}

/// Deletes a prompt by id.
pub fn cmd_delete(store: &mut Store, id: &str) -> Result<()> {
    store.dispatch(Intent::DeletePrompt(PromptId::new(id)))?;
    println!("deleted {id}");
    Ok(())
}

/// Taxonomy maintenance actions.
#[derive(Debug, Clone)]
pub enum CategoryAction {
    /// Print all labels.
    List,
    /// Append a generated label.
    Add,
    /// Relabel a category.
    Rename {
        /// Current label.
        old: String,
        /// Replacement label.
        new: String,
    },
    /// Remove a category.
    Delete {
        /// Label to remove.
        name: String,
    },
}

/// Runs a taxonomy maintenance action.
pub fn cmd_categories(store: &mut Store, action: CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List => {
            for category in &store.state().categories {
                let marker = if *category == store.state().active_category {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {category}");
            }
        }
        CategoryAction::Add => {
            store.dispatch(Intent::AddCategory)?;
            if let Some(added) = store.state().categories.last() {
                println!("added {added}");
            }
        }
        CategoryAction::Rename { old, new } => {
            store.dispatch(Intent::RenameCategory { old, new })?;
        }
        CategoryAction::Delete { name } => {
            store.dispatch(Intent::DeleteCategory(name))?;
        }
    }
    Ok(())
}

/// Writes a dated backup file in the given format.
pub fn cmd_export(store: &Store, format: Format, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(backup_filename(format)));
    let text = store.export_collection(format);
    fs::write(&path, text).map_err(|e| Error::OperationFailed {
        operation: "write_backup".to_string(),
        cause: e.to_string(),
    })?;
    println!("exported {} prompts to {}", store.state().prompts.len(), path.display());
    Ok(())
}

/// Imports a backup file, detecting the format from its extension.
pub fn cmd_import(store: &mut Store, path: &Path) -> Result<()> {
    let format = Format::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_backup".to_string(),
        cause: e.to_string(),
    })?;
    let report = store.import_collection(format, &text)?;
    println!("imported {} prompts", report.accepted);
    Ok(())
}
