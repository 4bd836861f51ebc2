//! Entry command handlers

use anyhow::{bail, Context, Result};

use reflect_core::{EntryDraft, EntryId, EntryStore, Placement, CLI_SOURCE};

use crate::output::Output;
use crate::prompt::{ask_stdin, confirm};

/// Add an entry, prompting for any field not given on the command line
pub fn add(
    store: &EntryStore,
    title: Option<String>,
    content: Option<String>,
    placement: Placement,
    output: &Output,
) -> Result<()> {
    let interactive = title.is_none() || content.is_none();
    if interactive && !output.is_quiet() && !output.is_json() {
        println!();
        println!("=== Learning Journal - Add Entry ===");
        println!("This will save an entry to {}", store.path().display());
        println!();
    }

    let title = match title {
        Some(t) => t,
        None => ask_stdin("Enter entry title: ")?,
    };
    let content = match content {
        Some(c) => c,
        None => ask_stdin("Enter entry content: ")?,
    };

    let draft = build_draft(title, content);

    let mut entries = store.load();
    let entry = store.append(&mut entries, draft, CLI_SOURCE, placement);
    store
        .save(&entries)
        .with_context(|| format!("Failed to save entry to {}", store.path().display()))?;

    output.print_saved(&entry, store.path(), entries.len());
    Ok(())
}

/// List all entries in file order
pub fn list(store: &EntryStore, output: &Output) -> Result<()> {
    let entries = store.list();
    output.print_entries(&entries);
    Ok(())
}

/// Delete an entry by id
pub fn delete(store: &EntryStore, id: String, force: bool, output: &Output) -> Result<()> {
    let entry_id: EntryId = id.parse()?;

    let mut entries = store.load();
    let Some(existing) = entries.iter().find(|e| e.id == entry_id).cloned() else {
        bail!("Entry not found: {}", entry_id);
    };

    if !force && output.should_prompt() {
        println!("Delete entry: {} - {}", existing.id, existing.title);
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    store.remove(&mut entries, entry_id);
    store
        .save(&entries)
        .with_context(|| format!("Failed to save {}", store.path().display()))?;

    output.success(&format!("Deleted entry: {}", entry_id));
    Ok(())
}

/// Turn raw prompt answers into a draft
///
/// A blank title means "no title" so the default placeholder applies.
fn build_draft(title: String, content: String) -> EntryDraft {
    let title = title.trim();
    EntryDraft {
        title: (!title.is_empty()).then(|| title.to_string()),
        content: Some(content),
    }
}
