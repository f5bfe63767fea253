//! Alias command handlers

use anyhow::{bail, Context, Result};

use authors_core::{AliasDraft, KeyValueStore, Store};

use crate::commands::author::find;
use crate::output::Output;

/// Validate and save an alias fragment for an author
pub fn set<S: KeyValueStore>(
    store: &mut Store<S>,
    id: &str,
    raw: &str,
    output: &Output,
) -> Result<()> {
    let author = find(store, id)?;
    let name = author.name.clone();

    let mut draft = AliasDraft::new(author.alias_fragment.clone());
    draft.set_text(raw);

    let fragment = match draft.commit() {
        Ok(fragment) => fragment,
        Err(e) => bail!("Invalid alias '{}': {}", raw, e),
    };
    let full = fragment.full();

    store
        .set_alias(id, fragment)
        .context("Failed to save alias")?;

    output.success(&format!("{} saved for {}", full, name));
    Ok(())
}

/// Show how a fragment would render, and whether it would be accepted
pub fn preview(raw: &str, output: &Output) {
    let mut draft = AliasDraft::new(None);
    draft.set_text(raw);
    let error = draft.commit().err().map(|e| e.to_string());
    output.print_alias_preview(draft.text(), error.as_deref());
}
