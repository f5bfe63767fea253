//! Follow command handlers

use anyhow::{Context, Result};

use authors_core::{KeyValueStore, Store};

use crate::commands::author::find;
use crate::output::Output;

/// Follow or unfollow an author
pub fn set<S: KeyValueStore>(
    store: &mut Store<S>,
    id: &str,
    followed: bool,
    output: &Output,
) -> Result<()> {
    let name = find(store, id)?.name.clone();

    store
        .set_followed(id, followed)
        .context("Failed to update follow state")?;

    if followed {
        output.success(&format!("Following {}", name));
    } else {
        output.success(&format!("Unfollowed {}", name));
    }
    Ok(())
}

/// Flip the follow state of an author
pub fn toggle<S: KeyValueStore>(store: &mut Store<S>, id: &str, output: &Output) -> Result<()> {
    let name = find(store, id)?.name.clone();

    let followed = store
        .toggle_followed(id)
        .context("Failed to update follow state")?;

    if followed {
        output.success(&format!("Following {}", name));
    } else {
        output.success(&format!("Unfollowed {}", name));
    }
    Ok(())
}
