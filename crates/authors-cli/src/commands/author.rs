//! Author listing command handlers

use anyhow::{anyhow, Result};

use authors_core::{Author, KeyValueStore, SortMode, Store};

use crate::output::Output;

/// List authors matching `query`, ordered by `sort`
pub fn list<S: KeyValueStore>(
    store: &Store<S>,
    query: &str,
    sort: SortMode,
    output: &Output,
) -> Result<()> {
    let rows = with_follow_flags(store, store.query(query, sort));
    output.print_authors(&rows, query, Some(sort))
}

/// Show a single author
pub fn show<S: KeyValueStore>(store: &Store<S>, id: &str, output: &Output) -> Result<()> {
    let author = find(store, id)?;
    output.print_author(author, store.is_followed(&author.id))
}

/// List followed authors in catalog order
pub fn following<S: KeyValueStore>(store: &Store<S>, output: &Output) -> Result<()> {
    let rows = with_follow_flags(store, store.followed());
    output.print_authors(&rows, "", None)
}

/// Look up an author or fail with a user-facing message
pub fn find<'a, S: KeyValueStore>(store: &'a Store<S>, id: &str) -> Result<&'a Author> {
    store
        .get(id)
        .ok_or_else(|| anyhow!("Author not found: {}", id))
}

fn with_follow_flags<'a, S: KeyValueStore>(
    store: &Store<S>,
    authors: Vec<&'a Author>,
) -> Vec<(&'a Author, bool)> {
    authors
        .into_iter()
        .map(|a| (a, store.is_followed(&a.id)))
        .collect()
}
