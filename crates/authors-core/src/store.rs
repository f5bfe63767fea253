//! Entity store
//!
//! The `Store` holds the author catalog together with the user's follow
//! state and alias overrides, and writes every change through a
//! [`KeyValueStore`].
//!
//! ## Loading
//!
//! `initialize` reads the follow-state record and one alias override per
//! author. A record that can't be read or decoded falls back to its default
//! (nothing followed, catalog alias) and is reported in `load_issues()`.
//!
//! ## Writes
//!
//! Every mutation persists first and only updates memory once the write
//! succeeded, so a failed write leaves the store exactly as it was.
//! Mutations take `&mut self`, which serializes all writes to the
//! follow-state record.
//!
//! ## Usage
//!
//! ```
//! use authors_core::{alias, Catalog, MemoryStore, SortMode, Store};
//!
//! let mut store = Store::initialize(Catalog::sample(), MemoryStore::new());
//!
//! store.set_followed("a1", true)?;
//! store.set_alias("a2", alias::validate("mina-k")?)?;
//!
//! let visible = store.query("mina", SortMode::Popular);
//! assert_eq!(visible[0].full_alias(), "mina-k.animetlik.eth");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::alias::AliasFragment;
use crate::catalog::Catalog;
use crate::error::{StoreError, StoreResult};
use crate::models::{Author, FollowState, SortMode};
use crate::query;
use crate::storage::{alias_key, KeyValueStore, FOLLOW_KEY};

/// Authors plus follow and alias state for one session
pub struct Store<S: KeyValueStore> {
    /// Effective authors, in catalog order
    authors: Vec<Author>,
    /// Author id to position in `authors`
    index: HashMap<String, usize>,
    /// Follow flags by author id
    follows: FollowState,
    /// Where changes are persisted
    gateway: S,
    /// Bumped on every successful mutation
    version: u64,
    /// Records that failed to load during `initialize`
    load_issues: Vec<StoreError>,
}

impl<S: KeyValueStore> Store<S> {
    /// Build the store from the base catalog and persisted overrides
    pub fn initialize(catalog: Catalog, gateway: S) -> Self {
        let mut authors = catalog.into_authors();
        let mut load_issues = Vec::new();

        let follows = match load_follows(&gateway) {
            Ok(follows) => follows,
            Err(e) => {
                warn!("Could not load follow state, starting empty: {}", e);
                load_issues.push(e);
                FollowState::new()
            }
        };

        let mut overrides = 0;
        for author in &mut authors {
            match load_alias(&gateway, &author.id) {
                Ok(Some(fragment)) => {
                    author.alias_fragment = Some(fragment);
                    overrides += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Could not load alias for {}, keeping catalog value: {}", author.id, e);
                    load_issues.push(e);
                }
            }
        }

        let index = authors
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();

        info!(
            "Store initialized: {} authors, {} followed, {} alias overrides",
            authors.len(),
            follows.followed_ids().count(),
            overrides
        );

        Self {
            authors,
            index,
            follows,
            gateway,
            version: 0,
            load_issues,
        }
    }

    // ==================== Follow Operations ====================

    /// Set whether an author is followed
    ///
    /// Persists the whole follow-state record in one write.
    pub fn set_followed(&mut self, id: &str, followed: bool) -> StoreResult<()> {
        self.ensure_known(id)?;

        let mut next = self.follows.clone();
        next.set(id, followed);

        let encoded = serde_json::to_string(&next).map_err(|source| StoreError::Record {
            key: FOLLOW_KEY.to_string(),
            source,
        })?;
        self.gateway.write(FOLLOW_KEY, &encoded)?;

        self.follows = next;
        self.version += 1;
        debug!("Set followed={} for {}", followed, id);
        Ok(())
    }

    /// Flip the follow flag, returning the new value
    pub fn toggle_followed(&mut self, id: &str) -> StoreResult<bool> {
        let next = !self.follows.is_followed(id);
        self.set_followed(id, next)?;
        Ok(next)
    }

    /// Check whether an author is followed
    pub fn is_followed(&self, id: &str) -> bool {
        self.follows.is_followed(id)
    }

    /// Current follow state
    pub fn follow_state(&self) -> &FollowState {
        &self.follows
    }

    /// Followed authors, in catalog order
    pub fn followed(&self) -> Vec<&Author> {
        self.authors
            .iter()
            .filter(|a| self.follows.is_followed(&a.id))
            .collect()
    }

    // ==================== Alias Operations ====================

    /// Save an alias override for an author
    ///
    /// Writes only that author's override record.
    pub fn set_alias(&mut self, id: &str, fragment: AliasFragment) -> StoreResult<()> {
        let pos = self.ensure_known(id)?;

        self.gateway.write(&alias_key(id), fragment.as_str())?;

        debug!("Saved alias {} for {}", fragment.full(), id);
        self.authors[pos].alias_fragment = Some(fragment);
        self.version += 1;
        Ok(())
    }

    // ==================== Queries ====================

    /// Get an author by id
    pub fn get(&self, id: &str) -> Option<&Author> {
        self.index.get(id).map(|&pos| &self.authors[pos])
    }

    /// All authors, in catalog order
    pub fn list(&self) -> &[Author] {
        &self.authors
    }

    /// Filtered and sorted view of the authors
    pub fn query(&self, query: &str, mode: SortMode) -> Vec<&Author> {
        query::view(&self.authors, query, mode)
    }

    /// Number of authors
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    // ==================== Advanced ====================

    /// Counter that changes whenever the store's contents change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Problems found while loading persisted records
    pub fn load_issues(&self) -> &[StoreError] {
        &self.load_issues
    }

    /// Get access to the persistence gateway
    pub fn gateway(&self) -> &S {
        &self.gateway
    }

    /// Get mutable access to the persistence gateway
    pub fn gateway_mut(&mut self) -> &mut S {
        &mut self.gateway
    }

    fn ensure_known(&self, id: &str) -> StoreResult<usize> {
        match self.index.get(id) {
            Some(&pos) => Ok(pos),
            None => {
                error!("Operation on unknown author id {}", id);
                Err(StoreError::UnknownId { id: id.to_string() })
            }
        }
    }
}

fn load_follows<S: KeyValueStore>(gateway: &S) -> StoreResult<FollowState> {
    match gateway.read(FOLLOW_KEY)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Record {
            key: FOLLOW_KEY.to_string(),
            source,
        }),
        None => Ok(FollowState::new()),
    }
}

fn load_alias<S: KeyValueStore>(gateway: &S, id: &str) -> StoreResult<Option<AliasFragment>> {
    match gateway.read(&alias_key(id))? {
        Some(raw) => Ok(Some(AliasFragment::try_from(raw)?)),
        None => Ok(None),
    }
}
