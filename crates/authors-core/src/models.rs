//! Data models for the authors directory
//!
//! Defines the core data structures: Author, FollowState, and SortMode.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alias::{self, AliasFragment};

/// A content creator in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    /// Unique, stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// User-editable part of the alias
    #[serde(default)]
    pub alias_fragment: Option<AliasFragment>,
    /// Free-text biography
    #[serde(default)]
    pub bio: String,
    /// Follower count (sample data, never changed by the store)
    #[serde(default)]
    pub follower_count: u64,
    /// Date the author joined
    pub joined_at: NaiveDate,
    /// Category labels, in display order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Author {
    /// Create an author with the given identity and join date
    pub fn new(id: impl Into<String>, name: impl Into<String>, joined_at: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            alias_fragment: None,
            bio: String::new(),
            follower_count: 0,
            joined_at,
            tags: Vec::new(),
        }
    }

    /// Set the biography
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Set the follower count
    pub fn with_follower_count(mut self, follower_count: u64) -> Self {
        self.follower_count = follower_count;
        self
    }

    /// Set the alias fragment
    pub fn with_alias(mut self, fragment: AliasFragment) -> Self {
        self.alias_fragment = Some(fragment);
        self
    }

    /// Add a tag, ignoring duplicates
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Full alias for display, placeholder when no fragment is set
    pub fn full_alias(&self) -> String {
        alias::render(self.alias_fragment.as_ref().map(AliasFragment::as_str))
    }
}

/// Which authors the current user follows
///
/// Persisted as one JSON object mapping author id to a boolean. Unfollowing
/// keeps the entry with `false` rather than removing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FollowState(BTreeMap<String, bool>);

impl FollowState {
    /// Create an empty follow state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an author is followed (unknown ids are not)
    pub fn is_followed(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Record the follow flag for an author
    pub fn set(&mut self, id: impl Into<String>, followed: bool) {
        self.0.insert(id.into(), followed);
    }

    /// Ids currently followed, in id order
    pub fn followed_ids(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, followed)| **followed)
            .map(|(id, _)| id.as_str())
    }

    /// Number of recorded entries (followed or not)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no entries are recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw entry for an id
    pub fn get(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }
}

/// Ordering applied to the visible author list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most followers first
    #[default]
    Popular,
    /// Name, alphabetical
    Az,
    /// Most recently joined first
    Recent,
}

impl SortMode {
    /// All modes, in display order
    pub const ALL: [SortMode; 3] = [SortMode::Popular, SortMode::Az, SortMode::Recent];

    /// Short identifier used in config and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Popular => "popular",
            SortMode::Az => "az",
            SortMode::Recent => "recent",
        }
    }

    /// Label for display
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Popular => "Popular",
            SortMode::Az => "A–Z",
            SortMode::Recent => "Recent",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`SortMode`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort mode '{0}' (expected popular, az, or recent)")]
pub struct ParseSortModeError(pub String);

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popular" => Ok(SortMode::Popular),
            "az" | "a-z" => Ok(SortMode::Az),
            "recent" => Ok(SortMode::Recent),
            _ => Err(ParseSortModeError(s.to_string())),
        }
    }
}
