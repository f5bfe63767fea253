//! Alias codec
//!
//! An author's alias is a short user-editable fragment joined to a fixed
//! suffix: `<fragment>.animetlik.eth`. Only the fragment is stored.
//!
//! Normalizing and validating are separate steps so a caller can show a
//! live preview with [`render`] (never fails) while only committing values
//! that pass [`validate`].
//!
//! ```
//! use authors_core::alias::{normalize, render, validate};
//!
//! let fragment = validate(&normalize("  Akira ")).unwrap();
//! assert_eq!(fragment.as_str(), "akira");
//! assert_eq!(render(Some(fragment.as_str())), "akira.animetlik.eth");
//! assert_eq!(render(None), "—.animetlik.eth");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed suffix appended to every alias fragment
pub const ALIAS_SUFFIX: &str = "animetlik.eth";

/// Rendered form of an author without a fragment
pub const PLACEHOLDER_ALIAS: &str = "—.animetlik.eth";

/// Shortest accepted fragment, in characters
pub const MIN_FRAGMENT_LEN: usize = 1;

/// Longest accepted fragment, in characters
pub const MAX_FRAGMENT_LEN: usize = 30;

/// Message shown next to the alias field when validation fails
pub const INVALID_FORMAT_REASON: &str = "Use 1–30 chars: a–z, 0–9, hyphen.";

/// Errors produced by alias validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    /// The candidate is empty, too long, or has characters outside `[a-z0-9-]`
    #[error("{reason}")]
    InvalidFormat {
        /// The rejected (normalized) candidate
        candidate: String,
        /// Human-readable explanation
        reason: &'static str,
    },
}

/// A fragment that has passed [`validate`]
///
/// The only way to build one is through validation (directly or via
/// deserialization), so holding an `AliasFragment` proves the format rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AliasFragment(String);

impl AliasFragment {
    /// Get the fragment text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full alias, `<fragment>.<suffix>`
    pub fn full(&self) -> String {
        format!("{}.{}", self.0, ALIAS_SUFFIX)
    }
}

impl fmt::Display for AliasFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AliasFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AliasFragment {
    type Error = AliasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&normalize(&value))
    }
}

impl TryFrom<&str> for AliasFragment {
    type Error = AliasError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate(&normalize(value))
    }
}

impl From<AliasFragment> for String {
    fn from(fragment: AliasFragment) -> Self {
        fragment.0
    }
}

/// Trim surrounding whitespace and lowercase
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Accept a candidate made only of `[a-z0-9-]`, 1 to 30 characters long
///
/// The candidate is checked as given; call [`normalize`] first to accept
/// mixed-case or padded input.
pub fn validate(candidate: &str) -> Result<AliasFragment, AliasError> {
    let len = candidate.chars().count();
    let in_range = (MIN_FRAGMENT_LEN..=MAX_FRAGMENT_LEN).contains(&len);

    if in_range && candidate.chars().all(is_fragment_char) {
        Ok(AliasFragment(candidate.to_string()))
    } else {
        Err(AliasError::InvalidFormat {
            candidate: candidate.to_string(),
            reason: INVALID_FORMAT_REASON,
        })
    }
}

fn is_fragment_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Render a fragment for display
///
/// Case-folds without validating. An absent or blank fragment renders as
/// [`PLACEHOLDER_ALIAS`].
pub fn render(fragment: Option<&str>) -> String {
    match fragment.map(str::trim) {
        Some(f) if !f.is_empty() => format!("{}.{}", f.to_lowercase(), ALIAS_SUFFIX),
        _ => PLACEHOLDER_ALIAS.to_string(),
    }
}

/// The full alias worth copying, or `None` when only the placeholder exists
pub fn copyable(fragment: Option<&str>) -> Option<String> {
    fragment
        .filter(|f| !f.trim().is_empty())
        .map(|f| render(Some(f)))
}

/// In-progress edit of one author's alias
///
/// Holds the text being typed and the last validation error. The draft
/// starts from the saved fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDraft {
    text: String,
    error: Option<AliasError>,
}

impl AliasDraft {
    /// Start editing from the currently saved fragment
    pub fn new(saved: Option<AliasFragment>) -> Self {
        Self {
            text: saved.map(String::from).unwrap_or_default(),
            error: None,
        }
    }

    /// Replace the draft text, lowercasing it and clearing any error
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_lowercase();
        self.error = None;
    }

    /// Current draft text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last validation error, if the previous commit failed
    pub fn error(&self) -> Option<&AliasError> {
        self.error.as_ref()
    }

    /// Live preview of the full alias
    pub fn preview(&self) -> String {
        render(Some(&self.text))
    }

    /// Validate the draft; on failure the error is also kept on the draft
    pub fn commit(&mut self) -> Result<AliasFragment, AliasError> {
        match validate(&normalize(&self.text)) {
            Ok(fragment) => {
                self.error = None;
                Ok(fragment)
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }
}
