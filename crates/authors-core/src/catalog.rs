//! Base author catalog
//!
//! The catalog is the ordered list of authors the store starts from. It
//! comes either from the built-in sample data or from a JSON file holding
//! an array of authors. Ids must be unique; alias fragments are validated
//! while parsing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::alias::validate;
use crate::config::Config;
use crate::models::Author;

/// Errors building a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two authors share an id
    #[error("Duplicate author id '{0}' in catalog")]
    DuplicateId(String),

    /// Catalog JSON could not be parsed
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog file could not be read
    #[error("Failed to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered, id-unique sequence of base authors
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    authors: Vec<Author>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(authors: Vec<Author>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for author in &authors {
            if !seen.insert(author.id.as_str()) {
                return Err(CatalogError::DuplicateId(author.id.clone()));
            }
        }
        Ok(Self { authors })
    }

    /// Parse a JSON array of authors
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let authors: Vec<Author> = serde_json::from_str(json)?;
        Self::new(authors)
    }

    /// Load a JSON catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Catalog named by the configuration, or the sample catalog
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => Self::load(path),
            None => Ok(Self::sample()),
        }
    }

    /// Built-in sample catalog
    pub fn sample() -> Self {
        let authors = vec![
            Author {
                id: "a1".to_string(),
                name: "Akira Tanaka".to_string(),
                alias_fragment: validate("akira").ok(),
                bio: "Dark fantasy writer building parallel worlds.".to_string(),
                follower_count: 12450,
                joined_at: sample_date(2024, 8, 11),
                tags: vec!["fantasy".into(), "isekai".into(), "+16".into()],
            },
            Author {
                id: "a2".to_string(),
                name: "Mina Kobayashi".to_string(),
                alias_fragment: validate("mina").ok(),
                bio: "Slice of life with a musical heart. Coffee lover.".to_string(),
                follower_count: 8420,
                joined_at: sample_date(2025, 1, 9),
                tags: vec!["slice of life".into(), "music".into()],
            },
            Author {
                id: "a3".to_string(),
                name: "Haru Sakamoto".to_string(),
                alias_fragment: validate("haru").ok(),
                bio: "Action & cyberpunk with relentless pacing.".to_string(),
                follower_count: 15890,
                joined_at: sample_date(2024, 5, 22),
                tags: vec!["action".into(), "cyberpunk".into()],
            },
            Author {
                id: "a4".to_string(),
                name: "Lucía Morita".to_string(),
                alias_fragment: validate("lucia").ok(),
                bio: "Teen romance with traditional illustration.".to_string(),
                follower_count: 6790,
                joined_at: sample_date(2025, 3, 1),
                tags: vec!["romance".into(), "school".into()],
            },
        ];
        Self { authors }
    }

    /// Authors in catalog order
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Take ownership of the authors
    pub fn into_authors(self) -> Vec<Author> {
        self.authors
    }

    /// Number of authors
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

fn sample_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
