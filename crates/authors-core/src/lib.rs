//! Authors Core Library
//!
//! This crate provides the core of the authors directory: a catalog of
//! content creators, the user's follow state, and per-author alias
//! overrides, all persisted through a small key-value interface.
//!
//! # Architecture
//!
//! - **Catalog**: the base authors, fixed for the session
//! - **Store**: source of truth for the session; writes every change through
//!   a [`KeyValueStore`] before applying it in memory
//! - **Query engine**: pure filter and sort over the store's authors
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = Store::initialize(Catalog::from_config(&config)?, FileStore::from_config(&config)?);
//!
//! store.toggle_followed("a1")?;
//! let visible = store.query("fantasy", SortMode::Popular);
//! ```
//!
//! # Modules
//!
//! - `alias`: alias fragment normalization, validation and rendering
//! - `catalog`: base author catalog
//! - `models`: data structures for authors, follow state and sort modes
//! - `query`: filtering, sorting and memoized views
//! - `storage`: key-value persistence
//! - `store`: the entity store (main entry point)
//! - `config`: application configuration

pub mod alias;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

pub use alias::{AliasDraft, AliasError, AliasFragment, ALIAS_SUFFIX};
pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use models::{Author, FollowState, ParseSortModeError, SortMode};
pub use query::QueryCache;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::Store;
