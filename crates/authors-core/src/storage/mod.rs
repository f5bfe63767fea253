//! Storage layer
//!
//! Follow state and alias overrides are persisted through a small
//! string key-value interface, [`KeyValueStore`].
//!
//! ## Keys
//!
//! | Record | Key | Value |
//! |---|---|---|
//! | Follow state | `authors:follows:v1` | JSON object, author id to boolean |
//! | Alias override | `authors:ensPrefix:<id>` | validated lowercase fragment |
//!
//! ## Backends
//!
//! - [`FileStore`]: one JSON file, replaced atomically on every write
//! - [`MemoryStore`]: in-process map with failure injection, for tests

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key of the aggregate follow-state record
pub const FOLLOW_KEY: &str = "authors:follows:v1";

/// Prefix of per-author alias override keys
pub const ALIAS_KEY_PREFIX: &str = "authors:ensPrefix:";

/// Key of the alias override record for one author
pub fn alias_key(author_id: &str) -> String {
    format!("{}{}", ALIAS_KEY_PREFIX, author_id)
}

/// String key-value persistence used by the store
///
/// A read of a missing key is `Ok(None)`, not an error.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}
