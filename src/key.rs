//! Lock key namespacing.

use std::fmt;

/// Prefix applied to every caller key before it reaches the store.
pub const KEY_PREFIX: &str = "LOCK_";

/// A caller-supplied lock key together with its store-visible form.
///
/// The prefix is applied once, at construction, so the store key is a pure
/// function of the caller key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
    name: String,
    store_key: String,
}

impl LockKey {
    /// Namespace a caller key.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let store_key = format!("{}{}", KEY_PREFIX, name);
        Self { name, store_key }
    }

    /// The key as the caller supplied it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key as sent to the store.
    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    /// Recover the caller key from a store key, if it carries the prefix.
    pub fn from_store_key(store_key: &str) -> Option<Self> {
        store_key
            .strip_prefix(KEY_PREFIX)
            .map(|name| Self::new(name.to_string()))
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
