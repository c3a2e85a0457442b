//! Process-local store.

use super::StoreConnection;
use super::record::owner_string;
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Claim {
    owner: String,
    expires_at: Option<Instant>,
}

impl Claim {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// In-memory store with per-key expiry.
///
/// The map mutex is held only for the duration of one claim or release, which
/// makes each round-trip atomic the same way a server-side script would be.
#[derive(Debug)]
pub struct MemoryStore {
    owner: String,
    claims: Mutex<HashMap<String, Claim>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_owner(owner_string())
    }

    /// Create a store that records `owner` as the value of each claim.
    pub fn with_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            claims: Mutex::new(HashMap::new()),
        }
    }

    /// Owner of the live claim on `key`, if any.
    pub fn holder(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|claim| claim.is_live(now))
            .map(|claim| claim.owner.clone())
    }

    /// Number of live claims.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|claim| claim.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Claim>> {
        self.claims
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConnection for MemoryStore {
    fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut claims = self.lock();

        // Drop expired claims
        claims.retain(|_, claim| claim.is_live(now));

        if claims.contains_key(key) {
            return Ok(false);
        }

        claims.insert(
            key.to_string(),
            Claim {
                owner: self.owner.clone(),
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(true)
    }

    fn release(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}
