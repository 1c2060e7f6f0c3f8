//! In-process store backend.
//!
//! Used by the test suite and for smoke-running the harness without a
//! server. Mimics a real backend's addressing constraints by rejecting
//! keys that could not be encoded on a wire: empty keys and keys with an
//! interior NUL are `InvalidKey`.

use crate::{Store, StoreError, StoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check_key(key: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
                reason: "empty key".to_owned(),
            });
        }
        if key.contains('\0') {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
                reason: "key contains NUL byte".to_owned(),
            });
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        Self::check_key(key)?;
        self.entries
            .write()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<String> {
        Self::check_key(key)?;
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }
}
