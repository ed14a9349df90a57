//! In-process cache store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{CacheError, CacheStore};

/// Blobs kept in a shared map. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map still holds whole blobs; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), CacheError> {
        self.lock().insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock().remove(key).is_some())
    }
}
