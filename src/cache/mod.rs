//! Route snapshot caching.
//!
//! # Data Flow
//! ```text
//! handler type id
//!     → cache_key (md5 hex)
//!     → CacheStore (keyed blob: file.rs or memory.rs)
//!     → RouteCache (JSON encode/decode of the route list)
//! ```
//!
//! # Design Decisions
//! - Stores only know keys and bytes; route encoding lives in `RouteCache`
//! - Blobs are self-contained: one JSON array of routes per handler type
//! - No locking: populate the cache in a single-writer step before serving

pub mod file;
pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::routing::Route;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;

/// Errors raised by cache stores.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode route snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode route snapshot \"{key}\": {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Keyed blob persistence.
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Read the blob stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `blob` under `key`, replacing any previous blob.
    fn set(&self, key: &str, blob: &[u8]) -> Result<(), CacheError>;

    fn contains(&self, key: &str) -> bool;

    /// Remove the blob under `key`. Returns false when nothing was stored.
    fn delete(&self, key: &str) -> Result<bool, CacheError>;
}

/// Cache key for a handler type identifier: lowercase hex MD5.
pub fn cache_key(handler_id: &str) -> String {
    format!("{:x}", md5::compute(handler_id.as_bytes()))
}

/// Route lists cached per handler type.
#[derive(Debug)]
pub struct RouteCache {
    store: Box<dyn CacheStore>,
}

impl RouteCache {
    pub fn new(store: impl CacheStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn from_boxed(store: Box<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Cached routes for `handler_id`, if a snapshot exists.
    ///
    /// Decoded routes go through the same method and pattern checks as newly
    /// built ones; a snapshot holding an invalid route fails the load.
    pub fn load(&self, handler_id: &str) -> crate::Result<Option<Vec<Route>>> {
        let key = cache_key(handler_id);
        let Some(blob) = self.store.get(&key)? else {
            return Ok(None);
        };
        let routes: Vec<Route> = serde_json::from_slice(&blob).map_err(|source| CacheError::Decode {
            key: key.clone(),
            source,
        })?;
        let routes = routes
            .into_iter()
            .map(Route::restore)
            .collect::<crate::Result<Vec<_>>>()
            .inspect_err(|e| {
                tracing::warn!(handler = %handler_id, %key, error = %e, "Rejected route snapshot");
            })?;
        Ok(Some(routes))
    }

    /// Write the snapshot for `handler_id`, replacing any existing one.
    pub fn save(&self, handler_id: &str, routes: &[Route]) -> Result<(), CacheError> {
        let blob = serde_json::to_vec(routes).map_err(CacheError::Encode)?;
        self.store.set(&cache_key(handler_id), &blob)?;
        tracing::info!(handler = %handler_id, routes = routes.len(), "Saved route snapshot");
        Ok(())
    }

    /// Drop the snapshot for `handler_id`, if present.
    pub fn remove(&self, handler_id: &str) -> Result<bool, CacheError> {
        let removed = self.store.delete(&cache_key(handler_id))?;
        if removed {
            tracing::info!(handler = %handler_id, "Removed route snapshot");
        }
        Ok(removed)
    }

    pub fn contains(&self, handler_id: &str) -> bool {
        self.store.contains(&cache_key(handler_id))
    }
}
