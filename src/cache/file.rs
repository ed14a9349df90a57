//! Directory-backed cache store: one `<key>.json` file per entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::cache::{CacheError, CacheStore};
use crate::error::{Result, RouteError};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    /// Open a store over an existing directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(RouteError::InvalidCacheLocation(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{EXTENSION}"))
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> std::result::Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, blob: &[u8]) -> std::result::Result<(), CacheError> {
        fs::write(self.path_for(key), blob)?;
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn delete(&self, key: &str) -> std::result::Result<bool, CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
