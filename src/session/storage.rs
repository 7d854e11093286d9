//! Persistent key/value storage for the operator session
//!
//! A small JSON file plays the role of browser local storage: the session
//! token and the language preference live under fixed keys. Every write
//! persists the whole map through a temporary file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};
use crate::utils::errors::Result;

/// File-backed key/value store
#[derive(Debug)]
pub struct SessionStorage {
    /// Backing file; `None` keeps values in memory only
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl SessionStorage {
    /// Open the storage file, treating a missing file as empty storage
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            debug!(path = %path.display(), "Storage file not found, starting empty");
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    /// Storage that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Read a value
    pub fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    /// Write a value and persist
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    /// Remove a value and persist
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&values)
    }

    /// Backing file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(values)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, serialized)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            warn!(path = %path.display(), error = %e, "Failed to replace storage file");
            return Err(e.into());
        }

        debug!(path = %path.display(), keys = values.len(), "Storage persisted");
        Ok(())
    }
}
