//! Key-value persistence for ledger snapshots.
//!
//! The engine never sees a `Store`. Command handlers load a snapshot through it, hand plain values
//! to the engine and save the result.

use crate::{utils, Result};
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::trace;

pub const TICKETS_KEY: &str = "tickets";
pub const CATALOGUE_KEY: &str = "ticket_catalogue";
pub const FUEL_KEY: &str = "fuel";

/// A string key-value store.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Loads the JSON document stored under `key`, or `T::default()` if nothing is stored.
pub async fn load_json<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    match store.get(key).await? {
        Some(json) => serde_json::from_str(&json)
            .with_context(|| format!("Unable to parse the stored '{key}' data")),
        None => Ok(T::default()),
    }
}

/// Serializes `value` to JSON and stores it under `key`.
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized + Sync,
    S: Store + ?Sized,
{
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Unable to serialize the '{key}' data"))?;
    store.set(key, json).await
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            bail!("Invalid store key '{key}'")
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        trace!("Reading {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path(key)?;
        trace!("Writing {}", path.display());
        utils::write(&path, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        utils::remove_file(&path).await
    }
}

/// An in-memory store, for callers that keep state elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_data<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> Result<T> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| anyhow!("The memory store lock is poisoned"))?;
        Ok(f(&mut *guard))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_data(|data| data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.with_data(|data| {
            let _ = data.insert(key.to_string(), value);
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.with_data(|data| {
            let _ = data.remove(key);
        })
    }
}
