//! Storage collaborator: a synchronous key-value store of JSON documents.

mod memory;
mod sqlite;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub const ACTIVE_SESSION_KEY: &str = "desem_active_session";
pub const HISTORY_KEY: &str = "desem_history";
pub const DEFAULT_CONFIG_KEY: &str = "desem_default_config";
pub const PRESETS_KEY: &str = "desem_presets";
pub const ACTIVE_RECIPE_KEY: &str = "desem_active_recipe";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .with_context(|| format!("failed to decode '{key}'")),
        None => Ok(None),
    }
}

pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).with_context(|| format!("failed to encode '{key}'"))?;
    store.set(key, &raw)
}
