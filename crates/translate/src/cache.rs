//! Durable translation cache over a pluggable string store.

use crate::error::CacheIoError;
use crate::lang::Lang;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage slot holding the serialized cache map.
pub const CACHE_SLOT: &str = "tabtrans_translation_cache_v1";

/// A durable string key-value store.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheIoError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheIoError>;
}

/// In-process store, mostly for tests and `--no-cache` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheIoError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheIoError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file mapping slot names to strings.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<HashMap<String, String>, CacheIoError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheIoError> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheIoError> {
        let mut slots = self.read_slots().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "replacing unreadable store file");
            HashMap::new()
        });
        slots.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(&slots)?)?;
        Ok(())
    }
}

/// Build the cache key for a source/target pair and text.
#[must_use]
pub fn cache_key(from: Lang, to: Lang, text: &str) -> String {
    format!("{}->{}::{}", from.code(), to.code(), text)
}

/// Translation map persisted as one JSON document in a [`KvStore`] slot.
///
/// Loaded lazily on first use. Storage failures never surface: unreadable
/// data loads as an empty map and failed writes leave the in-memory map
/// intact, both logged as warnings.
#[derive(Debug)]
pub struct TranslationCache<S: KvStore> {
    store: S,
    entries: Option<HashMap<String, String>>,
}

impl<S: KvStore> TranslationCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_slot(&self) -> HashMap<String, String> {
        let raw = match self.store.get(CACHE_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "translation cache unreadable, starting empty");
                return HashMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "translation cache corrupt, starting empty");
            HashMap::new()
        })
    }

    /// Load entries from the store, replacing anything held in memory.
    pub fn load(&mut self) {
        let entries = self.read_slot();
        tracing::debug!(entries = entries.len(), "loaded translation cache");
        self.entries = Some(entries);
    }

    fn entries(&mut self) -> &mut HashMap<String, String> {
        if self.entries.is_none() {
            self.load();
        }
        self.entries.get_or_insert_with(HashMap::new)
    }

    pub fn get(&mut self, from: Lang, to: Lang, text: &str) -> Option<String> {
        self.entries().get(&cache_key(from, to, text)).cloned()
    }

    /// Record a translation and persist immediately.
    pub fn insert(&mut self, from: Lang, to: Lang, text: &str, value: &str) {
        self.entries()
            .insert(cache_key(from, to, text), value.to_string());
        self.save();
    }

    /// Persist as a union with whatever the store currently holds.
    ///
    /// Entries written by another cache on the same store survive; on key
    /// conflicts the in-memory value wins.
    pub fn save(&mut self) {
        let mut merged = self.read_slot();
        merged.extend(self.entries().drain());

        let result = serde_json::to_string(&merged)
            .map_err(CacheIoError::from)
            .and_then(|raw| self.store.set(CACHE_SLOT, &raw));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist translation cache");
        }
        self.entries = Some(merged);
    }

    pub fn len(&mut self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_key_format() {
        assert_eq!(cache_key(Lang::En, Lang::Zh, "cat"), "en->zh::cat");
    }

    #[test]
    fn test_memory_roundtrip() {
        let mut cache = TranslationCache::new(MemoryStore::new());
        assert!(cache.is_empty());
        cache.insert(Lang::En, Lang::Zh, "cat", "猫");

        assert_eq!(cache.get(Lang::En, Lang::Zh, "cat").as_deref(), Some("猫"));
        assert_eq!(cache.get(Lang::Zh, Lang::En, "cat"), None);
        let raw = cache.store().get(CACHE_SLOT).unwrap().unwrap();
        assert!(raw.contains("en->zh::cat"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let mut first = TranslationCache::new(JsonFileStore::new(&path));
        first.insert(Lang::En, Lang::Zh, "dog", "狗");

        let mut second = TranslationCache::new(JsonFileStore::new(&path));
        assert_eq!(second.get(Lang::En, Lang::Zh, "dog").as_deref(), Some("狗"));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_interleaved_writers_union() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut a = TranslationCache::new(JsonFileStore::new(&path));
        let mut b = TranslationCache::new(JsonFileStore::new(&path));
        a.load();
        b.load();
        a.insert(Lang::En, Lang::Zh, "one", "一");
        b.insert(Lang::En, Lang::Zh, "two", "二");

        let mut fresh = TranslationCache::new(JsonFileStore::new(&path));
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh.get(Lang::En, Lang::Zh, "one").as_deref(), Some("一"));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json").unwrap();

        let mut cache = TranslationCache::new(JsonFileStore::new(&path));
        assert!(cache.is_empty());
        cache.insert(Lang::En, Lang::Ja, "hi", "やあ");

        let mut reloaded = TranslationCache::new(JsonFileStore::new(&path));
        assert_eq!(reloaded.get(Lang::En, Lang::Ja, "hi").as_deref(), Some("やあ"));
    }

    #[test]
    fn test_corrupt_slot_value_degrades_to_empty() {
        let mut store = MemoryStore::new();
        store.set(CACHE_SLOT, "[1, 2").unwrap();
        let mut cache = TranslationCache::new(store);
        assert_eq!(cache.len(), 0);
    }
}
