//! Lookup cache: memoizes knowledge-base queries for the lifetime of a run.
//!
//! The same cell string, entity, or entity pair recurs constantly across a
//! benchmark dataset; the relation stage alone re-touches the same pair once
//! per row. [`CachedKb`] wraps any [`KbService`] and remembers every
//! successful outcome, including empty ones, so a known miss is never
//! re-queried. Failures are not cached: a transient transport error should
//! not poison the key for the rest of the run.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TesseraError};

use super::service::{KbConfig, KbService};

/// Hit/miss counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Queries answered from the cache.
    pub hits: usize,
    /// Queries that went through to the underlying service.
    pub misses: usize,
}

/// Serialized form of the cache contents.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheSnapshot {
    search: HashMap<String, Vec<String>>,
    types: HashMap<String, Vec<String>>,
    relations: Vec<(String, String, Vec<String>)>,
}

/// Caching decorator over a knowledge-base service.
///
/// Locks are held only for map access, never across a network call. Under
/// concurrent use two callers missing the same key may both query the
/// underlying service; the later result overwrites the earlier one
/// (call-and-overwrite).
pub struct CachedKb<S> {
    inner: S,
    search: Mutex<HashMap<String, Vec<String>>>,
    types: Mutex<HashMap<String, Vec<String>>>,
    relations: Mutex<HashMap<(String, String), Vec<String>>>,
    stats: Mutex<CacheStats>,
}

impl<S: KbService> CachedKb<S> {
    /// Wrap a service with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            search: Mutex::new(HashMap::new()),
            types: Mutex::new(HashMap::new()),
            relations: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Access the wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Hit/miss counters accumulated so far.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap()
    }

    /// Number of cached entries across all capabilities.
    pub fn len(&self) -> usize {
        self.search.lock().unwrap().len()
            + self.types.lock().unwrap().len()
            + self.relations.lock().unwrap().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Preload the cache from a JSON file written by [`CachedKb::save`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            TesseraError::Persistence(format!("Failed to open cache '{}': {}", path.display(), e))
        })?;

        let snapshot: CacheSnapshot =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                TesseraError::Persistence(format!(
                    "Failed to parse cache '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        *self.search.lock().unwrap() = snapshot.search;
        *self.types.lock().unwrap() = snapshot.types;
        *self.relations.lock().unwrap() = snapshot
            .relations
            .into_iter()
            .map(|(a, b, rels)| ((a, b), rels))
            .collect();

        Ok(())
    }

    /// Save the cache contents to a JSON file for reuse by later runs.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let snapshot = CacheSnapshot {
            search: self.search.lock().unwrap().clone(),
            types: self.types.lock().unwrap().clone(),
            relations: self
                .relations
                .lock()
                .unwrap()
                .iter()
                .map(|((a, b), rels)| (a.clone(), b.clone(), rels.clone()))
                .collect(),
        };

        let file = File::create(path).map_err(|e| {
            TesseraError::Persistence(format!("Failed to create cache '{}': {}", path.display(), e))
        })?;

        serde_json::to_writer(BufWriter::new(file), &snapshot).map_err(|e| {
            TesseraError::Persistence(format!("Failed to serialize cache: {}", e))
        })?;

        Ok(())
    }

    fn record_hit(&self) {
        self.stats.lock().unwrap().hits += 1;
    }

    fn record_miss(&self) {
        self.stats.lock().unwrap().misses += 1;
    }
}

/// Normalize an entity pair to its unordered cache key.
fn pair_key(first: &str, second: &str) -> (String, String) {
    if first <= second {
        (first.to_string(), second.to_string())
    } else {
        (second.to_string(), first.to_string())
    }
}

impl<S: KbService> KbService for CachedKb<S> {
    fn search(&self, text: &str) -> Result<Vec<String>> {
        if let Some(cached) = self.search.lock().unwrap().get(text) {
            self.record_hit();
            return Ok(cached.clone());
        }

        self.record_miss();
        let result = self.inner.search(text)?;
        self.search
            .lock()
            .unwrap()
            .insert(text.to_string(), result.clone());
        Ok(result)
    }

    fn types_of(&self, entity: &str) -> Result<Vec<String>> {
        if let Some(cached) = self.types.lock().unwrap().get(entity) {
            self.record_hit();
            return Ok(cached.clone());
        }

        self.record_miss();
        let result = self.inner.types_of(entity)?;
        self.types
            .lock()
            .unwrap()
            .insert(entity.to_string(), result.clone());
        Ok(result)
    }

    fn relations_between(&self, first: &str, second: &str) -> Result<Vec<String>> {
        let key = pair_key(first, second);

        if let Some(cached) = self.relations.lock().unwrap().get(&key) {
            self.record_hit();
            return Ok(cached.clone());
        }

        self.record_miss();
        let result = self.inner.relations_between(first, second)?;
        self.relations.lock().unwrap().insert(key, result.clone());
        Ok(result)
    }

    fn config(&self) -> &KbConfig {
        self.inner.config()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
