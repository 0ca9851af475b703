//! Mock knowledge-base service for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{Result, TesseraError};

use super::service::{KbConfig, KbService};

/// Counts of lookup calls that reached the mock, by capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCallCounts {
    pub search: usize,
    pub types: usize,
    pub relations: usize,
}

/// Programmable in-memory service with predictable responses.
///
/// Used by tests and by the CLI's `--kb mock` choice for offline dry runs.
/// Unknown inputs return empty results; inputs registered via the `fail_*`
/// builders return a lookup error instead, for exercising failure counting.
pub struct MockKbService {
    config: KbConfig,
    entities: HashMap<String, Vec<String>>,
    types: HashMap<String, Vec<String>>,
    relations: HashMap<(String, String), Vec<String>>,
    failing_searches: HashSet<String>,
    failing_entities: HashSet<String>,
    calls: Mutex<MockCallCounts>,
}

impl MockKbService {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self {
            config: KbConfig::default(),
            entities: HashMap::new(),
            types: HashMap::new(),
            relations: HashMap::new(),
            failing_searches: HashSet::new(),
            failing_entities: HashSet::new(),
            calls: Mutex::new(MockCallCounts::default()),
        }
    }

    /// Register search candidates for a text value, best first.
    pub fn with_entity(mut self, text: impl Into<String>, candidates: &[&str]) -> Self {
        self.entities.insert(
            text.into(),
            candidates.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Register the declared types of an entity.
    pub fn with_types(mut self, entity: impl Into<String>, types: &[&str]) -> Self {
        self.types
            .insert(entity.into(), types.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Register the direct relations between two entities (unordered).
    pub fn with_relation(
        mut self,
        first: impl Into<String>,
        second: impl Into<String>,
        relations: &[&str],
    ) -> Self {
        self.relations.insert(
            pair_key(&first.into(), &second.into()),
            relations.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Make searches for a text value fail with a lookup error.
    pub fn fail_search(mut self, text: impl Into<String>) -> Self {
        self.failing_searches.insert(text.into());
        self
    }

    /// Make type/relation lookups touching an entity fail.
    pub fn fail_entity(mut self, entity: impl Into<String>) -> Self {
        self.failing_entities.insert(entity.into());
        self
    }

    /// Number of calls that reached this mock, by capability.
    pub fn calls(&self) -> MockCallCounts {
        *self.calls.lock().unwrap()
    }
}

impl Default for MockKbService {
    fn default() -> Self {
        Self::new()
    }
}

fn pair_key(first: &str, second: &str) -> (String, String) {
    if first <= second {
        (first.to_string(), second.to_string())
    } else {
        (second.to_string(), first.to_string())
    }
}

impl KbService for MockKbService {
    fn search(&self, text: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().search += 1;
        if self.failing_searches.contains(text) {
            return Err(TesseraError::Lookup(format!("mock search failure: {}", text)));
        }
        Ok(self.entities.get(text).cloned().unwrap_or_default())
    }

    fn types_of(&self, entity: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().types += 1;
        if self.failing_entities.contains(entity) {
            return Err(TesseraError::Lookup(format!("mock type failure: {}", entity)));
        }
        Ok(self.types.get(entity).cloned().unwrap_or_default())
    }

    fn relations_between(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().relations += 1;
        if self.failing_entities.contains(first) || self.failing_entities.contains(second) {
            return Err(TesseraError::Lookup(format!(
                "mock relation failure: {} / {}",
                first, second
            )));
        }
        Ok(self
            .relations
            .get(&pair_key(first, second))
            .cloned()
            .unwrap_or_default())
    }

    fn config(&self) -> &KbConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
