//! Knowledge-base service trait and configuration.

use crate::error::Result;

/// Configuration for knowledge-base services.
#[derive(Debug, Clone)]
pub struct KbConfig {
    /// Entity search endpoint (MediaWiki API).
    pub search_endpoint: String,

    /// SPARQL query endpoint.
    pub sparql_endpoint: String,

    /// Language used for entity search.
    pub language: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "https://www.wikidata.org/w/api.php".to_string(),
            sparql_endpoint: "https://query.wikidata.org/sparql".to_string(),
            language: "en".to_string(),
            user_agent: "tessera/0.1 (table annotation)".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Trait for knowledge-base lookup services.
///
/// Implementations must be thread-safe (Send + Sync) so a single service can
/// back every annotation stage, including behind a shared cache.
///
/// All three lookups return `Err` only for transport-level failures (network,
/// timeout, malformed response). "Nothing found" is an empty `Ok` result and
/// is a perfectly ordinary outcome.
pub trait KbService: Send + Sync {
    /// Search for entities matching free text, best candidate first.
    fn search(&self, text: &str) -> Result<Vec<String>>;

    /// List the declared type identifiers of an entity.
    fn types_of(&self, entity: &str) -> Result<Vec<String>>;

    /// List the direct relation identifiers connecting two entities.
    ///
    /// The pair is unordered: implementations must report a relation
    /// regardless of which argument is its subject.
    fn relations_between(&self, first: &str, second: &str) -> Result<Vec<String>>;

    /// Get the configuration for this service.
    fn config(&self) -> &KbConfig;

    /// Get the name of this service (for logging/debugging).
    fn name(&self) -> &str;
}
