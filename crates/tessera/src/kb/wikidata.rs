//! Wikidata service implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::{Result, TesseraError};

use super::service::{KbConfig, KbService};

/// Wikidata-backed knowledge-base service.
///
/// Entity search goes through the `wbsearchentities` MediaWiki API; type and
/// relation listings go through the SPARQL query service. Every call is a
/// blocking request with the configured timeout.
pub struct WikidataService {
    client: Client,
    config: KbConfig,
}

/// Response shape of `wbsearchentities`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}

/// Response shape of a SPARQL SELECT query.
#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl WikidataService {
    /// Create a service with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(KbConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(config: KbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TesseraError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|e| TesseraError::Config(format!("Invalid user agent: {}", e)))?,
        );
        Ok(headers)
    }

    /// Run a SPARQL SELECT query and return the binding values of `var`.
    fn sparql_values(&self, query: &str, var: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.config.sparql_endpoint)
            .headers(self.build_headers()?)
            .query(&[("query", query), ("format", "json")])
            .send()
            .map_err(|e| TesseraError::Lookup(format!("SPARQL request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TesseraError::Lookup(format!(
                "SPARQL error ({})",
                response.status()
            )));
        }

        let parsed: SparqlResponse = response
            .json()
            .map_err(|e| TesseraError::Lookup(format!("Failed to parse SPARQL response: {}", e)))?;

        let values = parsed
            .results
            .bindings
            .into_iter()
            .filter_map(|mut binding| {
                binding
                    .remove(var)
                    .and_then(|v| v.get("value").and_then(|s| s.as_str().map(String::from)))
            })
            .collect();

        Ok(values)
    }
}

/// Extract the bare identifier from an entity/property IRI.
fn iri_tail(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}

impl KbService for WikidataService {
    fn search(&self, text: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.config.search_endpoint)
            .headers(self.build_headers()?)
            .query(&[
                ("action", "wbsearchentities"),
                ("format", "json"),
                ("language", self.config.language.as_str()),
                ("type", "item"),
                ("search", text),
            ])
            .send()
            .map_err(|e| TesseraError::Lookup(format!("Entity search failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TesseraError::Lookup(format!(
                "Entity search error ({})",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .map_err(|e| TesseraError::Lookup(format!("Failed to parse search response: {}", e)))?;

        Ok(parsed.search.into_iter().map(|hit| hit.id).collect())
    }

    fn types_of(&self, entity: &str) -> Result<Vec<String>> {
        let query = format!(
            "SELECT ?type WHERE {{ wd:{} wdt:P31 ?type . }}",
            entity
        );

        let values = self.sparql_values(&query, "type")?;
        Ok(values.iter().map(|iri| iri_tail(iri).to_string()).collect())
    }

    fn relations_between(&self, first: &str, second: &str) -> Result<Vec<String>> {
        // UNION over both directions keeps the pair genuinely unordered.
        let query = format!(
            "SELECT ?p WHERE {{ {{ wd:{a} ?p wd:{b} . }} UNION {{ wd:{b} ?p wd:{a} . }} }}",
            a = first,
            b = second
        );

        let values = self.sparql_values(&query, "p")?;
        Ok(values
            .iter()
            .filter(|iri| iri.contains("/prop/direct/"))
            .map(|iri| iri_tail(iri).to_string())
            .collect())
    }

    fn config(&self) -> &KbConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "wikidata"
    }
}
