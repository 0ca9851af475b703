//! Knowledge-base lookup services.
//!
//! The annotation stages only ever see the [`KbService`] trait, which covers
//! the three capabilities the pipeline needs: entity search, type listing,
//! and relation listing. Shipped implementations:
//!
//! - **Wikidata** - entity search via the `wbsearchentities` API, types and
//!   relations via the SPARQL query service
//! - **Mock** - programmable in-memory fixture for tests and dry runs
//!
//! Wrap any service in [`CachedKb`] to avoid repeat network round-trips for
//! repeated cell strings and entity pairs.

mod cache;
mod mock;
mod service;
mod wikidata;

pub use cache::{CacheStats, CachedKb};
pub use mock::{MockCallCounts, MockKbService};
pub use service::{KbConfig, KbService};
pub use wikidata::WikidataService;
