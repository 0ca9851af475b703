//! Tessera: semantic annotation of tabular data against a knowledge base.
//!
//! Tessera resolves targeted table cells to knowledge-base entities, then
//! derives a semantic type for each column and a relation for each column
//! pair by majority vote over the resolved entities.
//!
//! # Stages
//!
//! - **CEA** - cell-entity annotation: cell text to entity identifier
//! - **CTA** - column-type annotation: majority type across a column's entities
//! - **CPA** - column-pair annotation: majority relation across row-aligned
//!   entity pairs
//!
//! # Example
//!
//! ```no_run
//! use tessera::{CachedKb, DirTableLoader, Pipeline, WikidataService, read_cell_targets};
//!
//! let targets = read_cell_targets("targets/cea_targets.csv").unwrap();
//! let loader = DirTableLoader::new("tables");
//! let kb = CachedKb::new(WikidataService::new().unwrap());
//!
//! let outcome = Pipeline::new(&loader, &kb).run(&targets);
//! println!("{} cells annotated", outcome.summary.cells.annotated);
//! ```

pub mod annotate;
pub mod error;
pub mod input;
pub mod kb;
pub mod output;
pub mod score;

mod pipeline;

pub use annotate::{
    CellAnnotation, CellAnnotator, CellReport, ColumnKey, ColumnPairKey,
    ColumnPairRelationAnnotation, ColumnTypeAnnotation, ColumnTypeReport, EntityResolver,
    RelationAggregator, RelationReport, TypeAggregator, VoteCounter,
};
pub use error::{Result, TesseraError};
pub use input::{CellTarget, DataTable, DirTableLoader, TableLoader, read_cell_targets};
pub use kb::{CacheStats, CachedKb, KbConfig, KbService, MockKbService, WikidataService};
pub use output::{
    CEA_FILE, CPA_FILE, CTA_FILE, WIKIDATA_ENTITY_NS, result_paths, write_cell_annotations,
    write_column_relations, write_column_types,
};
pub use pipeline::{Pipeline, RunOutcome, RunSummary};
pub use score::{ScoreReport, Task, score_file};
