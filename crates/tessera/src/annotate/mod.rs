//! The three annotation stages.
//!
//! - **Cells** (CEA): resolve targeted cell text to knowledge-base entities
//! - **Column types** (CTA): majority-vote a semantic type per column from
//!   the resolved entities' declared types
//! - **Column relations** (CPA): majority-vote a relation per column pair
//!   from entities co-occurring on the same rows
//!
//! Cell annotation runs first; both aggregation stages consume its complete
//! output and are independent of each other.

mod annotation;
mod cells;
mod column_types;
mod relations;
mod resolver;
mod vote;

pub use annotation::{
    CellAnnotation, ColumnKey, ColumnPairKey, ColumnPairRelationAnnotation, ColumnTypeAnnotation,
};
pub use cells::{CellAnnotator, CellReport};
pub use column_types::{ColumnTypeReport, TypeAggregator};
pub use relations::{RelationAggregator, RelationReport};
pub use resolver::EntityResolver;
pub use vote::VoteCounter;
