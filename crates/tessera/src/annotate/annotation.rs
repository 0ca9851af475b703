//! Annotation result types.

use serde::{Deserialize, Serialize};

use crate::input::CellTarget;

/// One resolved cell: a target and the entity its text mapped to.
///
/// At most one annotation exists per target; unresolved cells produce none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAnnotation {
    /// The annotated cell.
    pub target: CellTarget,
    /// Bare entity identifier in the knowledge base.
    pub entity: String,
}

impl CellAnnotation {
    /// Create an annotation.
    pub fn new(target: CellTarget, entity: impl Into<String>) -> Self {
        Self {
            target,
            entity: entity.into(),
        }
    }
}

/// Grouping key for column-type aggregation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    /// Identifier of the table.
    pub table_id: String,
    /// Zero-based column index.
    pub column: usize,
}

impl ColumnKey {
    /// Create a column key.
    pub fn new(table_id: impl Into<String>, column: usize) -> Self {
        Self {
            table_id: table_id.into(),
            column,
        }
    }
}

/// The majority type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeAnnotation {
    /// The annotated column.
    pub key: ColumnKey,
    /// Bare type identifier in the knowledge base.
    pub type_id: String,
}

/// Grouping key for column-pair relation aggregation.
///
/// Pairs are unordered and represented once, with `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnPairKey {
    /// Identifier of the table.
    pub table_id: String,
    /// Lower column index of the pair.
    pub first: usize,
    /// Higher column index of the pair.
    pub second: usize,
}

impl ColumnPairKey {
    /// Create a pair key, normalizing the column order.
    pub fn new(table_id: impl Into<String>, a: usize, b: usize) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            table_id: table_id.into(),
            first,
            second,
        }
    }
}

/// The majority relation of one column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPairRelationAnnotation {
    /// The annotated column pair.
    pub key: ColumnPairKey,
    /// Bare relation identifier in the knowledge base.
    pub relation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_normalizes_order() {
        let key = ColumnPairKey::new("T1", 3, 1);
        assert_eq!(key.first, 1);
        assert_eq!(key.second, 3);
        assert_eq!(key, ColumnPairKey::new("T1", 1, 3));
    }

    #[test]
    fn test_column_key_ordering() {
        let mut keys = vec![
            ColumnKey::new("T2", 0),
            ColumnKey::new("T1", 1),
            ColumnKey::new("T1", 0),
        ];
        keys.sort();
        assert_eq!(keys[0], ColumnKey::new("T1", 0));
        assert_eq!(keys[2], ColumnKey::new("T2", 0));
    }
}
