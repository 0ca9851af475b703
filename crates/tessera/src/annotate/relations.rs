//! Column-pair relation aggregation (the CPA stage).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::kb::KbService;

use super::annotation::{CellAnnotation, ColumnPairKey, ColumnPairRelationAnnotation};
use super::vote::VoteCounter;

/// Outcome counts for a relation aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationReport {
    /// Tables with at least one cell annotation.
    pub tables: usize,
    /// Tables skipped for having fewer than two annotated columns.
    pub tables_skipped: usize,
    /// Column pairs examined.
    pub pairs: usize,
    /// Column pairs that received a relation annotation.
    pub annotated: usize,
    /// Relation lookups that failed at the transport level.
    pub lookup_failures: usize,
}

/// Derives one relation per column pair by majority vote.
///
/// This is the densest stage of the pipeline: every unordered pair of
/// annotated columns is examined against every annotated row, so the lookup
/// volume is quadratic in columns. Run it behind a [`crate::kb::CachedKb`] -
/// the same entity pair recurs across rows and tables.
pub struct RelationAggregator<'a> {
    kb: &'a dyn KbService,
}

impl<'a> RelationAggregator<'a> {
    /// Create an aggregator.
    pub fn new(kb: &'a dyn KbService) -> Self {
        Self { kb }
    }

    /// Aggregate cell annotations into column-pair relation annotations.
    ///
    /// Tables with fewer than two annotated columns are skipped: no relation
    /// can be inferred from a single column. A lookup failure for one row
    /// pair loses that vote only; the column pair and table carry on.
    pub fn aggregate(
        &self,
        annotations: &[CellAnnotation],
    ) -> (Vec<ColumnPairRelationAnnotation>, RelationReport) {
        // Per table: (row, column) -> entity.
        let mut tables: BTreeMap<&str, BTreeMap<(usize, usize), &str>> = BTreeMap::new();
        for ann in annotations {
            tables
                .entry(ann.target.table_id.as_str())
                .or_default()
                .insert((ann.target.row, ann.target.column), ann.entity.as_str());
        }

        let mut report = RelationReport {
            tables: tables.len(),
            ..RelationReport::default()
        };

        let mut results = Vec::new();
        for (table_id, cells) in &tables {
            let columns: BTreeSet<usize> = cells.keys().map(|&(_, col)| col).collect();
            if columns.len() < 2 {
                report.tables_skipped += 1;
                continue;
            }

            let rows: BTreeSet<usize> = cells.keys().map(|&(row, _)| row).collect();

            for &c1 in &columns {
                for &c2 in columns.range((c1 + 1)..) {
                    report.pairs += 1;

                    let mut votes = VoteCounter::new();
                    for &row in &rows {
                        let (Some(&e1), Some(&e2)) =
                            (cells.get(&(row, c1)), cells.get(&(row, c2)))
                        else {
                            continue;
                        };

                        match self.kb.relations_between(e1, e2) {
                            Ok(relations) => votes.extend(relations),
                            Err(_) => report.lookup_failures += 1,
                        }
                    }

                    if let Some(relation) = votes.into_winner() {
                        results.push(ColumnPairRelationAnnotation {
                            key: ColumnPairKey::new(*table_id, c1, c2),
                            relation,
                        });
                        report.annotated += 1;
                    }
                }
            }
        }

        (results, report)
    }
}

#[cfg(test)]
mod tests {
    use crate::input::CellTarget;
    use crate::kb::MockKbService;

    use super::*;

    fn ann(table: &str, col: usize, row: usize, entity: &str) -> CellAnnotation {
        CellAnnotation::new(CellTarget::new(table, col, row), entity)
    }

    #[test]
    fn test_capital_country_relation() {
        let kb = MockKbService::new()
            .with_relation("Q90", "Q142", &["P1376"])
            .with_relation("Q64", "Q183", &["P1376"]);
        let aggregator = RelationAggregator::new(&kb);

        let annotations = vec![
            ann("T2", 0, 0, "Q90"),
            ann("T2", 1, 0, "Q142"),
            ann("T2", 0, 1, "Q64"),
            ann("T2", 1, 1, "Q183"),
        ];
        let (results, report) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, ColumnPairKey::new("T2", 0, 1));
        assert_eq!(results[0].relation, "P1376");
        assert_eq!(report.pairs, 1);
        assert_eq!(report.annotated, 1);
    }

    #[test]
    fn test_single_column_table_is_skipped() {
        let kb = MockKbService::new();
        let aggregator = RelationAggregator::new(&kb);

        let annotations = vec![ann("T1", 0, 0, "Q90"), ann("T1", 0, 1, "Q64")];
        let (results, report) = aggregator.aggregate(&annotations);

        assert!(results.is_empty());
        assert_eq!(report.tables_skipped, 1);
        assert_eq!(kb.calls().relations, 0);
    }

    #[test]
    fn test_rows_missing_one_side_cast_no_vote() {
        let kb = MockKbService::new().with_relation("Q90", "Q142", &["P1376"]);
        let aggregator = RelationAggregator::new(&kb);

        let annotations = vec![
            ann("T2", 0, 0, "Q90"),
            ann("T2", 1, 0, "Q142"),
            // Row 1 only annotated on one side.
            ann("T2", 0, 1, "Q64"),
        ];
        let (results, _) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 1);
        assert_eq!(kb.calls().relations, 1);
    }

    #[test]
    fn test_majority_relation_wins() {
        let kb = MockKbService::new()
            .with_relation("Q90", "Q142", &["P1376"])
            .with_relation("Q64", "Q183", &["P1376"])
            .with_relation("Q1490", "Q17", &["P131"]);
        let aggregator = RelationAggregator::new(&kb);

        let annotations = vec![
            ann("T2", 0, 0, "Q90"),
            ann("T2", 1, 0, "Q142"),
            ann("T2", 0, 1, "Q64"),
            ann("T2", 1, 1, "Q183"),
            ann("T2", 0, 2, "Q1490"),
            ann("T2", 1, 2, "Q17"),
        ];
        let (results, _) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relation, "P1376");
    }

    #[test]
    fn test_three_columns_make_three_pairs() {
        let kb = MockKbService::new().with_relation("Q90", "Q142", &["P1376"]);
        let aggregator = RelationAggregator::new(&kb);

        let annotations = vec![
            ann("T2", 0, 0, "Q90"),
            ann("T2", 1, 0, "Q142"),
            ann("T2", 2, 0, "Q8"),
        ];
        let (results, report) = aggregator.aggregate(&annotations);

        assert_eq!(report.pairs, 3);
        // Only the capital/country pair has a relation.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, ColumnPairKey::new("T2", 0, 1));
    }

    #[test]
    fn test_lookup_failure_loses_one_vote_only() {
        let kb = MockKbService::new()
            .fail_entity("Q64")
            .with_relation("Q90", "Q142", &["P1376"]);
        let aggregator = RelationAggregator::new(&kb);

        let annotations = vec![
            ann("T2", 0, 0, "Q90"),
            ann("T2", 1, 0, "Q142"),
            ann("T2", 0, 1, "Q64"),
            ann("T2", 1, 1, "Q183"),
        ];
        let (results, report) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relation, "P1376");
        assert_eq!(report.lookup_failures, 1);
    }
}
