//! Column-type aggregation (the CTA stage).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::kb::KbService;

use super::annotation::{CellAnnotation, ColumnKey, ColumnTypeAnnotation};
use super::vote::VoteCounter;

/// Outcome counts for a column-type aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeReport {
    /// Column groups formed from the cell annotations.
    pub columns: usize,
    /// Columns that received a type annotation.
    pub annotated: usize,
    /// Type lookups that failed at the transport level.
    pub lookup_failures: usize,
}

/// Derives one semantic type per column by majority vote.
pub struct TypeAggregator<'a> {
    kb: &'a dyn KbService,
}

impl<'a> TypeAggregator<'a> {
    /// Create an aggregator.
    pub fn new(kb: &'a dyn KbService) -> Self {
        Self { kb }
    }

    /// Aggregate cell annotations into column-type annotations.
    ///
    /// Each entity occurrence in a column contributes one vote per declared
    /// type; an entity annotated on three rows votes three times. The type
    /// set itself is fetched once per distinct entity. Columns whose
    /// entities declare no types produce no annotation.
    pub fn aggregate(
        &self,
        annotations: &[CellAnnotation],
    ) -> (Vec<ColumnTypeAnnotation>, ColumnTypeReport) {
        // Group by column, keeping each group's entities in row order so the
        // vote order (and thus tie-breaking) is deterministic.
        let mut groups: BTreeMap<ColumnKey, Vec<(usize, &str)>> = BTreeMap::new();
        for ann in annotations {
            let key = ColumnKey::new(ann.target.table_id.clone(), ann.target.column);
            groups
                .entry(key)
                .or_default()
                .push((ann.target.row, ann.entity.as_str()));
        }

        let mut report = ColumnTypeReport {
            columns: groups.len(),
            ..ColumnTypeReport::default()
        };

        let mut results = Vec::new();
        for (key, mut group) in groups {
            group.sort_by_key(|(row, _)| *row);

            // One lookup per distinct entity; a failed lookup counts once
            // and degrades to an empty type set for the rest of the group.
            let mut type_sets: HashMap<&str, Vec<String>> = HashMap::new();
            let mut votes = VoteCounter::new();

            for &(_, entity) in &group {
                if !type_sets.contains_key(entity) {
                    let types = match self.kb.types_of(entity) {
                        Ok(types) => types,
                        Err(_) => {
                            report.lookup_failures += 1;
                            Vec::new()
                        }
                    };
                    type_sets.insert(entity, types);
                }
                votes.extend(type_sets[entity].iter().cloned());
            }

            if let Some(type_id) = votes.into_winner() {
                results.push(ColumnTypeAnnotation { key, type_id });
                report.annotated += 1;
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
    fn test_unanimous_vote() {
        let kb = MockKbService::new()
            .with_types("Q90", &["Q515"])
            .with_types("Q64", &["Q515"]);
        let aggregator = TypeAggregator::new(&kb);

        let annotations = vec![ann("T1", 0, 0, "Q90"), ann("T1", 0, 1, "Q64")];
        let (results, report) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, ColumnKey::new("T1", 0));
        assert_eq!(results[0].type_id, "Q515");
        assert_eq!(report.annotated, 1);
    }

    #[test]
    fn test_majority_beats_minority() {
        let kb = MockKbService::new()
            .with_types("Q90", &["Q515"])
            .with_types("Q64", &["Q515"])
            .with_types("Q142", &["Q6256"]);
        let aggregator = TypeAggregator::new(&kb);

        let annotations = vec![
            ann("T1", 0, 0, "Q142"),
            ann("T1", 0, 1, "Q90"),
            ann("T1", 0, 2, "Q64"),
        ];
        let (results, _) = aggregator.aggregate(&annotations);

        assert_eq!(results[0].type_id, "Q515");
    }

    #[test]
    fn test_repeated_entity_votes_per_occurrence() {
        // Two rows of Q90 outvote one row of Q142 even though the distinct
        // entity counts are equal.
        let kb = MockKbService::new()
            .with_types("Q90", &["Q515"])
            .with_types("Q142", &["Q6256"]);
        let aggregator = TypeAggregator::new(&kb);

        let annotations = vec![
            ann("T1", 0, 0, "Q142"),
            ann("T1", 0, 1, "Q90"),
            ann("T1", 0, 2, "Q90"),
        ];
        let (results, _) = aggregator.aggregate(&annotations);

        assert_eq!(results[0].type_id, "Q515");
        assert_eq!(kb.calls().types, 2);
    }

    #[test]
    fn test_typeless_column_emits_nothing() {
        let kb = MockKbService::new();
        let aggregator = TypeAggregator::new(&kb);

        let annotations = vec![ann("T1", 0, 0, "Q90")];
        let (results, report) = aggregator.aggregate(&annotations);

        assert!(results.is_empty());
        assert_eq!(report.columns, 1);
        assert_eq!(report.annotated, 0);
    }

    #[test]
    fn test_lookup_failure_degrades_to_no_votes() {
        let kb = MockKbService::new()
            .fail_entity("Q90")
            .with_types("Q64", &["Q515"]);
        let aggregator = TypeAggregator::new(&kb);

        let annotations = vec![ann("T1", 0, 0, "Q90"), ann("T1", 0, 1, "Q64")];
        let (results, report) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].type_id, "Q515");
        assert_eq!(report.lookup_failures, 1);
    }

    #[test]
    fn test_columns_are_grouped_separately() {
        let kb = MockKbService::new()
            .with_types("Q90", &["Q515"])
            .with_types("Q142", &["Q6256"]);
        let aggregator = TypeAggregator::new(&kb);

        let annotations = vec![ann("T1", 0, 0, "Q90"), ann("T1", 1, 0, "Q142")];
        let (results, _) = aggregator.aggregate(&annotations);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].key, ColumnKey::new("T1", 0));
        assert_eq!(results[0].type_id, "Q515");
        assert_eq!(results[1].key, ColumnKey::new("T1", 1));
        assert_eq!(results[1].type_id, "Q6256");
    }
}
