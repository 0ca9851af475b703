//! Pipeline orchestration: cells, then types and relations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotate::{
    CellAnnotation, CellAnnotator, CellReport, ColumnPairRelationAnnotation, ColumnTypeAnnotation,
    ColumnTypeReport, RelationAggregator, RelationReport, TypeAggregator,
};
use crate::input::{CellTarget, TableLoader};
use crate::kb::KbService;

/// Per-run counts for every stage.
///
/// A completed run always yields three result sets, possibly empty; this
/// summary is what makes degraded coverage visible instead of silent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Cell-annotation stage counts.
    pub cells: CellReport,
    /// Column-type stage counts.
    pub column_types: ColumnTypeReport,
    /// Relation stage counts.
    pub relations: RelationReport,
}

impl RunSummary {
    /// Total lookup failures across all stages.
    pub fn lookup_failures(&self) -> usize {
        self.cells.lookup_failures
            + self.column_types.lookup_failures
            + self.relations.lookup_failures
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Cell-entity annotations (CEA).
    pub cells: Vec<CellAnnotation>,
    /// Column-type annotations (CTA).
    pub column_types: Vec<ColumnTypeAnnotation>,
    /// Column-pair relation annotations (CPA).
    pub relations: Vec<ColumnPairRelationAnnotation>,
    /// Per-stage counts.
    pub summary: RunSummary,
}

/// The three-stage annotation pipeline.
///
/// Stages run strictly in sequence: both aggregation stages consume the
/// complete cell-annotation output. No failure inside a stage aborts a run;
/// everything degrades locally and surfaces in the summary.
pub struct Pipeline<'a> {
    loader: &'a dyn TableLoader,
    kb: &'a dyn KbService,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over a table loader and a lookup service.
    ///
    /// Wrap the service in a [`crate::kb::CachedKb`] unless it is already
    /// memoized; the aggregation stages revisit the same entities and pairs
    /// constantly.
    pub fn new(loader: &'a dyn TableLoader, kb: &'a dyn KbService) -> Self {
        Self { loader, kb }
    }

    /// Run all three stages over a target list.
    pub fn run(&self, targets: &[CellTarget]) -> RunOutcome {
        let (cells, cell_report) = CellAnnotator::new(self.loader, self.kb).annotate(targets);
        let (column_types, type_report) = TypeAggregator::new(self.kb).aggregate(&cells);
        let (relations, relation_report) = RelationAggregator::new(self.kb).aggregate(&cells);

        RunOutcome {
            cells,
            column_types,
            relations,
            summary: RunSummary {
                finished_at: Utc::now(),
                cells: cell_report,
                column_types: type_report,
                relations: relation_report,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    use crate::input::DirTableLoader;
    use crate::kb::{CachedKb, MockKbService};

    use super::*;

    fn write_table(dir: &Path, id: &str, content: &str) {
        let mut file = File::create(dir.join(format!("{}.csv", id))).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_full_run_produces_all_three_sets() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), "T2", "Paris,France\nBerlin,Germany\n");

        let kb = MockKbService::new()
            .with_entity("Paris", &["Q90"])
            .with_entity("Berlin", &["Q64"])
            .with_entity("France", &["Q142"])
            .with_entity("Germany", &["Q183"])
            .with_types("Q90", &["Q515"])
            .with_types("Q64", &["Q515"])
            .with_types("Q142", &["Q6256"])
            .with_types("Q183", &["Q6256"])
            .with_relation("Q90", "Q142", &["P1376"])
            .with_relation("Q64", "Q183", &["P1376"]);
        let loader = DirTableLoader::new(dir.path());
        let pipeline = Pipeline::new(&loader, &kb);

        let targets = vec![
            CellTarget::new("T2", 0, 0),
            CellTarget::new("T2", 1, 0),
            CellTarget::new("T2", 0, 1),
            CellTarget::new("T2", 1, 1),
        ];
        let outcome = pipeline.run(&targets);

        assert_eq!(outcome.cells.len(), 4);
        assert_eq!(outcome.column_types.len(), 2);
        assert_eq!(outcome.relations.len(), 1);
        assert_eq!(outcome.relations[0].relation, "P1376");
        assert_eq!(outcome.summary.cells.annotated, 4);
        assert_eq!(outcome.summary.lookup_failures(), 0);
    }

    #[test]
    fn test_cache_collapses_repeat_lookups() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), "T1", "Paris\nBerlin\nParis\n");

        let kb = CachedKb::new(
            MockKbService::new()
                .with_entity("Paris", &["Q90"])
                .with_entity("Berlin", &["Q64"])
                .with_types("Q90", &["Q515"])
                .with_types("Q64", &["Q515"]),
        );
        let loader = DirTableLoader::new(dir.path());
        let pipeline = Pipeline::new(&loader, &kb);

        let targets = vec![
            CellTarget::new("T1", 0, 0),
            CellTarget::new("T1", 0, 1),
            CellTarget::new("T1", 0, 2),
        ];
        let outcome = pipeline.run(&targets);

        assert_eq!(outcome.cells.len(), 3);
        assert_eq!(outcome.column_types.len(), 1);
        // "Paris" searched once despite two occurrences; two distinct
        // entities mean two type lookups.
        assert_eq!(kb.inner().calls().search, 2);
        assert_eq!(kb.inner().calls().types, 2);
    }
}
