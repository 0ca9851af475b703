//! Cell-entity annotation (the CEA stage).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::input::{CellTarget, DataTable, TableLoader};
use crate::kb::KbService;

use super::annotation::CellAnnotation;
use super::resolver::EntityResolver;

/// Outcome counts for a cell-annotation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    /// Targets read from the target list.
    pub targets: usize,
    /// Cells successfully annotated.
    pub annotated: usize,
    /// Targets referencing a missing table or an out-of-range cell.
    pub malformed: usize,
    /// Targets whose cell text was empty after trimming.
    pub empty_cells: usize,
    /// Non-empty cells the knowledge base had no candidate for.
    pub unresolved: usize,
    /// Entity searches that failed at the transport level.
    pub lookup_failures: usize,
    /// Distinct table load attempts that failed.
    pub tables_failed: usize,
}

/// Annotates targeted cells with knowledge-base entities.
pub struct CellAnnotator<'a> {
    loader: &'a dyn TableLoader,
    kb: &'a dyn KbService,
}

impl<'a> CellAnnotator<'a> {
    /// Create an annotator.
    pub fn new(loader: &'a dyn TableLoader, kb: &'a dyn KbService) -> Self {
        Self { loader, kb }
    }

    /// Annotate the targets in input order.
    ///
    /// No per-target failure aborts the batch: missing tables, out-of-range
    /// indices, and lookup failures each degrade to "no annotation" and are
    /// counted in the report. A repeated target is processed once, keeping
    /// at most one annotation per cell.
    pub fn annotate(&self, targets: &[CellTarget]) -> (Vec<CellAnnotation>, CellReport) {
        let resolver = EntityResolver::new(self.kb);
        let mut report = CellReport {
            targets: targets.len(),
            ..CellReport::default()
        };

        let mut annotations = Vec::new();
        let mut seen: HashSet<&CellTarget> = HashSet::new();

        // Target lists arrive grouped by table, so memoizing the last load
        // avoids re-parsing the same file for each of its targets. A failed
        // load is memoized too: one bad table costs one attempt, not one
        // per target.
        let mut current: Option<(String, Option<DataTable>)> = None;

        for target in targets {
            if !seen.insert(target) {
                continue;
            }

            if current.as_ref().map(|(id, _)| id.as_str()) != Some(target.table_id.as_str()) {
                let loaded = match self.loader.load(&target.table_id) {
                    Ok(table) => Some(table),
                    Err(_) => {
                        report.tables_failed += 1;
                        None
                    }
                };
                current = Some((target.table_id.clone(), loaded));
            }

            let Some((_, Some(table))) = &current else {
                report.malformed += 1;
                continue;
            };

            let Some(text) = table.cell(target.row, target.column) else {
                report.malformed += 1;
                continue;
            };

            if text.trim().is_empty() {
                report.empty_cells += 1;
                continue;
            }

            match resolver.resolve(text) {
                Ok(Some(entity)) => {
                    annotations.push(CellAnnotation::new(target.clone(), entity));
                    report.annotated += 1;
                }
                Ok(None) => report.unresolved += 1,
                Err(_) => report.lookup_failures += 1,
            }
        }

        (annotations, report)
    }
}
