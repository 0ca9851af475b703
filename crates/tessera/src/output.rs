//! Result-set emission.
//!
//! Each annotation task writes one header-less CSV file of fixed-width
//! records, with identifiers expanded to fully qualified URIs. Records are
//! sorted by key before writing so a re-run over the same inputs is
//! byte-identical.

use std::fs;
use std::path::{Path, PathBuf};

use crate::annotate::{CellAnnotation, ColumnPairRelationAnnotation, ColumnTypeAnnotation};
use crate::error::{Result, TesseraError};

/// Namespace prepended to bare identifiers in the output files.
pub const WIKIDATA_ENTITY_NS: &str = "http://www.wikidata.org/entity/";

/// Default file names for the three result sets.
pub const CEA_FILE: &str = "CEA.csv";
pub const CTA_FILE: &str = "CTA.csv";
pub const CPA_FILE: &str = "CPA.csv";

fn create_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                TesseraError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = fs::File::create(path).map_err(|e| TesseraError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file))
}

/// Write cell annotations as `(table, column, row, entity URI)` records.
pub fn write_cell_annotations(
    path: impl AsRef<Path>,
    annotations: &[CellAnnotation],
    namespace: &str,
) -> Result<()> {
    let mut sorted: Vec<&CellAnnotation> = annotations.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.target.table_id, a.target.column, a.target.row)
            .cmp(&(&b.target.table_id, b.target.column, b.target.row))
    });

    let mut writer = create_writer(path.as_ref())?;
    for ann in sorted {
        writer.write_record(&[
            ann.target.table_id.clone(),
            ann.target.column.to_string(),
            ann.target.row.to_string(),
            format!("{}{}", namespace, ann.entity),
        ])?;
    }
    writer.flush().map_err(|e| TesseraError::Io {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Write column types as `(table, column, type URI)` records.
pub fn write_column_types(
    path: impl AsRef<Path>,
    annotations: &[ColumnTypeAnnotation],
    namespace: &str,
) -> Result<()> {
    let mut sorted: Vec<&ColumnTypeAnnotation> = annotations.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    let mut writer = create_writer(path.as_ref())?;
    for ann in sorted {
        writer.write_record(&[
            ann.key.table_id.clone(),
            ann.key.column.to_string(),
            format!("{}{}", namespace, ann.type_id),
        ])?;
    }
    writer.flush().map_err(|e| TesseraError::Io {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Write column-pair relations as `(table, column, column, relation URI)` records.
pub fn write_column_relations(
    path: impl AsRef<Path>,
    annotations: &[ColumnPairRelationAnnotation],
    namespace: &str,
) -> Result<()> {
    let mut sorted: Vec<&ColumnPairRelationAnnotation> = annotations.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    let mut writer = create_writer(path.as_ref())?;
    for ann in sorted {
        writer.write_record(&[
            ann.key.table_id.clone(),
            ann.key.first.to_string(),
            ann.key.second.to_string(),
            format!("{}{}", namespace, ann.relation),
        ])?;
    }
    writer.flush().map_err(|e| TesseraError::Io {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Paths of the three result files inside an output directory.
pub fn result_paths(dir: impl AsRef<Path>) -> (PathBuf, PathBuf, PathBuf) {
    let dir = dir.as_ref();
    (
        dir.join(CEA_FILE),
        dir.join(CTA_FILE),
        dir.join(CPA_FILE),
    )
}

#[cfg(test)]
mod tests {
    use crate::annotate::{ColumnKey, ColumnPairKey};
    use crate::input::CellTarget;

    use super::*;

    #[test]
    fn test_cell_output_is_sorted_and_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CEA.csv");

        let annotations = vec![
            CellAnnotation::new(CellTarget::new("T1", 0, 2), "Q90"),
            CellAnnotation::new(CellTarget::new("T1", 0, 1), "Q64"),
        ];
        write_cell_annotations(&path, &annotations, WIKIDATA_ENTITY_NS).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "T1,0,1,http://www.wikidata.org/entity/Q64\n\
             T1,0,2,http://www.wikidata.org/entity/Q90\n"
        );
    }

    #[test]
    fn test_empty_result_set_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CTA.csv");

        write_column_types(&path, &[], WIKIDATA_ENTITY_NS).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_output_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/outputs/CPA.csv");

        let annotations = vec![ColumnPairRelationAnnotation {
            key: ColumnPairKey::new("T2", 0, 1),
            relation: "P1376".to_string(),
        }];
        write_column_relations(&path, &annotations, WIKIDATA_ENTITY_NS).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "T2,0,1,http://www.wikidata.org/entity/P1376\n");
    }

    #[test]
    fn test_column_type_record_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CTA.csv");

        let annotations = vec![ColumnTypeAnnotation {
            key: ColumnKey::new("T1", 0),
            type_id: "Q515".to_string(),
        }];
        write_column_types(&path, &annotations, WIKIDATA_ENTITY_NS).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "T1,0,http://www.wikidata.org/entity/Q515\n");
    }
}
