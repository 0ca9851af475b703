//! Target list parsing.
//!
//! A cell target list is a header-less CSV with three fields per record:
//! table identifier, column index, row index. Indices are decimal text.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TesseraError};

/// One cell to annotate, as named by the benchmark's target list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellTarget {
    /// Identifier of the table the cell belongs to.
    pub table_id: String,
    /// Zero-based column index.
    pub column: usize,
    /// Zero-based row index.
    pub row: usize,
}

impl CellTarget {
    /// Create a target.
    pub fn new(table_id: impl Into<String>, column: usize, row: usize) -> Self {
        Self {
            table_id: table_id.into(),
            column,
            row,
        }
    }
}

/// Read a cell target list in file order.
///
/// An unreadable file or a record that does not fit the three-field shape is
/// fatal: without a trustworthy target list there is nothing to annotate.
pub fn read_cell_targets(path: impl AsRef<Path>) -> Result<Vec<CellTarget>> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| TesseraError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(BufReader::new(file));

    let mut targets = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        let record = result?;

        if record.len() < 3 {
            return Err(TesseraError::MalformedRecord {
                line,
                message: format!("expected 3 fields, got {}", record.len()),
            });
        }

        let column = parse_index(&record[1], line, "column")?;
        let row = parse_index(&record[2], line, "row")?;
        targets.push(CellTarget::new(record[0].to_string(), column, row));
    }

    Ok(targets)
}

fn parse_index(field: &str, line: usize, what: &str) -> Result<usize> {
    field
        .trim()
        .parse()
        .map_err(|_| TesseraError::MalformedRecord {
            line,
            message: format!("invalid {} index '{}'", what, field),
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_targets(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_targets_in_order() {
        let file = write_targets("T1,0,1\nT1,0,2\nT2,3,4\n");
        let targets = read_cell_targets(file.path()).unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], CellTarget::new("T1", 0, 1));
        assert_eq!(targets[2], CellTarget::new("T2", 3, 4));
    }

    #[test]
    fn test_bad_index_is_fatal() {
        let file = write_targets("T1,zero,1\n");
        assert!(read_cell_targets(file.path()).is_err());
    }

    #[test]
    fn test_short_record_is_fatal() {
        let file = write_targets("T1,0\n");
        assert!(read_cell_targets(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(read_cell_targets("/no/such/targets.csv").is_err());
    }
}
