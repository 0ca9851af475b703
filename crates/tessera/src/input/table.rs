//! Table loading for annotation.
//!
//! Benchmark tables are plain CSV files without a header convention: the
//! target lists index the physical first line as row 0, so rows are kept
//! exactly as they appear in the file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{Result, TesseraError};

/// Parsed tabular data, immutable once loaded.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Row data as strings (row-major order, no header row split off).
    rows: Vec<Vec<String>>,
    /// Widest row seen, used for column bounds checks on ragged data.
    width: usize,
}

impl DataTable {
    /// Create a table from raw rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self { rows, width }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.width
    }

    /// Get a cell value.
    ///
    /// Returns `None` when the row or column index is out of range for the
    /// table. A ragged row that is merely shorter than the widest row yields
    /// the empty string for its missing trailing fields.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if col >= self.width {
            return None;
        }
        let row = self.rows.get(row)?;
        Some(row.get(col).map(|s| s.as_str()).unwrap_or(""))
    }
}

/// Loads a table by its benchmark identifier.
///
/// Implementations must return the table's rows exactly as stored; the
/// annotation stages treat loaded tables as immutable.
pub trait TableLoader {
    /// Load the table with the given identifier.
    fn load(&self, table_id: &str) -> Result<DataTable>;
}

/// Loads `<dir>/<table_id>.csv` files from a dataset directory.
pub struct DirTableLoader {
    dir: PathBuf,
}

impl DirTableLoader {
    /// Create a loader rooted at the given tables directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table_id: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table_id))
    }
}

impl TableLoader for DirTableLoader {
    fn load(&self, table_id: &str) -> Result<DataTable> {
        let path = self.table_path(table_id);

        let file = File::open(&path).map_err(|e| TesseraError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if rows.is_empty() {
            return Err(TesseraError::EmptyData(format!(
                "No rows in table '{}'",
                table_id
            )));
        }

        Ok(DataTable::new(rows))
    }
}
