//! Input parsing: benchmark target lists and the tables they reference.

mod table;
mod targets;

pub use table::{DataTable, DirTableLoader, TableLoader};
pub use targets::{CellTarget, read_cell_targets};
