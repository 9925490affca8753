// File I/O operations

use std::path::Path;

use trainbridge_table::Table;

pub mod audit;
pub mod csv;
pub mod error;
pub mod xlsx;

pub use error::{IoError, Result};

/// Load a table, picking the reader from the file extension:
/// `.xlsx` via the Excel reader, `.csv`/`.tsv`/`.txt` via the delimited
/// reader (delimiter sniffed).
pub fn load_table(path: &Path) -> Result<Table> {
    match extension(path).as_deref() {
        Some("xlsx") => xlsx::read_xlsx(path),
        Some("csv") | Some("tsv") | Some("txt") => csv::read_csv(path),
        _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Save a table, picking the writer from the file extension.
/// `.tsv` writes tab-delimited, `.csv` comma-delimited, `.xlsx` a workbook.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    match extension(path).as_deref() {
        Some("xlsx") => xlsx::write_xlsx(table, path),
        Some("csv") => csv::write_csv(table, path),
        Some("tsv") => csv::write_tsv(table, path),
        _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
