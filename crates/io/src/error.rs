use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

/// Failure cases for loading and saving tables and the audit log.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("{}: workbook has no sheets", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("{}: no header row", .0.display())]
    NoHeader(PathBuf),

    #[error("{}: unsupported file format", .0.display())]
    UnsupportedFormat(PathBuf),
}
