use std::fmt;

#[derive(Debug)]
pub enum PrepareError {
    /// A required column is absent from an input table.
    ColumnMissing { table: &'static str, column: String },
    /// An input table has fewer columns than the step can work with.
    TooFewColumns { table: &'static str, expected: usize },
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnMissing { table, column } => {
                write!(f, "{table} table: missing column '{column}'")
            }
            Self::TooFewColumns { table, expected } => {
                write!(f, "{table} table: needs at least {expected} columns")
            }
        }
    }
}

impl std::error::Error for PrepareError {}
