use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad slot count, empty key field, etc.).
    ConfigValidation(String),
    /// The key field is absent from a dataset's header row.
    KeyFieldMissing { dataset: &'static str, field: String },
    /// A slot column named by the layout is absent from a dataset.
    SlotColumnMissing { dataset: &'static str, slot: usize, column: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::KeyFieldMissing { dataset, field } => {
                write!(f, "{dataset} dataset: missing key field '{field}'")
            }
            Self::SlotColumnMissing { dataset, slot, column } => {
                write!(f, "{dataset} dataset: slot {slot} missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
