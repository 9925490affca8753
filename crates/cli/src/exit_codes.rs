//! CLI exit code registry
//!
//! Single source of truth for exit codes. They are part of the shell
//! contract; wrapper scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error (I/O, unexpected)                 |
//! | 2    | Usage error (bad arguments, unknown format)     |
//! | 3    | Run configuration unreadable or invalid         |
//! | 4    | Dataset schema error (missing key/slot columns) |
//! | 5    | Input file did not parse                        |

use trainbridge_io::IoError;
use trainbridge_recon::ReconError;

/// Success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error. Prefer a specific code where one exists.
pub const EXIT_ERROR: u8 = 1;

/// Usage error: bad arguments or an unsupported file format.
pub const EXIT_USAGE: u8 = 2;

/// The run configuration failed to parse or validate.
pub const EXIT_CONFIG: u8 = 3;

/// A dataset is missing its key field or slot columns.
pub const EXIT_SCHEMA: u8 = 4;

/// An input file could not be parsed.
pub const EXIT_PARSE: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::KeyFieldMissing { .. } | ReconError::SlotColumnMissing { .. } => EXIT_SCHEMA,
    }
}

/// Map a file error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Csv(_)
        | IoError::ExcelRead(_)
        | IoError::EmptyWorkbook(_)
        | IoError::NoHeader(_) => EXIT_PARSE,
        IoError::UnsupportedFormat(_) => EXIT_USAGE,
        IoError::Io(_) | IoError::ExcelWrite(_) => EXIT_ERROR,
    }
}
