//! Upstream pipeline that turns an HR activity report into the wide
//! bulk-update layout the reconciliation step consumes.
//!
//! Three pure table-to-table steps, run in order:
//! cleanse (column projection + date hygiene), transform (course and user
//! joins into upload rows), transfer (pivot to one row per employee).
//! No file I/O here; loading and saving belong to the caller.

pub mod cleanse;
pub mod error;
pub mod transfer;
pub mod transform;

pub use cleanse::cleanse;
pub use error::PrepareError;
pub use transfer::{template, transfer, wide_headers};
pub use transform::transform;

use trainbridge_table::Table;

/// Result of one pipeline step: the produced table plus any per-row
/// conditions worth surfacing without failing the step.
#[derive(Debug)]
pub struct StepOutput {
    pub table: Table,
    pub warnings: Vec<String>,
}
