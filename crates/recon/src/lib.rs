//! Training-record reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, mutates the compare table
//! in place, returns the audit trail and run summary. No CLI or file I/O
//! dependencies.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod rules;
pub mod slots;

pub use audit::AuditEntry;
pub use config::{ReconConfig, RuleStrategy};
pub use engine::{run, run_with_progress};
pub use error::ReconError;
pub use model::{CourseSlot, RunReport, RunSummary, SlotStatus};
