use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::AuditEntry;

// ---------------------------------------------------------------------------
// Slot status
// ---------------------------------------------------------------------------

/// Progress state of one course slot. Unrecognized labels and blank cells
/// both read as `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    NotStarted,
    InProgress,
    Passed,
}

impl SlotStatus {
    /// Parse a status cell. Matching is case-insensitive and tolerant of
    /// surrounding whitespace; anything unrecognized is `NotStarted`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "passed" => Self::Passed,
            "in progress" | "in_progress" => Self::InProgress,
            _ => Self::NotStarted,
        }
    }

    /// Canonical output label, as written back into status columns.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Passed => "Passed",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Course slot
// ---------------------------------------------------------------------------

/// One course slot lifted out of its row. Absent dates stay `None`; the
/// sentinel scrub happens at extraction, so a populated field here is real.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseSlot {
    pub name: String,
    pub status: SlotStatus,
    pub started: Option<NaiveDate>,
    pub finished: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub expires: Option<NaiveDate>,
}

impl CourseSlot {
    /// True when the slot carries no course at all (blank name cell).
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Slot outcome
// ---------------------------------------------------------------------------

/// Decision for a single evaluated slot: the merged state to write back,
/// plus both inputs as extracted, for the audit trail.
#[derive(Debug, Clone)]
pub struct SlotOutcome {
    pub updated: bool,
    pub reason: &'static str,
    pub merged: CourseSlot,
    pub compare: CourseSlot,
    pub reference: CourseSlot,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// A cell that failed to parse. The slot is skipped, not the row.
#[derive(Debug, Clone, Serialize)]
pub struct SlotWarning {
    pub employee: String,
    pub row: usize,
    pub slot: usize,
    pub side: &'static str,
    pub field: String,
    pub value: String,
}

impl std::fmt::Display for SlotWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "employee {} row {} slot {}: unparseable {} value {:?} in {}",
            self.employee, self.row, self.slot, self.field, self.value, self.side
        )
    }
}

// ---------------------------------------------------------------------------
// Summary + report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub slots_evaluated: usize,
    pub slots_updated: usize,
    pub slots_errored: usize,
}

/// Everything a run produces besides the in-place table mutation.
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub audit: Vec<AuditEntry>,
    pub warnings: Vec<SlotWarning>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
