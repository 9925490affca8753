use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{CourseSlot, SlotOutcome};
use crate::slots::DateCodec;

/// Audit log column order. Fixed so review tooling can rely on position:
/// identity and decision first, then merged, reference, compare slot state.
pub const HEADER: [&str; 24] = [
    "employee_id",
    "first_name",
    "last_name",
    "slot",
    "course",
    "updated",
    "reason",
    "new_status",
    "new_started",
    "new_finished",
    "new_deadline",
    "new_expires",
    "ref_status",
    "ref_started",
    "ref_finished",
    "ref_deadline",
    "ref_expires",
    "cmp_status",
    "cmp_started",
    "cmp_finished",
    "cmp_deadline",
    "cmp_expires",
    "row",
    "logged_at",
];

/// One line per evaluated, non-empty slot, whether or not it was updated.
/// Both source slots are kept as extracted, before any gap-filling, so every
/// decision can be reconstructed by hand.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub employee: String,
    pub first_name: String,
    pub last_name: String,
    pub slot: usize,
    pub course: String,
    pub updated: bool,
    pub reason: &'static str,
    pub merged: CourseSlot,
    pub reference: CourseSlot,
    pub compare: CourseSlot,
    pub row: usize,
    pub logged_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        employee: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        slot: usize,
        row: usize,
        outcome: SlotOutcome,
    ) -> Self {
        let SlotOutcome {
            updated,
            reason,
            merged,
            compare,
            reference,
        } = outcome;
        Self {
            employee: employee.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            slot,
            course: compare.name.clone(),
            updated,
            reason,
            merged,
            reference,
            compare,
            row,
            logged_at: Utc::now(),
        }
    }

    /// Render one record in `HEADER` order.
    pub fn to_record(&self, codec: &DateCodec) -> Vec<String> {
        let mut record = Vec::with_capacity(HEADER.len());
        record.push(self.employee.clone());
        record.push(self.first_name.clone());
        record.push(self.last_name.clone());
        record.push(self.slot.to_string());
        record.push(self.course.clone());
        record.push(if self.updated { "yes" } else { "no" }.into());
        record.push(self.reason.to_string());
        for slot in [&self.merged, &self.reference, &self.compare] {
            record.push(slot.status.label().into());
            record.push(codec.render(slot.started));
            record.push(codec.render(slot.finished));
            record.push(codec.render(slot.deadline));
            record.push(codec.render(slot.expires));
        }
        record.push(self.row.to_string());
        record.push(self.logged_at.to_rfc3339_opts(SecondsFormat::Secs, true));
        record
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
