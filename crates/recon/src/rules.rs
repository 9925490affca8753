use chrono::{Datelike, NaiveDate};

use crate::config::{ReconConfig, RuleStrategy};
use crate::model::{CourseSlot, SlotOutcome, SlotStatus};

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// The per-slot decision algorithm. Pure: given both extracted slots it
/// returns the merged slot, the update flag, and a reason for the audit
/// trail. The compare side is local intent; the reference side may override
/// only with more progress or newer completion data, never a regression.
#[derive(Debug, Clone)]
pub struct RuleSet {
    strategy: RuleStrategy,
    open_ended_year: i32,
}

impl RuleSet {
    pub fn new(strategy: RuleStrategy, open_ended_year: i32) -> Self {
        Self {
            strategy,
            open_ended_year,
        }
    }

    pub fn from_config(config: &ReconConfig) -> Self {
        Self::new(config.rules.strategy, config.sentinels.open_ended_year)
    }

    pub fn reconcile(&self, compare: &CourseSlot, reference: &CourseSlot) -> SlotOutcome {
        let (updated, reason, merged) = match self.strategy {
            RuleStrategy::StatusAware => self.status_aware(compare, reference),
            RuleStrategy::NewerStartOnly => self.newer_start_only(compare, reference),
        };
        SlotOutcome {
            updated,
            reason,
            merged,
            compare: compare.clone(),
            reference: reference.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // status_aware: the full decision table
    // -----------------------------------------------------------------------

    fn status_aware(
        &self,
        compare: &CourseSlot,
        reference: &CourseSlot,
    ) -> (bool, &'static str, CourseSlot) {
        use SlotStatus::*;
        match (compare.status, reference.status) {
            (Passed, Passed) => {
                let filled = self.fill_reference_dates(reference, compare);
                match (filled.finished, compare.finished) {
                    (Some(theirs), Some(ours)) if theirs > ours => {
                        let mut merged = compare.clone();
                        merged.started = filled.started;
                        merged.finished = filled.finished;
                        merged.expires = filled.expires;
                        (true, "reference completion newer", merged)
                    }
                    (Some(theirs), Some(ours)) if theirs == ours => {
                        (false, "completion dates match", compare.clone())
                    }
                    (Some(_), Some(_)) => (false, "reference completion older", compare.clone()),
                    _ => (false, "completion dates incomplete", compare.clone()),
                }
            }
            (Passed, _) => (false, "already passed, reference behind", compare.clone()),
            (NotStarted, Passed) => {
                let filled = self.fill_reference_dates(reference, compare);
                let mut merged = compare.clone();
                merged.status = Passed;
                merged.started = filled.started;
                merged.finished = filled.finished;
                merged.expires = filled.expires;
                (true, "promoted to passed", merged)
            }
            (NotStarted, InProgress) => {
                let mut merged = compare.clone();
                merged.status = InProgress;
                merged.started = reference.started;
                merged.deadline = reference.deadline;
                (true, "in progress adopted", merged)
            }
            (NotStarted, NotStarted) => (false, "no progress either side", compare.clone()),
            // Undefined combination: left alone deliberately, but still
            // audited so the gap is visible.
            (InProgress, _) => (false, "in progress locally, no rule applies", compare.clone()),
        }
    }

    // -----------------------------------------------------------------------
    // newer_start_only: legacy strict variant
    // -----------------------------------------------------------------------

    fn newer_start_only(
        &self,
        compare: &CourseSlot,
        reference: &CourseSlot,
    ) -> (bool, &'static str, CourseSlot) {
        match (reference.started, compare.started) {
            (Some(theirs), Some(ours)) if theirs > ours => {
                let mut merged = compare.clone();
                merged.status = reference.status;
                merged.started = reference.started;
                merged.finished = reference.finished;
                merged.expires = reference.expires;
                (true, "reference start newer", merged)
            }
            (Some(_), Some(_)) => (false, "reference start not newer", compare.clone()),
            _ => (false, "start dates incomplete", compare.clone()),
        }
    }

    // -----------------------------------------------------------------------
    // Date gap-filling
    // -----------------------------------------------------------------------

    /// Mirror-fill an absent reference start/finish from the one that is
    /// present; with neither present, adopt the compare side's dates
    /// wholesale. An expiration still absent afterwards is derived.
    fn fill_reference_dates(&self, reference: &CourseSlot, compare: &CourseSlot) -> CourseSlot {
        let mut filled = reference.clone();
        match (filled.started, filled.finished) {
            (None, Some(finish)) => filled.started = Some(finish),
            (Some(start), None) => filled.finished = Some(start),
            (None, None) => {
                filled.started = compare.started;
                filled.finished = compare.finished;
                filled.expires = compare.expires;
            }
            (Some(_), Some(_)) => {}
        }
        if filled.expires.is_none() {
            filled.expires = self.derive_expiration(filled.finished, compare);
        }
        filled
    }

    /// An open-ended expiration carries over unchanged; anything else keeps
    /// the compare side's validity period, re-anchored to the new finish.
    /// Absent inputs leave the expiration absent.
    fn derive_expiration(
        &self,
        finished: Option<NaiveDate>,
        compare: &CourseSlot,
    ) -> Option<NaiveDate> {
        let expires = compare.expires?;
        if expires.year() == self.open_ended_year {
            return Some(expires);
        }
        let span = expires.signed_duration_since(compare.finished?);
        finished?.checked_add_signed(span)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
