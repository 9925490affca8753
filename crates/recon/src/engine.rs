use tracing::{info, warn};
use trainbridge_table::Table;

use crate::audit::AuditEntry;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::index::KeyIndex;
use crate::model::{CourseSlot, RunReport, RunSummary, SlotWarning};
use crate::rules::RuleSet;
use crate::slots::{self, DateCodec, SlotFields};

/// Reconcile `compare` against `reference`, mutating `compare` in place.
/// Row order is preserved; unmatched rows pass through untouched.
/// Persistence of both the table and the audit trail stays with the caller.
pub fn run(
    config: &ReconConfig,
    compare: &mut Table,
    reference: &Table,
) -> Result<RunReport, ReconError> {
    run_with_progress(config, compare, reference, |_, _| {})
}

/// Like [`run`] with a callback after each compare row (done, total), for
/// progress reporting. The callback sees counts only, never the tables.
pub fn run_with_progress(
    config: &ReconConfig,
    compare: &mut Table,
    reference: &Table,
    mut on_row: impl FnMut(usize, usize),
) -> Result<RunReport, ReconError> {
    let layout: Vec<SlotFields> = (1..=config.dataset.slot_count).map(SlotFields::new).collect();
    validate_schema("compare", compare, config, &layout)?;
    validate_schema("reference", reference, config, &layout)?;

    let codec = DateCodec::new(&config.dates);
    let rules = RuleSet::from_config(config);
    let index = KeyIndex::build(reference, &config.dataset.key_field);
    info!(
        rows = compare.len(),
        reference_rows = reference.len(),
        indexed = index.len(),
        slots = layout.len(),
        strategy = %config.rules.strategy,
        "reconciliation started"
    );

    let mut summary = RunSummary {
        rows: compare.len(),
        ..RunSummary::default()
    };
    let mut audit = Vec::new();
    let mut warnings: Vec<SlotWarning> = Vec::new();
    let total = compare.len();

    for row in 0..total {
        let key = compare
            .value(row, &config.dataset.key_field)
            .unwrap_or("")
            .trim()
            .to_string();
        let Some(ref_row) = index.lookup(&key) else {
            summary.unmatched += 1;
            on_row(row + 1, total);
            continue;
        };
        summary.matched += 1;
        let first_name = compare
            .value(row, &config.dataset.first_name_field)
            .unwrap_or("")
            .to_string();
        let last_name = compare
            .value(row, &config.dataset.last_name_field)
            .unwrap_or("")
            .to_string();

        for fields in &layout {
            let compare_slot =
                match slots::extract(compare, row, fields, &codec, &config.sentinels) {
                    Ok(Some(slot)) => slot,
                    // Empty slot: never reconciled, never logged.
                    Ok(None) => continue,
                    Err(err) => {
                        record_warning(&mut warnings, &mut summary, &key, row, fields, "compare", err);
                        continue;
                    }
                };
            let reference_slot =
                match slots::extract(reference, ref_row, fields, &codec, &config.sentinels) {
                    Ok(Some(slot)) => slot,
                    // No course upstream reads as "no information".
                    Ok(None) => CourseSlot::default(),
                    Err(err) => {
                        record_warning(
                            &mut warnings,
                            &mut summary,
                            &key,
                            row,
                            fields,
                            "reference",
                            err,
                        );
                        continue;
                    }
                };

            summary.slots_evaluated += 1;
            let outcome = rules.reconcile(&compare_slot, &reference_slot);
            if outcome.updated {
                slots::apply(compare, row, fields, &outcome.merged, &codec);
                summary.slots_updated += 1;
            }
            audit.push(AuditEntry::new(
                key.as_str(),
                first_name.as_str(),
                last_name.as_str(),
                fields.slot,
                row + 1,
                outcome,
            ));
        }
        on_row(row + 1, total);
    }

    info!(
        matched = summary.matched,
        unmatched = summary.unmatched,
        evaluated = summary.slots_evaluated,
        updated = summary.slots_updated,
        errored = summary.slots_errored,
        "reconciliation finished"
    );
    Ok(RunReport {
        summary,
        audit,
        warnings,
    })
}

fn validate_schema(
    dataset: &'static str,
    table: &Table,
    config: &ReconConfig,
    layout: &[SlotFields],
) -> Result<(), ReconError> {
    if !table.has_column(&config.dataset.key_field) {
        return Err(ReconError::KeyFieldMissing {
            dataset,
            field: config.dataset.key_field.clone(),
        });
    }
    for fields in layout {
        for column in fields.columns() {
            if !table.has_column(column) {
                return Err(ReconError::SlotColumnMissing {
                    dataset,
                    slot: fields.slot,
                    column: column.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn record_warning(
    warnings: &mut Vec<SlotWarning>,
    summary: &mut RunSummary,
    key: &str,
    row: usize,
    fields: &SlotFields,
    side: &'static str,
    err: slots::SlotParseError,
) {
    warn!(
        employee = key,
        row = row + 1,
        slot = fields.slot,
        side,
        field = %err.field,
        value = %err.value,
        "unparseable date, slot skipped"
    );
    warnings.push(SlotWarning {
        employee: key.to_string(),
        row: row + 1,
        slot: fields.slot,
        side,
        field: err.field,
        value: err.value,
    });
    summary.slots_errored += 1;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
