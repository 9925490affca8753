use tracing::warn;
use trainbridge_recon::slots::DateCodec;
use trainbridge_table::Table;

use crate::error::PrepareError;
use crate::StepOutput;

/// Columns the cleansed report keeps, in output order.
pub const REPORT_COLUMNS: [&str; 6] = [
    "Position ID",
    "Payroll Name",
    "Course Name Description",
    "Start Date",
    "Recertification Date",
    "Acquired Date",
];

// Positions within REPORT_COLUMNS.
const START: usize = 3;
const RECERT: usize = 4;
const ACQUIRED: usize = 5;

/// Project an activity report down to the migration columns and apply the
/// date-hygiene rules:
/// - a start date alone is kept as is;
/// - a start date plus an acquired date without a recertification clears
///   both recertification and acquired;
/// - a start date plus a recertification: a later recertification stamps the
///   start date in as acquired, an equal or earlier one clears both fields.
/// Rows without a start date, or whose dates cannot be parsed, pass through
/// unchanged (the latter with a warning).
pub fn cleanse(report: &Table, codec: &DateCodec) -> Result<StepOutput, PrepareError> {
    let required: Vec<String> = REPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
    if let Some(missing) = report.missing_columns(&required).first() {
        return Err(PrepareError::ColumnMissing {
            table: "report",
            column: missing.to_string(),
        });
    }

    let mut out = Table::new(required);
    let mut warnings = Vec::new();

    for row in 0..report.len() {
        let mut values: Vec<String> = REPORT_COLUMNS
            .iter()
            .map(|col| report.value(row, col).unwrap_or("").trim().to_string())
            .collect();

        let has_start = !values[START].is_empty();
        let has_recert = !values[RECERT].is_empty();
        let has_acquired = !values[ACQUIRED].is_empty();

        if has_start && has_acquired && !has_recert {
            values[RECERT].clear();
            values[ACQUIRED].clear();
        } else if has_start && has_recert {
            match (codec.parse(&values[START]), codec.parse(&values[RECERT])) {
                (Some(start), Some(recert)) if recert > start => {
                    values[ACQUIRED] = codec.format(start);
                }
                (Some(_), Some(_)) => {
                    values[RECERT].clear();
                    values[ACQUIRED].clear();
                }
                _ => {
                    warn!(row = row + 1, "unparseable date in report row, kept as is");
                    warnings.push(format!(
                        "row {}: unparseable start/recertification date, row kept as is",
                        row + 1
                    ));
                }
            }
        }

        out.push_row(values);
    }

    Ok(StepOutput {
        table: out,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
