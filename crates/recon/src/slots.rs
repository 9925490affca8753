use chrono::NaiveDate;
use trainbridge_table::Table;

use crate::config::{DateConfig, SentinelConfig};
use crate::model::{CourseSlot, SlotStatus};

// ---------------------------------------------------------------------------
// Slot layout
// ---------------------------------------------------------------------------

/// Column names for one slot in the wide layout, precomputed once per run
/// so row processing never formats strings.
#[derive(Debug, Clone)]
pub struct SlotFields {
    pub slot: usize,
    pub name: String,
    pub status: String,
    pub started: String,
    pub finished: String,
    pub deadline: String,
    pub expires: String,
}

impl SlotFields {
    /// Layout columns for 1-based slot `i`.
    pub fn new(i: usize) -> Self {
        Self {
            slot: i,
            name: format!("course {i}"),
            status: format!("course {i} status"),
            started: format!("course {i} date started"),
            finished: format!("course {i} date finished"),
            deadline: format!("course {i} deadline date"),
            expires: format!("course {i} expiration date"),
        }
    }

    /// All six columns in layout order.
    pub fn columns(&self) -> [&str; 6] {
        [
            &self.name,
            &self.status,
            &self.started,
            &self.finished,
            &self.deadline,
            &self.expires,
        ]
    }
}

// ---------------------------------------------------------------------------
// Date codec
// ---------------------------------------------------------------------------

/// Parses dates against the configured input formats in order; formats
/// every output date the same single way.
#[derive(Debug, Clone)]
pub struct DateCodec {
    input_formats: Vec<String>,
    output_format: String,
}

impl DateCodec {
    pub fn new(config: &DateConfig) -> Self {
        Self {
            input_formats: config.input_formats.clone(),
            output_format: config.output_format.clone(),
        }
    }

    /// First input format that parses wins. Datetime formats drop their
    /// time-of-day part.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        self.input_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.output_format).to_string()
    }

    pub(crate) fn render(&self, date: Option<NaiveDate>) -> String {
        date.map(|d| self.format(d)).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// A date cell that was present but would not parse under any input format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotParseError {
    pub field: String,
    pub value: String,
}

/// Lift one slot out of `row`. Returns `Ok(None)` when the name cell is
/// blank or a sentinel (no course in this slot). Sentinel scrub happens
/// here, before any date parsing.
pub fn extract(
    table: &Table,
    row: usize,
    fields: &SlotFields,
    codec: &DateCodec,
    sentinels: &SentinelConfig,
) -> Result<Option<CourseSlot>, SlotParseError> {
    let name = match sentinels.clean(table.value(row, &fields.name).unwrap_or("")) {
        Some(name) => name.to_string(),
        None => return Ok(None),
    };
    let status = SlotStatus::from_label(table.value(row, &fields.status).unwrap_or(""));
    Ok(Some(CourseSlot {
        name,
        status,
        started: date_field(table, row, &fields.started, codec, sentinels)?,
        finished: date_field(table, row, &fields.finished, codec, sentinels)?,
        deadline: date_field(table, row, &fields.deadline, codec, sentinels)?,
        expires: date_field(table, row, &fields.expires, codec, sentinels)?,
    }))
}

fn date_field(
    table: &Table,
    row: usize,
    field: &str,
    codec: &DateCodec,
    sentinels: &SentinelConfig,
) -> Result<Option<NaiveDate>, SlotParseError> {
    match sentinels.clean(table.value(row, field).unwrap_or("")) {
        None => Ok(None),
        Some(raw) => codec.parse(raw).map(Some).ok_or_else(|| SlotParseError {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Write-back
// ---------------------------------------------------------------------------

/// Write the merged slot into its row. The course name column is left
/// untouched; absent dates render as empty cells.
pub fn apply(
    table: &mut Table,
    row: usize,
    fields: &SlotFields,
    slot: &CourseSlot,
    codec: &DateCodec,
) {
    table.set(row, &fields.status, slot.status.label());
    table.set(row, &fields.started, codec.render(slot.started));
    table.set(row, &fields.finished, codec.render(slot.finished));
    table.set(row, &fields.deadline, codec.render(slot.deadline));
    table.set(row, &fields.expires, codec.render(slot.expires));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
