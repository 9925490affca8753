use std::collections::HashMap;

use tracing::warn;
use trainbridge_table::Table;

use crate::error::PrepareError;
use crate::StepOutput;

/// Identity columns leading the wide layout.
pub const IDENTITY_COLUMNS: [&str; 5] = [
    "skyprep_internal_id",
    "first_name",
    "last_name",
    "email_or_username",
    "work_phone",
];

const UPLOAD_REQUIRED: [&str; 9] = [
    "SkyPrep ID",
    "First name",
    "Last name",
    "Email",
    "Work phone",
    "Course Name",
    "Start Date",
    "Completion Date",
    "Expiration Date",
];

/// Full header row of the wide layout: the identity columns followed by
/// seven columns per course slot.
pub fn wide_headers(slot_count: usize) -> Vec<String> {
    let mut headers: Vec<String> = IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
    for i in 1..=slot_count {
        headers.push(format!("course {i}"));
        headers.push(format!("course {i} status"));
        headers.push(format!("course {i} date started"));
        headers.push(format!("course {i} date finished"));
        headers.push(format!("course {i} access date"));
        headers.push(format!("course {i} deadline date"));
        headers.push(format!("course {i} expiration date"));
    }
    headers
}

/// Empty wide-layout table, header row only.
pub fn template(slot_count: usize) -> Table {
    Table::new(wide_headers(slot_count))
}

/// Pivot upload rows (one per employee and course) into the wide layout
/// (one row per employee, first seen first). Courses take the slot of their
/// position in `course_order` when one is given, otherwise slots are handed
/// out in order of first appearance. Rows without a SkyPrep id, and courses
/// that fit no slot, are dropped with a warning; identity fields come from
/// the employee's first row.
pub fn transfer(
    upload: &Table,
    course_order: Option<&[String]>,
    slot_count: usize,
) -> Result<StepOutput, PrepareError> {
    for col in UPLOAD_REQUIRED {
        if !upload.has_column(col) {
            return Err(PrepareError::ColumnMissing {
                table: "upload",
                column: col.to_string(),
            });
        }
    }

    // Course name to 1-based slot number.
    let mut slots: HashMap<String, usize> = HashMap::new();
    if let Some(order) = course_order {
        for (i, name) in order.iter().enumerate() {
            let name = name.trim();
            if !name.is_empty() {
                slots.entry(name.to_string()).or_insert(i + 1);
            }
        }
    }
    let explicit = course_order.is_some();

    let mut out = template(slot_count);
    let mut employees: HashMap<String, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for row in 0..upload.len() {
        let cell = |col: &str| upload.value(row, col).unwrap_or("").trim().to_string();

        let key = cell("SkyPrep ID");
        if key.is_empty() {
            warn!(row = row + 1, "upload row without a skyprep id dropped");
            warnings.push(format!("row {}: no skyprep id, row dropped", row + 1));
            continue;
        }

        let out_row = match employees.get(&key) {
            Some(&pos) => pos,
            None => {
                let mut values = vec![
                    key.clone(),
                    cell("First name"),
                    cell("Last name"),
                    cell("Email"),
                    cell("Work phone"),
                ];
                values.resize(out.width(), String::new());
                out.push_row(values);
                let pos = out.len() - 1;
                employees.insert(key, pos);
                pos
            }
        };

        let course = cell("Course Name");
        if course.is_empty() {
            warnings.push(format!("row {}: no course name, slot skipped", row + 1));
            continue;
        }
        let slot = match slots.get(&course) {
            Some(&slot) => slot,
            None if explicit => {
                warn!(row = row + 1, course = %course, "course not in the course list");
                warnings.push(format!(
                    "row {}: course '{course}' not in the course list, slot skipped",
                    row + 1
                ));
                continue;
            }
            None => {
                let next = slots.len() + 1;
                slots.insert(course.clone(), next);
                next
            }
        };
        if slot > slot_count {
            warn!(row = row + 1, course = %course, slot, "course does not fit the layout");
            warnings.push(format!(
                "row {}: course '{course}' needs slot {slot} but the layout has {slot_count}",
                row + 1
            ));
            continue;
        }

        out.set(out_row, &format!("course {slot}"), course);
        out.set(
            out_row,
            &format!("course {slot} status"),
            // Soft column: older uploads predate it.
            upload
                .value(row, "Course Progress Status")
                .unwrap_or("")
                .trim(),
        );
        out.set(out_row, &format!("course {slot} date started"), cell("Start Date"));
        out.set(
            out_row,
            &format!("course {slot} date finished"),
            cell("Completion Date"),
        );
        out.set(
            out_row,
            &format!("course {slot} deadline date"),
            upload.value(row, "Deadline Date").unwrap_or("").trim(),
        );
        out.set(
            out_row,
            &format!("course {slot} expiration date"),
            cell("Expiration Date"),
        );
    }

    Ok(StepOutput {
        table: out,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
