use std::collections::HashMap;

use tracing::warn;
use trainbridge_table::Table;

use crate::error::PrepareError;
use crate::StepOutput;

/// Headers of the upload layout, one row per employee and course.
pub const UPLOAD_HEADERS: [&str; 12] = [
    "SkyPrep ID",
    "First name",
    "Last name",
    "Email",
    "Work phone",
    "Course Name",
    "Login Status",
    "Course Progress Status",
    "Start Date",
    "Completion Date",
    "Deadline Date",
    "Expiration Date",
];

const REPORT_REQUIRED: [&str; 5] = [
    "Position ID",
    "Course Name Description",
    "Start Date",
    "Recertification Date",
    "Acquired Date",
];

const USER_REQUIRED: [&str; 5] = [
    "work_phone",
    "skyprep_internal_id",
    "email_or_username",
    "first_name",
    "last_name",
];

/// Join every cleansed report row against the course mapping (first column
/// source description, second column platform name) and the user list
/// (keyed on work phone, which carries the position id). In both lookups the
/// first matching row wins. Employees absent from the user list come out
/// with blank identity fields and the `Not found` login status; course
/// descriptions absent from the mapping leave the course name blank and are
/// reported as warnings.
pub fn transform(
    report: &Table,
    courses: &Table,
    users: &Table,
) -> Result<StepOutput, PrepareError> {
    require(report, "report", &REPORT_REQUIRED)?;
    require(users, "user list", &USER_REQUIRED)?;
    if courses.width() < 2 {
        return Err(PrepareError::TooFewColumns {
            table: "course mapping",
            expected: 2,
        });
    }

    let mut course_names: HashMap<&str, &str> = HashMap::new();
    for row in courses.rows() {
        let source = row.get(0).trim();
        if !source.is_empty() {
            course_names.entry(source).or_insert_with(|| row.get(1).trim());
        }
    }

    let mut user_rows: HashMap<&str, usize> = HashMap::new();
    for pos in 0..users.len() {
        let phone = users.value(pos, "work_phone").unwrap_or("").trim();
        if !phone.is_empty() {
            user_rows.entry(phone).or_insert(pos);
        }
    }

    let mut out = Table::new(UPLOAD_HEADERS.iter().map(|h| h.to_string()).collect());
    let mut warnings = Vec::new();

    for row in 0..report.len() {
        let cell = |col: &str| report.value(row, col).unwrap_or("").trim().to_string();
        let position_id = cell("Position ID");
        let description = cell("Course Name Description");
        let start = cell("Start Date");
        let recert = cell("Recertification Date");
        let acquired = cell("Acquired Date");

        let course_name = course_names
            .get(description.as_str())
            .copied()
            .unwrap_or("");
        if course_name.is_empty() && !description.is_empty() {
            warn!(row = row + 1, course = %description, "no course mapping");
            warnings.push(format!(
                "row {}: no course mapping for '{description}'",
                row + 1
            ));
        }

        let (skyprep, first, last, email) = match user_rows.get(position_id.as_str()) {
            Some(&pos) => (
                users.value(pos, "skyprep_internal_id").unwrap_or("").trim(),
                users.value(pos, "first_name").unwrap_or("").trim(),
                users.value(pos, "last_name").unwrap_or("").trim(),
                users.value(pos, "email_or_username").unwrap_or("").trim(),
            ),
            None => ("", "", "", ""),
        };

        let login_status = if email.is_empty() { "Not found" } else { "Active" };
        // A recertification date means the course was completed at least once.
        let progress = if recert.is_empty() { "Not Started" } else { "Passed" };

        out.push_row(vec![
            skyprep.to_string(),
            first.to_string(),
            last.to_string(),
            email.to_string(),
            position_id,
            course_name.to_string(),
            login_status.to_string(),
            progress.to_string(),
            start,
            acquired,
            String::new(),
            recert,
        ]);
    }

    Ok(StepOutput {
        table: out,
        warnings,
    })
}

fn require(table: &Table, name: &'static str, columns: &[&str]) -> Result<(), PrepareError> {
    for col in columns {
        if !table.has_column(col) {
            return Err(PrepareError::ColumnMissing {
                table: name,
                column: col.to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
