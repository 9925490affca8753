// Excel import (first worksheet only) and export

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveTime;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use trainbridge_table::Table;

use crate::error::{IoError, Result};

/// Read the first worksheet into a table, first row as headers.
/// Date cells come out in ISO form, with the time part kept only when it is
/// not midnight, so the downstream date format lists accept them.
pub fn read_xlsx(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Err(IoError::EmptyWorkbook(path.to_path_buf()));
    };
    let range = workbook.worksheet_range(first)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| cell_text(cell).trim().to_string())
            .collect(),
        None => return Err(IoError::NoHeader(path.to_path_buf())),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_text).collect());
    }
    Ok(table)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Whole floats print without the trailing .0
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(stamp) if stamp.time() == NaiveTime::MIN => {
                stamp.format("%Y-%m-%d").to_string()
            }
            Some(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Write the table to a single-sheet workbook, everything as text cells.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row, data) in table.rows().enumerate() {
        for (col, value) in data.values().iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row as u32 + 1, col as u16, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
