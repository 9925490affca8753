// CSV/TSV table import/export

use std::io::Read;
use std::path::Path;

use trainbridge_table::Table;

use crate::error::{IoError, Result};

/// Read a delimited text file into a table, first row as headers.
/// The delimiter is sniffed from the first lines.
pub fn read_csv(path: &Path) -> Result<Table> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    parse(path, &content, delimiter)
}

pub fn read_csv_with_delimiter(path: &Path, delimiter: u8) -> Result<Table> {
    let content = read_file_as_utf8(path)?;
    parse(path, &content, delimiter)
}

/// Read a file as UTF-8, falling back to Windows-1252 when the bytes do not
/// validate (the usual encoding of Excel-exported CSVs). A leading byte
/// order mark is dropped so it cannot glue itself onto the first header.
pub fn read_file_as_utf8(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(mut content) => {
            if content.starts_with('\u{feff}') {
                content.drain(..3);
            }
            Ok(content)
        }
        Err(invalid) => {
            // decode() sniffs and strips the BOM on its own.
            let bytes = invalid.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Pick the delimiter that splits the first lines most consistently.
/// A candidate must produce more than one field on the header line to be
/// viable; among viable candidates, consistency across lines wins and a
/// higher field count breaks ties.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content.lines().take(10).collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delimiter in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| field_count(line, delimiter))
            .collect();
        if counts[0] <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|record| record.ok())
        .map(|record| record.len())
        .unwrap_or(1)
}

fn parse(path: &Path, content: &str, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|f| f.trim().to_string()).collect(),
        None => return Err(IoError::NoHeader(path.to_path_buf())),
    };

    let mut table = Table::new(headers);
    for record in records {
        let record = record?;
        table.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    write_with_delimiter(table, path, b',')
}

pub fn write_tsv(table: &Table, path: &Path) -> Result<()> {
    write_with_delimiter(table, path, b'\t')
}

fn write_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.values())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Table {
        let mut t = Table::new(vec!["name".into(), "city".into()]);
        t.push_row(vec!["Alice".into(), "Paris".into()]);
        t.push_row(vec!["Bob, Jr.".into(), "London".into()]);
        t
    }

    #[test]
    fn csv_roundtrip_keeps_values_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&sample(), &path).unwrap();

        let back = read_csv(&path).unwrap();
        assert_eq!(back.headers(), sample().headers());
        assert_eq!(back.value(0, "name"), Some("Alice"));
        assert_eq!(back.value(1, "name"), Some("Bob, Jr."));
        assert_eq!(back.value(1, "city"), Some("London"));
    }

    #[test]
    fn tsv_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_tsv(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\t'));

        let back = read_csv(&path).unwrap();
        assert_eq!(back.value(0, "city"), Some("Paris"));
    }

    #[test]
    fn sniffs_semicolon_even_with_quoted_commas() {
        let content = "name;address\n\"Doe, Jane\";\"12 Main St, Apt 4\"\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniffs_pipe() {
        assert_eq!(sniff_delimiter("a|b|c\n1|2|3\n"), b'|');
    }

    #[test]
    fn reads_windows_1252_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(&path, b"name,city\nRen\xe9,Montr\xe9al\n").unwrap();

        let table = read_csv(&path).unwrap();
        assert_eq!(table.value(0, "name"), Some("Ren\u{e9}"));
        assert_eq!(table.value(0, "city"), Some("Montr\u{e9}al"));
    }

    #[test]
    fn strips_a_leading_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}id,name\n1,Alice\n").unwrap();

        let table = read_csv(&path).unwrap();
        assert!(table.has_column("id"));
        assert_eq!(table.value(0, "id"), Some("1"));
    }

    #[test]
    fn empty_file_has_no_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert!(matches!(read_csv(&path), Err(IoError::NoHeader(_))));
    }

    #[test]
    fn fixed_delimiter_skips_sniffing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("semi.csv");
        fs::write(&path, "a;b\n1;2\n").unwrap();

        let table = read_csv_with_delimiter(&path, b';').unwrap();
        assert_eq!(table.value(0, "b"), Some("2"));
    }
}
