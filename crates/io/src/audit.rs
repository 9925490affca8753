// Append-only audit log

use std::fs::OpenOptions;
use std::path::Path;

use trainbridge_recon::audit::{AuditEntry, HEADER};
use trainbridge_recon::slots::DateCodec;

use crate::error::Result;

/// Append entries to the audit CSV at `path`. The header row is written only
/// when the file is new or empty; existing history is never rewritten.
pub fn append(path: &Path, entries: &[AuditEntry], codec: &DateCodec) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let fresh = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if fresh {
        writer.write_record(HEADER)?;
    }
    for entry in entries {
        writer.write_record(entry.to_record(codec))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use trainbridge_recon::config::DateConfig;
    use trainbridge_recon::model::{CourseSlot, SlotOutcome, SlotStatus};

    fn entry(reason: &'static str) -> AuditEntry {
        let passed = CourseSlot {
            name: "WHMIS".into(),
            status: SlotStatus::Passed,
            ..Default::default()
        };
        let outcome = SlotOutcome {
            updated: true,
            reason,
            merged: passed.clone(),
            compare: CourseSlot {
                name: "WHMIS".into(),
                ..Default::default()
            },
            reference: passed,
        };
        AuditEntry::new("1001", "Dana", "Reyes", 1, 2, outcome)
    }

    #[test]
    fn header_is_written_once_across_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.csv");
        let codec = DateCodec::new(&DateConfig::default());

        append(&path, &[entry("promoted to passed")], &codec).unwrap();
        append(&path, &[entry("completion dates match")], &codec).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("employee_id,"));
        assert!(lines[1].contains("promoted to passed"));
        assert!(lines[2].contains("completion dates match"));
        assert!(!lines[2].starts_with("employee_id,"));
    }

    #[test]
    fn empty_batch_still_creates_the_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.csv");
        let codec = DateCodec::new(&DateConfig::default());

        append(&path, &[], &codec).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
