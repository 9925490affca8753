use trainbridge_recon::{run, ReconConfig, ReconError, SlotStatus};
use trainbridge_table::Table;

// -------------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------------

fn config(slot_count: usize, strategy: &str) -> ReconConfig {
    ReconConfig::from_toml(&format!(
        r#"
[files]
compare = "compare.csv"
reference = "reference.csv"
output = "updated.csv"

[dataset]
slot_count = {slot_count}

[rules]
strategy = "{strategy}"
"#
    ))
    .unwrap()
}

fn headers(slot_count: usize) -> Vec<String> {
    let mut h = vec![
        "skyprep_internal_id".to_string(),
        "first_name".to_string(),
        "last_name".to_string(),
    ];
    for i in 1..=slot_count {
        for suffix in [
            "",
            " status",
            " date started",
            " date finished",
            " deadline date",
            " expiration date",
        ] {
            h.push(format!("course {i}{suffix}"));
        }
    }
    h
}

fn push_employee(table: &mut Table, key: &str, first: &str, last: &str, slots: &[[&str; 6]]) {
    let mut row = vec![key.to_string(), first.to_string(), last.to_string()];
    for cells in slots {
        row.extend(cells.iter().map(|c| c.to_string()));
    }
    table.push_row(row);
}

fn snapshot(table: &Table) -> Vec<Vec<String>> {
    table.rows().map(|r| r.values().to_vec()).collect()
}

// -------------------------------------------------------------------------
// Decision table, end to end
// -------------------------------------------------------------------------

#[test]
fn run_applies_the_full_decision_table() {
    let cfg = config(4, "status_aware");
    let mut compare = Table::new(headers(4));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[
            // Slot 1: passed locally, reference behind. No change.
            ["WHMIS", "Passed", "2023-01-05", "2023-01-20", "", "2026-01-20"],
            // Slot 2: untouched locally, passed upstream. Promotion.
            ["Fall Protection", "Not Started", "", "", "2024-06-01", ""],
            // Slot 3: untouched locally, in progress upstream.
            ["Confined Space", "Not Started", "", "", "", ""],
            // Slot 4: passed on both sides, upstream retake is newer.
            ["First Aid", "Passed", "2022-03-01", "2022-03-02", "", "2023-03-02"],
        ],
    );
    let mut reference = Table::new(headers(4));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["WHMIS", "In Progress", "2024-02-01", "", "2024-03-01", ""],
            ["Fall Protection", "Passed", "2024-01-10", "2024-01-12", "", "2027-01-12"],
            ["Confined Space", "In Progress", "2024-01-10", "", "2024-02-10", ""],
            ["First Aid", "Passed", "2024-04-01", "2024-04-02", "", ""],
        ],
    );

    let report = run(&cfg, &mut compare, &reference).unwrap();

    assert_eq!(report.summary.rows, 1);
    assert_eq!(report.summary.matched, 1);
    assert_eq!(report.summary.slots_evaluated, 4);
    assert_eq!(report.summary.slots_updated, 3);
    assert_eq!(report.summary.slots_errored, 0);

    // Slot 1 untouched.
    assert_eq!(compare.value(0, "course 1 status"), Some("Passed"));
    assert_eq!(compare.value(0, "course 1 date started"), Some("2023-01-05"));

    // Slot 2 promoted, local deadline kept.
    assert_eq!(compare.value(0, "course 2 status"), Some("Passed"));
    assert_eq!(compare.value(0, "course 2 date started"), Some("2024-01-10"));
    assert_eq!(compare.value(0, "course 2 date finished"), Some("2024-01-12"));
    assert_eq!(compare.value(0, "course 2 deadline date"), Some("2024-06-01"));
    assert_eq!(compare.value(0, "course 2 expiration date"), Some("2027-01-12"));

    // Slot 3 adopted in-progress state.
    assert_eq!(compare.value(0, "course 3 status"), Some("In Progress"));
    assert_eq!(compare.value(0, "course 3 date started"), Some("2024-01-10"));
    assert_eq!(compare.value(0, "course 3 deadline date"), Some("2024-02-10"));
    assert_eq!(compare.value(0, "course 3 date finished"), Some(""));

    // Slot 4 adopted the retake; the 365-day validity period re-anchors to
    // the new finish.
    assert_eq!(compare.value(0, "course 4 status"), Some("Passed"));
    assert_eq!(compare.value(0, "course 4 date finished"), Some("2024-04-02"));
    assert_eq!(compare.value(0, "course 4 expiration date"), Some("2025-04-02"));
}

#[test]
fn equal_completion_dates_leave_the_row_alone() {
    // Reference start mirror-fills from its finish; equal finish dates then
    // stop the update, open-ended expiration stays put.
    let cfg = config(1, "status_aware");
    let mut compare = Table::new(headers(1));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[["WHMIS", "Passed", "2023-05-01", "2023-05-02", "", "2050-01-01"]],
    );
    let before = snapshot(&compare);
    let mut reference = Table::new(headers(1));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[["WHMIS", "Passed", "", "2023-05-02", "", ""]],
    );

    let report = run(&cfg, &mut compare, &reference).unwrap();
    assert_eq!(report.summary.slots_updated, 0);
    assert_eq!(snapshot(&compare), before);
    assert_eq!(report.audit.len(), 1);
    assert!(!report.audit[0].updated);
}

// -------------------------------------------------------------------------
// Driver laws
// -------------------------------------------------------------------------

#[test]
fn row_order_is_preserved() {
    let cfg = config(1, "status_aware");
    let mut compare = Table::new(headers(1));
    for key in ["300", "100", "200"] {
        push_employee(
            &mut compare,
            key,
            "X",
            "Y",
            &[["Course", "Not Started", "", "", "", ""]],
        );
    }
    let mut reference = Table::new(headers(1));
    for key in ["100", "200", "300"] {
        push_employee(
            &mut reference,
            key,
            "X",
            "Y",
            &[["Course", "Passed", "2024-01-01", "2024-01-02", "", ""]],
        );
    }

    run(&cfg, &mut compare, &reference).unwrap();

    let keys: Vec<_> = (0..compare.len())
        .map(|i| compare.value(i, "skyprep_internal_id").unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["300", "100", "200"]);
}

#[test]
fn unmatched_rows_come_back_byte_identical() {
    let cfg = config(1, "status_aware");
    let mut compare = Table::new(headers(1));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[["Course", "Not Started", "", "", "", ""]],
    );
    push_employee(
        &mut compare,
        "no-such-key",
        "Sam",
        "Okafor",
        &[["Course", "Not Started", "", "", "", ""]],
    );
    let before = snapshot(&compare);
    let mut reference = Table::new(headers(1));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[["Course", "Passed", "2024-01-01", "2024-01-02", "", ""]],
    );

    let report = run(&cfg, &mut compare, &reference).unwrap();

    assert_eq!(report.summary.matched, 1);
    assert_eq!(report.summary.unmatched, 1);
    // Row 0 was updated, row 1 must be untouched.
    assert_ne!(snapshot(&compare)[0], before[0]);
    assert_eq!(snapshot(&compare)[1], before[1]);
    assert!(report.audit.iter().all(|e| e.employee != "no-such-key"));
}

#[test]
fn second_run_is_a_fixed_point() {
    let cfg = config(3, "status_aware");
    let mut compare = Table::new(headers(3));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Not Started", "", "", "", ""],
            ["B", "Not Started", "", "", "", ""],
            ["C", "Passed", "2022-01-01", "2022-01-02", "", ""],
        ],
    );
    let mut reference = Table::new(headers(3));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Passed", "2024-01-01", "2024-01-02", "", ""],
            ["B", "In Progress", "2024-01-10", "", "2024-02-10", ""],
            ["C", "Passed", "2024-03-01", "2024-03-02", "", ""],
        ],
    );

    let first = run(&cfg, &mut compare, &reference).unwrap();
    assert_eq!(first.summary.slots_updated, 3);
    let settled = snapshot(&compare);

    let second = run(&cfg, &mut compare, &reference).unwrap();
    assert_eq!(second.summary.slots_updated, 0);
    assert_eq!(snapshot(&compare), settled);
}

#[test]
fn duplicate_reference_key_reads_the_later_row() {
    let cfg = config(1, "status_aware");
    let mut compare = Table::new(headers(1));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[["Course", "Not Started", "", "", "", ""]],
    );
    let mut reference = Table::new(headers(1));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[["Course", "In Progress", "2024-01-10", "", "2024-02-10", ""]],
    );
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[["Course", "Passed", "2024-05-01", "2024-05-02", "", ""]],
    );

    let report = run(&cfg, &mut compare, &reference).unwrap();
    assert_eq!(report.audit[0].reference.status, SlotStatus::Passed);
    assert_eq!(compare.value(0, "course 1 status"), Some("Passed"));
}

// -------------------------------------------------------------------------
// Strategy selection
// -------------------------------------------------------------------------

#[test]
fn strategies_diverge_on_the_same_tables() {
    let build = || {
        let mut compare = Table::new(headers(1));
        push_employee(
            &mut compare,
            "1001",
            "Dana",
            "Reyes",
            &[["Course", "Not Started", "", "", "", ""]],
        );
        let mut reference = Table::new(headers(1));
        push_employee(
            &mut reference,
            "1001",
            "Dana",
            "Reyes",
            &[["Course", "Passed", "2024-01-01", "2024-01-02", "", ""]],
        );
        (compare, reference)
    };

    // status_aware promotes the untouched slot.
    let (mut compare, reference) = build();
    let report = run(&config(1, "status_aware"), &mut compare, &reference).unwrap();
    assert_eq!(report.summary.slots_updated, 1);
    assert_eq!(compare.value(0, "course 1 status"), Some("Passed"));

    // newer_start_only needs a local start to compare against, so it skips.
    let (mut compare, reference) = build();
    let report = run(&config(1, "newer_start_only"), &mut compare, &reference).unwrap();
    assert_eq!(report.summary.slots_updated, 0);
    assert_eq!(compare.value(0, "course 1 status"), Some("Not Started"));
}

// -------------------------------------------------------------------------
// Audit completeness
// -------------------------------------------------------------------------

#[test]
fn audit_logs_every_evaluated_slot_and_nothing_else() {
    let cfg = config(3, "status_aware");
    let mut compare = Table::new(headers(3));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Passed", "2023-01-01", "2023-01-02", "", ""],
            // Slot 2 never assigned: not evaluated, not logged.
            ["", "", "", "", "", ""],
            ["C", "Not Started", "", "", "", ""],
        ],
    );
    push_employee(
        &mut compare,
        "ghost",
        "Sam",
        "Okafor",
        &[
            ["A", "Not Started", "", "", "", ""],
            ["B", "Not Started", "", "", "", ""],
            ["C", "Not Started", "", "", "", ""],
        ],
    );
    let mut reference = Table::new(headers(3));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Not Started", "", "", "", ""],
            ["B", "Passed", "2024-01-01", "2024-01-02", "", ""],
            ["C", "Not Started", "", "", "", ""],
        ],
    );

    let report = run(&cfg, &mut compare, &reference).unwrap();

    let logged: Vec<_> = report.audit.iter().map(|e| (e.employee.as_str(), e.slot)).collect();
    assert_eq!(logged, vec![("1001", 1), ("1001", 3)]);
    // No-ops are still logged with their reason.
    assert!(report.audit.iter().all(|e| !e.updated));
    assert_eq!(report.audit[0].reason, "already passed, reference behind");
    assert_eq!(report.audit[1].reason, "no progress either side");
}

// -------------------------------------------------------------------------
// Failure handling
// -------------------------------------------------------------------------

#[test]
fn schema_error_aborts_before_any_mutation() {
    let cfg = config(2, "status_aware");
    let mut compare = Table::new(headers(2));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Not Started", "", "", "", ""],
            ["B", "Not Started", "", "", "", ""],
        ],
    );
    let before = snapshot(&compare);
    // Reference only carries slot 1 columns.
    let mut reference = Table::new(headers(1));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[["A", "Passed", "2024-01-01", "2024-01-02", "", ""]],
    );

    let err = run(&cfg, &mut compare, &reference).unwrap_err();
    assert!(matches!(err, ReconError::SlotColumnMissing { dataset: "reference", slot: 2, .. }));
    assert_eq!(snapshot(&compare), before);
}

#[test]
fn bad_dates_degrade_per_slot_not_per_run() {
    let cfg = config(2, "status_aware");
    let mut compare = Table::new(headers(2));
    push_employee(
        &mut compare,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Not Started", "", "", "", ""],
            ["B", "Not Started", "", "", "", ""],
        ],
    );
    let mut reference = Table::new(headers(2));
    push_employee(
        &mut reference,
        "1001",
        "Dana",
        "Reyes",
        &[
            ["A", "Passed", "13/45/9999", "", "", ""],
            ["B", "Passed", "2024-01-01", "2024-01-02", "", ""],
        ],
    );

    let report = run(&cfg, &mut compare, &reference).unwrap();
    assert_eq!(report.summary.slots_errored, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].side, "reference");
    // The clean slot still went through.
    assert_eq!(compare.value(0, "course 2 status"), Some("Passed"));
    assert_eq!(compare.value(0, "course 1 status"), Some("Not Started"));
}
