// Reconciliation commands - run and validate

use std::path::{Path, PathBuf};

use trainbridge_io as io;
use trainbridge_recon::slots::DateCodec;
use trainbridge_recon::{run_with_progress, ReconConfig};

use crate::exit_codes::EXIT_CONFIG;
use crate::CliError;

pub fn cmd_run(config_path: &Path, dry_run: bool, json: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    let mut compare = io::load_table(&resolve(config_path, &config.files.compare))?;
    let reference = io::load_table(&resolve(config_path, &config.files.reference))?;

    let report = run_with_progress(&config, &mut compare, &reference, |done, total| {
        if done % 1000 == 0 || done == total {
            eprintln!("{done}/{total} rows");
        }
    })?;

    if dry_run {
        eprintln!("dry run: output and audit log not written");
    } else {
        let output = resolve(config_path, &config.files.output);
        io::save_table(&compare, &output)?;
        let audit_log = match &config.files.audit_log {
            Some(path) => resolve(config_path, path),
            None => default_audit_path(&output),
        };
        let codec = DateCodec::new(&config.dates);
        io::audit::append(&audit_log, &report.audit, &codec)?;
    }

    let summary = &report.summary;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).map_err(|e| CliError::general(e.to_string()))?
        );
    } else {
        eprintln!(
            "{} rows ({} matched, {} unmatched), {} slots evaluated, {} updated, {} skipped on bad data",
            summary.rows,
            summary.matched,
            summary.unmatched,
            summary.slots_evaluated,
            summary.slots_updated,
            summary.slots_errored
        );
    }
    Ok(())
}

pub fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    eprintln!(
        "ok: {} course slots, strategy '{}', key field '{}'",
        config.dataset.slot_count, config.rules.strategy, config.dataset.key_field
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<ReconConfig, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_CONFIG,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })?;
    Ok(ReconConfig::from_toml(&raw)?)
}

/// Without a configured audit log the entries land next to the output file.
fn default_audit_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output.with_file_name(format!("{stem}-audit.csv"))
}

/// Relative paths in the run config are taken relative to the config file.
fn resolve(config_path: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        return file.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file),
        _ => file.to_path_buf(),
    }
}
