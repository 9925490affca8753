// TrainBridge CLI - migration and reconciliation from the shell

mod exit_codes;
mod reconcile;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use trainbridge_io as io;
use trainbridge_io::IoError;
use trainbridge_prepare as prepare;
use trainbridge_prepare::{PrepareError, StepOutput};
use trainbridge_recon::config::DateConfig;
use trainbridge_recon::slots::DateCodec;
use trainbridge_recon::ReconError;

use exit_codes::{io_exit_code, recon_exit_code, EXIT_ERROR, EXIT_SCHEMA, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "tbridge")]
#[command(about = "Training-record migration: cleanse, transform, transfer, reconcile")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a wide-layout dataset pair
    Reconcile {
        #[command(subcommand)]
        command: ReconcileCommands,
    },

    /// Project an activity report down to the migration columns and fix its dates
    Cleanse {
        /// Activity report (csv, tsv or xlsx)
        report: PathBuf,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Join a cleansed report against the course mapping and user list
    Transform {
        /// Cleansed report
        report: PathBuf,

        /// Course mapping: source name in the first column, platform name in the second
        #[arg(long)]
        courses: PathBuf,

        /// User list keyed on work phone
        #[arg(long)]
        users: PathBuf,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Pivot upload rows into the wide layout, one row per employee
    #[command(after_help = "\
Examples:
  tbridge transfer upload.csv -o wide.csv
  tbridge transfer upload.xlsx -o wide.xlsx --slots 20
  tbridge transfer upload.csv -o wide.csv --course-list courses.txt")]
    Transfer {
        /// Upload rows, one per employee and course
        upload: PathBuf,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Course names in slot order, one per line; without it slots follow first appearance
        #[arg(long)]
        course_list: Option<PathBuf>,

        /// Course slots in the layout
        #[arg(long, default_value_t = 71)]
        slots: usize,
    },

    /// Write an empty wide-layout header
    Template {
        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Course slots in the layout
        #[arg(long, default_value_t = 71)]
        slots: usize,
    },
}

#[derive(Subcommand)]
enum ReconcileCommands {
    /// Apply the reference dataset's newer results to the compare dataset
    #[command(after_help = "\
Examples:
  tbridge reconcile run run.toml
  tbridge reconcile run run.toml --dry-run
  tbridge reconcile run run.toml --json | jq .slots_updated")]
    Run {
        /// Run configuration (TOML)
        config: PathBuf,

        /// Report without writing the output dataset or audit log
        #[arg(long)]
        dry_run: bool,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a run configuration
    Validate {
        /// Run configuration (TOML)
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reconcile { command } => match command {
            ReconcileCommands::Run {
                config,
                dry_run,
                json,
            } => reconcile::cmd_run(&config, dry_run, json),
            ReconcileCommands::Validate { config } => reconcile::cmd_validate(&config),
        },
        Commands::Cleanse { report, output } => cmd_cleanse(&report, &output),
        Commands::Transform {
            report,
            courses,
            users,
            output,
        } => cmd_transform(&report, &courses, &users, &output),
        Commands::Transfer {
            upload,
            output,
            course_list,
            slots,
        } => cmd_transfer(&upload, &output, course_list.as_deref(), slots),
        Commands::Template { output, slots } => cmd_template(&output, slots),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        Self {
            code: io_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::SlotColumnMissing { .. } => {
                Some("compare the dataset against `tbridge template`".to_string())
            }
            _ => None,
        };
        Self {
            code: recon_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}

impl From<PrepareError> for CliError {
    fn from(err: PrepareError) -> Self {
        Self {
            code: EXIT_SCHEMA,
            message: err.to_string(),
            hint: None,
        }
    }
}

// ============================================================================
// cleanse / transform / transfer / template
// ============================================================================

fn cmd_cleanse(report: &Path, output: &Path) -> Result<(), CliError> {
    let table = io::load_table(report)?;
    let codec = DateCodec::new(&DateConfig::default());
    let step = prepare::cleanse(&table, &codec)?;
    finish_step(&step, output)
}

fn cmd_transform(
    report: &Path,
    courses: &Path,
    users: &Path,
    output: &Path,
) -> Result<(), CliError> {
    let step = prepare::transform(
        &io::load_table(report)?,
        &io::load_table(courses)?,
        &io::load_table(users)?,
    )?;
    finish_step(&step, output)
}

fn cmd_transfer(
    upload: &Path,
    output: &Path,
    course_list: Option<&Path>,
    slots: usize,
) -> Result<(), CliError> {
    let order = match course_list {
        Some(path) => Some(read_course_list(path)?),
        None => None,
    };
    let table = io::load_table(upload)?;
    let step = prepare::transfer(&table, order.as_deref(), slots)?;
    finish_step(&step, output)
}

fn cmd_template(output: &Path, slots: usize) -> Result<(), CliError> {
    io::save_table(&prepare::template(slots), output)?;
    eprintln!("template with {slots} course slots -> {}", output.display());
    Ok(())
}

fn finish_step(step: &StepOutput, output: &Path) -> Result<(), CliError> {
    for warning in &step.warnings {
        eprintln!("warning: {warning}");
    }
    io::save_table(&step.table, output)?;
    eprintln!("{} rows -> {}", step.table.len(), output.display());
    Ok(())
}

fn read_course_list(path: &Path) -> Result<Vec<String>, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::general(format!("cannot read {}: {e}", path.display())))?;
    let names: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(CliError::general(format!(
            "{}: empty course list",
            path.display()
        ))
        .with_hint("one course name per line, in slot order"));
    }
    Ok(names)
}
