use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub files: FilesConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub sentinels: SentinelConfig,
    #[serde(default)]
    pub dates: DateConfig,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Input/output paths, resolved relative to the config file by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub compare: String,
    pub reference: String,
    pub output: String,
    #[serde(default)]
    pub audit_log: Option<String>,
}

// ---------------------------------------------------------------------------
// Dataset layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Column holding the match key in both datasets.
    #[serde(default = "default_key_field")]
    pub key_field: String,
    /// Number of course slots in the wide layout.
    pub slot_count: usize,
    #[serde(default = "default_first_name_field")]
    pub first_name_field: String,
    #[serde(default = "default_last_name_field")]
    pub last_name_field: String,
}

fn default_key_field() -> String {
    "skyprep_internal_id".into()
}

fn default_first_name_field() -> String {
    "first_name".into()
}

fn default_last_name_field() -> String {
    "last_name".into()
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub strategy: RuleStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStrategy {
    /// Full decision table over both slots' statuses.
    #[default]
    StatusAware,
    /// Update only when the reference start date is strictly newer.
    NewerStartOnly,
}

impl std::fmt::Display for RuleStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatusAware => write!(f, "status_aware"),
            Self::NewerStartOnly => write!(f, "newer_start_only"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SentinelConfig {
    /// Cell values that mean "no data", scrubbed at extraction.
    #[serde(default = "default_missing")]
    pub missing: Vec<String>,
    /// Expiration dates in this year mean "never expires".
    #[serde(default = "default_open_ended_year")]
    pub open_ended_year: i32,
}

fn default_missing() -> Vec<String> {
    vec!["-".into()]
}

fn default_open_ended_year() -> i32 {
    2050
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            missing: default_missing(),
            open_ended_year: default_open_ended_year(),
        }
    }
}

impl SentinelConfig {
    /// Trim a raw cell; empty and sentinel values read as absent.
    pub fn clean<'a>(&self, value: &'a str) -> Option<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() || self.missing.iter().any(|m| m == trimmed) {
            None
        } else {
            Some(trimmed)
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DateConfig {
    /// Accepted input formats, tried in order.
    #[serde(default = "default_input_formats")]
    pub input_formats: Vec<String>,
    /// Format for every date written back out.
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

// Two-digit years must be tried before %m/%d/%Y: chrono's %Y accepts short
// years, so "4/7/23" would otherwise parse as year 23.
fn default_input_formats() -> Vec<String> {
    vec![
        "%Y-%m-%d".into(),
        "%Y-%m-%d %H:%M:%S".into(),
        "%m/%d/%y".into(),
        "%m/%d/%Y".into(),
    ]
}

fn default_output_format() -> String {
    "%Y-%m-%d".into()
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            input_formats: default_input_formats(),
            output_format: default_output_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.dataset.slot_count == 0 {
            return Err(ReconError::ConfigValidation(
                "slot_count must be at least 1".into(),
            ));
        }
        if self.dataset.key_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "key_field must not be empty".into(),
            ));
        }
        if self.dates.input_formats.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one date input format is required".into(),
            ));
        }
        if self.dates.output_format.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "date output format must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
