//! Orchestration of the full check: local checks on compiled tables, then the downstream checker.
//!
//! The downstream checker is an external program, configured in the program settings. It is run
//! with the path of a TableIR file, followed by `--diagnostics-json <file> --manifest-json <file>`,
//! and may write a [`DiagnosticsDocument`] and a manifest to those files.
use crate::diagnostics::{DiagnosticsDocument, Severity};
use crate::output::{OutputFormat, write_table_ir};
use crate::settings::Settings;
use crate::table_ir::TableIR;
use crate::validation::canonical::check_canonical_form;
use crate::validation::schema::validate_table_ir_structure;
use anyhow::{Context, Result, bail};
use itertools::Itertools;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

/// How often to poll the checker process for completion
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Options for running the downstream checker
#[derive(PartialEq, Debug, Clone)]
pub struct CheckOptions {
    /// Program and leading arguments. If empty, the downstream check is skipped.
    pub command: Vec<String>,
    /// Time after which the checker is killed
    pub timeout: Duration,
}

impl CheckOptions {
    /// Take the checker options from the program settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            command: settings.checker_command.clone(),
            timeout: Duration::from_secs(settings.checker_timeout_secs),
        }
    }
}

/// The outcome of a check
#[derive(Debug, Default)]
pub struct CheckResult {
    /// Whether every stage passed
    pub success: bool,
    /// The file which was checked, if any
    pub source_path: Option<PathBuf>,
    /// Distinct table tags, in order of first appearance
    pub tables: Vec<String>,
    /// Total number of rows across all tables
    pub total_rows: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of errors
    pub errors: usize,
    /// Messages for each error
    pub error_messages: Vec<String>,
    /// Manifest written by the checker
    pub manifest: Option<Value>,
    /// Diagnostics written by the checker
    pub diagnostics: Option<DiagnosticsDocument>,
}

impl CheckResult {
    fn add_error(&mut self, message: String) {
        self.errors += 1;
        self.error_messages.push(message);
    }
}

/// Check compiled tables.
///
/// This never fails: problems at any stage, including failure to run the checker, are recorded as
/// errors in the returned [`CheckResult`].
///
/// # Arguments
///
/// * `table_ir` - The tables to check
/// * `source_path` - The file the tables came from, for reporting
/// * `options` - How to run the downstream checker
pub fn run_check(
    table_ir: &TableIR,
    source_path: Option<&Path>,
    options: &CheckOptions,
) -> CheckResult {
    let mut result = CheckResult {
        source_path: source_path.map(Path::to_path_buf),
        tables: table_ir
            .iter_tables()
            .map(|(_, _, table)| table.tag.clone())
            .unique()
            .collect(),
        total_rows: table_ir.total_rows(),
        ..Default::default()
    };

    if let Err(err) = validate_table_ir_structure(table_ir) {
        result.add_error(format!("{err:#}"));
        return result;
    }
    for error in check_canonical_form(table_ir) {
        result.add_error(error);
    }
    if result.errors > 0 {
        return result;
    }

    if options.command.is_empty() {
        warn!("No checker command configured. Skipping downstream check.");
        result.success = true;
        return result;
    }

    match run_checker(table_ir, options, &mut result) {
        Ok(status) => {
            if !status.success() {
                info!("Checker exited with {status}");
            }
            result.success = status.success() && result.errors == 0;
        }
        Err(err) => result.add_error(format!("{err:#}")),
    }

    result
}

/// Run the downstream checker on a temporary copy of the tables and collect its outputs
fn run_checker(
    table_ir: &TableIR,
    options: &CheckOptions,
    result: &mut CheckResult,
) -> Result<ExitStatus> {
    let dir = tempdir().context("Failed to create temporary directory")?;
    let table_ir_path = dir.path().join("tableir.yaml");
    let diagnostics_path = dir.path().join("diagnostics.json");
    let manifest_path = dir.path().join("manifest.json");
    write_table_ir(table_ir, &table_ir_path, OutputFormat::Yaml, false)?;

    let (program, args) = options
        .command
        .split_first()
        .context("Empty checker command")?;
    debug!("Running checker: {}", options.command.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .arg(&table_ir_path)
        .arg("--diagnostics-json")
        .arg(&diagnostics_path)
        .arg("--manifest-json")
        .arg(&manifest_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run checker '{program}'"))?;

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().context("Failed to wait for checker")? {
            break status;
        }
        if start.elapsed() >= options.timeout {
            // Either may fail if the child has just exited
            child.kill().ok();
            child.wait().ok();
            bail!(
                "Checker timed out after {} seconds",
                options.timeout.as_secs_f64()
            );
        }
        thread::sleep(POLL_INTERVAL);
    };

    if manifest_path.is_file() {
        let contents = fs::read_to_string(&manifest_path).context("Could not read manifest")?;
        result.manifest = Some(serde_json::from_str(&contents).context("Invalid manifest")?);
    }

    if diagnostics_path.is_file() {
        let diagnostics = DiagnosticsDocument::from_path(&diagnostics_path)?;
        let summary = diagnostics.summary();
        let mut listed = 0;
        for diagnostic in diagnostics.with_severity(Severity::Error) {
            result.add_error(diagnostic.message.clone());
            listed += 1;
        }
        if summary.error_count > listed {
            result.add_error(format!(
                "Checker reported {} error(s) but listed {listed}",
                summary.error_count
            ));
        }
        result.warnings += summary.warning_count;
        result.diagnostics = Some(diagnostics);
    }

    Ok(status)
}
