//! The command line interface for the compiler.
use crate::check::{CheckOptions, CheckResult, run_check};
use crate::compiler::{compile_source, validate_source};
use crate::input::{load_source, load_table_ir};
use crate::log;
use crate::output::{OutputFormat, table_ir_to_string, write_table_ir};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the compiler.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options for the `compile` command
#[derive(Args, Default)]
pub struct CompileOpts {
    /// File to write TableIR to. If omitted, TableIR is written to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Output format. Defaults to the output file's extension, then to the program settings.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Skip validation of the source document and compiled tables
    #[arg(long)]
    pub no_validate: bool,
    /// Whether to overwrite the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile a source file to TableIR.
    Compile {
        /// Path to the source file.
        input: PathBuf,
        /// Other compile options
        #[command(flatten)]
        opts: CompileOpts,
    },
    /// Validate a source file.
    Validate {
        /// Path to the source file.
        input: PathBuf,
    },
    /// Compile a source file and check the result, including with the downstream checker.
    Check {
        /// Path to the source file.
        input: PathBuf,
        /// Whether the input is a TableIR file rather than a source file
        #[arg(long)]
        tableir: bool,
    },
    /// Manage demo models.
    Example {
        /// The available subcommands for managing demo models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Compile { input, opts } => handle_compile_command(&input, &opts, None),
            Self::Validate { input } => handle_validate_command(&input, None),
            Self::Check { input, tableir } => handle_check_command(&input, tableir, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        command.execute()?;
    } else {
        // No command provided. Show help.
        Cli::command().print_long_help()?;
    }

    Ok(())
}

/// Load program settings and initialise the logger, unless settings are provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    Ok(settings)
}

/// Handle the `compile` command.
pub fn handle_compile_command(
    input: &Path,
    opts: &CompileOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = load_settings(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.no_validate {
        settings.validate = false;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }

    let source = load_source(input)?;
    let compilation = compile_source(&source, settings.validate)
        .with_context(|| format!("Failed to compile {}", input.display()))?;
    info!(
        "Compiled {} to {} file(s) with {} row(s)",
        input.display(),
        compilation.table_ir.files.len(),
        compilation.table_ir.total_rows()
    );

    let Some(output) = &opts.output else {
        let format = opts.format.unwrap_or(settings.output_format);
        print!("{}", table_ir_to_string(&compilation.table_ir, format)?);
        return Ok(());
    };

    let format = opts
        .format
        .or_else(|| OutputFormat::from_path(output))
        .unwrap_or(settings.output_format);
    let overwritten = write_table_ir(&compilation.table_ir, output, format, settings.overwrite)?;
    if overwritten {
        warn!("Output file {} was overwritten", output.display());
    }
    info!("TableIR written to {}", output.display());

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(input: &Path, settings: Option<Settings>) -> Result<()> {
    load_settings(settings)?;

    let source = load_source(input)?;
    let (_, warnings) = validate_source(&source).context("Failed to validate model.")?;
    info!(
        "Model validation successful with {} warning(s)",
        warnings.len()
    );

    Ok(())
}

/// Handle the `check` command.
pub fn handle_check_command(
    input: &Path,
    is_table_ir: bool,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    let table_ir = if is_table_ir {
        load_table_ir(input)?
    } else {
        let source = load_source(input)?;
        compile_source(&source, true)
            .with_context(|| format!("Failed to compile {}", input.display()))?
            .table_ir
    };

    let result = run_check(&table_ir, Some(input), &CheckOptions::from_settings(&settings));
    print!("{}", format_check_summary(&result));
    ensure!(result.success, "Check failed with {} error(s)", result.errors);

    Ok(())
}

/// A human-readable summary of a check
fn format_check_summary(result: &CheckResult) -> String {
    let source = result
        .source_path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<input>".to_string());
    let status = if result.success { "PASSED" } else { "FAILED" };

    let mut summary = format!(
        "{status}: {source}\n  Tables: {}\n  Rows: {}\n  Warnings: {}\n  Errors: {}\n",
        result.tables.iter().join(", "),
        result.total_rows,
        result.warnings,
        result.errors
    );
    for message in &result.error_messages {
        summary.push_str(&format!("  - {message}\n"));
    }

    summary
}
