//! The compiler lowers a [`Model`] into [`TableIR`].
//!
//! [`compile_source`] runs the full pipeline on a parsed source document: structural validation,
//! loading, cross-reference validation, lowering and validation of the resulting tables.
//! [`lower_model`] is the lowering step on its own. It is deterministic: the output depends only
//! on the model, with ordering following declaration order.
use crate::error::SemanticValidationError;
use crate::input::load_model;
use crate::model::Model;
use crate::table_ir::{Sheet, Table, TableFile, TableIR};
use crate::validation::cross_reference::validate_cross_references;
use crate::validation::schema::{validate_source_structure, validate_table_ir_structure};
use crate::validation::table_shape::check_table_shapes;
use anyhow::Result;
use log::{debug, info, warn};
use serde_json::Value;

pub mod constraint;
pub mod scenario;
pub mod system;
pub mod time_slice;
pub mod topology;
pub mod trade;

/// Tag of the table mapping books to regions
pub const BOOKREGIONS_MAP: &str = "~BOOKREGIONS_MAP";
/// Tag of the start year table
pub const STARTYEAR: &str = "~STARTYEAR";
/// Tag of the active period definition table
pub const ACTIVEPDEF: &str = "~ACTIVEPDEF";
/// Tag of the period lengths table
pub const TIMEPERIODS: &str = "~TIMEPERIODS";
/// Tag of the currencies table
pub const CURRENCIES: &str = "~CURRENCIES";
/// Tag of the time slice hierarchy table
pub const TIMESLICES: &str = "~TIMESLICES";
/// Tag of the commodity declaration table
pub const FI_COMM: &str = "~FI_COMM";
/// Tag of the process declaration table
pub const FI_PROCESS: &str = "~FI_PROCESS";
/// Tag of the process topology and attribute table
pub const FI_T: &str = "~FI_T";
/// Tag of the system parameter insertion table
pub const TFM_INS: &str = "~TFM_INS";
/// Tag of the scenario attribute table
pub const TFM_DINS_AT: &str = "~TFM_DINS-AT";
/// Tag of the trade link matrix tables
pub const TRADELINKS: &str = "~TRADELINKS";
/// Tag of the user constraint table
pub const UC_T: &str = "~UC_T";

/// Path of the system settings file
pub const SYS_SETTINGS_FILE: &str = "SysSettings.xlsx";
/// Path of the trade links file
pub const TRADE_LINKS_FILE: &str = "SuppXLS/Trades/ScenTrade__Trade_Links.xlsx";
/// Path of the user constraints file
pub const UC_CONSTRAINTS_FILE: &str = "SuppXLS/Scen_UC_Constraints.xlsx";
/// Sheet of the main file holding processes
pub const PROCESS_SHEET: &str = "Processes";
/// Sheet of scenario files
pub const SCENARIO_SHEET: &str = "Scenario";
/// Sheet of the user constraints file
pub const UC_SHEET: &str = "UC_Constraints";

/// The result of compiling a source document
#[derive(Debug, PartialEq)]
pub struct Compilation {
    /// The compiled tables
    pub table_ir: TableIR,
    /// Non-fatal findings of cross-reference validation
    pub warnings: Vec<String>,
}

/// The path of the main process file for a model
pub fn process_file_path(model: &Model) -> String {
    format!(
        "VT_{}_{}.xlsx",
        model.parameters.bookname(),
        model.parameters.name
    )
}

/// Validate a parsed source document and load the model it describes.
///
/// Runs structural validation, then cross-reference validation on the loaded model. Warnings are
/// logged as well as returned.
///
/// # Returns
///
/// The model along with any warnings, or a
/// [`StructuralValidationError`](crate::error::StructuralValidationError) or
/// [`SemanticValidationError`] if the document is invalid.
pub fn validate_source(source: &Value) -> Result<(Model, Vec<String>)> {
    validate_source_structure(source)?;
    let model = load_model(source)?;

    let (errors, warnings) = validate_cross_references(&model);
    if !errors.is_empty() {
        return Err(SemanticValidationError { errors, warnings }.into());
    }
    for warning in &warnings {
        warn!("{warning}");
    }

    Ok((model, warnings))
}

/// Compile a parsed source document into TableIR.
///
/// # Arguments
///
/// * `source` - The parsed source document
/// * `validate` - Whether to run the validation stages. Loading always checks the things lowering
///   relies on (e.g. primary commodity groups), so skipping validation cannot produce malformed
///   rows, only rows with dangling references.
///
/// # Returns
///
/// The compiled tables along with any warnings. Fails with a
/// [`StructuralValidationError`](crate::error::StructuralValidationError) or
/// [`SemanticValidationError`] if the document is invalid, or with a
/// [`TableValidationError`](crate::error::TableValidationError) if the compiled tables are
/// non-conformant.
pub fn compile_source(source: &Value, validate: bool) -> Result<Compilation> {
    let (model, warnings) = if validate {
        validate_source(source)?
    } else {
        (load_model(source)?, Vec::new())
    };

    info!("Compiling model '{}'", model.parameters.name);
    let table_ir = lower_model(&model);
    debug!(
        "Produced {} file(s) with {} row(s)",
        table_ir.files.len(),
        table_ir.total_rows()
    );

    if validate {
        validate_table_ir_structure(&table_ir)?;
        check_table_shapes(&table_ir)?;
    }

    Ok(Compilation { table_ir, warnings })
}

/// Lower a model into TableIR.
///
/// Files are produced in a fixed order: system settings, the main process file, one file per
/// commodity price scenario, the trade links file and the user constraints file. Only the first
/// two are always present.
pub fn lower_model(model: &Model) -> TableIR {
    let region = model.region_list();
    let model_years = model.model_years();
    let trade = trade::compile_trade_links(model);

    let mut process_rows = topology::process_rows(model, &region);
    process_rows.extend(trade.process_rows);

    let mut topology_rows: Vec<_> = model
        .processes
        .values()
        .flat_map(|process| topology::topology_rows(process, &region))
        .collect();
    topology_rows.extend(scenario::demand_projection_rows(
        model,
        &region,
        &model_years,
    ));
    topology_rows.extend(trade.topology_rows);

    let mut files = vec![
        system::system_settings_file(model, &region),
        TableFile::new(
            &process_file_path(model),
            vec![Sheet::new(
                PROCESS_SHEET,
                vec![
                    Table::new(FI_PROCESS, process_rows),
                    Table::new(FI_T, topology_rows),
                ],
            )],
        ),
    ];
    files.extend(scenario::commodity_price_files(
        model,
        &region,
        &model_years,
    ));
    files.extend(trade.file);
    files.extend(constraint::constraint_file(model, &region, &model_years));

    TableIR { files }
}
