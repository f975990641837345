//! Common routines for reading input files and building a [`Model`] from a source document.
use crate::commodity::Commodity;
use crate::constraint::Constraint;
use crate::id::RegionID;
use crate::model::{Model, ModelParameters};
use crate::scenario::Scenario;
use crate::table_ir::TableIR;
use crate::time_slice::TimeSliceDefinition;
use crate::trade::TradeLink;
use crate::validation::schema::validate_table_ir_value;
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use serde::de::{Deserializer, Error, Visitor};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

mod commodity;
use commodity::read_commodities;
mod process;
use process::{ProcessRaw, read_processes};

/// Extensions recognised for source documents
const SOURCE_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Format an error message to include the file path.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Parse a YAML (or JSON) document from a string into a JSON value tree.
///
/// Documents are parsed as YAML, of which JSON is a subset. Mapping keys which YAML reads as
/// numbers (e.g. years) become strings in the returned tree.
pub fn parse_yaml_document(contents: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(contents).context("Invalid YAML")?;
    serde_json::to_value(&yaml).context("Document cannot be represented as JSON")
}

/// Load a VedaLang source document from the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to a `.veda.yaml`, `.yaml`, `.yml` or `.json` file
///
/// # Returns
///
/// The document as a JSON value tree, ready for schema validation.
pub fn load_source(file_path: &Path) -> Result<Value> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    ensure!(
        SOURCE_EXTENSIONS.contains(&extension),
        "Unsupported source file extension for {}. Expected one of: {}",
        file_path.display(),
        SOURCE_EXTENSIONS.join(", ")
    );

    let contents = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    parse_yaml_document(&contents).with_context(|| input_err_msg(file_path))
}

/// Load a TableIR document from the specified path.
///
/// The document is checked against the TableIR schema before conversion.
pub fn load_table_ir(file_path: &Path) -> Result<TableIR> {
    let value = load_source(file_path)?;
    validate_table_ir_value(&value).with_context(|| input_err_msg(file_path))?;
    serde_json::from_value(value).with_context(|| input_err_msg(file_path))
}

/// The entity collections of the `model` section of a source document
#[derive(Deserialize)]
struct ModelRaw {
    regions: Vec<RegionID>,
    #[serde(default)]
    commodities: Vec<Commodity>,
    #[serde(default)]
    processes: Vec<ProcessRaw>,
    #[serde(default)]
    scenarios: Vec<Scenario>,
    #[serde(default)]
    constraints: Vec<Constraint>,
    #[serde(default)]
    trade_links: Vec<TradeLink>,
    timeslices: Option<TimeSliceDefinition>,
}

/// Build a model from a source document.
///
/// The document is expected to have passed structural validation, but this function does its own
/// checks on the things it relies on: required fields, unique names and valid primary commodity
/// groups. References between entities are not checked here (see
/// [`crate::validation::cross_reference`]).
///
/// # Arguments
///
/// * `source` - The parsed source document
///
/// # Returns
///
/// The loaded model or an error.
pub fn load_model(source: &Value) -> Result<Model> {
    let model = source
        .get("model")
        .context("Source document has no 'model' section")?;
    let parameters = ModelParameters::from_value(model)?;
    let raw: ModelRaw =
        serde_json::from_value(model.clone()).context("Invalid model definition")?;

    Ok(Model {
        parameters,
        regions: read_regions(raw.regions)?,
        commodities: read_commodities(raw.commodities)?,
        processes: read_processes(raw.processes)?,
        scenarios: raw.scenarios,
        constraints: raw.constraints,
        trade_links: raw.trade_links,
        time_slices: raw.timeslices,
    })
}

/// Collect region names into a set, checking that there is at least one and no duplicates
fn read_regions(regions: Vec<RegionID>) -> Result<IndexSet<RegionID>> {
    ensure!(!regions.is_empty(), "Model must declare at least one region");

    let mut set = IndexSet::with_capacity(regions.len());
    for region in regions {
        ensure!(
            !set.contains(&region),
            "Duplicate region name '{region}'"
        );
        set.insert(region);
    }

    Ok(set)
}

/// Check that a slice of values is sorted and contains no duplicates
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().collect::<Vec<_>>().windows(2).all(|w| w[0] < w[1])
}

/// A year used as a mapping key, written either as an integer or as a string
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct YearKey(u32);

impl<'de> Deserialize<'de> for YearKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct YearKeyVisitor;

        impl Visitor<'_> for YearKeyVisitor {
            type Value = YearKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a four-digit year")
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<YearKey, E> {
                u32::try_from(v)
                    .map(YearKey)
                    .map_err(|_| E::custom(format!("invalid year: {v}")))
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<YearKey, E> {
                u32::try_from(v)
                    .map(YearKey)
                    .map_err(|_| E::custom(format!("invalid year: {v}")))
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<YearKey, E> {
                v.trim()
                    .parse()
                    .map(YearKey)
                    .map_err(|_| E::custom(format!("invalid year: {v}")))
            }
        }

        deserializer.deserialize_any(YearKeyVisitor)
    }
}

/// Deserialise a mapping of year to value, ordered by year.
///
/// Keys may be integers or strings holding integers.
pub fn deserialise_year_values<'de, D>(deserializer: D) -> Result<BTreeMap<u32, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<YearKey, f64>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(year, value)| (year.0, value)).collect())
}

/// As [`deserialise_year_values`], for optional fields
pub fn deserialise_optional_year_values<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<u32, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialise_year_values(deserializer).map(Some)
}
