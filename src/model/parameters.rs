//! Read and validate the top-level parameters of a model.
//!
//! These are the scalar fields of the `model` section of a source document: the model's name and
//! the layout of its time periods.
use anyhow::{Context, Result, ensure};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_start_year, u32, 2020);
define_param_default!(default_time_periods, Vec<u32>, vec![10, 10, 10, 10]);

/// Model parameters as declared in the `model` section of a source document.
///
/// NOTE: If you add or change a field in this struct, you must also update the schema in
/// `schemas/vedalang.schema.json`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ModelParameters {
    /// Name of the model, used in output file names
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// The first model year
    #[serde(default = "default_start_year")]
    pub start_year: u32,
    /// Length in years of each model period
    #[serde(default = "default_time_periods")]
    pub time_periods: Vec<u32>,
}

/// Check that the `name` parameter can be used in file names
fn check_name(name: &str) -> Result<()> {
    static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        NAME_PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid regex"));
    ensure!(
        pattern.is_match(name),
        "Model name '{name}' may only contain letters, digits, '_' and '-'"
    );

    Ok(())
}

/// Check that the `time_periods` parameter is valid for a model starting in `start_year`
fn check_time_periods(start_year: u32, periods: &[u32]) -> Result<()> {
    ensure!(!periods.is_empty(), "`time_periods` is empty");
    ensure!(
        periods.iter().all(|&length| length > 0),
        "`time_periods` must all be greater than zero"
    );
    periods
        .iter()
        .try_fold(start_year, |year, &length| year.checked_add(length))
        .with_context(|| {
            format!("`time_periods` extend too far beyond the start year {start_year}")
        })?;

    Ok(())
}

impl ModelParameters {
    /// Read the parameters from the `model` section of a source document.
    ///
    /// Fields belonging to other parts of the model are ignored.
    ///
    /// # Returns
    ///
    /// The parameters as a [`ModelParameters`] struct or an error if they are invalid
    pub fn from_value(model: &Value) -> Result<ModelParameters> {
        let params: ModelParameters =
            serde_json::from_value(model.clone()).context("Invalid model parameters")?;
        params.validate()?;

        Ok(params)
    }

    /// Validate parameters after reading
    fn validate(&self) -> Result<()> {
        check_name(&self.name)?;
        check_time_periods(self.start_year, &self.time_periods)?;

        Ok(())
    }

    /// The model name in upper case, as used for book names
    pub fn bookname(&self) -> String {
        self.name.to_uppercase()
    }
}
