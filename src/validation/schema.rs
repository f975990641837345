//! Structural validation of source documents and TableIR against JSON schemas.
//!
//! The schemas are embedded at build time and compiled on first use.
use crate::error::StructuralValidationError;
use crate::table_ir::TableIR;
use anyhow::{Context, Result};
use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

/// JSON schema for VedaLang source documents
pub const SOURCE_SCHEMA: &str = include_str!("../../schemas/vedalang.schema.json");

/// JSON schema for TableIR
pub const TABLE_IR_SCHEMA: &str = include_str!("../../schemas/tableir.schema.json");

/// Collections of named entities within the `model` section, with the noun used for one entry
const NAMED_COLLECTIONS: [(&str, &str); 4] = [
    ("commodities", "commodity"),
    ("processes", "process"),
    ("scenarios", "scenario"),
    ("constraints", "constraint"),
];

/// Compile one of the embedded schemas
fn compile_schema(schema: &str) -> Validator {
    let schema: Value = serde_json::from_str(schema).expect("Embedded schema is not valid JSON");
    jsonschema::validator_for(&schema).expect("Embedded schema is not a valid JSON schema")
}

fn source_validator() -> &'static Validator {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    VALIDATOR.get_or_init(|| compile_schema(SOURCE_SCHEMA))
}

fn table_ir_validator() -> &'static Validator {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    VALIDATOR.get_or_init(|| compile_schema(TABLE_IR_SCHEMA))
}

/// Describe the named entity containing the value at `path`, e.g. "process 'PP_CCGT'"
fn describe_entity(source: &Value, path: &str) -> Option<String> {
    let mut segments = path.split('/').skip(1);
    if segments.next()? != "model" {
        return None;
    }
    let collection = segments.next()?;
    let index = segments.next()?;
    let (_, noun) = NAMED_COLLECTIONS
        .iter()
        .find(|(name, _)| *name == collection)?;
    let name = source
        .pointer(&format!("/model/{collection}/{index}/name"))?
        .as_str()?;

    Some(format!("{noun} '{name}'"))
}

/// Check a document against a schema, reporting the first violation
fn validate_with(
    validator: &Validator,
    document: &'static str,
    instance: &Value,
) -> Result<(), StructuralValidationError> {
    let Some(error) = validator.iter_errors(instance).next() else {
        return Ok(());
    };

    let path = error.instance_path.to_string();
    let message = match describe_entity(instance, &path) {
        Some(entity) => format!("{error} (in {entity})"),
        None => error.to_string(),
    };

    Err(StructuralValidationError {
        document,
        path,
        message,
    })
}

/// Check a source document against the VedaLang schema.
///
/// Fails with a [`StructuralValidationError`] describing the first violation. Where the violation
/// lies within a named entity (e.g. a process), the message names it.
pub fn validate_source_structure(source: &Value) -> Result<()> {
    validate_with(source_validator(), "source", source)?;
    Ok(())
}

/// Check compiled tables against the TableIR schema
pub fn validate_table_ir_structure(table_ir: &TableIR) -> Result<()> {
    let instance = serde_json::to_value(table_ir).context("Could not serialise TableIR")?;
    validate_table_ir_value(&instance)
}

/// Check a TableIR document, as read from a file, against the TableIR schema
pub fn validate_table_ir_value(instance: &Value) -> Result<()> {
    validate_with(table_ir_validator(), "TableIR", instance)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::source;
    use rstest::rstest;
    use serde_json::json;

    fn structural_error(result: Result<()>) -> StructuralValidationError {
        let error = result.unwrap_err();
        let error = error.downcast_ref::<StructuralValidationError>().unwrap();
        StructuralValidationError {
            document: error.document,
            path: error.path.clone(),
            message: error.message.clone(),
        }
    }

    #[test]
    fn embedded_schemas_compile() {
        source_validator();
        table_ir_validator();
    }

    #[rstest]
    fn valid_source(source: Value) {
        validate_source_structure(&source).unwrap();
    }

    #[rstest]
    fn missing_primary_commodity_group(mut source: Value) {
        source["model"]["processes"][2]
            .as_object_mut()
            .unwrap()
            .remove("primary_commodity_group");

        let error = structural_error(validate_source_structure(&source));
        assert_eq!(error.document, "source");
        assert_eq!(error.path, "/model/processes/2");
        assert!(error.message.contains("primary_commodity_group"));
        assert!(error.message.ends_with("(in process 'DMD_RSD')"));
    }

    #[rstest]
    #[case("/model/processes/1/efficiency", json!(1.5))]
    #[case("/model/processes/1/efficiency", json!(0))]
    #[case("/model/processes/1/primary_commodity_group", json!("NRG"))]
    #[case("/model/commodities/0/type", json!("fuel"))]
    fn invalid_values(mut source: Value, #[case] pointer: &str, #[case] value: Value) {
        *source.pointer_mut(pointer).unwrap() = value;
        let error = structural_error(validate_source_structure(&source));
        assert_eq!(error.path, pointer);
    }

    #[rstest]
    fn overlong_time_period(mut source: Value) {
        source["model"]["time_periods"] = json!([4_294_967_000u32, 10]);
        let error = structural_error(validate_source_structure(&source));
        assert_eq!(error.path, "/model/time_periods/0");
    }

    #[rstest]
    fn invalid_share(mut source: Value) {
        source["model"]["processes"][1]["outputs"][0]["share"] = json!(1.2);
        let error = structural_error(validate_source_structure(&source));
        assert_eq!(error.path, "/model/processes/1/outputs/0/share");
        assert!(error.message.ends_with("(in process 'PP_CCGT')"));
    }

    #[test]
    fn missing_model_section() {
        let error = structural_error(validate_source_structure(&json!({"name": "x"})));
        assert_eq!(error.path, "");
        assert!(error.message.contains("model"));
    }

    #[test]
    fn table_ir_tag_pattern() {
        validate_table_ir_value(&json!({"files": []})).unwrap();

        let bad = json!({"files": [{"path": "a.xlsx", "sheets": [{"name": "s", "tables": [
            {"tag": "FI_T", "rows": []}
        ]}]}]});
        let error = structural_error(validate_table_ir_value(&bad));
        assert_eq!(error.document, "TableIR");
        assert_eq!(error.path, "/files/0/sheets/0/tables/0/tag");
    }

    #[test]
    fn table_ir_nested_values_rejected() {
        let bad = json!({"files": [{"path": "a.xlsx", "sheets": [{"name": "s", "tables": [
            {"tag": "~FI_T", "rows": [{"region": {"nested": 1}}]}
        ]}]}]});
        let error = structural_error(validate_table_ir_value(&bad));
        assert_eq!(error.path, "/files/0/sheets/0/tables/0/rows/0/region");
    }
}
