//! Canonical-form checks on compiled tables.
//!
//! These catch tables which are structurally valid but which downstream tools would misread, such
//! as years used as column headers.
use crate::compiler::{ACTIVEPDEF, FI_T, STARTYEAR, TFM_DINS_AT, TRADELINKS};
use crate::table_ir::{Scalar, Table, TableIR};
use regex::Regex;
use std::sync::LazyLock;

static COLUMN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("Invalid regex"));
static YEAR_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[12][0-9]{3}$").expect("Invalid regex"));

/// Tags whose column headers are data rather than names (e.g. regions and commodities)
const MATRIX_TAGS: [&str; 1] = [TRADELINKS];

/// Tags holding a single value
const SCALAR_TAGS: [&str; 2] = [STARTYEAR, ACTIVEPDEF];

/// Tags which must use attribute columns rather than a `value` column
const NO_VALUE_TAGS: [&str; 2] = [FI_T, TFM_DINS_AT];

/// Check the columns and values of one table
fn check_table(table: &Table, errors: &mut Vec<String>) {
    let tag = &table.tag;
    let columns = table.columns();

    if !MATRIX_TAGS.contains(&tag.as_str()) {
        for column in &columns {
            if YEAR_LIKE.is_match(column) {
                errors.push(format!(
                    "{tag}: column '{column}' looks like a year. Years must be given in a 'year' \
                     column"
                ));
            } else if !COLUMN_NAME.is_match(column) {
                errors.push(format!(
                    "{tag}: column '{column}' is not in canonical form (lower case letters, \
                     digits, '_' and '-')"
                ));
            }
        }
    }

    if SCALAR_TAGS.contains(&tag.as_str()) {
        if let Some(column) = columns.iter().find(|column| **column != "value") {
            errors.push(format!(
                "{tag}: scalar table has column '{column}'. Only 'value' is allowed"
            ));
        }
        if tag == STARTYEAR {
            for value in table.rows.iter().filter_map(|row| row.get("value")) {
                if !matches!(value, Scalar::Int(_)) {
                    errors.push(format!("{tag}: start year '{value}' is not an integer"));
                }
            }
        }
    }

    if NO_VALUE_TAGS.contains(&tag.as_str()) && columns.contains("value") {
        errors.push(format!("{tag}: 'value' column not allowed in this table"));
    }

    for (i, value) in table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| Some((i, row.get("year")?)))
    {
        if !matches!(value, Scalar::Int(_)) {
            errors.push(format!(
                "{tag} (row {}): year '{value}' is not an integer",
                i + 1
            ));
        }
    }

    for (key, value) in table.uc_sets.iter().flatten() {
        if value.ends_with(':') {
            errors.push(format!(
                "{tag}: uc_sets value for '{key}' must not end with ':' (got '{value}')"
            ));
        }
    }
}

/// Check every table of a TableIR document for canonical form.
///
/// # Returns
///
/// Every problem found, each prefixed with the file and sheet containing the table.
pub fn check_canonical_form(table_ir: &TableIR) -> Vec<String> {
    let mut errors = Vec::new();
    for (file, sheet, table) in table_ir.iter_tables() {
        let mut table_errors = Vec::new();
        check_table(table, &mut table_errors);
        errors.extend(
            table_errors
                .into_iter()
                .map(|error| format!("{}/{}: {error}", file.path, sheet.name)),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{UC_T, lower_model};
    use crate::fixture::model;
    use crate::model::Model;
    use crate::table_ir::{Row, Sheet, TableFile, row};
    use indexmap::indexmap;
    use rstest::rstest;

    fn check(table: Table) -> Vec<String> {
        let mut errors = Vec::new();
        check_table(&table, &mut errors);
        errors
    }

    #[rstest]
    fn compiled_model_is_canonical(model: Model) {
        assert!(check_canonical_form(&lower_model(&model)).is_empty());
    }

    #[rstest]
    #[case(row!("region" => "R", "2020" => 1.0), "~FI_T: column '2020' looks like a year. Years must be given in a 'year' column")]
    #[case(row!("Region" => "R", "eff" => 1.0), "~FI_T: column 'Region' is not in canonical form (lower case letters, digits, '_' and '-')")]
    #[case(row!("region" => "R", "value" => 1.0), "~FI_T: 'value' column not allowed in this table")]
    #[case(row!("region" => "R", "year" => "2020"), "~FI_T (row 1): year '2020' is not an integer")]
    fn process_table_problems(#[case] row: Row, #[case] msg: &str) {
        assert_eq!(check(Table::new(FI_T, vec![row])), [msg]);
    }

    #[test]
    fn scalar_tables() {
        assert!(check(Table::new(STARTYEAR, vec![row!("value" => 2020u32)])).is_empty());
        assert_eq!(
            check(Table::new(STARTYEAR, vec![row!("value" => 2020.0, "year" => 2020u32)])),
            [
                "~STARTYEAR: scalar table has column 'year'. Only 'value' is allowed",
                "~STARTYEAR: start year '2020' is not an integer"
            ]
        );
    }

    #[test]
    fn matrix_tables_exempt() {
        let table = Table::new(TRADELINKS, vec![row!("ELC" => "REG1", "REG2" => "T_B_ELC")]);
        assert!(check(table).is_empty());
    }

    #[test]
    fn uc_sets_trailing_colon() {
        let mut table = Table::new(UC_T, vec![row!("uc_n" => "c", "uc_rhsrt" => 1.0)]);
        table.uc_sets = Some(indexmap! {"R_E".to_string() => "AllRegions:".to_string()});
        let table_ir = TableIR {
            files: vec![TableFile::new("f.xlsx", vec![Sheet::new("s", vec![table])])],
        };
        assert_eq!(
            check_canonical_form(&table_ir),
            ["f.xlsx/s: ~UC_T: uc_sets value for 'R_E' must not end with ':' (got 'AllRegions:')"]
        );
    }
}
