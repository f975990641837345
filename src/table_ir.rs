//! TableIR: the tabular intermediate representation produced by the compiler.
//!
//! A [`TableIR`] is a list of files, each holding sheets, each holding tables. A table has a tag
//! (e.g. `~FI_T`) naming its role and a list of rows. Rows are sparse: each maps column names to
//! scalar values and the header of a table is the union of its rows' columns.
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// String
    Str(String),
}

impl Scalar {
    /// The value as a string slice, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A table row: column name to value, in insertion order
pub type Row = IndexMap<String, Scalar>;

/// Build a [`Row`] from `column => value` pairs
macro_rules! row {
    ($($column:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut row = $crate::table_ir::Row::new();
        $(row.insert($column.to_string(), $crate::table_ir::Scalar::from($value));)*
        row
    }};
}
pub(crate) use row;

/// A tagged table
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// The table's role (e.g. `~FI_T`)
    pub tag: String,
    /// Scope settings for user-constraint tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uc_sets: Option<IndexMap<String, String>>,
    /// The table's rows
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table with the given tag and rows
    pub fn new(tag: &str, rows: Vec<Row>) -> Self {
        Self {
            tag: tag.to_string(),
            uc_sets: None,
            rows,
        }
    }

    /// The union of the columns of all rows, in order of first appearance
    pub fn columns(&self) -> IndexSet<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }
}

/// A sheet within a file
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// Tables on this sheet
    pub tables: Vec<Table>,
}

impl Sheet {
    /// Create a sheet with the given name and tables
    pub fn new(name: &str, tables: Vec<Table>) -> Self {
        Self {
            name: name.to_string(),
            tables,
        }
    }
}

/// An output file
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TableFile {
    /// Path of the file, relative to the output directory
    pub path: String,
    /// Sheets in this file
    pub sheets: Vec<Sheet>,
}

impl TableFile {
    /// Create a file with the given path and sheets
    pub fn new(path: &str, sheets: Vec<Sheet>) -> Self {
        Self {
            path: path.to_string(),
            sheets,
        }
    }
}

/// The complete output of compiling a model
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableIR {
    /// Output files, in emission order
    pub files: Vec<TableFile>,
}

impl TableIR {
    /// Iterate over every table along with the file and sheet containing it
    pub fn iter_tables(&self) -> impl Iterator<Item = (&TableFile, &Sheet, &Table)> {
        self.files.iter().flat_map(|file| {
            file.sheets.iter().flat_map(move |sheet| {
                sheet.tables.iter().map(move |table| (file, sheet, table))
            })
        })
    }

    /// Iterate over the tables with the given tag
    pub fn tables_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Table> {
        self.iter_tables()
            .map(|(_, _, table)| table)
            .filter(move |table| table.tag == tag)
    }

    /// Get the file with the given path
    pub fn file(&self, path: &str) -> Option<&TableFile> {
        self.files.iter().find(|file| file.path == path)
    }

    /// The total number of rows across all tables
    pub fn total_rows(&self) -> usize {
        self.iter_tables().map(|(_, _, table)| table.rows.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_ir() -> TableIR {
        TableIR {
            files: vec![TableFile::new(
                "SysSettings.xlsx",
                vec![Sheet::new(
                    "SysSets",
                    vec![
                        Table::new("~STARTYEAR", vec![row!("value" => 2020u32)]),
                        Table::new(
                            "~FI_COMM",
                            vec![
                                row!("region" => "REG1", "commodity" => "NG"),
                                row!("region" => "REG1", "unit" => "PJ"),
                            ],
                        ),
                    ],
                )],
            )],
        }
    }

    #[test]
    fn row_macro_keeps_order() {
        let row = row!("b" => 1.5, "a" => true, "c" => "x");
        assert_eq!(row.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(row["b"], Scalar::Float(1.5));
    }

    #[test]
    fn table_columns_union() {
        let ir = table_ir();
        let table = ir.tables_with_tag("~FI_COMM").next().unwrap();
        assert_eq!(
            table.columns().into_iter().collect::<Vec<_>>(),
            ["region", "commodity", "unit"]
        );
        assert_eq!(ir.total_rows(), 3);
    }

    #[test]
    fn serialise_to_json() {
        let value = serde_json::to_value(table_ir()).unwrap();
        assert_eq!(
            value["files"][0]["sheets"][0]["tables"][0],
            json!({"tag": "~STARTYEAR", "rows": [{"value": 2020}]})
        );
    }

    #[test]
    fn deserialise_scalars() {
        let row: Row = serde_json::from_value(json!({"a": 1, "b": 0.5, "c": "x", "d": false}))
            .unwrap();
        assert_eq!(row["a"], Scalar::Int(1));
        assert_eq!(row["b"], Scalar::Float(0.5));
        assert_eq!(row["c"], Scalar::Str("x".into()));
        assert_eq!(row["d"], Scalar::Bool(false));
    }
}
