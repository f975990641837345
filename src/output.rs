//! The module responsible for writing compiled TableIR to file.
use crate::table_ir::TableIR;
use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialisation format for TableIR output
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML
    #[default]
    Yaml,
    /// JSON, pretty-printed
    Json,
}

impl OutputFormat {
    /// Guess the format from a file's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Serialise TableIR in the given format
pub fn table_ir_to_string(table_ir: &TableIR, format: OutputFormat) -> Result<String> {
    let contents = match format {
        OutputFormat::Yaml => serde_yaml::to_string(table_ir)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(table_ir)?;
            json.push('\n');
            json
        }
    };

    Ok(contents)
}

/// Write TableIR to the specified file, creating parent directories as needed.
///
/// # Arguments
///
/// * `table_ir` - The compiled tables
/// * `path` - Path of the file to write
/// * `format` - Serialisation format
/// * `allow_overwrite` - Whether to replace an existing file
///
/// # Returns
///
/// Whether an existing file was overwritten, or an error.
pub fn write_table_ir(
    table_ir: &TableIR,
    path: &Path,
    format: OutputFormat,
    allow_overwrite: bool,
) -> Result<bool> {
    let exists = path.exists();
    ensure!(
        !exists || allow_overwrite,
        "Output file {} already exists. Use --overwrite to replace it.",
        path.display()
    );

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create directory {}", parent.display()))?;
    }

    let contents = table_ir_to_string(table_ir, format)?;
    fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))?;

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lower_model;
    use crate::fixture::model;
    use crate::input::load_table_ir;
    use crate::model::Model;
    use rstest::rstest;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[rstest]
    #[case("out.yaml", Some(OutputFormat::Yaml))]
    #[case("out.yml", Some(OutputFormat::Yaml))]
    #[case("out.json", Some(OutputFormat::Json))]
    #[case("out.xlsx", None)]
    #[case("out", None)]
    fn format_from_path(#[case] path: &str, #[case] expected: Option<OutputFormat>) {
        assert_eq!(OutputFormat::from_path(&PathBuf::from(path)), expected);
    }

    #[rstest]
    fn write_and_reload(model: Model, #[values(OutputFormat::Yaml, OutputFormat::Json)] format: OutputFormat) {
        let table_ir = lower_model(&model);
        let dir = tempdir().unwrap();
        let extension = match format {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        };
        let path = dir.path().join("nested").join(format!("tableir.{extension}"));

        assert!(!write_table_ir(&table_ir, &path, format, false).unwrap());
        assert_eq!(load_table_ir(&path).unwrap(), table_ir);
    }

    #[rstest]
    fn overwrite(model: Model) {
        let table_ir = lower_model(&model);
        let dir = tempdir().unwrap();
        let path = dir.path().join("tableir.yaml");
        fs::write(&path, "").unwrap();

        assert!(write_table_ir(&table_ir, &path, OutputFormat::Yaml, false).is_err());
        assert!(write_table_ir(&table_ir, &path, OutputFormat::Yaml, true).unwrap());
    }
}
