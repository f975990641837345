//! Structured diagnostics reported by the downstream checker.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Version of the diagnostics format written by this program
pub const DIAGNOSTICS_VERSION: &str = "1.0.0";

/// How serious a diagnostic is
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The model cannot be processed
    Error,
    /// The model can be processed but is probably not what was intended
    Warning,
    /// For information only
    Info,
}

/// Where in the checker's input a diagnostic arose
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocation {
    /// Output file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Sheet within the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Cell range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Table tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Row number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    /// Column name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// A single diagnostic message
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Location of the problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
    /// Arbitrary extra information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Counts of diagnostics by severity
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Number of info messages
    pub info_count: usize,
}

impl Summary {
    /// Count the diagnostics of each severity
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let count = |severity| {
            diagnostics
                .iter()
                .filter(|diagnostic| diagnostic.severity == severity)
                .count()
        };

        Self {
            error_count: count(Severity::Error),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
        }
    }
}

/// A diagnostics document, as written by the checker
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Overall status: "success", "warning" or "error"
    #[serde(default)]
    pub status: String,
    /// Every diagnostic, in the order reported
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    /// Counts by severity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

fn default_version() -> String {
    DIAGNOSTICS_VERSION.to_string()
}

impl DiagnosticsDocument {
    /// Read a diagnostics document from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read diagnostics file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid diagnostics file {}", path.display()))
    }

    /// The summary, recomputed from the diagnostics if the document has none
    pub fn summary(&self) -> Summary {
        self.summary
            .unwrap_or_else(|| Summary::from_diagnostics(&self.diagnostics))
    }

    /// Iterate over the diagnostics with the given severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity == severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diagnostic(severity: Severity, message: &str) -> Diagnostic {
        Diagnostic {
            severity,
            code: "TEST".into(),
            message: message.into(),
            source: None,
            context: None,
            suggestion: None,
        }
    }

    #[test]
    fn with_severity_and_summary() {
        let doc = DiagnosticsDocument {
            version: DIAGNOSTICS_VERSION.into(),
            status: "error".into(),
            diagnostics: vec![
                diagnostic(Severity::Warning, "w"),
                diagnostic(Severity::Error, "e"),
                diagnostic(Severity::Info, "i"),
            ],
            summary: None,
        };
        assert_eq!(
            doc.with_severity(Severity::Error)
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>(),
            ["e"]
        );
        assert_eq!(
            doc.summary(),
            Summary {
                error_count: 1,
                warning_count: 1,
                info_count: 1
            }
        );
    }

    #[test]
    fn version_defaults_when_absent() {
        let doc: DiagnosticsDocument = serde_json::from_value(json!({"diagnostics": []})).unwrap();
        assert_eq!(doc.version, DIAGNOSTICS_VERSION);
        assert_eq!(doc.status, "");
    }

    #[test]
    fn summary_recomputed_when_absent() {
        let doc: DiagnosticsDocument = serde_json::from_value(json!({
            "version": "1.0.0",
            "status": "error",
            "timestamp": "2024-01-01T00:00:00",
            "diagnostics": [
                {"severity": "error", "code": "MISSING_TABLE", "message": "No ~FI_T table",
                 "source": {"file": "VT_M_m.xlsx", "tag": "~FI_T"}},
                {"severity": "warning", "code": "W1", "message": "odd", "suggestion": "fix it"}
            ]
        }))
        .unwrap();

        assert_eq!(doc.summary, None);
        assert_eq!(
            doc.summary(),
            Summary {
                error_count: 1,
                warning_count: 1,
                info_count: 0
            }
        );
        let source = doc.diagnostics[0].source.as_ref().unwrap();
        assert_eq!(source.tag.as_deref(), Some("~FI_T"));
        assert_eq!(source.row, None);
    }

    #[test]
    fn serialise_skips_missing_fields() {
        let value = serde_json::to_value(diagnostic(Severity::Info, "i")).unwrap();
        assert_eq!(
            value,
            json!({"severity": "info", "code": "TEST", "message": "i"})
        );
    }
}
