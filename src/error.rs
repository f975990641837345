//! Error types for the validation stages that callers need to tell apart.
//!
//! These are returned wrapped in [`anyhow::Error`]; use `downcast_ref` to recover them.
use std::fmt;
use thiserror::Error;

/// A document which does not conform to its structural schema
#[derive(Debug, Error, PartialEq)]
#[error("{document} failed schema validation at '{path}': {message}")]
pub struct StructuralValidationError {
    /// Which document was being validated (e.g. "source")
    pub document: &'static str,
    /// JSON pointer to the offending value
    pub path: String,
    /// Description of the violation
    pub message: String,
}

/// Unresolved references or incompatible targets in a model
#[derive(Debug, Error, PartialEq)]
pub struct SemanticValidationError {
    /// Every error found in the model
    pub errors: Vec<String>,
    /// Non-fatal warnings found alongside the errors
    pub warnings: Vec<String>,
}

impl fmt::Display for SemanticValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} semantic error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        if !self.warnings.is_empty() {
            write!(f, "\n{} warning(s):", self.warnings.len())?;
            for warning in &self.warnings {
                write!(f, "\n  - {warning}")?;
            }
        }

        Ok(())
    }
}

/// Compiled tables which do not conform to the table-shape schemas
#[derive(Debug, Error, PartialEq)]
#[error("{}", .errors.join("\n"))]
pub struct TableValidationError {
    /// Every violation found
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_error_message() {
        let error = SemanticValidationError {
            errors: vec!["bad ref".into(), "other ref".into()],
            warnings: vec!["odd unit".into()],
        };
        assert_eq!(
            error.to_string(),
            "2 semantic error(s):\n  - bad ref\n  - other ref\n1 warning(s):\n  - odd unit"
        );
    }

    #[test]
    fn semantic_error_message_no_warnings() {
        let error = SemanticValidationError {
            errors: vec!["bad ref".into()],
            warnings: Vec::new(),
        };
        assert_eq!(error.to_string(), "1 semantic error(s):\n  - bad ref");
    }

    #[test]
    fn table_error_message() {
        let error = TableValidationError {
            errors: vec!["a".into(), "b".into()],
        };
        assert_eq!(error.to_string(), "a\nb");
    }
}
