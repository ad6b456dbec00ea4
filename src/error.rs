//! Error types for themepack

use std::fmt;

/// Errors that can occur while validating a theme document
#[derive(Debug)]
pub enum ValidateError {
    /// IO error reading a document file
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The document is not well-formed YAML
    Syntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// The document is well-formed but violates a structural rule
    Schema(String),
    /// A theme's `where` clause failed filter validation
    Filter {
        theme: String,
        errors: Vec<String>,
    },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::Io { path, source } => {
                write!(f, "failed to read '{}': {}", path, source)
            }
            ValidateError::Syntax { message, .. } => {
                write!(f, "invalid YAML: {}", message)
            }
            ValidateError::Schema(message) => {
                write!(f, "{}", message)
            }
            ValidateError::Filter { theme, errors } => {
                write!(f, "invalid filter in theme '{}': {}", theme, errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ValidateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidateError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ValidateError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        ValidateError::Syntax {
            message: err.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }
}
