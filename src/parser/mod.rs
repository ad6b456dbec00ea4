//! Document parser (verb module)
//!
//! Transforms raw theme documents into the validated model.

mod validate;

use std::path::Path;

use crate::error::ValidateError;
use crate::filter::{FilterValidator, SqlValidator};
use crate::model::ThemeSelection;

pub use validate::RESERVED_THEME_NAMES;

/// Parse and validate a theme document from a YAML string.
pub fn parse_str(yaml: &str) -> Result<ThemeSelection, ValidateError> {
    parse_str_with(yaml, &SqlValidator)
}

/// Parse and validate with a caller-supplied filter validator.
pub fn parse_str_with(
    yaml: &str,
    validator: &dyn FilterValidator,
) -> Result<ThemeSelection, ValidateError> {
    validate::validate(yaml, validator)
}

/// Parse and validate a theme document from a YAML file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ThemeSelection, ValidateError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ValidateError::Io {
        path: path_str,
        source: e,
    })?;
    parse_str(&contents)
}
