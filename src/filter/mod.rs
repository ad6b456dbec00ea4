//! Filter clause validation
//!
//! A theme may carry a `where` clause that gets copied verbatim into the
//! generated SQL. Every clause is checked against a restricted boolean
//! grammar before anything is emitted: comparisons, IN lists and NULL tests
//! over named columns, combined with AND/OR/NOT and parentheses. Statement
//! separators, comments, subqueries and function calls do not tokenize, so a
//! hostile clause fails validation instead of reaching the database.

mod lexer;
mod parser;

use std::collections::BTreeSet;
use std::fmt;

use lexer::LexError;
use parser::{ParseFilterError, Parser};

/// Error describing why a filter clause was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct FilterError {
    pub errors: Vec<String>,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join("; "))
    }
}

impl std::error::Error for FilterError {}

impl From<LexError> for FilterError {
    fn from(err: LexError) -> Self {
        FilterError {
            errors: vec![err.to_string()],
        }
    }
}

impl From<ParseFilterError> for FilterError {
    fn from(err: ParseFilterError) -> Self {
        FilterError {
            errors: vec![err.message],
        }
    }
}

/// Validation policy for `where` clauses.
///
/// Document validation calls this once per clause. A successful result
/// carries the set of columns the clause references, which the caller
/// resolves against the theme's selected keys.
pub trait FilterValidator {
    fn validate(&self, clause: &str) -> Result<BTreeSet<String>, FilterError>;
}

/// Default validator accepting only the restricted boolean grammar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlValidator;

impl FilterValidator for SqlValidator {
    fn validate(&self, clause: &str) -> Result<BTreeSet<String>, FilterError> {
        let tokens = lexer::tokenize(clause)?;
        let columns = Parser::new(&tokens).parse()?;
        Ok(columns)
    }
}
