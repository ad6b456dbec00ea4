//! Recursive descent parser for the restricted filter grammar
//!
//! ```text
//! expr      := and_chain (OR and_chain)*
//! and_chain := negation (AND negation)*
//! negation  := NOT negation | primary
//! primary   := '(' expr ')' | condition
//! condition := column ( cmp value
//!                     | IN '(' value (',' value)* ')'
//!                     | IS [NOT] NULL )
//! value     := string | number
//! ```
//!
//! The parser never evaluates anything. It accepts or rejects the clause and
//! records which columns it references, so the caller can resolve them
//! against the selected key set. Nesting of parentheses and NOT is bounded;
//! a clause past the bound is rejected like any other invalid input.

use std::collections::BTreeSet;
use std::fmt;

use super::lexer::Token;

/// Nesting bound for parentheses and NOT. Parsing recurses once per level,
/// so depth past the bound must fail as an ordinary error instead of
/// overflowing the stack.
const MAX_NESTING_DEPTH: usize = 128;

/// Error produced while parsing a tokenized filter clause
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFilterError {
    pub message: String,
}

impl fmt::Display for ParseFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseFilterError {}

/// Single-use parser over a token stream.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    columns: BTreeSet<String>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            columns: BTreeSet::new(),
        }
    }

    /// Parse the whole token stream as one boolean expression and return the
    /// set of columns it references. Trailing tokens fail the clause.
    pub fn parse(mut self) -> Result<BTreeSet<String>, ParseFilterError> {
        if self.tokens.is_empty() {
            return Err(ParseFilterError {
                message: "empty filter".to_string(),
            });
        }
        self.expr()?;
        if let Some(token) = self.peek() {
            return Err(ParseFilterError {
                message: format!("unexpected '{}' after end of expression", token),
            });
        }
        Ok(self.columns)
    }

    fn expr(&mut self) -> Result<(), ParseFilterError> {
        self.and_chain()?;
        while self.eat(&Token::Or) {
            self.and_chain()?;
        }
        Ok(())
    }

    fn and_chain(&mut self) -> Result<(), ParseFilterError> {
        self.negation()?;
        while self.eat(&Token::And) {
            self.negation()?;
        }
        Ok(())
    }

    /// Every recursion cycle in the grammar passes through here, so this is
    /// where the nesting depth is tracked and capped.
    fn negation(&mut self) -> Result<(), ParseFilterError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseFilterError {
                message: "expression nesting too deep".to_string(),
            });
        }
        self.depth += 1;
        let result = if self.eat(&Token::Not) {
            self.negation()
        } else {
            self.primary()
        };
        self.depth -= 1;
        result
    }

    fn primary(&mut self) -> Result<(), ParseFilterError> {
        if self.eat(&Token::LParen) {
            self.expr()?;
            self.expect(&Token::RParen)?;
            return Ok(());
        }
        self.condition()
    }

    fn condition(&mut self) -> Result<(), ParseFilterError> {
        let column = match self.advance() {
            Some(Token::Column(name)) => name.clone(),
            Some(token) => {
                return Err(ParseFilterError {
                    message: format!("expected column name, found '{}'", token),
                })
            }
            None => {
                return Err(ParseFilterError {
                    message: "expected column name at end of filter".to_string(),
                })
            }
        };
        self.columns.insert(column);

        match self.advance() {
            Some(
                Token::Eq | Token::NotEq | Token::Lt | Token::LtEq | Token::Gt | Token::GtEq,
            ) => self.value(),
            Some(Token::In) => self.in_list(),
            Some(Token::Is) => self.null_test(),
            Some(token) => Err(ParseFilterError {
                message: format!("expected comparison, IN or IS after column, found '{}'", token),
            }),
            None => Err(ParseFilterError {
                message: "expected comparison, IN or IS after column".to_string(),
            }),
        }
    }

    /// Comparison and IN list operands are literals only. A column on the
    /// right-hand side is rejected, which also keeps expressions like
    /// `a = a` out of the grammar.
    fn value(&mut self) -> Result<(), ParseFilterError> {
        match self.advance() {
            Some(Token::Text(_) | Token::Number(_)) => Ok(()),
            Some(token) => Err(ParseFilterError {
                message: format!("expected string or number, found '{}'", token),
            }),
            None => Err(ParseFilterError {
                message: "expected string or number at end of filter".to_string(),
            }),
        }
    }

    fn in_list(&mut self) -> Result<(), ParseFilterError> {
        self.expect(&Token::LParen)?;
        self.value()?;
        while self.eat(&Token::Comma) {
            self.value()?;
        }
        self.expect(&Token::RParen)
    }

    fn null_test(&mut self) -> Result<(), ParseFilterError> {
        self.eat(&Token::Not);
        match self.advance() {
            Some(Token::Null) => Ok(()),
            Some(token) => Err(ParseFilterError {
                message: format!("expected NULL after IS, found '{}'", token),
            }),
            None => Err(ParseFilterError {
                message: "expected NULL after IS".to_string(),
            }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseFilterError> {
        if self.eat(expected) {
            return Ok(());
        }
        match self.peek() {
            Some(token) => Err(ParseFilterError {
                message: format!("expected '{}', found '{}'", expected, token),
            }),
            None => Err(ParseFilterError {
                message: format!("expected '{}' at end of filter", expected),
            }),
        }
    }
}
