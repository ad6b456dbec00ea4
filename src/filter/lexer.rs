//! Tokenizer for theme filter clauses
//!
//! Hand-written so the accepted character set stays closed: anything outside
//! the restricted grammar (semicolons, comment introducers, arithmetic) is a
//! lex error rather than something passed through to the generated SQL.

use std::fmt;

/// Token types for filter clauses
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords (matched case-insensitively)
    And,
    Or,
    Not,
    In,
    Is,
    Null,

    /// Column reference, with any surrounding double quotes stripped
    Column(String),
    /// Single-quoted string literal, quotes stripped and '' unescaped
    Text(String),
    /// Unsigned numeric literal, kept as written
    Number(String),

    // Comparison operators
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Punctuation
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::In => write!(f, "IN"),
            Token::Is => write!(f, "IS"),
            Token::Null => write!(f, "NULL"),
            Token::Column(name) => write!(f, "{}", name),
            Token::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
            Token::Number(value) => write!(f, "{}", value),
            Token::Eq => write!(f, "="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Error produced while tokenizing a filter clause
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    /// Character offset into the clause
    pub position: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

/// Tokenize a filter clause.
///
/// Whitespace separates tokens and is otherwise ignored. Any character that
/// cannot start a token of the restricted grammar fails the whole clause.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            c if c.is_whitespace() => pos += 1,
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            '=' => {
                tokens.push(Token::Eq);
                pos += 1;
            }
            '!' => {
                if chars.get(pos + 1) == Some(&'=') {
                    tokens.push(Token::NotEq);
                    pos += 2;
                } else {
                    return Err(LexError {
                        message: "expected '=' after '!'".to_string(),
                        position: pos,
                    });
                }
            }
            '<' => match chars.get(pos + 1) {
                Some('=') => {
                    tokens.push(Token::LtEq);
                    pos += 2;
                }
                Some('>') => {
                    tokens.push(Token::NotEq);
                    pos += 2;
                }
                _ => {
                    tokens.push(Token::Lt);
                    pos += 1;
                }
            },
            '>' => {
                if chars.get(pos + 1) == Some(&'=') {
                    tokens.push(Token::GtEq);
                    pos += 2;
                } else {
                    tokens.push(Token::Gt);
                    pos += 1;
                }
            }
            '\'' => {
                let (value, next) = lex_text(&chars, pos)?;
                tokens.push(Token::Text(value));
                pos = next;
            }
            '"' => {
                let (name, next) = lex_quoted_column(&chars, pos)?;
                tokens.push(Token::Column(name));
                pos = next;
            }
            c if c.is_ascii_digit() => {
                let (value, next) = lex_number(&chars, pos);
                tokens.push(Token::Number(value));
                pos = next;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let (word, next) = lex_word(&chars, pos);
                tokens.push(keyword_or_column(word));
                pos = next;
            }
            _ => {
                return Err(LexError {
                    message: format!("unexpected character '{}'", c),
                    position: pos,
                });
            }
        }
    }

    Ok(tokens)
}

/// Consume a single-quoted string literal. A doubled quote inside the
/// literal is the SQL escape for a literal quote.
fn lex_text(chars: &[char], start: usize) -> Result<(String, usize), LexError> {
    let mut value = String::new();
    let mut pos = start + 1;
    while pos < chars.len() {
        if chars[pos] == '\'' {
            if chars.get(pos + 1) == Some(&'\'') {
                value.push('\'');
                pos += 2;
            } else {
                return Ok((value, pos + 1));
            }
        } else {
            value.push(chars[pos]);
            pos += 1;
        }
    }
    Err(LexError {
        message: "unterminated string literal".to_string(),
        position: start,
    })
}

/// Consume a double-quoted column name. Embedded quotes are not supported.
fn lex_quoted_column(chars: &[char], start: usize) -> Result<(String, usize), LexError> {
    let mut name = String::new();
    let mut pos = start + 1;
    while pos < chars.len() {
        if chars[pos] == '"' {
            if name.is_empty() {
                return Err(LexError {
                    message: "empty quoted column name".to_string(),
                    position: start,
                });
            }
            return Ok((name, pos + 1));
        }
        name.push(chars[pos]);
        pos += 1;
    }
    Err(LexError {
        message: "unterminated quoted column name".to_string(),
        position: start,
    })
}

/// Consume an unsigned integer or decimal literal.
fn lex_number(chars: &[char], start: usize) -> (String, usize) {
    let mut value = String::new();
    let mut pos = start;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        value.push(chars[pos]);
        pos += 1;
    }
    if chars.get(pos) == Some(&'.') && chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit()) {
        value.push('.');
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            value.push(chars[pos]);
            pos += 1;
        }
    }
    (value, pos)
}

/// Consume a bare word: a keyword or an unquoted column name. Colons are
/// allowed so namespaced OSM keys like addr:housenumber work unquoted.
fn lex_word(chars: &[char], start: usize) -> (String, usize) {
    let mut word = String::new();
    let mut pos = start;
    while pos < chars.len()
        && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_' || chars[pos] == ':')
    {
        word.push(chars[pos]);
        pos += 1;
    }
    (word, pos)
}

fn keyword_or_column(word: String) -> Token {
    match word.to_ascii_lowercase().as_str() {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "in" => Token::In,
        "is" => Token::Is,
        "null" => Token::Null,
        _ => Token::Column(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_condition() {
        let tokens = tokenize("amenity = 'cafe'").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Column("amenity".to_string()),
                Token::Eq,
                Token::Text("cafe".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let tokens = tokenize("a IS NOT null and b or not c in").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Column("a".to_string()),
                Token::Is,
                Token::Not,
                Token::Null,
                Token::And,
                Token::Column("b".to_string()),
                Token::Or,
                Token::Not,
                Token::Column("c".to_string()),
                Token::In,
            ]
        );
    }

    #[test]
    fn test_quoted_column() {
        let tokens = tokenize("\"addr:city\" = 'Dar es Salaam'").unwrap();
        assert_eq!(tokens[0], Token::Column("addr:city".to_string()));
    }

    #[test]
    fn test_bare_column_with_colon() {
        let tokens = tokenize("addr:housenumber IS NOT NULL").unwrap();
        assert_eq!(tokens[0], Token::Column("addr:housenumber".to_string()));
    }

    #[test]
    fn test_string_escape() {
        let tokens = tokenize("name = 'O''Brien'").unwrap();
        assert_eq!(tokens[2], Token::Text("O'Brien".to_string()));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokenize("7").unwrap(), vec![Token::Number("7".to_string())]);
        assert_eq!(tokenize("3.5").unwrap(), vec![Token::Number("3.5".to_string())]);
        // A trailing dot is not part of the number
        assert!(tokenize("3.").is_err());
    }

    #[test]
    fn test_comparison_operators() {
        let tokens = tokenize("= != <> < <= > >=").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Eq,
                Token::NotEq,
                Token::NotEq,
                Token::Lt,
                Token::LtEq,
                Token::Gt,
                Token::GtEq,
            ]
        );
    }

    #[test]
    fn test_rejects_statement_break() {
        let err = tokenize("1; DROP TABLE planet_osm_point").unwrap_err();
        assert!(err.message.contains("';'"));
    }

    #[test]
    fn test_rejects_comment_introducer() {
        assert!(tokenize("amenity = 'cafe' -- comment").is_err());
        assert!(tokenize("amenity = 'cafe' /* comment */").is_err());
    }

    #[test]
    fn test_rejects_signed_number() {
        assert!(tokenize("layer = -1").is_err());
        assert!(tokenize("layer = +1").is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("name = 'open").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_unterminated_quoted_column() {
        let err = tokenize("\"addr:city = 'x'").unwrap_err();
        assert_eq!(err.message, "unterminated quoted column name");
    }

    #[test]
    fn test_empty_quoted_column() {
        let err = tokenize("\"\" = 'x'").unwrap_err();
        assert_eq!(err.message, "empty quoted column name");
    }

    #[test]
    fn test_bang_without_equals() {
        assert!(tokenize("a ! b").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), Vec::new());
        assert_eq!(tokenize("   ").unwrap(), Vec::new());
    }
}
