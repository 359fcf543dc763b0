use sqlgate_common::{Error, Result, Value};
use sqlparser::tokenizer::Token;

use crate::ast::TableName;

pub struct ParserHelpers;

impl ParserHelpers {
    pub fn is_keyword(token: Option<&&Token>, keyword: &str) -> bool {
        matches!(
            token,
            Some(Token::Word(w)) if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(keyword)
        )
    }

    pub fn peek_keyword(tokens: &[&Token], idx: usize, keyword: &str) -> bool {
        Self::is_keyword(tokens.get(idx), keyword)
    }

    pub fn consume_keyword(tokens: &[&Token], idx: &mut usize, keyword: &str) -> bool {
        if Self::peek_keyword(tokens, *idx, keyword) {
            *idx += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_keyword(tokens: &[&Token], idx: &mut usize, keyword: &str) -> Result<()> {
        if Self::consume_keyword(tokens, idx, keyword) {
            return Ok(());
        }
        Err(Error::parse_error(format!(
            "Expected {}, found {}",
            keyword,
            Self::describe(tokens.get(*idx))
        )))
    }

    /// Consumes a keyword sequence such as `IF NOT EXISTS`. Returns `false`
    /// if the first keyword is absent; a partial match is an error.
    pub fn consume_keywords(tokens: &[&Token], idx: &mut usize, keywords: &[&str]) -> Result<bool> {
        let Some((first, rest)) = keywords.split_first() else {
            return Ok(false);
        };
        if !Self::consume_keyword(tokens, idx, first) {
            return Ok(false);
        }
        for keyword in rest {
            Self::expect_keyword(tokens, idx, keyword)?;
        }
        Ok(true)
    }

    pub fn consume_token(tokens: &[&Token], idx: &mut usize, expected: &Token) -> bool {
        if tokens.get(*idx).is_some_and(|t| *t == expected) {
            *idx += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_token(tokens: &[&Token], idx: &mut usize, expected: &Token) -> Result<()> {
        if Self::consume_token(tokens, idx, expected) {
            return Ok(());
        }
        Err(Error::parse_error(format!(
            "Expected '{}', found {}",
            expected,
            Self::describe(tokens.get(*idx))
        )))
    }

    pub fn expect_end(tokens: &[&Token], idx: usize) -> Result<()> {
        match tokens.get(idx) {
            None => Ok(()),
            Some(token) => Err(Error::parse_error(format!(
                "Unexpected '{}' at end of statement",
                token
            ))),
        }
    }

    pub fn parse_identifier(tokens: &[&Token], idx: &mut usize) -> Result<String> {
        match tokens.get(*idx) {
            Some(Token::Word(w)) => {
                *idx += 1;
                Ok(w.value.clone())
            }
            Some(Token::DoubleQuotedString(s)) => {
                *idx += 1;
                Ok(s.clone())
            }
            other => Err(Error::parse_error(format!(
                "Expected identifier, found {}",
                Self::describe(other)
            ))),
        }
    }

    pub fn parse_table_name(tokens: &[&Token], idx: &mut usize) -> Result<TableName> {
        let first = Self::parse_identifier(tokens, idx)?;
        if Self::consume_token(tokens, idx, &Token::Period) {
            let table = Self::parse_identifier(tokens, idx)?;
            return Ok(TableName::qualified(first, table));
        }
        Ok(TableName::new(first))
    }

    pub fn parse_number(tokens: &[&Token], idx: &mut usize) -> Result<u64> {
        match tokens.get(*idx) {
            Some(Token::Number(n, _)) => {
                *idx += 1;
                n.parse()
                    .map_err(|_| Error::parse_error(format!("Invalid number: {}", n)))
            }
            other => Err(Error::parse_error(format!(
                "Expected number, found {}",
                Self::describe(other)
            ))),
        }
    }

    pub fn parse_string(tokens: &[&Token], idx: &mut usize) -> Result<String> {
        match tokens.get(*idx) {
            Some(Token::SingleQuotedString(s)) => {
                *idx += 1;
                Ok(s.clone())
            }
            other => Err(Error::parse_error(format!(
                "Expected string literal, found {}",
                Self::describe(other)
            ))),
        }
    }

    pub fn is_literal_start(token: Option<&&Token>) -> bool {
        match token {
            Some(Token::Number(_, _)) | Some(Token::SingleQuotedString(_)) | Some(Token::Minus) => {
                true
            }
            Some(Token::Word(w)) if w.quote_style.is_none() => {
                ["NULL", "TRUE", "FALSE"]
                    .iter()
                    .any(|kw| w.value.eq_ignore_ascii_case(kw))
            }
            _ => false,
        }
    }

    pub fn parse_literal(tokens: &[&Token], idx: &mut usize) -> Result<Value> {
        let negative = Self::consume_token(tokens, idx, &Token::Minus);
        let value = match tokens.get(*idx) {
            Some(Token::Number(n, _)) => {
                let literal = if negative { format!("-{}", n) } else { n.clone() };
                match literal.parse::<i64>() {
                    Ok(int) => Value::Int64(int),
                    Err(_) => literal
                        .parse::<f64>()
                        .map(Value::Float64)
                        .map_err(|_| Error::parse_error(format!("Invalid number: {}", literal)))?,
                }
            }
            Some(Token::SingleQuotedString(s)) if !negative => Value::String(s.clone()),
            Some(Token::Word(w)) if !negative && w.quote_style.is_none() => {
                match w.value.to_ascii_uppercase().as_str() {
                    "NULL" => Value::Null,
                    "TRUE" => Value::Bool(true),
                    "FALSE" => Value::Bool(false),
                    _ => {
                        return Err(Error::parse_error(format!(
                            "Expected literal, found '{}'",
                            w.value
                        )));
                    }
                }
            }
            other => {
                return Err(Error::parse_error(format!(
                    "Expected literal, found {}",
                    Self::describe(other)
                )));
            }
        };
        *idx += 1;
        Ok(value)
    }

    /// Type names may carry arguments: `Nullable(String)`, `Decimal(10, 2)`.
    pub fn parse_data_type(tokens: &[&Token], idx: &mut usize) -> Result<String> {
        let mut data_type = Self::parse_identifier(tokens, idx)?;
        if !matches!(tokens.get(*idx), Some(Token::LParen)) {
            return Ok(data_type);
        }

        let mut depth = 0usize;
        while let Some(token) = tokens.get(*idx) {
            *idx += 1;
            match token {
                Token::LParen => {
                    depth += 1;
                    data_type.push('(');
                }
                Token::RParen => {
                    data_type.push(')');
                    depth -= 1;
                    if depth == 0 {
                        return Ok(data_type);
                    }
                }
                Token::Comma => data_type.push_str(", "),
                Token::Word(w) => data_type.push_str(&w.value),
                other => data_type.push_str(&other.to_string()),
            }
        }

        Err(Error::parse_error(format!(
            "Unbalanced parentheses in type {}",
            data_type
        )))
    }

    pub fn render_tokens(tokens: &[&Token]) -> String {
        tokens
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn describe(token: Option<&&Token>) -> String {
        match token {
            Some(t) => format!("'{}'", t),
            None => "end of statement".to_string(),
        }
    }
}
