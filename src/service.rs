//! Request/response boundary used by front ends.
//!
//! A front end sends `{"expression": "..."}` and gets back either
//! `{"result": "..."}` or `{"error": {"kind": "...", "detail": ...}}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{CalcError, calculate_with, config::EngineConfig, format::format_number};
use crate::{lexer::LexError, parser::EvalError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success { result: String },
    Failure { error: ErrorKind },
}

/// Wire form of every error the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ErrorKind {
    UnexpectedCharacter(usize),
    MalformedNumber(usize),
    EmptyExpression,
    UnmatchedParen,
    TrailingInput,
    UnexpectedToken {
        expected: String,
        found: String,
    },
    UnexpectedEnd,
    UnknownFunction(String),
    UnknownConstant(String),
    ArityMismatch(String),
    DomainError(String),
    DivisionByZero,
    TooDeeplyNested,
}

impl From<&CalcError> for ErrorKind {
    fn from(error: &CalcError) -> Self {
        match error {
            CalcError::Lex(LexError::UnexpectedCharacter(pos)) => Self::UnexpectedCharacter(*pos),
            CalcError::Lex(LexError::MalformedNumber(pos)) => Self::MalformedNumber(*pos),
            CalcError::Eval(error) => match error {
                EvalError::EmptyExpression => Self::EmptyExpression,
                EvalError::UnmatchedParen => Self::UnmatchedParen,
                EvalError::TrailingInput => Self::TrailingInput,
                EvalError::UnexpectedToken { expected, found } => Self::UnexpectedToken {
                    expected: (*expected).to_string(),
                    found: found.clone(),
                },
                EvalError::UnexpectedEnd => Self::UnexpectedEnd,
                EvalError::UnknownFunction(name) => Self::UnknownFunction(name.clone()),
                EvalError::UnknownConstant(name) => Self::UnknownConstant(name.clone()),
                EvalError::ArityMismatch(name) => Self::ArityMismatch(name.clone()),
                EvalError::DomainError(detail) => Self::DomainError(detail.clone()),
                EvalError::DivisionByZero => Self::DivisionByZero,
                EvalError::TooDeeplyNested => Self::TooDeeplyNested,
            },
        }
    }
}

impl Response {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Evaluates one request.
#[must_use]
pub fn handle(request: &Request, config: &EngineConfig) -> Response {
    match calculate_with(&request.expression, config) {
        Ok(value) => Response::Success {
            result: format_number(value),
        },
        Err(error) => Response::Failure {
            error: ErrorKind::from(&error),
        },
    }
}

/// Evaluates a JSON-encoded [`Request`] and returns the JSON-encoded
/// [`Response`].
///
/// # Errors
/// Returns an error if `body` is not a valid request. Evaluation failures are
/// reported inside the response, not as an error.
///
/// # Examples
/// ```
/// use scicalc::{config::EngineConfig, service::handle_json};
///
/// let config = EngineConfig::default();
/// let body = handle_json(r#"{"expression": "pow(2,10)"}"#, &config).unwrap();
/// assert_eq!(body, r#"{"result":"1024"}"#);
///
/// let body = handle_json(r#"{"expression": "10/0"}"#, &config).unwrap();
/// assert_eq!(body, r#"{"error":{"kind":"division_by_zero"}}"#);
/// ```
pub fn handle_json(body: &str, config: &EngineConfig) -> Result<String> {
    let request: Request = serde_json::from_str(body).context("malformed request")?;
    let response = handle(&request, config);
    serde_json::to_string(&response).context("failed to encode response")
}
