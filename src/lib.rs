pub mod config;
pub mod engine;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod service;

use thiserror::Error;

// Re-export main types and functions for convenient use
pub use config::EngineConfig;
pub use engine::{AngleUnit, Function, apply_binary, factorial};
pub use format::format_number;
pub use lexer::{LexError, Lexer, Op, Token, tokenize};
pub use parser::{EvalError, Parser, evaluate};
pub use service::{ErrorKind, Request, Response, handle, handle_json};

/// Any error the calculator can report for a single input string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Tokenize and evaluate an expression with the default configuration.
///
/// # Arguments
/// * `input` - The expression as typed, e.g. `"2 + sqrt(16)"`
///
/// # Returns
/// * `Ok(f64)` - The value of the expression
/// * `Err(CalcError)` - The first lexing or evaluation error
///
/// # Errors
/// Returns `CalcError::Lex` if the input cannot be tokenized and
/// `CalcError::Eval` if it cannot be parsed or evaluated.
///
/// # Examples
/// ```
/// use scicalc::{CalcError, EvalError, calculate};
///
/// assert_eq!(calculate("2+3*4").unwrap(), 14.0);
/// assert_eq!(calculate("fact(5)").unwrap(), 120.0);
/// assert_eq!(
///     calculate("10/0"),
///     Err(CalcError::Eval(EvalError::DivisionByZero))
/// );
/// ```
pub fn calculate(input: &str) -> Result<f64, CalcError> {
    calculate_with(input, &EngineConfig::default())
}

/// Tokenize and evaluate an expression with an explicit configuration.
///
/// # Errors
/// See [`calculate`].
///
/// # Examples
/// ```
/// use scicalc::{AngleUnit, EngineConfig, calculate_with};
///
/// let config = EngineConfig {
///     angle_unit: AngleUnit::Radians,
///     ..EngineConfig::default()
/// };
/// let value = calculate_with("cos(pi)", &config).unwrap();
/// assert!((value + 1.0).abs() < 1e-12);
/// ```
pub fn calculate_with(input: &str, config: &EngineConfig) -> Result<f64, CalcError> {
    let tokens =
        tokenize(input).inspect_err(|error| tracing::debug!(input, %error, "tokenizing failed"))?;
    let result = Parser::with_config(tokens, *config).evaluate();
    match &result {
        Ok(value) => tracing::debug!(input, value, "evaluated expression"),
        Err(error) => tracing::debug!(input, %error, "evaluation failed"),
    }
    Ok(result?)
}
