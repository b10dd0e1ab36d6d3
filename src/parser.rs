use thiserror::Error;

use crate::{
    config::EngineConfig,
    engine::{self, Function},
    lexer::{Op, Token},
};

/// Binding strength of prefix `-` and `+`: tighter than `*` and `/`, looser
/// than `^`, so `-2^2` is `-(2^2)`.
pub const UNARY_PRECEDENCE: u8 = 3;

static END: Token = Token::End;

/// Errors raised while parsing and folding a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("unmatched parenthesis")]
    UnmatchedParen,
    #[error("unexpected input after the end of the expression")]
    TrailingInput,
    #[error("expected {expected} but found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("unknown constant '{0}'")]
    UnknownConstant(String),
    #[error("wrong number of arguments for '{0}'")]
    ArityMismatch(String),
    #[error("domain error: {0}")]
    DomainError(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression is nested too deeply")]
    TooDeeplyNested,
}

/// Precedence-climbing parser that folds values while it parses.
///
/// The parser owns the token sequence and a single cursor into it. Every rule
/// only moves the cursor forward; one token of lookahead is enough to decide
/// between alternatives.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    config: EngineConfig,
    /// Parenthesised groups, calls and `^` operands currently open
    depth: usize,
    /// Groups and argument lists whose `)` has not been seen yet
    open_parens: usize,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, EngineConfig::default())
    }

    /// Creates a parser with explicit settings. A `max_depth` above
    /// [`EngineConfig::MAX_SUPPORTED_DEPTH`] is clamped to it.
    #[must_use]
    pub const fn with_config(tokens: Vec<Token>, mut config: EngineConfig) -> Self {
        if config.max_depth > EngineConfig::MAX_SUPPORTED_DEPTH {
            config.max_depth = EngineConfig::MAX_SUPPORTED_DEPTH;
        }
        Self {
            tokens,
            current: 0,
            config,
            depth: 0,
            open_parens: 0,
        }
    }

    /// Parses the whole token sequence and returns its value.
    ///
    /// # Errors
    /// Returns the first [`EvalError`] encountered; no partial result is
    /// produced.
    pub fn evaluate(mut self) -> Result<f64, EvalError> {
        if self.is_at_end() {
            return Err(EvalError::EmptyExpression);
        }

        let value = self.parse_expression(0)?;

        match self.peek() {
            Token::End => Ok(value),
            Token::RParen => Err(EvalError::UnmatchedParen),
            _ => Err(EvalError::TrailingInput),
        }
    }

    /// Folds operators whose precedence is at least `min_precedence`.
    fn parse_expression(&mut self, min_precedence: u8) -> Result<f64, EvalError> {
        let mut lhs = self.parse_unary()?;

        while let Token::Operator(op) = self.peek() {
            let op = *op;
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let rhs = if op.is_right_associative() {
                self.nested(|parser| parser.parse_expression(precedence))?
            } else {
                self.parse_expression(precedence + 1)?
            };
            lhs = engine::apply_binary(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        // A run of signs folds into one negation, without recursing per sign
        let mut signs = 0;
        let mut negative = false;
        while let Token::Operator(sign @ (Op::Add | Op::Sub)) = self.peek() {
            if *sign == Op::Sub {
                negative = !negative;
            }
            signs += 1;
            self.advance();
        }

        if signs == 0 {
            return self.parse_primary();
        }

        let operand = self.parse_expression(UNARY_PRECEDENCE)?;
        Ok(if negative { -operand } else { operand })
    }

    fn parse_primary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Token::Number(value) => {
                let value = *value;
                self.advance();
                Ok(value)
            }
            Token::LParen => {
                self.advance(); // consume '('
                self.nested(Self::parse_group)
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                self.parse_identifier(name)
            }
            Token::End => Err(self.unexpected_end()),
            Token::RParen if self.open_parens == 0 => Err(EvalError::UnmatchedParen),
            token => Err(EvalError::UnexpectedToken {
                expected: "a number, constant, function call or '('",
                found: token.to_string(),
            }),
        }
    }

    /// Parses the inside of a group whose '(' has been consumed.
    fn parse_group(&mut self) -> Result<f64, EvalError> {
        self.open_parens += 1;
        let value = self.parse_expression(0)?;
        self.expect_close("')'")?;
        Ok(value)
    }

    fn parse_identifier(&mut self, name: String) -> Result<f64, EvalError> {
        if matches!(self.peek(), Token::LParen) {
            // Unknown callees are rejected before their arguments are parsed
            let function: Function = name.parse()?;
            self.advance(); // consume '('
            let args = self.nested(Self::parse_arguments)?;
            return function.apply(&args, self.config.angle_unit);
        }

        if let Some(value) = engine::constant(&name) {
            return Ok(value);
        }
        if name.parse::<Function>().is_ok() {
            return Err(EvalError::UnexpectedToken {
                expected: "'(' after a function name",
                found: self.peek().to_string(),
            });
        }
        Err(EvalError::UnknownConstant(name))
    }

    /// Parses a comma-separated argument list whose '(' has been consumed.
    fn parse_arguments(&mut self) -> Result<Vec<f64>, EvalError> {
        self.open_parens += 1;
        let mut args = Vec::new();

        if matches!(self.peek(), Token::RParen) {
            self.expect_close("')'")?;
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression(0)?);
            if matches!(self.peek(), Token::Comma) {
                self.advance();
            } else {
                self.expect_close("',' or ')'")?;
                return Ok(args);
            }
        }
    }

    fn expect_close(&mut self, expected: &'static str) -> Result<(), EvalError> {
        match self.peek() {
            Token::RParen => {
                self.advance();
                self.open_parens -= 1;
                Ok(())
            }
            Token::End => Err(EvalError::UnmatchedParen),
            token => Err(EvalError::UnexpectedToken {
                expected,
                found: token.to_string(),
            }),
        }
    }

    /// Runs `rule` one nesting level deeper, enforcing the configured cap.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        if self.depth >= self.config.max_depth {
            return Err(EvalError::TooDeeplyNested);
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Input ran out where an operand was required.
    const fn unexpected_end(&self) -> EvalError {
        if self.open_parens > 0 {
            EvalError::UnmatchedParen
        } else {
            EvalError::UnexpectedEnd
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&END)
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::End)
    }
}

/// Evaluates a token sequence with the default [`EngineConfig`].
///
/// # Errors
/// Returns an [`EvalError`] if the tokens do not form a valid expression or
/// evaluating it fails.
///
/// # Examples
/// ```
/// use scicalc::{lexer::tokenize, parser::evaluate};
///
/// let tokens = tokenize("2 + 3 * 4").unwrap();
/// assert_eq!(evaluate(tokens).unwrap(), 14.0);
/// ```
pub fn evaluate(tokens: Vec<Token>) -> Result<f64, EvalError> {
    Parser::new(tokens).evaluate()
}
