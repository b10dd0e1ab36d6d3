use std::fmt;

use thiserror::Error;

/// Binary (and prefix) arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
}

impl Op {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
        }
    }

    /// Binding strength used by the precedence-climbing parser.
    ///
    /// Prefix signs sit between `*`/`/` and `^` (see
    /// [`crate::parser::UNARY_PRECEDENCE`]), which makes `-2^2` equal `-4`.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal, already converted to a double
    Number(f64),
    /// + - * / ^
    Operator(Op),
    /// Function or constant names
    Ident(String),
    /// (
    LParen,
    /// )
    RParen,
    /// Argument separator
    Comma,
    /// End of input
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Operator(op) => write!(f, "'{}'", op.symbol()),
            Self::Ident(name) => write!(f, "'{name}'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::End => f.write_str("end of input"),
        }
    }
}

/// Errors raised while splitting the input into tokens.
///
/// Positions are zero-based byte offsets into the input string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character at position {0}")]
    UnexpectedCharacter(usize),
    #[error("malformed number starting at position {0}")]
    MalformedNumber(usize),
}

pub struct Lexer<'input> {
    input: &'input str,
    chars: std::str::CharIndices<'input>,
    current: Option<(usize, char)>,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        let mut chars = input.char_indices();
        let current = chars.next();
        Lexer {
            input,
            chars,
            current,
        }
    }

    /// Tokenizes the input string into a vector of tokens terminated by
    /// [`Token::End`].
    ///
    /// # Errors
    /// Returns a [`LexError`] on an unexpected character or a malformed
    /// numeric literal.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some((pos, ch)) = self.current {
            match ch {
                '0'..='9' | '.' => {
                    let value = self.read_number(pos)?;
                    tokens.push(Token::Number(value));
                }
                'a'..='z' => {
                    let ident = self.read_identifier()?;
                    tokens.push(Token::Ident(ident));
                }
                '+' | '-' | '*' | '/' | '^' => {
                    tokens.push(Token::Operator(Self::operator(ch)));
                    self.advance();
                }
                '(' => {
                    tokens.push(Token::LParen);
                    self.advance();
                }
                ')' => {
                    tokens.push(Token::RParen);
                    self.advance();
                }
                ',' => {
                    tokens.push(Token::Comma);
                    self.advance();
                }
                c if c.is_whitespace() => self.skip_whitespace(),
                _ => return Err(LexError::UnexpectedCharacter(pos)),
            }
        }

        tokens.push(Token::End);
        tracing::trace!(count = tokens.len(), "tokenized input");
        Ok(tokens)
    }

    fn advance(&mut self) {
        self.current = self.chars.next();
    }

    /// Byte offset of the current character, or the input length at the end.
    fn offset(&self) -> usize {
        self.current.map_or(self.input.len(), |(pos, _)| pos)
    }

    const fn operator(ch: char) -> Op {
        match ch {
            '+' => Op::Add,
            '-' => Op::Sub,
            '*' => Op::Mul,
            '/' => Op::Div,
            _ => Op::Pow,
        }
    }

    fn read_number(&mut self, start: usize) -> Result<f64, LexError> {
        let mut dots = 0;
        let mut digits = 0;
        while let Some((_, ch)) = self.current {
            match ch {
                '0'..='9' => digits += 1,
                '.' => dots += 1,
                _ => break,
            }
            self.advance();
        }

        if dots > 1 || digits == 0 {
            return Err(LexError::MalformedNumber(start));
        }
        // `2pi` or `3x` is neither a number nor an identifier
        if let Some((pos, ch)) = self.current {
            if ch.is_alphabetic() {
                return Err(LexError::UnexpectedCharacter(pos));
            }
        }

        self.input[start..self.offset()]
            .parse()
            .map_err(|_| LexError::MalformedNumber(start))
    }

    fn read_identifier(&mut self) -> Result<String, LexError> {
        let start = self.offset();
        while let Some((_, 'a'..='z')) = self.current {
            self.advance();
        }
        if let Some((pos, '0'..='9' | '.')) = self.current {
            return Err(LexError::UnexpectedCharacter(pos));
        }
        Ok(self.input[start..self.offset()].to_string())
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, ch)) = self.current {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}

/// Convenience wrapper around [`Lexer::tokenize`].
///
/// # Errors
/// Returns a [`LexError`] if the input contains characters outside the
/// calculator alphabet or a malformed number.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
