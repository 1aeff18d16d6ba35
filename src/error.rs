//! The Errors that may occur within the crate.

use thiserror::Error;

use crate::alphabet::Symbol;

pub type Result<T, E = crate::Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    // Parse Errors
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("Symbol {symbol:?} at token {position} is not in the alphabet")]
    SymbolOutsideAlphabet { symbol: Symbol, position: usize },
    // Construction Errors
    #[error("NFA description has no start node")]
    NoStartState,
    // Serialization Errors
    #[error("Failed to encode DFA: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to decode DFA: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

impl Error {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Token index the error refers to, if it came from reading a regex.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Syntax(e) => Some(e.position),
            Self::SymbolOutsideAlphabet { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Syntax error at token {position}: {kind}")]
pub struct SyntaxError {
    pub position: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    EmptyInput,
    UnexpectedEnd,
    UnexpectedToken,
    UnmatchedParenthesis,
    TrailingTokens,
    /// Parentheses or stars nested past [`crate::parser::NEST_LIMIT`].
    NestTooDeep,
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::EmptyInput => "empty regex",
            Self::UnexpectedEnd => "expected an atom but input ended",
            Self::UnexpectedToken => "unexpected token",
            Self::UnmatchedParenthesis => "unmatched parenthesis",
            Self::TrailingTokens => "tokens left after a complete regex",
            Self::NestTooDeep => "regex is nested too deeply",
        };
        f.write_str(msg)
    }
}

impl SyntaxError {
    pub(crate) fn new(position: usize, kind: SyntaxErrorKind) -> Self {
        Self { position, kind }
    }
}

#[cfg(feature = "python-bindings")]
impl From<Error> for pyo3::PyErr {
    fn from(e: Error) -> Self {
        use pyo3::exceptions::PyValueError;
        use pyo3::PyErr;
        PyErr::new::<PyValueError, _>(e.to_string())
    }
}
