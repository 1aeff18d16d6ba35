//! Classified input tokens: alphabet literals and regex operators.

use crate::alphabet::{Alphabet, Symbol};

pub const OPEN_PAREN: Symbol = '(';
pub const CLOSE_PAREN: Symbol = ')';
pub const ALTERNATION: Symbol = '+';
pub const STAR: Symbol = '*';
/// Operator standing for the empty string.
pub const EMPTY_LITERAL: Symbol = '1';

const OPERATORS: [Symbol; 5] = [OPEN_PAREN, CLOSE_PAREN, ALTERNATION, STAR, EMPTY_LITERAL];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub symbol: Symbol,
    pub is_operator: bool,
}

impl Token {
    pub fn new(symbol: Symbol, is_operator: bool) -> Self {
        Self {
            symbol,
            is_operator,
        }
    }

    pub fn literal(symbol: Symbol) -> Self {
        Self::new(symbol, false)
    }

    pub fn operator(symbol: Symbol) -> Self {
        Self::new(symbol, true)
    }

    pub fn is_op(&self, symbol: Symbol) -> bool {
        self.is_operator && self.symbol == symbol
    }
}

/// Split raw regex text into tokens, skipping whitespace.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
        .map(|c| Token::new(c, OPERATORS.contains(&c)))
        .collect()
}

/// The alphabet made of every literal token.
pub fn infer_alphabet(tokens: &[Token]) -> Alphabet {
    tokens
        .iter()
        .filter(|token| !token.is_operator)
        .map(|token| token.symbol)
        .collect()
}
