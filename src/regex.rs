//! Regular expression syntax tree and its canonical printing.

use crate::alphabet::{Alphabet, Symbol};
use crate::parser;
use crate::token::{self, Token, EMPTY_LITERAL};
use crate::{Error, Result};

/// Binding strength of a node; a child weaker than its context gets parenthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Lowest,
    Alternation,
    Concatenation,
    Star,
    Literal,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexNode {
    /// Matches only the empty string.
    Empty,
    Literal(Symbol),
    /// At least two alternatives.
    Alternation(Vec<RegexNode>),
    /// At least two factors.
    Concatenation(Vec<RegexNode>),
    Star(Box<RegexNode>),
}

impl RegexNode {
    pub fn priority(&self) -> Priority {
        match self {
            RegexNode::Empty => Priority::Empty,
            RegexNode::Literal(_) => Priority::Literal,
            RegexNode::Alternation(_) => Priority::Alternation,
            RegexNode::Concatenation(_) => Priority::Concatenation,
            RegexNode::Star(_) => Priority::Star,
        }
    }

    /// Print with the fewest parentheses needed in a context of `context` priority.
    ///
    /// Alternatives are joined by a bare `+` (`a+b`, not `a + b`), so the
    /// printed text is itself canonical input and parses back to the same tree.
    pub fn write_in(&self, out: &mut String, context: Priority) {
        let prior = self.priority();
        let wrap = prior < context;
        if wrap {
            out.push('(');
        }
        match self {
            RegexNode::Empty => out.push(EMPTY_LITERAL),
            RegexNode::Literal(symbol) => out.push(*symbol),
            RegexNode::Alternation(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(token::ALTERNATION);
                    }
                    child.write_in(out, prior);
                }
            }
            RegexNode::Concatenation(children) => {
                for child in children {
                    child.write_in(out, prior);
                }
            }
            RegexNode::Star(child) => {
                child.write_in(out, prior);
                out.push(token::STAR);
            }
        }
        if wrap {
            out.push(')');
        }
    }

    /// Visit every literal symbol in the tree.
    pub fn for_each_literal(&self, f: &mut impl FnMut(Symbol)) {
        match self {
            RegexNode::Empty => {}
            RegexNode::Literal(symbol) => f(*symbol),
            RegexNode::Alternation(children) | RegexNode::Concatenation(children) => {
                for child in children {
                    child.for_each_literal(f);
                }
            }
            RegexNode::Star(child) => child.for_each_literal(f),
        }
    }
}

impl std::fmt::Display for RegexNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.write_in(&mut out, Priority::Lowest);
        f.write_str(&out)
    }
}

/// A parsed regex together with the alphabet its automata range over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    alphabet: Alphabet,
    tree: RegexNode,
}

impl Regex {
    /// Parse `tokens`, taking the alphabet from the literal tokens.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self> {
        let tree = parser::parse(tokens)?;
        Ok(Self {
            alphabet: token::infer_alphabet(tokens),
            tree,
        })
    }

    /// Parse `tokens` over a caller supplied alphabet.
    pub fn from_tokens_with_alphabet(tokens: &[Token], alphabet: Alphabet) -> Result<Self> {
        let tree = parser::parse(tokens)?;
        if let Some((position, token)) = tokens
            .iter()
            .enumerate()
            .find(|(_, token)| !token.is_operator && !alphabet.contains(token.symbol))
        {
            return Err(Error::SymbolOutsideAlphabet {
                symbol: token.symbol,
                position,
            });
        }
        Ok(Self { alphabet, tree })
    }

    /// Build from an already constructed tree; the alphabet is widened to
    /// cover every literal in it.
    pub fn from_tree(tree: RegexNode, mut alphabet: Alphabet) -> Self {
        tree.for_each_literal(&mut |symbol| {
            alphabet.insert(symbol);
        });
        Self { alphabet, tree }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn tree(&self) -> &RegexNode {
        &self.tree
    }
}

impl std::str::FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tokens(&token::tokenize(s))
    }
}

impl std::fmt::Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.tree.fmt(f)
    }
}
