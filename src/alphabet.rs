//! Symbols, state identifiers and the finite alphabet shared by one automaton family.

use std::collections::BTreeSet;

use bincode::{Decode, Encode};

// define type alias for state-id and symbol
pub type StateId = u32;
pub type Symbol = char;

/// A finite set of symbols, always iterated in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct Alphabet {
    symbols: BTreeSet<Symbol>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol) -> bool {
        self.symbols.insert(symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type Item = Symbol;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Symbol>>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter().copied()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, symbol) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", symbol)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_sorted_and_deduplicated() {
        let alphabet: Alphabet = "cabca".chars().collect();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.iter().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        assert!(alphabet.contains('c'));
        assert!(!alphabet.contains('z'));
        assert_eq!(alphabet.to_string(), "{a, b, c}");
    }

    #[test]
    fn empty_alphabet() {
        let alphabet = Alphabet::new();
        assert!(alphabet.is_empty());
        assert_eq!(alphabet.to_string(), "{}");
    }
}
