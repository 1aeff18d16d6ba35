//! Deterministic automata: a possibly partial [`Dfa`] and a [`CompleteDfa`]
//! with an explicit dead node.
//!
//! Both are dense arenas indexed by [`StateId`]; every stage that produces
//! one allocates a fresh arena, so ids are only meaningful within one value.

use std::collections::BTreeMap;

use crate::alphabet::{Alphabet, StateId, Symbol};
use crate::automaton::{FiniteAutomaton, Label};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaNode {
    pub(crate) transitions: BTreeMap<Symbol, StateId>,
    pub(crate) accepting: bool,
}

impl DfaNode {
    pub fn next(&self, symbol: Symbol) -> Option<StateId> {
        self.transitions.get(&symbol).copied()
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn transitions(&self) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.transitions.iter().map(|(symbol, to)| (*symbol, *to))
    }
}

/// Deterministic automaton, not necessarily complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Alphabet,
    pub(crate) nodes: Vec<DfaNode>,
    pub(crate) start: StateId,
}

/// Deterministic automaton with one edge per symbol on every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteDfa {
    pub(crate) alphabet: Alphabet,
    pub(crate) nodes: Vec<DfaNode>,
    pub(crate) start: StateId,
    pub(crate) dead: Option<StateId>,
}

impl Dfa {
    pub fn node(&self, id: StateId) -> Option<&DfaNode> {
        self.nodes.get(id as usize)
    }

    pub fn next_state(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.node(state)?.next(symbol)
    }

    /// Whether every node has an edge for every symbol.
    pub fn is_complete(&self) -> bool {
        is_complete(&self.alphabet, &self.nodes)
    }
}

impl CompleteDfa {
    pub fn node(&self, id: StateId) -> Option<&DfaNode> {
        self.nodes.get(id as usize)
    }

    pub fn next_state(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.node(state)?.next(symbol)
    }

    /// The non-accepting sink, if the automaton needs one.
    pub fn dead(&self) -> Option<StateId> {
        self.dead
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.alphabet, &self.nodes)
    }
}

fn is_complete(alphabet: &Alphabet, nodes: &[DfaNode]) -> bool {
    nodes
        .iter()
        .all(|node| alphabet.iter().all(|symbol| node.next(symbol).is_some()))
}

fn walk(nodes: &[DfaNode], start: StateId, input: &[Symbol]) -> Option<StateId> {
    input.iter().try_fold(start, |state, symbol| {
        nodes.get(state as usize)?.next(*symbol)
    })
}

fn edges(nodes: &[DfaNode]) -> Vec<(StateId, Label, StateId)> {
    nodes
        .iter()
        .enumerate()
        .flat_map(|(from, node)| {
            node.transitions()
                .map(move |(symbol, to)| (from as StateId, Some(symbol), to))
        })
        .collect()
}

fn write_table(
    f: &mut std::fmt::Formatter<'_>,
    nodes: &[DfaNode],
    start: StateId,
    dead: Option<StateId>,
) -> std::fmt::Result {
    for (id, node) in nodes.iter().enumerate() {
        let id = id as StateId;
        let mut marks = String::new();
        if id == start {
            marks.push('>');
        }
        if node.accepting {
            marks.push('*');
        }
        if Some(id) == dead {
            marks.push('!');
        }
        write!(f, "{:>3}{:<3}", id, marks)?;
        for (symbol, to) in node.transitions() {
            write!(f, " {}->{}", symbol, to)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

macro_rules! impl_deterministic_automaton {
    ($type_name:ty) => {
        impl FiniteAutomaton for $type_name {
            fn alphabet(&self) -> &Alphabet {
                &self.alphabet
            }

            fn start(&self) -> StateId {
                self.start
            }

            fn states(&self) -> Vec<StateId> {
                (0..self.nodes.len() as StateId).collect()
            }

            fn is_accepting(&self, state: StateId) -> bool {
                self.node(state).is_some_and(|node| node.accepting)
            }

            fn edges(&self) -> Vec<(StateId, Label, StateId)> {
                edges(&self.nodes)
            }

            fn accepts(&self, input: &[Symbol]) -> bool {
                walk(&self.nodes, self.start, input).is_some_and(|state| self.is_accepting(state))
            }

            fn num_states(&self) -> usize {
                self.nodes.len()
            }
        }
    };
}

impl_deterministic_automaton!(Dfa);
impl_deterministic_automaton!(CompleteDfa);

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA over {}:", self.alphabet)?;
        write_table(f, &self.nodes, self.start, None)
    }
}

impl std::fmt::Display for CompleteDfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Complete DFA over {}:", self.alphabet)?;
        write_table(f, &self.nodes, self.start, self.dead)
    }
}
