//! Read-only view shared by every pipeline stage.
//!
//! The view is enough for external tooling to draw an automaton (states,
//! start, accepting flags and labelled edges) and to decide membership.

use crate::alphabet::{Alphabet, StateId, Symbol};

/// An edge label; `None` is an epsilon move.
pub type Label = Option<Symbol>;

pub trait FiniteAutomaton {
    fn alphabet(&self) -> &Alphabet;

    fn start(&self) -> StateId;

    /// All state ids in increasing order.
    fn states(&self) -> Vec<StateId>;

    fn is_accepting(&self, state: StateId) -> bool;

    /// `(from, label, to)` triples sorted by source, label and target.
    fn edges(&self) -> Vec<(StateId, Label, StateId)>;

    fn accepts(&self, input: &[Symbol]) -> bool;

    fn accepts_str(&self, input: &str) -> bool {
        let input: Vec<Symbol> = input.chars().collect();
        self.accepts(&input)
    }

    fn num_states(&self) -> usize {
        self.states().len()
    }

    fn accepting_states(&self) -> Vec<StateId> {
        self.states()
            .into_iter()
            .filter(|state| self.is_accepting(*state))
            .collect()
    }
}
