//! # Regex_MDFA
//!
//! `regex_mdfa` compiles a regular expression into a minimal complete DFA:
//! parse, Thompson construction, epsilon elimination, subset construction,
//! completion and partition-refinement minimization. Every stage returns a
//! fresh automaton that owns its nodes.
//!
//! ```
//! use regex_mdfa::MinimalDfa;
//!
//! let dfa = MinimalDfa::new("(a+b)*a(b+a)").unwrap();
//! assert!(dfa.accepts("bab"));
//! assert!(!dfa.accepts("abb"));
//! ```

pub mod alphabet;
pub mod automaton;
pub mod dfa;
pub mod error;
pub mod minimal_dfa;
pub mod nfa;
pub mod parser;
pub mod regex;
pub mod token;

mod complete;
mod epsilon;
mod minimize;
mod subset;
mod thompson;

pub use alphabet::{Alphabet, StateId, Symbol};
pub use automaton::{FiniteAutomaton, Label};
pub use dfa::{CompleteDfa, Dfa, DfaNode};
pub use error::{Error, Result, SyntaxError, SyntaxErrorKind};
pub use minimal_dfa::{compile_many, Builder, Config, MinimalDfa, Stages};
pub use nfa::{Nfa, NfaNode, NfaNodeInput};
pub use regex::{Priority, Regex, RegexNode};
pub use token::{tokenize, Token};

#[cfg(feature = "python-bindings")]
mod python_bindings;
