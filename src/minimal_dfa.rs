//! Building a `MinimalDfa` table from a regex through the full pipeline.

use bincode::config;
use bincode::{Decode, Encode};
use log::debug;
use rayon::prelude::*;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::alphabet::{Alphabet, StateId, Symbol};
use crate::automaton::FiniteAutomaton;
use crate::dfa::{CompleteDfa, Dfa};
use crate::nfa::Nfa;
use crate::regex::Regex;
use crate::token::{tokenize, Token};
use crate::Result;

/// Options for [`Builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    alphabet: Option<Alphabet>,
    minimize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: None,
            minimize: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the alphabet instead of inferring it from the literals.
    pub fn alphabet(mut self, alphabet: Option<Alphabet>) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// When disabled the table is the completed, unminimized automaton.
    pub fn minimize(mut self, yes: bool) -> Self {
        self.minimize = yes;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn build(&self, pattern: &str) -> Result<MinimalDfa> {
        self.build_from_tokens(&tokenize(pattern))
    }

    pub fn build_from_tokens(&self, tokens: &[Token]) -> Result<MinimalDfa> {
        let regex = self.parse(tokens)?;
        let nfa = Nfa::from_regex(&regex).without_epsilon();
        let complete = CompleteDfa::from_dfa(&Dfa::from_nfa(&nfa));
        let table = if self.config.minimize {
            complete.minimize()
        } else {
            debug!("minimization skipped for {}", regex);
            complete
        };
        Ok(MinimalDfa::from_complete(&table))
    }

    /// Run the pipeline keeping every intermediate automaton.
    pub fn build_stages(&self, tokens: &[Token]) -> Result<Stages> {
        Ok(Stages::run(&self.parse(tokens)?))
    }

    fn parse(&self, tokens: &[Token]) -> Result<Regex> {
        match &self.config.alphabet {
            Some(alphabet) => Regex::from_tokens_with_alphabet(tokens, alphabet.clone()),
            None => Regex::from_tokens(tokens),
        }
    }
}

/// The automaton produced by every stage of the pipeline, for inspection.
#[derive(Debug, Clone)]
pub struct Stages {
    pub thompson: Nfa,
    pub epsilon_free: Nfa,
    pub dfa: Dfa,
    pub complete: CompleteDfa,
    pub minimal: CompleteDfa,
}

impl Stages {
    pub fn run(regex: &Regex) -> Self {
        let thompson = Nfa::from_regex(regex);
        let epsilon_free = thompson.clone().without_epsilon();
        let dfa = Dfa::from_nfa(&epsilon_free);
        let complete = CompleteDfa::from_dfa(&dfa);
        let minimal = complete.minimize();
        debug!(
            "pipeline for {}: {} -> {} -> {} -> {} -> {} nodes",
            regex,
            thompson.num_states(),
            epsilon_free.num_states(),
            dfa.num_states(),
            complete.num_states(),
            minimal.num_states()
        );
        Self {
            thompson,
            epsilon_free,
            dfa,
            complete,
            minimal,
        }
    }
}

/// Transition table of a complete DFA, ready for membership walks.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct MinimalDfa {
    alphabet: Alphabet,
    initial_state: StateId,
    final_states: HashSet<StateId>,
    dead_state: Option<StateId>,
    transitions: HashMap<StateId, HashMap<Symbol, StateId>>,
}

impl MinimalDfa {
    pub fn new(regex: &str) -> Result<Self> {
        Builder::new().build(regex)
    }

    pub fn from_complete(cdfa: &CompleteDfa) -> Self {
        let mut transitions: HashMap<StateId, HashMap<Symbol, StateId>> = HashMap::default();
        let mut final_states: HashSet<StateId> = HashSet::default();
        for state in cdfa.states() {
            if cdfa.is_accepting(state) {
                final_states.insert(state);
            }
        }
        for (from, label, to) in cdfa.edges() {
            if let Some(symbol) = label {
                transitions.entry(from).or_default().insert(symbol, to);
            }
        }
        Self {
            alphabet: cdfa.alphabet().clone(),
            initial_state: cdfa.start(),
            final_states,
            dead_state: cdfa.dead(),
            transitions,
        }
    }

    pub fn get_alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn get_initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn get_final_states(&self) -> &HashSet<StateId> {
        &self.final_states
    }

    pub fn get_dead_state(&self) -> Option<StateId> {
        self.dead_state
    }

    pub fn get_states(&self) -> HashSet<StateId> {
        let mut states = self.final_states.clone();
        states.insert(self.initial_state);
        for (state, inputs) in &self.transitions {
            states.insert(*state);
            states.extend(inputs.values().cloned());
        }
        states
    }

    pub fn num_states(&self) -> usize {
        self.get_states().len()
    }

    pub fn get_transitions(&self) -> &HashMap<StateId, HashMap<Symbol, StateId>> {
        &self.transitions
    }

    pub fn is_initial_state(&self, state: StateId) -> bool {
        state == self.initial_state
    }

    pub fn is_final_state(&self, state: &StateId) -> bool {
        self.final_states.contains(state)
    }

    pub fn is_dead_state(&self, state: StateId) -> bool {
        self.dead_state == Some(state)
    }

    pub fn next_state(&self, state: &StateId, input: &Symbol) -> Option<StateId> {
        Some(*self.transitions.get(state)?.get(input)?)
    }

    /// States visited while reading `inputs`, starting with the initial one.
    /// `None` once a symbol outside the alphabet is read.
    pub fn get_state_sequence(&self, inputs: &str) -> Option<Vec<StateId>> {
        let mut state = self.initial_state;
        let mut seq = vec![state];
        for input in inputs.chars() {
            if let Some(s) = self.next_state(&state, &input) {
                seq.push(s);
                state = s;
            } else {
                return None;
            }
        }
        Some(seq)
    }

    pub fn accepts(&self, inputs: &str) -> bool {
        self.get_state_sequence(inputs)
            .and_then(|seq| seq.last().copied())
            .is_some_and(|state| self.is_final_state(&state))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (dfa, _): (MinimalDfa, usize) = bincode::decode_from_slice(bytes, config::standard())?;
        Ok(dfa)
    }
}

impl std::fmt::Display for MinimalDfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Minimal DFA with transitions:")?;
        let mut states: Vec<&StateId> = self.transitions.keys().collect();
        states.sort_unstable();
        for state_id in states {
            let mut inputs: Vec<(&Symbol, &StateId)> = self.transitions[state_id].iter().collect();
            inputs.sort_unstable();
            writeln!(f, "{:?} -> {:?}", state_id, inputs)?;
        }
        Ok(())
    }
}

/// Compile independent patterns in parallel, one result per pattern.
pub fn compile_many(patterns: &[&str]) -> Vec<Result<MinimalDfa>> {
    patterns
        .par_iter()
        .map(|pattern| MinimalDfa::new(pattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn second_to_last_is_a() {
        let dfa = MinimalDfa::new("(a+b)*a(b+a)").unwrap();
        assert_eq!(dfa.num_states(), 4);
        assert_eq!(dfa.get_dead_state(), None);
        assert_eq!(dfa.get_initial_state(), 0);
        assert!(!dfa.is_final_state(&0));
        assert!(dfa.accepts("ab"));
        assert!(dfa.accepts("baa"));
        assert!(!dfa.accepts("bab"));
        assert!(!dfa.accepts("c"));

        let seq = dfa.get_state_sequence("aab").unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq[0], 0);
        assert!(dfa.get_state_sequence("ac").is_none());
    }

    #[test]
    fn table_covers_every_symbol() {
        let dfa = MinimalDfa::new("ab").unwrap();
        let dead = dfa.get_dead_state().unwrap();
        assert!(dfa.is_dead_state(dead));
        assert!(!dfa.is_final_state(&dead));
        for state in dfa.get_states() {
            for symbol in dfa.get_alphabet().iter() {
                assert!(dfa.next_state(&state, &symbol).is_some());
            }
        }
        assert_eq!(dfa.get_final_states().len(), 1);
        assert_eq!(dfa.num_states(), 4);
    }

    #[test]
    fn config_is_applied() {
        let alphabet: Alphabet = "abc".chars().collect();
        let dfa = Builder::new()
            .configure(Config::new().alphabet(Some(alphabet.clone())))
            .build("a*")
            .unwrap();
        assert_eq!(dfa.get_alphabet(), &alphabet);
        // a loop plus a dead node for b and c
        assert_eq!(dfa.num_states(), 2);

        let unminimized = Builder::new()
            .configure(Config::new().minimize(false))
            .build("a+aa*")
            .unwrap();
        let minimized = MinimalDfa::new("a+aa*").unwrap();
        assert!(unminimized.num_states() > minimized.num_states());
        for word in ["", "a", "aa", "aaa"] {
            assert_eq!(unminimized.accepts(word), minimized.accepts(word));
        }

        let err = Builder::new()
            .configure(Config::new().alphabet(Some("a".chars().collect())))
            .build("ab")
            .unwrap_err();
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn unminimized_table_is_the_completed_automaton() {
        let mut builder = Builder::new();
        builder.configure(Config::new().minimize(false));
        let stages = builder.build_stages(&tokenize("a+aa*")).unwrap();
        let table = builder.build("a+aa*").unwrap();
        assert_eq!(table, MinimalDfa::from_complete(&stages.complete));
        assert_ne!(table, MinimalDfa::from_complete(&stages.minimal));
    }

    #[test]
    fn survives_binary_round_trip() {
        let dfa = MinimalDfa::new("(ab+1)*c").unwrap();
        let bytes = dfa.to_bytes().unwrap();
        assert_eq!(MinimalDfa::from_bytes(&bytes).unwrap(), dfa);
        assert!(matches!(
            MinimalDfa::from_bytes(&bytes[..bytes.len() / 2]),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn compiles_in_parallel() {
        let results = compile_many(&["a+b", "ab", "a(", "a*"]);
        assert_eq!(results.len(), 4);
        assert!(results[0].as_ref().unwrap().accepts("b"));
        assert!(results[1].as_ref().unwrap().accepts("ab"));
        assert!(results[2].as_ref().unwrap_err().is_syntax());
        assert!(results[3].as_ref().unwrap().accepts("aaaa"));
    }

    #[test]
    fn display_is_sorted() {
        let dfa = MinimalDfa::new("a*").unwrap();
        assert_eq!(
            dfa.to_string(),
            "Minimal DFA with transitions:\n0 -> [('a', 0)]\n"
        );
    }
}
