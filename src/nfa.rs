//! Nondeterministic automaton with epsilon moves, stored as an id-keyed arena.
//!
//! Node ids are handed out from a counter and never reused, so they stay
//! stable while epsilon elimination adds edges and collects dead nodes.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap as HashMap;

use crate::alphabet::{Alphabet, StateId, Symbol};
use crate::automaton::{FiniteAutomaton, Label};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaNode {
    pub(crate) transitions: HashMap<Label, BTreeSet<StateId>>,
    pub(crate) accepting: bool,
    // number of edges from other nodes ending here
    pub(crate) links: usize,
}

impl NfaNode {
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn incoming_links(&self) -> usize {
        self.links
    }

    pub fn targets(&self, label: Label) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.get(&label).into_iter().flatten().copied()
    }

    pub fn has_epsilon(&self) -> bool {
        self.transitions.get(&None).is_some_and(|targets| !targets.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    alphabet: Alphabet,
    pub(crate) nodes: BTreeMap<StateId, NfaNode>,
    start: StateId,
    next_id: StateId,
}

/// Description of one node for [`Nfa::from_input`].
#[derive(Debug, Clone, Default)]
pub struct NfaNodeInput {
    pub id: String,
    /// Outgoing edges as `(label, target id)`; a `None` label is epsilon.
    pub next: Vec<(Label, String)>,
    pub start: bool,
    pub accepting: bool,
}

impl Nfa {
    /// A single non-accepting start node with no edges.
    pub fn new(alphabet: Alphabet) -> Self {
        let mut nfa = Self {
            alphabet,
            nodes: BTreeMap::new(),
            start: 0,
            next_id: 0,
        };
        nfa.start = nfa.new_node();
        nfa
    }

    /// Build an automaton from explicit node descriptions. Ids mentioned only
    /// as edge targets still become nodes.
    pub fn from_input(alphabet: Alphabet, input: &[NfaNodeInput]) -> Result<Self> {
        let mut nfa = Self {
            alphabet,
            nodes: BTreeMap::new(),
            start: 0,
            next_id: 0,
        };
        let mut id_to_node: HashMap<&str, StateId> = HashMap::default();
        let mut start = None;

        for descr in input {
            let from = nfa.node_for(&mut id_to_node, &descr.id);
            nfa.set_accepting(from, descr.accepting);
            if descr.start {
                start = Some(from);
            }
            for (label, target) in &descr.next {
                let to = nfa.node_for(&mut id_to_node, target);
                nfa.link(from, *label, to);
            }
        }

        nfa.start = start.ok_or(Error::NoStartState)?;
        Ok(nfa)
    }

    fn node_for<'a>(&mut self, ids: &mut HashMap<&'a str, StateId>, name: &'a str) -> StateId {
        match ids.get(name) {
            Some(id) => *id,
            None => {
                let id = self.new_node();
                ids.insert(name, id);
                id
            }
        }
    }

    pub(crate) fn new_node(&mut self) -> StateId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, NfaNode::default());
        id
    }

    pub fn node(&self, id: StateId) -> Option<&NfaNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn set_accepting(&mut self, id: StateId, accepting: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.accepting = accepting;
        }
    }

    /// Add an edge; returns false if it was already present.
    pub(crate) fn link(&mut self, from: StateId, label: Label, to: StateId) -> bool {
        let inserted = self
            .nodes
            .get_mut(&from)
            .is_some_and(|node| node.transitions.entry(label).or_default().insert(to));
        if inserted && from != to {
            if let Some(node) = self.nodes.get_mut(&to) {
                node.links += 1;
            }
        }
        inserted
    }

    pub(crate) fn unlink(&mut self, from: StateId, label: Label, to: StateId) -> bool {
        let removed = match self.nodes.get_mut(&from) {
            Some(node) => {
                let removed = node
                    .transitions
                    .get_mut(&label)
                    .is_some_and(|targets| targets.remove(&to));
                if node.transitions.get(&label).is_some_and(|t| t.is_empty()) {
                    node.transitions.remove(&label);
                }
                removed
            }
            None => false,
        };
        if removed && from != to {
            if let Some(node) = self.nodes.get_mut(&to) {
                node.links = node.links.saturating_sub(1);
            }
        }
        removed
    }

    pub fn epsilon_edge_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| node.targets(None).count())
            .sum()
    }

    /// Union of the `label` successors of every node in `set`.
    pub(crate) fn step(&self, set: &BTreeSet<StateId>, label: Label) -> BTreeSet<StateId> {
        set.iter()
            .filter_map(|id| self.nodes.get(id))
            .flat_map(|node| node.targets(label))
            .collect()
    }

    /// Grow `set` with everything reachable through epsilon moves.
    pub(crate) fn epsilon_closure(&self, set: &mut BTreeSet<StateId>) {
        let mut stack: Vec<StateId> = set.iter().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                for next in node.targets(None) {
                    if set.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }
    }

    pub(crate) fn any_accepting<'a>(&self, set: impl IntoIterator<Item = &'a StateId>) -> bool {
        set.into_iter()
            .any(|id| self.nodes.get(id).is_some_and(|node| node.accepting))
    }
}

impl FiniteAutomaton for Nfa {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn start(&self) -> StateId {
        self.start
    }

    fn states(&self) -> Vec<StateId> {
        self.nodes.keys().copied().collect()
    }

    fn is_accepting(&self, state: StateId) -> bool {
        self.nodes.get(&state).is_some_and(|node| node.accepting)
    }

    fn edges(&self) -> Vec<(StateId, Label, StateId)> {
        let mut edges: Vec<(StateId, Label, StateId)> = self
            .nodes
            .iter()
            .flat_map(|(from, node)| {
                node.transitions
                    .iter()
                    .flat_map(move |(label, targets)| targets.iter().map(move |to| (*from, *label, *to)))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    fn accepts(&self, input: &[Symbol]) -> bool {
        let mut current = BTreeSet::from([self.start]);
        self.epsilon_closure(&mut current);
        for symbol in input {
            current = self.step(&current, Some(*symbol));
            if current.is_empty() {
                return false;
            }
            self.epsilon_closure(&mut current);
        }
        self.any_accepting(&current)
    }
}

impl std::fmt::Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA over {} starting at {}:", self.alphabet, self.start)?;
        for (from, label, to) in self.edges() {
            let label = label.map_or_else(|| "ε".to_string(), |symbol| symbol.to_string());
            writeln!(f, "{} -{}-> {}", from, label, to)?;
        }
        write!(f, "accepting: {:?}", self.accepting_states())
    }
}
