//! Subset construction: each reachable set of NFA nodes becomes one DFA node.

use std::collections::{BTreeSet, VecDeque};

use log::{debug, trace};
use rustc_hash::FxHashMap as HashMap;

use crate::alphabet::StateId;
use crate::automaton::FiniteAutomaton;
use crate::dfa::{Dfa, DfaNode};
use crate::nfa::Nfa;

/// Sorted member ids; equal sets always produce equal keys.
type Configuration = Vec<StateId>;

impl Dfa {
    /// Determinize `nfa`. Epsilon moves, if any are left, are followed while
    /// building configurations. Nodes are numbered in discovery order with
    /// the start at 0; configurations with no move on a symbol get no edge.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let alphabet = nfa.alphabet().clone();

        let mut initial = BTreeSet::from([nfa.start()]);
        nfa.epsilon_closure(&mut initial);
        let initial: Configuration = initial.into_iter().collect();

        let mut nodes: Vec<DfaNode> = vec![DfaNode {
            transitions: Default::default(),
            accepting: nfa.any_accepting(&initial),
        }];
        let mut seen: HashMap<Configuration, StateId> = HashMap::default();
        seen.insert(initial.clone(), 0);
        let mut work_queue: VecDeque<(Configuration, StateId)> = VecDeque::from([(initial, 0)]);

        while let Some((configuration, from)) = work_queue.pop_front() {
            let members: BTreeSet<StateId> = configuration.into_iter().collect();
            for symbol in alphabet.iter() {
                let mut next = nfa.step(&members, Some(symbol));
                if next.is_empty() {
                    continue;
                }
                nfa.epsilon_closure(&mut next);
                let next: Configuration = next.into_iter().collect();

                let to = match seen.get(&next) {
                    Some(id) => *id,
                    None => {
                        let id = nodes.len() as StateId;
                        nodes.push(DfaNode {
                            transitions: Default::default(),
                            accepting: nfa.any_accepting(&next),
                        });
                        trace!("configuration {:?} -> node {}", next, id);
                        seen.insert(next.clone(), id);
                        work_queue.push_back((next, id));
                        id
                    }
                };
                nodes[from as usize].transitions.insert(symbol, to);
            }
        }

        debug!(
            "subset construction: {} NFA nodes -> {} DFA nodes",
            nfa.num_states(),
            nodes.len()
        );
        Dfa {
            alphabet,
            nodes,
            start: 0,
        }
    }
}
