//! Completion with a dead node, and the inverse that strips it again.

use log::debug;

use crate::alphabet::StateId;
use crate::dfa::{CompleteDfa, Dfa, DfaNode};

impl CompleteDfa {
    /// Route every missing move of `dfa` to a non-accepting dead node that
    /// loops on every symbol. The dead node is only added when some move is
    /// missing, so completing a complete automaton returns a copy.
    pub fn from_dfa(dfa: &Dfa) -> CompleteDfa {
        let mut nodes = dfa.nodes.clone();
        let mut dead = None;

        if !dfa.is_complete() {
            let dead_id = nodes.len() as StateId;
            nodes.push(DfaNode {
                transitions: dfa.alphabet.iter().map(|symbol| (symbol, dead_id)).collect(),
                accepting: false,
            });
            for node in nodes.iter_mut() {
                for symbol in dfa.alphabet.iter() {
                    node.transitions.entry(symbol).or_insert(dead_id);
                }
            }
            dead = Some(dead_id);
        }

        debug!(
            "completion: {} nodes, dead node {:?}",
            nodes.len(),
            dead
        );
        CompleteDfa {
            alphabet: dfa.alphabet.clone(),
            nodes,
            start: dfa.start,
            dead,
        }
    }
}

impl Dfa {
    /// Drop the dead node of `cdfa` and every edge into it. If the start is
    /// the dead node the result is a single non-accepting node with no edges.
    pub fn from_complete(cdfa: &CompleteDfa) -> Dfa {
        let Some(dead) = cdfa.dead else {
            return Dfa {
                alphabet: cdfa.alphabet.clone(),
                nodes: cdfa.nodes.clone(),
                start: cdfa.start,
            };
        };
        if cdfa.start == dead {
            return Dfa {
                alphabet: cdfa.alphabet.clone(),
                nodes: vec![DfaNode::default()],
                start: 0,
            };
        }

        // ids above the dead node shift down by one
        let remap = |id: StateId| if id > dead { id - 1 } else { id };
        let nodes = cdfa
            .nodes
            .iter()
            .enumerate()
            .filter(|(id, _)| *id as StateId != dead)
            .map(|(_, node)| DfaNode {
                transitions: node
                    .transitions()
                    .filter(|(_, to)| *to != dead)
                    .map(|(symbol, to)| (symbol, remap(to)))
                    .collect(),
                accepting: node.accepting,
            })
            .collect();

        Dfa {
            alphabet: cdfa.alphabet.clone(),
            nodes,
            start: remap(cdfa.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::FiniteAutomaton;
    use crate::nfa::Nfa;

    fn determinize(text: &str) -> Dfa {
        Dfa::from_nfa(&Nfa::from_regex(&text.parse().unwrap()).without_epsilon())
    }

    #[test]
    fn missing_moves_go_to_dead_node() {
        let dfa = determinize("ab");
        let cdfa = CompleteDfa::from_dfa(&dfa);
        assert!(cdfa.is_complete());
        assert_eq!(cdfa.num_states(), 4);

        let dead = cdfa.dead().unwrap();
        assert!(!cdfa.is_accepting(dead));
        assert_eq!(cdfa.next_state(dead, 'a'), Some(dead));
        assert_eq!(cdfa.next_state(dead, 'b'), Some(dead));
        assert_eq!(cdfa.next_state(0, 'b'), Some(dead));

        for word in ["", "a", "ab", "ba", "abb", "aab"] {
            assert_eq!(cdfa.accepts_str(word), dfa.accepts_str(word), "{:?}", word);
        }
    }

    #[test]
    fn completing_twice_changes_nothing() {
        let cdfa = CompleteDfa::from_dfa(&determinize("a(b+a)*"));
        let again = CompleteDfa::from_dfa(&Dfa {
            alphabet: cdfa.alphabet.clone(),
            nodes: cdfa.nodes.clone(),
            start: cdfa.start,
        });
        assert_eq!(again.nodes, cdfa.nodes);
        assert_eq!(again.dead(), None);

        let complete = determinize("(a+b)*");
        let cdfa = CompleteDfa::from_dfa(&complete);
        assert_eq!(cdfa.dead(), None);
        assert_eq!(cdfa.num_states(), complete.num_states());
    }

    #[test]
    fn stripping_the_dead_node_restores_the_dfa() {
        let dfa = determinize("a(ba)*");
        let cdfa = CompleteDfa::from_dfa(&dfa);
        assert_eq!(Dfa::from_complete(&cdfa), dfa);
    }

    #[test]
    fn dead_node_in_the_middle_is_renumbered_around() {
        let cdfa = CompleteDfa {
            alphabet: "a".chars().collect(),
            nodes: vec![
                DfaNode {
                    transitions: [('a', 2)].into_iter().collect(),
                    accepting: false,
                },
                DfaNode {
                    transitions: [('a', 1)].into_iter().collect(),
                    accepting: false,
                },
                DfaNode {
                    transitions: [('a', 1)].into_iter().collect(),
                    accepting: true,
                },
            ],
            start: 0,
            dead: Some(1),
        };
        let dfa = Dfa::from_complete(&cdfa);
        assert_eq!(dfa.num_states(), 2);
        assert_eq!(dfa.edges(), vec![(0, Some('a'), 1)]);
        assert_eq!(dfa.accepting_states(), vec![1]);
    }
}
