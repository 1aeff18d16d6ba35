//! Thompson construction: every syntax node becomes a fragment wired between
//! an entry and an exit node of the automaton under construction.

use log::debug;

use crate::alphabet::StateId;
use crate::automaton::FiniteAutomaton;
use crate::nfa::Nfa;
use crate::regex::{Regex, RegexNode};

impl Nfa {
    /// Build an epsilon-NFA with a single accepting node.
    pub fn from_regex(regex: &Regex) -> Nfa {
        let mut nfa = Nfa::new(regex.alphabet().clone());
        let begin = nfa.start();
        let end = nfa.new_node();

        wire(&mut nfa, regex.tree(), begin, end);
        nfa.set_accepting(end, true);

        debug!(
            "thompson: {} nodes, {} epsilon edges for {}",
            nfa.num_states(),
            nfa.epsilon_edge_count(),
            regex
        );
        nfa
    }
}

fn wire(nfa: &mut Nfa, node: &RegexNode, begin: StateId, end: StateId) {
    match node {
        RegexNode::Empty => {
            nfa.link(begin, None, end);
        }
        RegexNode::Literal(symbol) => {
            nfa.link(begin, Some(*symbol), end);
        }
        RegexNode::Alternation(children) => {
            for child in children {
                wire(nfa, child, begin, end);
            }
        }
        RegexNode::Concatenation(children) => {
            let mut chain: Vec<StateId> = Vec::with_capacity(children.len() + 1);
            chain.push(begin);
            for _ in 1..children.len() {
                chain.push(nfa.new_node());
            }
            chain.push(end);

            for (i, child) in children.iter().enumerate() {
                wire(nfa, child, chain[i], chain[i + 1]);
            }
        }
        RegexNode::Star(child) => {
            // the loop lives on its own node so it cannot mix with whatever
            // else leaves `begin`
            let hub = nfa.new_node();
            nfa.link(begin, None, hub);
            wire(nfa, child, hub, hub);
            nfa.link(hub, None, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> Nfa {
        Nfa::from_regex(&text.parse().unwrap())
    }

    #[test]
    fn literal_and_empty() {
        let nfa = build("a");
        assert_eq!(nfa.edges(), vec![(0, Some('a'), 1)]);
        assert_eq!(nfa.accepting_states(), vec![1]);

        let nfa = build("1");
        assert_eq!(nfa.edges(), vec![(0, None, 1)]);
        assert!(nfa.accepts_str(""));
    }

    #[test]
    fn alternation_shares_entry_and_exit() {
        let nfa = build("a+1");
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.edges(), vec![(0, None, 1), (0, Some('a'), 1)]);
        assert_eq!(nfa.epsilon_edge_count(), 1);
    }

    #[test]
    fn concatenation_chains_fresh_nodes() {
        let nfa = build("abc");
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(
            nfa.edges(),
            vec![(0, Some('a'), 2), (2, Some('b'), 3), (3, Some('c'), 1)]
        );
        assert!(nfa.accepts_str("abc"));
        assert!(!nfa.accepts_str("ab"));
    }

    #[test]
    fn star_loops_on_its_own_node() {
        let nfa = build("a*+b");
        assert!(nfa.accepts_str(""));
        assert!(nfa.accepts_str("aaa"));
        assert!(nfa.accepts_str("b"));
        assert!(!nfa.accepts_str("ab"));
        assert!(!nfa.accepts_str("bb"));

        let nfa = build("(a*b)*");
        assert!(nfa.accepts_str("aab"));
        assert!(nfa.accepts_str("babab"));
        assert!(!nfa.accepts_str("a"));
        assert!(!nfa.accepts_str("ba"));
    }
}
