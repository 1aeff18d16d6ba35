//! Partition refinement (Myhill–Nerode) over a complete DFA.

use std::collections::VecDeque;

use log::{debug, trace};
use rustc_hash::FxHashMap as HashMap;

use crate::alphabet::{StateId, Symbol};
use crate::dfa::{CompleteDfa, DfaNode};

type ClassId = u32;

// stands in for a missing move so malformed input still refines
const NO_CLASS: ClassId = ClassId::MAX;

impl CompleteDfa {
    /// Merge indistinguishable nodes. The result keeps only classes
    /// reachable from the start, numbered breadth first over the sorted
    /// alphabet, so two automata for the same language minimize to equal
    /// values.
    pub fn minimize(&self) -> CompleteDfa {
        let symbols: Vec<Symbol> = self.alphabet.iter().collect();
        let (classes, rounds) = self.refine(&symbols);

        // first member of every class stands for it
        let class_count = count_classes(&classes);
        let mut representative: Vec<usize> = vec![usize::MAX; class_count];
        for (node, class) in classes.iter().enumerate() {
            let slot = &mut representative[*class as usize];
            if *slot == usize::MAX {
                *slot = node;
            }
        }

        let start_class = classes[self.start as usize];
        let mut renumber: HashMap<ClassId, StateId> = HashMap::default();
        renumber.insert(start_class, 0);
        let mut nodes: Vec<DfaNode> = vec![DfaNode::default()];
        let mut work_queue: VecDeque<ClassId> = VecDeque::from([start_class]);

        while let Some(class) = work_queue.pop_front() {
            let id = renumber[&class] as usize;
            let member = &self.nodes[representative[class as usize]];
            nodes[id].accepting = member.accepting;
            for symbol in &symbols {
                let Some(target) = member.next(*symbol) else {
                    continue;
                };
                let target_class = classes[target as usize];
                let to = match renumber.get(&target_class) {
                    Some(to) => *to,
                    None => {
                        let to = nodes.len() as StateId;
                        nodes.push(DfaNode::default());
                        renumber.insert(target_class, to);
                        work_queue.push_back(target_class);
                        to
                    }
                };
                nodes[id].transitions.insert(*symbol, to);
            }
        }

        let dead = self
            .dead
            .and_then(|dead| renumber.get(&classes[dead as usize]).copied());

        debug!(
            "minimization: {} nodes -> {} classes ({} reachable) after {} rounds",
            self.nodes.len(),
            class_count,
            nodes.len(),
            rounds
        );
        CompleteDfa {
            alphabet: self.alphabet.clone(),
            nodes,
            start: 0,
            dead,
        }
    }

    /// Final class of every node and the number of refinement rounds taken.
    ///
    /// Classes start out as accepting/non-accepting and are split by the
    /// signature (own class, successor class per symbol) until a round leaves
    /// the class count unchanged. Labels follow first appearance in node
    /// order, so the outcome is reproducible.
    fn refine(&self, symbols: &[Symbol]) -> (Vec<ClassId>, usize) {
        let mut classes: Vec<ClassId> = label_by_first_appearance(
            self.nodes.iter().map(|node| node.accepting),
        );
        let mut count = count_classes(&classes);
        let mut rounds = 0;

        loop {
            rounds += 1;
            let signatures = self.nodes.iter().enumerate().map(|(id, node)| {
                let successors: Vec<ClassId> = symbols
                    .iter()
                    .map(|symbol| {
                        node.next(*symbol)
                            .map_or(NO_CLASS, |to| classes[to as usize])
                    })
                    .collect();
                (classes[id], successors)
            });
            let next = label_by_first_appearance(signatures);
            let next_count = count_classes(&next);
            trace!("refinement round {}: {} -> {} classes", rounds, count, next_count);

            classes = next;
            if next_count == count {
                break;
            }
            count = next_count;
        }
        (classes, rounds)
    }
}

fn label_by_first_appearance<K, I>(keys: I) -> Vec<ClassId>
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut labels: HashMap<K, ClassId> = HashMap::default();
    keys.into_iter()
        .map(|key| {
            let next = labels.len() as ClassId;
            *labels.entry(key).or_insert(next)
        })
        .collect()
}

fn count_classes(classes: &[ClassId]) -> usize {
    classes.iter().map(|c| *c as usize + 1).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::FiniteAutomaton;
    use crate::dfa::Dfa;
    use crate::nfa::Nfa;

    fn complete(text: &str) -> CompleteDfa {
        let nfa = Nfa::from_regex(&text.parse().unwrap()).without_epsilon();
        CompleteDfa::from_dfa(&Dfa::from_nfa(&nfa))
    }

    fn node(accepting: bool, transitions: &[(Symbol, StateId)]) -> DfaNode {
        DfaNode {
            transitions: transitions.iter().copied().collect(),
            accepting,
        }
    }

    #[test]
    fn star_collapses_to_one_node() {
        let mdfa = complete("a*").minimize();
        assert_eq!(mdfa.num_states(), 1);
        assert!(mdfa.is_accepting(0));
        assert_eq!(mdfa.next_state(0, 'a'), Some(0));
        assert_eq!(mdfa.dead(), None);
    }

    #[test]
    fn equivalent_nodes_are_merged() {
        // 0 -a-> 1, 0 -b-> 2, both accepting sinks into 3
        let cdfa = CompleteDfa {
            alphabet: "ab".chars().collect(),
            nodes: vec![
                node(false, &[('a', 1), ('b', 2)]),
                node(true, &[('a', 3), ('b', 3)]),
                node(true, &[('a', 3), ('b', 3)]),
                node(false, &[('a', 3), ('b', 3)]),
            ],
            start: 0,
            dead: Some(3),
        };
        let mdfa = cdfa.minimize();
        assert_eq!(mdfa.num_states(), 3);
        assert_eq!(mdfa.edges(), vec![
            (0, Some('a'), 1),
            (0, Some('b'), 1),
            (1, Some('a'), 2),
            (1, Some('b'), 2),
            (2, Some('a'), 2),
            (2, Some('b'), 2),
        ]);
        assert_eq!(mdfa.dead(), Some(2));
        assert_eq!(mdfa.accepting_states(), vec![1]);
    }

    #[test]
    fn unreachable_dead_node_is_dropped() {
        let cdfa = CompleteDfa {
            alphabet: "a".chars().collect(),
            nodes: vec![node(true, &[('a', 0)]), node(false, &[('a', 1)])],
            start: 0,
            dead: Some(1),
        };
        let mdfa = cdfa.minimize();
        assert_eq!(mdfa.num_states(), 1);
        assert_eq!(mdfa.dead(), None);
    }

    #[test]
    fn minimizing_twice_changes_nothing() {
        for text in ["(a+b)*a(b+a)", "ab+ba", "a(ba)*", "(a+b)*", "1"] {
            let once = complete(text).minimize();
            let twice = once.minimize();
            assert_eq!(once, twice, "{}", text);
        }
    }

    #[test]
    fn refinement_labels_are_deterministic() {
        let cdfa = complete("(a+b)*a(b+a)");
        let symbols: Vec<Symbol> = cdfa.alphabet.iter().collect();
        let (first, _) = cdfa.refine(&symbols);
        let (second, _) = cdfa.refine(&symbols);
        assert_eq!(first, second);
        assert_eq!(first[0], 0);
    }

    #[test]
    fn same_language_same_automaton() {
        let left = complete("(a+b)*").minimize();
        let right = complete("(a*b*)*").minimize();
        assert_eq!(left, right);

        let left = complete("a(b+c)").minimize();
        let right = complete("ab+ac").minimize();
        assert_eq!(left, right);
    }
}
