//! Epsilon elimination, performed in place on the Thompson automaton.

use std::collections::BTreeSet;

use log::{debug, trace};

use crate::alphabet::StateId;
use crate::automaton::FiniteAutomaton;
use crate::nfa::Nfa;

impl Nfa {
    /// Replace every epsilon move by the moves it leads to, then drop the
    /// nodes nothing points at any more. The accepted language is unchanged.
    pub fn remove_epsilon(&mut self) {
        let ids: Vec<StateId> = self.nodes.keys().copied().collect();
        let mut removed = 0usize;
        for id in ids {
            removed += self.resolve_epsilon(id);
        }
        let collected = self.collect_unlinked();
        debug!(
            "epsilon elimination: {} epsilon edges resolved, {} nodes collected, {} left",
            removed,
            collected,
            self.num_states()
        );
    }

    /// Consuming form of [`Nfa::remove_epsilon`].
    pub fn without_epsilon(mut self) -> Nfa {
        self.remove_epsilon();
        self
    }

    // Absorb the targets of `id`'s epsilon edges until none are left. A target
    // is copied at most once; edges leading back to an absorbed node are just
    // dropped since its moves are already here.
    fn resolve_epsilon(&mut self, id: StateId) -> usize {
        let mut absorbed: BTreeSet<StateId> = BTreeSet::from([id]);
        let mut removed = 0;

        loop {
            let next = self.node(id).and_then(|node| node.targets(None).next());
            let Some(target) = next else {
                break;
            };
            if absorbed.insert(target) {
                let Some(closure) = self.node(target).cloned() else {
                    self.unlink(id, None, target);
                    continue;
                };
                for (label, targets) in closure.transitions {
                    for to in targets {
                        self.link(id, label, to);
                    }
                }
                if closure.accepting {
                    self.set_accepting(id, true);
                }
                trace!("node {} absorbed node {}", id, target);
            }
            self.unlink(id, None, target);
            removed += 1;
        }
        removed
    }

    // Remove nodes with no incoming edge other than the start, cascading to
    // the nodes only they pointed at.
    fn collect_unlinked(&mut self) -> usize {
        let start = self.start();
        let mut queue: Vec<StateId> = self
            .nodes
            .iter()
            .filter(|(id, node)| **id != start && node.links == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut collected = 0;

        while let Some(id) = queue.pop() {
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            collected += 1;
            for to in node.transitions.into_values().flatten() {
                if to == id {
                    continue;
                }
                if let Some(target) = self.nodes.get_mut(&to) {
                    target.links = target.links.saturating_sub(1);
                    if target.links == 0 && to != start {
                        queue.push(to);
                    }
                }
            }
        }
        collected
    }
}
