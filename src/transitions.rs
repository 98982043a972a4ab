//! Extraction of the morph-to-morph transition function from a labelled tree.

use crate::MorphId;
use crate::morph::ClassifiedTree;
use crate::tree::Symbol;
use log::{debug, warn};
use std::collections::BTreeMap;

/// A single transition of the epsilon-machine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition<S> {
    /// The symbol emitted while taking the transition.
    pub symbol: S,
    /// Rounded probability of the transition.
    pub probability: f64,
}

/// Mapping `source morph -> target morph -> transition`.
///
/// Every morph has an entry, even if it has no outgoing transitions. If two symbols of the
/// same representative lead to the same target morph, the later symbol wins.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionTable<S> {
    transitions: BTreeMap<MorphId, BTreeMap<MorphId, Transition<S>>>,
}

impl<S: Symbol> TransitionTable<S> {
    /// Follow every branch of every morph representative and record the morph of the branch
    /// together with its symbol and probability.
    ///
    /// Branches leading to nodes without a morph (e.g. leaves) cannot be expressed in the
    /// table and are skipped.
    pub fn extract(classified: &ClassifiedTree<S>) -> TransitionTable<S> {
        let tree = classified.tree();
        let mut transitions = BTreeMap::new();
        for (morph, representative) in classified.representatives().iter().enumerate() {
            let targets: &mut BTreeMap<MorphId, Transition<S>> =
                transitions.entry(morph).or_default();
            for (symbol, branch) in tree.children(*representative) {
                let branch = tree.node(branch);
                let Some(target) = branch.morph() else {
                    warn!(
                        "Transition {} --[{}]--> `{}` skipped; the target has no morph.",
                        morph,
                        symbol,
                        branch.path_id()
                    );
                    continue;
                };
                targets.insert(
                    target,
                    Transition {
                        symbol: symbol.clone(),
                        probability: branch.prob(),
                    },
                );
            }
        }

        let table = TransitionTable { transitions };
        debug!(
            "Extracted {} transitions between {} morphs.",
            table.len(),
            classified.morph_count()
        );
        table
    }

    pub fn get(&self, from: MorphId, to: MorphId) -> Option<&Transition<S>> {
        self.transitions.get(&from).and_then(|it| it.get(&to))
    }

    /// Probability of moving from `from` to `to`, `None` if there is no such transition.
    pub fn probability(&self, from: MorphId, to: MorphId) -> Option<f64> {
        self.get(from, to).map(|it| it.probability)
    }

    /// Outgoing transitions of a morph in target order.
    pub fn targets(&self, from: MorphId) -> impl Iterator<Item = (MorphId, &Transition<S>)> {
        self.transitions
            .get(&from)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, it)| (*to, it)))
    }

    /// All transitions as `(source, target, transition)`, ordered by source and target.
    pub fn iter(&self) -> impl Iterator<Item = (MorphId, MorphId, &Transition<S>)> {
        self.transitions.iter().flat_map(|(from, targets)| {
            targets.iter().map(move |(to, it)| (*from, *to, it))
        })
    }

    /// Source morphs, including morphs without outgoing transitions.
    pub fn sources(&self) -> impl Iterator<Item = MorphId> {
        self.transitions.keys().copied()
    }

    /// Total number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.values().map(|it| it.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
