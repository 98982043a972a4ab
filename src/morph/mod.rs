//! Discovery of morphs (causal states) in a populated parse tree.
//!
//! All nodes at depth `K` are candidate morphs. Two candidates belong to the same morph when
//! their subtrees agree on the next `L` levels (see [`MorphConfig::equivalent`]). The
//! classifier picks representatives greedily in candidate order and then labels every tree
//! node with the first representative it is equivalent to.
//!
//! Classification is a resumable computation: [`MorphClassifier`] can be run to completion,
//! or polled step by step (and, with the `serde` feature, saved between steps). Long runs can
//! be cancelled through `cancel_this`.
//!
//! # Example
//!
//! ```
//! use epsilon_machine::morph::{MorphClassifier, MorphConfig};
//! use epsilon_machine::tree::SymbolTree;
//! use computation_process::Algorithm;
//!
//! let sequence = [0u8, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
//! let tree = SymbolTree::from_sequence(3, 2, &sequence);
//! let config = MorphConfig::new(3, 1, 1).unwrap();
//!
//! let classified = MorphClassifier::<u8>::run(config, tree).unwrap();
//! assert_eq!(classified.morph_count(), 2);
//! ```

mod classify_step;
mod morph_config;
mod morph_state;


use crate::tree::{NodeId, Symbol, SymbolTree};
pub use classify_step::MorphStep;
use computation_process::Computation;
pub use morph_config::{MAX_DEPTH, MAX_PRECISION, MorphConfig, REFERENCE_PROBABILITY_CHECK_LEVEL};
pub use morph_state::{ClassifiedTree, MorphState};

/// Greedy morph classification of a [`SymbolTree`].
pub type MorphClassifier<S> =
    Computation<MorphConfig, MorphState<S>, ClassifiedTree<S>, MorphStep<S>>;

/// Collect all nodes at exactly `depth`, in branch (symbol) order.
pub fn collect_k_nodes<S: Symbol>(tree: &SymbolTree<S>, depth: usize) -> Vec<NodeId> {
    let mut result = Vec::new();
    collect_recursive(tree, tree.root(), depth, &mut result);
    result
}

fn collect_recursive<S: Symbol>(
    tree: &SymbolTree<S>,
    node: NodeId,
    remaining: usize,
    result: &mut Vec<NodeId>,
) {
    if remaining == 0 {
        result.push(node);
        return;
    }
    for (_, child) in tree.children(node) {
        collect_recursive(tree, child, remaining - 1, result);
    }
}
