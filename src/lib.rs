//! Reconstruction of epsilon-machines (minimal causal-state models) from symbol sequences.
//!
//! The pipeline follows the subtree-reconstruction scheme of computational mechanics:
//!
//!  1. Build a depth-`D` parse tree of all observed windows ([`tree::SymbolTree`]).
//!  2. Derive node-to-node conditional probabilities.
//!  3. Group the depth-`K` nodes into morphs by comparing their `L`-level future subtrees
//!     ([`morph::MorphClassifier`]).
//!  4. Label every tree node with its morph.
//!  5. Extract the morph-to-morph transitions ([`transitions::TransitionTable`]).
//!
//! [`machine::reconstruct`] runs all of these steps and [`diagram`] serializes the results.

use crate::tree::{Symbol, SymbolTree};

#[cfg(test)]
mod test_utils;

pub mod diagram;
pub mod error;
pub mod machine;
pub mod morph;
pub mod sequence;
pub mod transitions;
pub mod tree;

pub use error::{ConfigError, ReconstructionError};
pub use machine::{EpsilonMachine, reconstruct};

/// Index of a morph (causal state) in the ordered list of morph representatives.
pub type MorphId = usize;

/// A utility method for printing useful metadata of parse trees.
fn log_tree<S: Symbol>(tree: &SymbolTree<S>) -> String {
    format!(
        "nodes={}; observations={}; depth={}",
        tree.len(),
        tree.observations(),
        tree.depth()
    )
}
