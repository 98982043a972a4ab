//! The complete reconstruction pipeline and the resulting epsilon-machine.
//!
//! # Example
//!
//! ```
//! use epsilon_machine::morph::MorphConfig;
//! use epsilon_machine::reconstruct;
//!
//! // A period-two process has two causal states that alternate deterministically.
//! let sequence: Vec<u8> = (0..200).map(|i| (i % 2) as u8).collect();
//! let config = MorphConfig::new(4, 2, 1).unwrap();
//! let machine = reconstruct(&sequence, &config).unwrap();
//!
//! assert_eq!(machine.morph_count(), 2);
//! assert_eq!(machine.transitions().probability(0, 1), Some(1.0));
//! assert_eq!(machine.transitions().probability(1, 0), Some(1.0));
//! ```

use crate::MorphId;
use crate::diagram::{StateDiagram, TransitionDiagram};
use crate::error::ReconstructionError;
use crate::log_tree;
use crate::morph::{ClassifiedTree, MorphClassifier, MorphConfig};
use crate::transitions::TransitionTable;
use crate::tree::{NodeId, Symbol, SymbolTree};
use computation_process::Algorithm;
use log::info;
use std::fmt::{Display, Formatter};


/// Reconstruct an epsilon-machine from a finite symbol sequence.
///
/// The configuration is validated before anything else happens. The tree is populated from
/// all windows of length `D + 1`; a sequence shorter than that yields a machine with a single
/// degenerate morph and no transitions.
pub fn reconstruct<S: Symbol>(
    sequence: &[S],
    config: &MorphConfig,
) -> Result<EpsilonMachine<S>, ReconstructionError> {
    config.validate()?;
    let tree = SymbolTree::from_sequence(config.depth, config.precision, sequence);
    EpsilonMachine::from_tree(tree, config)
}

/// States (morphs) and transitions reconstructed from a labelled parse tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "S: serde::Deserialize<'de> + Ord"))
)]
pub struct EpsilonMachine<S> {
    config: MorphConfig,
    classified: ClassifiedTree<S>,
    transitions: TransitionTable<S>,
}

impl<S: Symbol> EpsilonMachine<S> {
    /// Classify an already populated tree and extract its transitions.
    ///
    /// The tree depth must match `config.depth`. Probabilities are recomputed with
    /// `config.precision`.
    pub fn from_tree(
        tree: SymbolTree<S>,
        config: &MorphConfig,
    ) -> Result<EpsilonMachine<S>, ReconstructionError> {
        config.validate_tree(&tree)?;
        info!("Reconstructing morphs ({}).", log_tree(&tree));

        let classified = MorphClassifier::<S>::run(config.clone(), tree)?;
        let transitions = TransitionTable::extract(&classified);
        let machine = EpsilonMachine {
            config: config.clone(),
            classified,
            transitions,
        };
        info!("{machine}");
        Ok(machine)
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// The fully labelled parse tree.
    pub fn tree(&self) -> &SymbolTree<S> {
        self.classified.tree()
    }

    pub fn classified(&self) -> &ClassifiedTree<S> {
        &self.classified
    }

    pub fn morph_count(&self) -> usize {
        self.classified.morph_count()
    }

    /// Representative node of every morph, indexed by [`MorphId`].
    pub fn representatives(&self) -> &[NodeId] {
        self.classified.representatives()
    }

    pub fn morph_of(&self, node: NodeId) -> Option<MorphId> {
        self.classified.morph_of(node)
    }

    pub fn transitions(&self) -> &TransitionTable<S> {
        &self.transitions
    }

    /// The transition function `T^s`: the morph reached from `morph` after emitting `symbol`,
    /// together with its probability.
    ///
    /// Returns `None` if the symbol was never observed after the morph representative, or if
    /// the reached node has no morph.
    pub fn next_morph(&self, morph: MorphId, symbol: &S) -> Option<(MorphId, f64)> {
        let tree = self.tree();
        let representative = self.classified.representative(morph)?;
        let branch = tree.node(tree.child(representative, symbol)?);
        Some((branch.morph()?, branch.prob()))
    }

    pub fn state_diagram(&self) -> StateDiagram<'_, S> {
        StateDiagram(self.tree())
    }

    pub fn transition_diagram(&self) -> TransitionDiagram<'_, S> {
        TransitionDiagram(&self.transitions)
    }
}

impl<S: Symbol> Display for EpsilonMachine<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Epsilon machine with {} morphs (D={}, K={}, L={})",
            self.morph_count(),
            self.config.depth,
            self.config.past_depth,
            self.config.future_depth
        )
    }
}
