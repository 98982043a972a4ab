use crate::MorphId;
use crate::tree::{NodeId, Symbol, SymbolTree};

/// Internal state of the [`MorphClassifier`](crate::morph::MorphClassifier).
///
/// The state owns the tree while it is being labelled. Only derived node fields
/// (probabilities and morph labels) are written; the tree structure never changes.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "S: serde::Deserialize<'de> + Ord"))
)]
pub struct MorphState<S> {
    pub(crate) tree: SymbolTree<S>,
    pub(crate) phase: Phase,
    /// All depth-`K` nodes in branch order.
    pub(crate) candidates: Vec<NodeId>,
    /// One node per discovered morph; the index is the morph id.
    pub(crate) representatives: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum Phase {
    Preparing,
    Grouping { next: usize },
    Labelling,
    Done,
}

impl<S: Symbol> From<SymbolTree<S>> for MorphState<S> {
    fn from(value: SymbolTree<S>) -> Self {
        MorphState {
            tree: value,
            phase: Phase::Preparing,
            candidates: Vec::new(),
            representatives: Vec::new(),
        }
    }
}

impl<S: Symbol> From<&SymbolTree<S>> for MorphState<S> {
    fn from(value: &SymbolTree<S>) -> Self {
        MorphState::from(value.clone())
    }
}

impl<S: Symbol> MorphState<S> {
    pub fn tree(&self) -> &SymbolTree<S> {
        &self.tree
    }

    /// Candidate nodes collected so far (empty until the first step finishes).
    pub fn candidates(&self) -> &[NodeId] {
        &self.candidates
    }

    /// Representatives of the morphs discovered so far.
    pub fn representatives(&self) -> &[NodeId] {
        &self.representatives
    }

    /// Number of candidates that were already compared against the representatives.
    pub fn processed_candidates(&self) -> usize {
        match self.phase {
            Phase::Preparing => 0,
            Phase::Grouping { next } => next,
            Phase::Labelling | Phase::Done => self.candidates.len(),
        }
    }
}

/// The result of morph classification: a labelled tree and the morph representatives.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "S: serde::Deserialize<'de> + Ord"))
)]
pub struct ClassifiedTree<S> {
    pub(crate) tree: SymbolTree<S>,
    pub(crate) candidate_count: usize,
    pub(crate) representatives: Vec<NodeId>,
}

impl<S: Symbol> ClassifiedTree<S> {
    /// The tree with probabilities and morph labels filled in.
    pub fn tree(&self) -> &SymbolTree<S> {
        &self.tree
    }

    pub fn into_tree(self) -> SymbolTree<S> {
        self.tree
    }

    /// Representative node of every morph, indexed by [`MorphId`].
    pub fn representatives(&self) -> &[NodeId] {
        &self.representatives
    }

    pub fn representative(&self, morph: MorphId) -> Option<NodeId> {
        self.representatives.get(morph).copied()
    }

    pub fn morph_count(&self) -> usize {
        self.representatives.len()
    }

    /// Number of depth-`K` nodes that were considered as morph candidates.
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    pub fn morph_of(&self, node: NodeId) -> Option<MorphId> {
        self.tree.node(node).morph()
    }
}
