//! Depth-bounded parse tree over symbol windows.
//!
//! Every node of a [`SymbolTree`] corresponds to one word of length `d <= D` (its depth) that
//! was observed as a prefix of some length-`D` window of the input sequence. Leaves (depth `D`)
//! hold raw window counts, internal nodes aggregate them, and every node stores the conditional
//! probability of being reached from its parent.
//!
//! The tree is an arena: nodes live in a single vector and refer to each other through
//! [`NodeId`]. Each node exclusively owns its branch map, and children are always allocated
//! after their parent. The counting passes rely on this ordering (a reverse scan of the arena is
//! a valid bottom-up order, a forward scan is a valid top-down order).
//!
//! # Example
//!
//! ```
//! use epsilon_machine::tree::SymbolTree;
//!
//! let mut tree = SymbolTree::new(3);
//! tree.observe(&[1, 2, 3]);
//! tree.observe(&[1, 2, 2]);
//! tree.compute_probabilities();
//!
//! let node = tree.find(&[1, 2]).unwrap();
//! assert_eq!(tree.node(node).prob(), 1.0);
//! let node = tree.find(&[1, 2, 3]).unwrap();
//! assert_eq!(tree.node(node).prob(), 0.5);
//! ```

use crate::MorphId;
use log::trace;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

#[cfg(test)]
mod tests;

/// The path id of the root node.
pub const ROOT_PATH_ID: &str = "[*]";

/// Number of decimal digits kept when rounding conditional probabilities.
pub const DEFAULT_PRECISION: u32 = 2;

/// Any type that can label tree edges.
///
/// Symbols must be totally ordered, because branch iteration order (and therefore candidate
/// order during classification) follows symbol order. `Display` is used for path ids.
pub trait Symbol: Clone + Ord + Debug + Display + 'static {}

impl<T: Clone + Ord + Debug + Display + 'static> Symbol for T {}

/// Index of a node inside its [`SymbolTree`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root is always the first node of the arena.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// The leaf/internal distinction of a [`TreeNode`].
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "S: serde::Deserialize<'de> + Ord"))
)]
pub enum NodeKind<S> {
    /// A node at the maximal depth `D`. Its `value` is incremented once per observed window.
    Leaf { value: u64 },
    /// A node above depth `D`; branches are created on demand during population.
    Internal { branches: BTreeMap<S, NodeId> },
}

/// A single node of a [`SymbolTree`].
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "S: serde::Deserialize<'de> + Ord"))
)]
pub struct TreeNode<S> {
    depth: usize,
    edge_symbol: Option<S>,
    path_id: String,
    leaf_count: u64,
    prob: f64,
    morph: Option<MorphId>,
    kind: NodeKind<S>,
}

impl<S: Symbol> TreeNode<S> {
    fn new(depth: usize, target_depth: usize, edge_symbol: Option<S>, path_id: String) -> Self {
        let kind = if depth == target_depth {
            NodeKind::Leaf { value: 0 }
        } else {
            NodeKind::Internal {
                branches: BTreeMap::new(),
            }
        };
        TreeNode {
            depth,
            edge_symbol,
            path_id,
            leaf_count: 0,
            prob: 0.0,
            morph: None,
            kind,
        }
    }

    /// Distance from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Symbol on the edge from the parent to this node (`None` for the root).
    pub fn edge_symbol(&self) -> Option<&S> {
        self.edge_symbol.as_ref()
    }

    /// Human-readable label: the edge symbols from the root joined by `_`.
    pub fn path_id(&self) -> &str {
        &self.path_id
    }

    /// Raw number of windows recorded at this node. Always zero for internal nodes.
    pub fn value(&self) -> u64 {
        match &self.kind {
            NodeKind::Leaf { value } => *value,
            NodeKind::Internal { .. } => 0,
        }
    }

    /// Number of leaf observations below this node (valid after
    /// [`SymbolTree::compute_counts`]).
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Rounded conditional probability of reaching this node from its parent (valid after
    /// [`SymbolTree::compute_probabilities`]).
    pub fn prob(&self) -> f64 {
        self.prob
    }

    /// Morph assigned during classification, `None` when unassigned.
    pub fn morph(&self) -> Option<MorphId> {
        self.morph
    }

    pub fn kind(&self) -> &NodeKind<S> {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Branch map of an internal node, `None` for leaves.
    pub fn branches(&self) -> Option<&BTreeMap<S, NodeId>> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { branches } => Some(branches),
        }
    }
}

/// Depth-bounded trie with occurrence counts and conditional probabilities.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "S: serde::Deserialize<'de> + Ord"))
)]
pub struct SymbolTree<S> {
    depth: usize,
    precision: u32,
    nodes: Vec<TreeNode<S>>,
}

impl<S: Symbol> SymbolTree<S> {
    /// Create a tree of the given maximal depth with only the root node, using
    /// [`DEFAULT_PRECISION`] for probabilities.
    pub fn new(depth: usize) -> Self {
        SymbolTree::with_precision(depth, DEFAULT_PRECISION)
    }

    /// Same as [`SymbolTree::new`], but rounds probabilities to `precision` decimal digits.
    pub fn with_precision(depth: usize, precision: u32) -> Self {
        SymbolTree {
            depth,
            precision,
            nodes: vec![TreeNode::new(0, depth, None, ROOT_PATH_ID.to_string())],
        }
    }

    /// Populate a new tree from every window of length `depth + 1` of `sequence`.
    ///
    /// Sequences shorter than `depth + 1` produce a tree without observations.
    pub fn from_sequence(depth: usize, precision: u32, sequence: &[S]) -> Self {
        let mut tree = SymbolTree::with_precision(depth, precision);
        for window in sequence.windows(depth + 1) {
            tree.observe(window);
        }
        trace!(
            "Populated tree from {} symbols ({} nodes).",
            sequence.len(),
            tree.len()
        );
        tree
    }

    /// Maximal depth `D` of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of decimal digits kept in probabilities.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of materialized nodes (including the root).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has a root, so it is "empty" when nothing else was created.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode<S> {
        &self.nodes[id.0]
    }

    /// All nodes in allocation order (every parent precedes its children).
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Children of `id` in symbol order (nothing for leaves).
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&S, NodeId)> {
        self.node(id)
            .branches()
            .into_iter()
            .flat_map(|branches| branches.iter().map(|(symbol, child)| (symbol, *child)))
    }

    /// Existing child of `id` for `symbol`. Never creates nodes.
    pub fn child(&self, id: NodeId, symbol: &S) -> Option<NodeId> {
        self.node(id)
            .branches()
            .and_then(|branches| branches.get(symbol).copied())
    }

    /// Existing node reached by following `path` from the root. Never creates nodes.
    ///
    /// As with [`SymbolTree::node_at`], the walk stops at a leaf and ignores the rest of `path`.
    pub fn find(&self, path: &[S]) -> Option<NodeId> {
        let mut current = self.root();
        for symbol in path {
            if self.node(current).is_leaf() {
                break;
            }
            current = self.child(current, symbol)?;
        }
        Some(current)
    }

    /// Return the child of `id` for `symbol`, creating it if it does not exist yet.
    ///
    /// A leaf has no children, so calling this on a leaf returns the leaf itself.
    pub fn get_or_create_child(&mut self, id: NodeId, symbol: S) -> NodeId {
        let parent = self.node(id);
        let Some(branches) = parent.branches() else {
            return id;
        };
        if let Some(child) = branches.get(&symbol) {
            return *child;
        }

        let path_id = if id == self.root() {
            symbol.to_string()
        } else {
            format!("{}_{}", parent.path_id, symbol)
        };
        let child = NodeId(self.nodes.len());
        let node = TreeNode::new(parent.depth + 1, self.depth, Some(symbol.clone()), path_id);
        self.nodes.push(node);
        if let NodeKind::Internal { branches } = &mut self.nodes[id.0].kind {
            branches.insert(symbol, child);
        }
        child
    }

    /// Follow `path` from `from`, creating missing nodes.
    ///
    /// Once a leaf is reached, the remaining symbols are ignored and the leaf is returned.
    pub fn descend(&mut self, from: NodeId, path: &[S]) -> NodeId {
        let mut current = from;
        for symbol in path {
            if self.node(current).is_leaf() {
                break;
            }
            current = self.get_or_create_child(current, symbol.clone());
        }
        current
    }

    /// Follow `path` from the root, creating missing nodes. See [`SymbolTree::descend`].
    pub fn node_at(&mut self, path: &[S]) -> NodeId {
        self.descend(self.root(), path)
    }

    /// Record one window: the last `D` symbols select a leaf whose value is incremented.
    ///
    /// # Panics
    ///
    /// Panics if the window is shorter than the tree depth.
    pub fn observe(&mut self, window: &[S]) {
        assert!(
            window.len() >= self.depth,
            "Window of length {} cannot populate a tree of depth {}.",
            window.len(),
            self.depth
        );
        let leaf = self.node_at(&window[window.len() - self.depth..]);
        if let NodeKind::Leaf { value } = &mut self.nodes[leaf.0].kind {
            *value += 1;
        }
    }

    /// Total number of recorded windows (valid after [`SymbolTree::compute_counts`]).
    pub fn observations(&self) -> u64 {
        self.node(self.root()).leaf_count
    }

    /// Bottom-up pass: leaves take their `value`, internal nodes the sum over their branches.
    pub fn compute_counts(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let count = match &self.nodes[index].kind {
                NodeKind::Leaf { value } => *value,
                NodeKind::Internal { branches } => branches
                    .values()
                    .map(|child| self.nodes[child.0].leaf_count)
                    .sum(),
            };
            self.nodes[index].leaf_count = count;
        }
    }

    /// Top-down pass assigning `prob = round(child.leaf_count / parent.leaf_count)` to every
    /// non-root node. Counts are recomputed first.
    ///
    /// Exact ties round to the even digit, so `1/8` becomes `0.12` at two digits.
    ///
    /// Children of a node without observations get probability `0`. The root is reached with
    /// certainty, so its probability is `1`.
    pub fn compute_probabilities(&mut self) {
        self.compute_counts();
        let scale = 10f64.powi(self.precision as i32);
        self.nodes[0].prob = 1.0;
        for index in 0..self.nodes.len() {
            // Children always live after their parent in the arena.
            let (head, tail) = self.nodes.split_at_mut(index + 1);
            let parent = &head[index];
            let Some(branches) = parent.branches() else {
                continue;
            };
            for child in branches.values() {
                let child = &mut tail[child.0 - index - 1];
                child.prob = if parent.leaf_count == 0 {
                    0.0
                } else {
                    let ratio = child.leaf_count as f64 / parent.leaf_count as f64;
                    (ratio * scale).round_ties_even() / scale
                };
            }
        }
    }

    /// Change the number of decimal digits used by the next [`SymbolTree::compute_probabilities`].
    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision;
    }

    pub(crate) fn set_morph(&mut self, id: NodeId, morph: Option<MorphId>) {
        self.nodes[id.0].morph = morph;
    }
}
