use crate::error::ConfigError;
use crate::tree::{DEFAULT_PRECISION, NodeId, Symbol, SymbolTree};

/// Trees deeper than this are rejected; the tree grows as `|A|^D`.
pub const MAX_DEPTH: usize = 32;

/// Probabilities are `f64` values, so more digits than this are meaningless.
pub const MAX_PRECISION: u32 = 15;

/// Default look-ahead level from which probabilities of inner nodes take part in the
/// equivalence test (`level > 1`).
///
/// Setting [`MorphConfig::probability_check_level`] to `0` makes the test strict, i.e.
/// probabilities are compared on every level.
pub const REFERENCE_PROBABILITY_CHECK_LEVEL: usize = 2;

/// A "flat" configuration object for morph reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphConfig {
    /// Maximal depth `D` of the parse tree.
    pub depth: usize,
    /// Depth `K` at which candidate morphs are sampled (`K <= D`).
    pub past_depth: usize,
    /// Number of levels `L` below a candidate that must match for two candidates to be
    /// considered the same morph.
    pub future_depth: usize,
    /// Inner levels of the look-ahead (i.e. `level < L`) only compare probabilities when
    /// `level >= probability_check_level` (default: [`REFERENCE_PROBABILITY_CHECK_LEVEL`]).
    ///
    /// The last look-ahead level always compares probabilities.
    pub probability_check_level: usize,
    /// Number of decimal digits kept in tree probabilities (default: [`DEFAULT_PRECISION`]).
    ///
    /// Probabilities are compared for exact equality after rounding, so this is effectively
    /// the tolerance of the equivalence test. Classification applies it to the tree before
    /// computing probabilities, overriding the precision the tree was built with.
    pub precision: u32,
}

impl MorphConfig {
    /// Create a new validated [`MorphConfig`] with the reference probability check and
    /// default precision.
    pub fn new(
        depth: usize,
        past_depth: usize,
        future_depth: usize,
    ) -> Result<MorphConfig, ConfigError> {
        let config = MorphConfig {
            depth,
            past_depth,
            future_depth,
            probability_check_level: REFERENCE_PROBABILITY_CHECK_LEVEL,
            precision: DEFAULT_PRECISION,
        };
        config.validate()?;
        Ok(config)
    }

    /// Compare probabilities on every look-ahead level.
    pub fn strict(mut self) -> MorphConfig {
        self.probability_check_level = 0;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> MorphConfig {
        self.precision = precision;
        self
    }

    /// Check that the configuration can be used. Fields are public, so this is repeated by
    /// [`crate::reconstruct`] before any tree is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.depth > MAX_DEPTH {
            return Err(ConfigError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }
        if self.past_depth > self.depth {
            return Err(ConfigError::PastDepthExceedsDepth {
                past_depth: self.past_depth,
                depth: self.depth,
            });
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }

    /// Check that `tree` was built for this configuration.
    pub fn validate_tree<S: Symbol>(&self, tree: &SymbolTree<S>) -> Result<(), ConfigError> {
        self.validate()?;
        if tree.depth() != self.depth {
            return Err(ConfigError::DepthMismatch {
                expected: self.depth,
                actual: tree.depth(),
            });
        }
        Ok(())
    }

    /// Two nodes are equivalent if their subtrees agree on the next `L` levels.
    ///
    /// See [`MorphConfig::equivalent_at`] for the exact rules.
    pub fn equivalent<S: Symbol>(&self, tree: &SymbolTree<S>, left: NodeId, right: NodeId) -> bool {
        self.equivalent_at(tree, left, right, 0)
    }

    /// Compare two nodes that are `level` steps below the nodes where the comparison started.
    ///
    /// - At `level == L`, only the edge symbols and probabilities are compared.
    /// - Above that, both nodes must have the same shape (both leaves, or both internal with
    ///   identical branch symbols), the same edge symbol and, once `level` reaches
    ///   [`MorphConfig::probability_check_level`], the same probability. All branch pairs
    ///   must then be equivalent on the next level.
    pub fn equivalent_at<S: Symbol>(
        &self,
        tree: &SymbolTree<S>,
        left: NodeId,
        right: NodeId,
        level: usize,
    ) -> bool {
        let (l_node, r_node) = (tree.node(left), tree.node(right));
        if level >= self.future_depth {
            return l_node.edge_symbol() == r_node.edge_symbol() && l_node.prob() == r_node.prob();
        }

        match (l_node.branches(), r_node.branches()) {
            (None, None) => {}
            (Some(l_branches), Some(r_branches)) => {
                if !l_branches.keys().eq(r_branches.keys()) {
                    return false;
                }
            }
            _ => return false,
        }

        if l_node.edge_symbol() != r_node.edge_symbol() {
            return false;
        }
        if level >= self.probability_check_level && l_node.prob() != r_node.prob() {
            return false;
        }

        // Branch keys are equal and sorted, so zipping pairs up identical symbols.
        tree.children(left)
            .zip(tree.children(right))
            .all(|((_, l_child), (_, r_child))| {
                self.equivalent_at(tree, l_child, r_child, level + 1)
            })
    }
}
