pub mod markov;

use crate::tree::{NodeId, Symbol, SymbolTree};

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Turn a string of binary digits into a symbol vector, e.g. `"0110"` becomes `[0, 1, 1, 0]`.
pub fn bits(word: &str) -> Vec<u8> {
    word.chars()
        .map(|it| match it {
            '0' => 0,
            '1' => 1,
            _ => panic!("Invalid binary symbol `{it}`."),
        })
        .collect()
}

/// Build a binary tree of the given depth where every word in `windows` is observed
/// the given number of times.
///
/// Words must have length `depth`.
pub fn mk_tree(depth: usize, windows: &[(&str, u64)]) -> SymbolTree<u8> {
    let mut tree = SymbolTree::new(depth);
    for (word, count) in windows {
        let word = bits(word);
        assert_eq!(word.len(), depth, "Window {:?} has the wrong length.", word);
        for _ in 0..*count {
            tree.observe(&word);
        }
    }
    tree
}

/// Look up an existing node by its binary path.
pub fn node(tree: &SymbolTree<u8>, path: &str) -> NodeId {
    tree.find(&bits(path))
        .unwrap_or_else(|| panic!("Node `{path}` does not exist."))
}

/// Check that every internal node counts exactly the observations of its children.
pub fn assert_conservation<S: Symbol>(tree: &SymbolTree<S>) {
    for (id, node) in tree.nodes() {
        if node.is_leaf() {
            assert_eq!(node.leaf_count(), node.value());
            continue;
        }
        let children: u64 = tree
            .children(id)
            .map(|(_, child)| tree.node(child).leaf_count())
            .sum();
        assert_eq!(
            node.leaf_count(),
            children,
            "Counts of `{}` are not conserved.",
            node.path_id()
        );
    }
}

/// Check that the branch probabilities of every observed internal node sum to one, up to
/// the rounding error of each child.
pub fn assert_normalized<S: Symbol>(tree: &SymbolTree<S>) {
    let tolerance = 10f64.powi(-(tree.precision() as i32));
    for (id, node) in tree.nodes() {
        if node.is_leaf() || node.leaf_count() == 0 {
            continue;
        }
        let branches = tree.children(id).count() as f64;
        let total: f64 = tree
            .children(id)
            .map(|(_, child)| tree.node(child).prob())
            .sum();
        assert!(
            (total - 1.0).abs() <= tolerance * branches + 1e-9,
            "Probabilities of `{}` sum to {}.",
            node.path_id(),
            total
        );
    }
}
