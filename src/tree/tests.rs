use crate::test_utils::{assert_conservation, assert_normalized, bits, init_logger, mk_tree, node};
use crate::tree::{NodeId, ROOT_PATH_ID, SymbolTree};

#[test]
fn path_ids_join_edge_symbols() {
    let mut tree = SymbolTree::<u8>::new(3);
    let zero = tree.node_at(&bits("0"));
    let zero_one = tree.node_at(&bits("01"));
    let leaf = tree.node_at(&bits("011"));

    assert_eq!(tree.node(tree.root()).path_id(), ROOT_PATH_ID);
    assert_eq!(tree.node(zero).path_id(), "0");
    assert_eq!(tree.node(zero_one).path_id(), "0_1");
    assert_eq!(tree.node(leaf).path_id(), "0_1_1");

    assert_eq!(tree.node(tree.root()).edge_symbol(), None);
    assert_eq!(tree.node(zero_one).edge_symbol(), Some(&1));
    assert_eq!(tree.node(leaf).depth(), 3);
    assert!(tree.node(leaf).is_leaf());
    assert!(!tree.node(zero_one).is_leaf());
}

#[test]
fn node_creation_is_idempotent() {
    let mut tree = SymbolTree::<u8>::new(2);
    let first = tree.get_or_create_child(NodeId::ROOT, 1);
    let second = tree.get_or_create_child(NodeId::ROOT, 1);
    let sibling = tree.get_or_create_child(NodeId::ROOT, 0);

    assert_eq!(first, second);
    assert_ne!(first, sibling);
    assert_eq!(tree.len(), 3);
    // Branches are kept in symbol order, not creation order.
    let symbols: Vec<u8> = tree.children(tree.root()).map(|(it, _)| *it).collect();
    assert_eq!(symbols, vec![0, 1]);
}

#[test]
fn leaves_absorb_longer_paths() {
    let mut tree = SymbolTree::<u8>::new(2);
    let leaf = tree.node_at(&bits("10"));
    assert_eq!(tree.get_or_create_child(leaf, 1), leaf);
    assert_eq!(tree.node_at(&bits("10111")), leaf);
    assert_eq!(tree.find(&bits("1011")), Some(leaf));
    assert_eq!(tree.len(), 3);
}

#[test]
fn find_never_creates_nodes() {
    let mut tree = SymbolTree::<u8>::new(3);
    tree.observe(&bits("010"));
    let before = tree.len();

    assert_eq!(tree.find(&bits("1")), None);
    assert_eq!(tree.find(&bits("011")), None);
    assert_eq!(tree.find(&[]), Some(tree.root()));
    assert!(tree.child(tree.root(), &1).is_none());
    assert_eq!(tree.len(), before);
}

#[test]
fn observe_uses_the_last_symbols_of_a_window() {
    let mut tree = SymbolTree::<u8>::new(2);
    tree.observe(&bits("110"));
    tree.observe(&bits("010"));
    tree.compute_counts();

    let leaf = node(&tree, "10");
    assert_eq!(tree.node(leaf).value(), 2);
    assert_eq!(tree.find(&bits("11")), None);
    assert_eq!(tree.observations(), 2);
}

#[test]
#[should_panic]
fn short_window_is_rejected() {
    let mut tree = SymbolTree::<u8>::new(3);
    tree.observe(&bits("01"));
}

#[test]
fn sequence_windows_are_counted() {
    init_logger();
    // Windows of length 3 keep their last two symbols: 10, 01, 11, 10.
    let mut tree = SymbolTree::from_sequence(2, 2, &bits("010110"));
    tree.compute_probabilities();

    assert_eq!(tree.observations(), 4);
    assert_eq!(tree.node(node(&tree, "10")).leaf_count(), 2);
    assert_eq!(tree.node(node(&tree, "01")).leaf_count(), 1);
    assert_eq!(tree.node(node(&tree, "11")).leaf_count(), 1);
    assert_eq!(tree.node(node(&tree, "0")).leaf_count(), 1);
    assert_eq!(tree.node(node(&tree, "1")).leaf_count(), 3);

    assert_eq!(tree.node(node(&tree, "0")).prob(), 0.25);
    assert_eq!(tree.node(node(&tree, "1")).prob(), 0.75);
    assert_eq!(tree.node(node(&tree, "10")).prob(), 0.67);
    assert_eq!(tree.node(node(&tree, "11")).prob(), 0.33);
    assert_eq!(tree.node(node(&tree, "01")).prob(), 1.0);
}

#[test]
fn short_sequence_has_no_observations() {
    let mut tree = SymbolTree::from_sequence(4, 2, &bits("0110"));
    tree.compute_probabilities();
    assert!(tree.is_empty());
    assert_eq!(tree.observations(), 0);
    assert_eq!(tree.node(tree.root()).prob(), 1.0);
}

#[test]
fn unobserved_nodes_have_zero_counts_and_probabilities() {
    let mut tree = SymbolTree::<u8>::new(3);
    let created = tree.node_at(&bits("01"));
    tree.compute_probabilities();

    assert_eq!(tree.observations(), 0);
    assert_eq!(tree.node(created).leaf_count(), 0);
    assert_eq!(tree.node(created).prob(), 0.0);
    assert_eq!(tree.node(node(&tree, "0")).prob(), 0.0);
}

#[test]
fn symbols_of_any_ordered_type() {
    let mut tree = SymbolTree::new(3);
    tree.observe(&['a', 'b', 'c']);
    tree.observe(&['a', 'b', 'b']);
    tree.observe(&['x', 'y', 'z']);
    tree.compute_probabilities();

    let ab = tree.find(&['a', 'b']).unwrap();
    assert_eq!(tree.node(ab).path_id(), "a_b");
    assert_eq!(tree.node(ab).prob(), 1.0);
    assert_eq!(tree.node(tree.find(&['a']).unwrap()).prob(), 0.67);
    assert_eq!(tree.node(tree.find(&['a', 'b', 'c']).unwrap()).prob(), 0.5);
}

#[test]
fn precision_controls_rounding() {
    let windows = [("00", 1), ("01", 2)];
    let mut tree = mk_tree(2, &windows);
    tree.compute_probabilities();
    assert_eq!(tree.node(node(&tree, "00")).prob(), 0.33);
    assert_eq!(tree.node(node(&tree, "01")).prob(), 0.67);

    let mut tree = SymbolTree::with_precision(2, 3);
    for (word, count) in windows {
        for _ in 0..count {
            tree.observe(&bits(word));
        }
    }
    tree.compute_probabilities();
    assert_eq!(tree.precision(), 3);
    assert_eq!(tree.node(node(&tree, "00")).prob(), 0.333);
    assert_eq!(tree.node(node(&tree, "01")).prob(), 0.667);
}

#[test]
fn counts_are_conserved_and_probabilities_normalized() {
    init_logger();
    let mut tree = mk_tree(
        3,
        &[
            ("000", 5),
            ("001", 1),
            ("010", 7),
            ("011", 2),
            ("101", 3),
            ("110", 4),
            ("111", 9),
        ],
    );
    tree.compute_probabilities();

    assert_eq!(tree.observations(), 31);
    assert_conservation(&tree);
    assert_normalized(&tree);
}

#[test]
fn recomputing_is_idempotent() {
    let mut tree = mk_tree(3, &[("011", 2), ("010", 1), ("110", 4)]);
    tree.compute_probabilities();
    let first = tree.clone();
    tree.compute_probabilities();
    assert_eq!(tree, first);

    // New observations are picked up by the next pass.
    tree.observe(&bits("111"));
    tree.compute_probabilities();
    assert_eq!(tree.observations(), 8);
    assert_conservation(&tree);
}

#[test]
fn internal_nodes_have_no_raw_value() {
    let mut tree = mk_tree(2, &[("01", 3)]);
    tree.compute_counts();
    let internal = node(&tree, "0");
    assert_eq!(tree.node(internal).value(), 0);
    assert_eq!(tree.node(internal).leaf_count(), 3);
    assert_eq!(tree.node(node(&tree, "01")).value(), 3);
    assert!(tree.node(node(&tree, "01")).branches().is_none());
}

#[test]
fn exact_ties_round_to_even() {
    let mut tree = mk_tree(2, &[("00", 1), ("01", 7), ("10", 5), ("11", 3)]);
    tree.compute_probabilities();

    assert_eq!(tree.node(node(&tree, "00")).prob(), 0.12);
    assert_eq!(tree.node(node(&tree, "01")).prob(), 0.88);
    assert_eq!(tree.node(node(&tree, "10")).prob(), 0.62);
    assert_eq!(tree.node(node(&tree, "11")).prob(), 0.38);
    assert_normalized(&tree);
    let zero = tree.node(node(&tree, "00")).prob() + tree.node(node(&tree, "01")).prob();
    assert!((zero - 1.0).abs() < 1e-9);
}

#[test]
fn precision_can_be_changed_before_recompute() {
    let mut tree = mk_tree(2, &[("00", 1), ("01", 2)]);
    tree.compute_probabilities();
    assert_eq!(tree.node(node(&tree, "01")).prob(), 0.67);

    tree.set_precision(1);
    tree.compute_probabilities();
    assert_eq!(tree.precision(), 1);
    assert_eq!(tree.node(node(&tree, "01")).prob(), 0.7);
}
