//! Tree construction, lookup, removal and enumeration

use graftree::util::testing;
use graftree::{Address, Tree, TreeError, TreeResult};
use rstest::{fixture, rstest};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

// 1
// ├── 2
// │   ├── 4
// │   └── 5
// └── 3
#[fixture]
fn sample() -> Tree<i32> {
    let mut tree = Tree::new(1);
    tree.add_range_at_root([2, 3]);
    tree.add_range_at(&Address::full([0]), [4, 5]).unwrap();
    tree
}

fn values(tree: &Tree<i32>, forwards: bool) -> Vec<i32> {
    tree.enumerate(forwards).iter().map(|n| *n.value()).collect()
}

fn max_level(tree: &Tree<i32>) -> usize {
    tree.iter().map(|n| n.level()).max().unwrap()
}

// ============================================================
// Construction and adding
// ============================================================

#[test]
fn given_new_tree_when_created_then_has_single_root_of_depth_one() {
    let tree = Tree::new("root");
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.node_count(), 1);
    assert!(tree.root().is_root());
    assert!(tree.root().is_dead_end());
    assert_eq!(*tree.root().value(), "root");

    let empty: Tree<i32> = Tree::default();
    assert_eq!(*empty.root().value(), 0);
}

#[test]
fn given_root_value_when_adding_levels_then_depth_grows() {
    let mut tree = Tree::new(1);
    tree.add_range_at_root([2, 3]);
    assert_eq!(tree.depth(), 2);

    tree.add_range_at(&Address::full([0]), [4, 5]).unwrap();
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.find_address_of(&4), Some(Address::full([0, 0])));
    assert_eq!(values(&tree, true), vec![1, 2, 3, 4, 5]);
}

#[rstest]
#[case(Address::full([1]))]
#[case(Address::full([7]))]
#[case(Address::full([0, 0, 0, 0]))]
fn given_empty_values_when_adding_then_nothing_changes(
    mut sample: Tree<i32>,
    #[case] address: Address,
) {
    let added = sample.add_range_at(&address, Vec::<i32>::new()).unwrap();
    assert!(added.is_empty());
    assert_eq!(sample.depth(), 3);
    assert_eq!(sample.node_count(), 5);
}

#[rstest]
fn given_unresolvable_address_when_adding_then_fails_without_mutation(mut sample: Tree<i32>) {
    let result = sample.add_range_at(&Address::full([5]), [9, 9]);
    assert!(matches!(result, Err(TreeError::AddressNotFound(_))));
    assert_eq!(sample.node_count(), 5);

    assert!(sample.add_at(&Address::full([0, 7]), 9).is_err());
    assert_eq!(values(&sample, true), vec![1, 2, 3, 4, 5]);
}

#[rstest]
fn given_add_at_when_adding_single_value_then_appended_last(mut sample: Tree<i32>) -> TreeResult<()> {
    let id = sample.add_at(&Address::full([0]), 6)?;
    let node = sample.node(id)?;
    assert_eq!(node.address(), Address::full([0, 2]));
    assert_eq!(node.level(), 3);

    let top = sample.add_at_root(7);
    assert_eq!(sample.node(top)?.address(), Address::full([2]));
    Ok(())
}

// ============================================================
// Address resolution
// ============================================================

#[rstest]
#[case(Address::ROOT, 1)]
#[case(Address::full([0]), 2)]
#[case(Address::full([1]), 3)]
#[case(Address::full([0, 0]), 4)]
#[case(Address::full([0, 1]), 5)]
#[case(Address::partial([0, 1], 1), 2)]
#[case(Address::partial([0, 1], 0), 1)]
fn given_address_when_resolving_then_returns_node(
    sample: Tree<i32>,
    #[case] address: Address,
    #[case] expected: i32,
) {
    let node = sample.get_node_at_address(&address).unwrap();
    assert_eq!(*node.value(), expected);
}

#[rstest]
#[case(Address::full([2]))]
#[case(Address::full([1, 0]))]
#[case(Address::full([0, 0, 0]))]
#[case(Address::full([0, 0, 0, 0, 0]))]
fn given_bad_address_when_resolving_then_address_not_found(
    sample: Tree<i32>,
    #[case] address: Address,
) {
    match sample.get_node_at_address(&address) {
        Err(TreeError::AddressNotFound(reported)) => assert_eq!(reported, address),
        other => panic!("expected AddressNotFound, got {:?}", other.map(|n| *n.value())),
    }
}

#[rstest]
fn given_any_node_when_walking_up_level_minus_one_parents_then_reaches_root(sample: Tree<i32>) {
    for node in sample.iter() {
        let address = node.address();
        let resolved = sample.get_node_at_address(&address).unwrap();
        let top = resolved.ancestors().last().unwrap_or(resolved);
        assert_eq!(resolved.ancestors().count(), resolved.level() - 1);
        assert_eq!(top.id(), sample.root_id());
    }
}

// ============================================================
// Finding
// ============================================================

#[rstest]
fn given_every_value_when_finding_then_address_round_trips(sample: Tree<i32>) {
    for value in 2..=5 {
        let address = sample.find_address_of(&value).unwrap();
        let node = sample.get_node_at_address(&address).unwrap();
        assert_eq!(*node.value(), value);
    }
}

#[rstest]
fn given_root_value_when_finding_then_root_address(sample: Tree<i32>) {
    assert_eq!(sample.find_address_of(&1), Some(Address::ROOT));
}

#[rstest]
fn given_missing_value_when_finding_then_none(sample: Tree<i32>) {
    assert_eq!(sample.find_address_of(&42), None);
}

#[rstest]
fn given_duplicate_values_when_finding_then_first_in_breadth_first_order(mut sample: Tree<i32>) {
    sample.add_at(&Address::full([1]), 4).unwrap();
    // [1, 0] sits on level 3 after [0, 0], which wins
    assert_eq!(sample.find_address_of(&4), Some(Address::full([0, 0])));
    sample.add_at_root(5);
    // now a level-2 5 precedes the level-3 one
    assert_eq!(sample.find_address_of(&5), Some(Address::full([2])));
}

#[rstest]
fn given_node_when_searching_children_then_not_found_is_none(sample: Tree<i32>) {
    let two = sample.get_node_at_address(&Address::full([0])).unwrap();
    assert_eq!(two.index_of_child_with_value(&5), Some(1));
    assert_eq!(*two.find_child_with_value(&4).unwrap().value(), 4);
    assert!(two.find_child_with_value(&3).is_none());
    assert!(matches!(
        two.child_at(2),
        Err(TreeError::IndexOutOfRange { index: 2, len: 2 })
    ));
    let five = two.child_at(1).unwrap();
    assert_eq!(two.index_of_child(&five), Some(1));
}

// ============================================================
// Removal
// ============================================================

#[rstest]
fn given_keep_children_when_removing_node_then_grandchildren_promoted_in_place(
    mut sample: Tree<i32>,
) -> TreeResult<()> {
    sample.remove_node_at(&Address::full([0]))?;
    assert_eq!(sample.node_count(), 4);
    assert_eq!(sample.depth(), 2);
    assert_eq!(values(&sample, true), vec![1, 4, 5, 3]);
    for node in sample.root().children() {
        assert_eq!(node.level(), 2);
    }
    Ok(())
}

#[rstest]
fn given_discard_children_when_removing_subtree_then_descendants_gone(
    mut sample: Tree<i32>,
) -> TreeResult<()> {
    let four = sample.get_node_at_address(&Address::full([0, 0]))?.id();
    sample.remove_subtree_at(&Address::full([0]), false)?;
    assert_eq!(values(&sample, true), vec![1, 3]);
    assert_eq!(sample.depth(), 2);
    assert!(matches!(sample.node(four), Err(TreeError::UnknownNode(_))));
    Ok(())
}

#[rstest]
fn given_root_address_when_removing_then_only_children_cleared(
    mut sample: Tree<i32>,
) -> TreeResult<()> {
    sample.remove_subtree_at(&Address::ROOT, false)?;
    assert_eq!(sample.node_count(), 1);
    assert_eq!(sample.depth(), 1);
    assert_eq!(*sample.root().value(), 1);
    Ok(())
}

#[rstest]
fn given_unresolvable_address_when_removing_then_error(mut sample: Tree<i32>) {
    assert!(matches!(
        sample.remove_subtree_at(&Address::full([3]), true),
        Err(TreeError::AddressNotFound(_))
    ));
    assert_eq!(sample.node_count(), 5);
}

#[rstest]
fn given_first_child_when_removing_by_index_then_allowed(mut sample: Tree<i32>) -> TreeResult<()> {
    let two = sample.get_node_at_address(&Address::full([0]))?.id();
    let mut node = sample.node_mut(two)?;
    node.remove_child_at(0)?;
    assert!(matches!(
        node.remove_child_at(1),
        Err(TreeError::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert!(!node.remove_child_with_value(&42));
    assert!(node.remove_child_with_value(&5));
    assert_eq!(sample.depth(), 2);
    Ok(())
}

// ============================================================
// Depth bookkeeping
// ============================================================

#[rstest]
fn given_mixed_mutations_when_recomputing_then_cache_matches(mut sample: Tree<i32>) -> TreeResult<()> {
    sample.add_range_at(&Address::full([0, 1]), [6, 7])?;
    assert_eq!(sample.depth(), max_level(&sample));

    let mut branch = Tree::new(10);
    branch.add_at_root(11);
    sample.graft_at(&Address::full([0, 1, 0]), branch)?;
    assert_eq!(sample.depth(), max_level(&sample));

    sample.remove_subtree_at(&Address::full([0]), false)?;
    assert_eq!(sample.depth(), max_level(&sample));
    assert_eq!(sample.recompute_depth(), 2);
    Ok(())
}

#[rstest]
fn given_node_when_reparenting_then_levels_and_depth_follow(mut sample: Tree<i32>) -> TreeResult<()> {
    let two = sample.get_node_at_address(&Address::full([0]))?.id();
    let three = sample.get_node_at_address(&Address::full([1]))?.id();

    sample.node_mut(two)?.set_parent(three)?;
    assert_eq!(sample.depth(), 4);
    assert_eq!(sample.find_address_of(&5), Some(Address::full([0, 0, 1])));
    assert_eq!(sample.node(two)?.level(), 3);

    let four = sample.find_address_of(&4).unwrap();
    let four = sample.get_node_at_address(&four)?.id();
    assert!(matches!(
        sample.node_mut(three)?.set_parent(four),
        Err(TreeError::Cycle)
    ));
    let root = sample.root_id();
    assert!(matches!(
        sample.node_mut(root)?.set_parent(three),
        Err(TreeError::RootIsAnchored)
    ));
    Ok(())
}

#[rstest]
fn given_node_handle_when_editing_value_then_visible_through_tree(mut sample: Tree<i32>) -> TreeResult<()> {
    let three = sample.get_node_at_address(&Address::full([1]))?.id();
    {
        let mut node = sample.node_mut(three)?;
        node.set_value(30);
        *node.value_mut() += 3;
        assert_eq!(*node.as_node().value(), 33);
    }
    assert_eq!(sample.find_address_of(&33), Some(Address::full([1])));
    Ok(())
}

// ============================================================
// Enumeration and rendering
// ============================================================

#[rstest]
fn given_backwards_when_enumerating_then_breadth_first_reversed(sample: Tree<i32>) {
    assert_eq!(values(&sample, false), vec![5, 4, 3, 2, 1]);
}

#[rstest]
fn given_tree_when_rendering_levels_then_one_line_per_level(sample: Tree<i32>) {
    assert_eq!(sample.render(true), "[1]\n[2] [3]\n[4] [5]");
    assert_eq!(sample.render(false), "[5] [4]\n[3] [2]\n[1]");
}

#[rstest]
fn given_tree_when_displayed_then_draws_branches(sample: Tree<i32>) {
    let drawing = sample.to_string();
    assert!(drawing.starts_with("1\n"));
    assert!(drawing.contains("├── 2"));
    assert!(drawing.contains("└── 3"));
}

#[rstest]
fn given_clone_when_mutating_then_original_untouched(sample: Tree<i32>) {
    let mut copy = sample.clone();
    copy.add_at_root(9);
    assert_ne!(copy.id(), sample.id());
    assert_eq!(sample.node_count(), 5);
    assert_eq!(copy.node_count(), 6);
    assert!(matches!(
        copy.node(sample.root_id()),
        Err(TreeError::UnknownNode(_))
    ));
}
