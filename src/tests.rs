use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn keys_of<'a>(nodes: impl Iterator<Item = NodeRef<'a, i32>>) -> String {
    nodes
        .map(|node| node.get_key().unwrap().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn insert_find_all(keys: &[u32]) {
    let mut tree: RedBlackTree<u32> = RedBlackTree::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys {
        let node = tree.search(key);
        assert_eq!(node.get_key(), Ok(key));
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

// Every permutation of `0..n`, in lexicographic order.
fn permutations(n: u32) -> Vec<Vec<u32>> {
    fn go(prefix: &mut Vec<u32>, rest: &mut Vec<u32>, out: &mut Vec<Vec<u32>>) {
        if rest.is_empty() {
            out.push(prefix.clone());
            return;
        }

        for i in 0..rest.len() {
            let key = rest.remove(i);
            prefix.push(key);
            go(prefix, rest, out);
            prefix.pop();
            rest.insert(i, key);
        }
    }

    let mut out = Vec::new();
    go(&mut Vec::new(), &mut (0..n).collect(), &mut out);
    out
}

#[test]
fn six_elems_find() {
    for keys in permutations(6) {
        insert_find_all(&keys);
    }
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: RedBlackTree<u32> = RedBlackTree::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.delete(key), Some(*key));
        assert!(tree.search(key).is_null());
        tree.assert_invariants();
    }

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.delete(key), Some(*key));
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_six() {
    for keys in permutations(6) {
        insert_remove_all(&keys);
    }
}

#[test]
fn insert_many() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    for key in [
        55, 40, 58, 42, 42, 42, 42, 42, 42, 43, 44, 40, -10, 10, 15, 11, 100, 101, 103, 106, 107,
        109, 102,
    ] {
        tree.insert(key);
        assert_eq!(tree.search(&key).get_key(), Ok(&key));
    }

    assert_eq!(tree.len(), 23);
    tree.assert_invariants();
}

#[test]
fn search() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    assert!(tree.search(&60).is_null());
    assert!(!tree.contains(&60));

    tree.insert(30);
    assert_eq!(tree.search(&30).get_key(), Ok(&30));
    assert!(tree.contains(&30));
}

#[test]
fn search_borrowed() {
    let tree: RedBlackTree<String> = ["b", "a", "c"].into_iter().map(String::from).collect();

    assert_eq!(tree.search("a").get_key().map(String::as_str), Ok("a"));
    assert!(tree.search("d").is_null());
}

#[test]
fn delete() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    tree.insert(78);
    assert_eq!(tree.search(&78).get_key(), Ok(&78));
    assert_eq!(tree.delete(&78), Some(78));
    assert!(tree.search(&78).is_null());
    assert!(tree.get_root().is_null());

    tree.extend([73, 48, 100, 42, 55, 40, 58, 42, 55, 40, 58, 42]);
    assert_eq!(tree.len(), 12);

    tree.delete(&48);
    assert_eq!(tree.len(), 11);
    tree.delete(&42);
    assert_eq!(tree.len(), 10);
    tree.delete(&42);
    assert_eq!(tree.len(), 9);
    assert_eq!(tree.search(&42).get_key(), Ok(&42));
    tree.delete(&42);
    assert!(tree.search(&42).is_null());
    assert_eq!(tree.len(), 8);
    tree.delete(&100);
    assert_eq!(tree.len(), 7);

    // Absent keys are ignored.
    assert_eq!(tree.delete(&100), None);
    assert_eq!(tree.len(), 7);

    tree.assert_invariants();
}

#[test]
fn elaborate_delete() {
    let mut tree: RedBlackTree<i32> = [
        55, 40, 58, 42, 42, 42, 42, 42, 42, 43, 44, 40, -10, 10, 15, 11, 100, 101, 103, 106, 107,
        109, 102,
    ]
    .into_iter()
    .collect();

    for key in [15, 55, 103, 106, 107, 101, 42, 42, 42, 10, 40, 58, 100, 42] {
        assert_eq!(tree.delete(&key), Some(key));
        tree.assert_invariants();
    }

    assert!(tree
        .keys()
        .copied()
        .eq([-10, 11, 40, 42, 42, 43, 44, 102, 109]));
}

#[test]
fn duplicates() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    for _ in 0..23 {
        tree.insert(42);
        tree.assert_invariants();
    }

    for _ in 0..7 {
        assert_eq!(tree.delete(&42), Some(42));
        tree.assert_invariants();
    }
    assert_eq!(tree.len(), 16);

    for _ in 0..16 {
        assert_eq!(tree.delete(&42), Some(42));
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
    assert!(tree.search(&42).is_null());
    assert_eq!(tree.delete(&42), None);
}

#[test]
fn get_root() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    assert!(tree.get_root().is_null());

    tree.insert(3);
    let root = tree.get_root();
    assert_eq!(root.get_key(), Ok(&3));
    assert!(root.is_black());
    assert!(root.parent().is_null());
    assert!(root.left().is_null());
    assert!(root.right().is_null());
}

#[test]
fn accessors() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    assert!(tree.maximum().is_null());
    assert!(tree.minimum().is_null());

    tree.extend([55, 40, 58, 42]);

    assert_eq!(tree.maximum().get_key(), Ok(&58));
    assert_eq!(tree.minimum().get_key(), Ok(&40));
    assert_eq!(tree.successor(tree.search(&42)).get_key(), Ok(&55));
    assert_eq!(tree.successor(tree.search(&40)).get_key(), Ok(&42));
    assert_eq!(tree.successor(tree.search(&55)).get_key(), Ok(&58));
    assert_eq!(tree.predecessor(tree.search(&42)).get_key(), Ok(&40));
    assert_eq!(tree.predecessor(tree.search(&55)).get_key(), Ok(&42));
    assert_eq!(tree.predecessor(tree.search(&58)).get_key(), Ok(&55));

    assert!(tree.successor(tree.maximum()).is_null());
    assert!(tree.predecessor(tree.minimum()).is_null());
    assert!(tree.successor(tree.search(&1000)).is_null());

    tree.insert(57);
    assert_eq!(tree.predecessor(tree.search(&57)).get_key(), Ok(&55));
    assert_eq!(tree.search(&57).successor().get_key(), Ok(&58));
    assert_eq!(tree.search(&57).predecessor(), tree.search(&55));
}

#[test]
fn nil_sentinel() {
    let tree: RedBlackTree<i32> = RedBlackTree::new();
    let nil = tree.get_root();

    assert!(nil.is_null());
    assert!(nil.is_black());
    assert!(!nil.is_red());
    assert_eq!(nil.color(), Color::Black);
    assert_eq!(nil.get_key(), Err(Error::NilSentinel));
    assert_eq!(nil.key(), None);
    assert!(nil.left().is_null());
    assert!(nil.right().is_null());
    assert!(nil.parent().is_null());
    assert_eq!(format!("{nil:?}"), "NIL");
}

#[test]
fn leaves_point_at_nil() {
    let tree: RedBlackTree<i32> = (0..20).collect();

    for node in tree.inorder() {
        for child in [node.left(), node.right()] {
            if child.is_null() {
                assert!(child.is_black());
                assert!(child.get_key().is_err());
            } else {
                assert_eq!(child.parent(), node);
            }
        }
    }
}

fn one_two_three() -> RedBlackTree<i32> {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    tree.insert(1);
    tree.insert(2);
    tree.insert(3);
    tree
}

#[test]
fn preorder() {
    let mut tree = one_two_three();
    assert_eq!(keys_of(tree.preorder()), "2 1 3");

    tree.set_iteration_style("pre").unwrap();
    assert_eq!(keys_of(tree.iter()), "2 1 3");
}

#[test]
fn inorder() {
    let mut tree = one_two_three();
    assert_eq!(keys_of(tree.inorder()), "1 2 3");

    tree.set_iteration_style("in").unwrap();
    assert_eq!(keys_of(tree.iter()), "1 2 3");
}

#[test]
fn postorder() {
    let mut tree = one_two_three();
    assert_eq!(keys_of(tree.postorder()), "1 3 2");

    tree.set_iteration_style("post").unwrap();
    assert_eq!(keys_of((&tree).into_iter()), "1 3 2");
}

#[test]
fn iteration_is_restartable() {
    let tree = RedBlackTree::from_iter([8, 3, 10, 1, 6, 14, 4, 7, 13])
        .with_iteration_style(IterStyle::Postorder);

    let first = keys_of(tree.iter());
    let second = keys_of(tree.iter());
    assert_eq!(first, second);
    assert_eq!(tree.iter().len(), 9);
}

#[test]
fn traversals_visit_every_node_once() {
    let tree: RedBlackTree<i32> = (0..100).rev().chain(0..50).collect();

    for traversal in [tree.preorder(), tree.inorder(), tree.postorder()] {
        let mut keys: Vec<i32> = traversal.map(|node| *node.get_key().unwrap()).collect();
        keys.sort_unstable();

        let mut expected: Vec<i32> = (0..100).chain(0..50).collect();
        expected.sort_unstable();

        assert_eq!(keys, expected);
    }
}

#[test]
fn invalid_iteration_style() {
    let mut tree = one_two_three();
    tree.set_iteration_style("post").unwrap();

    assert_eq!(
        tree.set_iteration_style("spam"),
        Err(Error::InvalidIterationStyle("spam".into()))
    );
    assert_eq!(tree.iteration_style(), IterStyle::Postorder);
    assert_eq!(keys_of(tree.iter()), "1 3 2");
}

#[test]
fn print() {
    let mut tree: RedBlackTree<i32> = RedBlackTree::new();
    tree.insert(73);
    assert_eq!(format!("{:?}", tree.get_root()), "73:Black");

    tree.extend([48, 100, 42, 55, 40, 58, 42, 55, 40, 58, 42]);

    let rendered = tree.to_string();
    assert_eq!(rendered.lines().next(), Some("48 [B]"));
    for key in [73, 48, 100, 42, 40, 58] {
        assert!(rendered.contains(&format!("{key} [")));
    }

    let len = tree.len();
    tree.print_tree().unwrap();
    assert_eq!(tree.len(), len);
    tree.assert_invariants();
}

#[test]
fn clear_and_reuse() {
    let mut tree: RedBlackTree<u32> = (0..64).collect();
    tree.set_iteration_style("pre").unwrap();
    tree.clear();

    assert!(tree.is_empty());
    assert!(tree.get_root().is_null());
    assert_eq!(tree.iteration_style(), IterStyle::Preorder);
    tree.assert_invariants();

    tree.extend([5, 1, 9]);
    assert_eq!(tree.len(), 3);
    tree.assert_invariants();
}

#[test]
fn clone_is_independent() {
    let mut tree: RedBlackTree<u32> = (0..16).collect();
    let copy = tree.clone();

    tree.delete(&3);
    assert!(copy.contains(&3));
    assert_eq!(copy.len(), 16);
    assert_eq!(format!("{:?}", RedBlackTree::from_iter([2, 1])), "{1, 2}");
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn model_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_model_equivalence(ops);
    }

    #[test]
    fn inorder_is_sorted(keys in proptest::collection::vec(any::<i16>(), 0..300)) {
        let tree: RedBlackTree<i16> = keys.iter().copied().collect();
        tree.assert_invariants();

        let mut sorted = keys;
        sorted.sort_unstable();
        prop_assert!(tree.keys().eq(sorted.iter()));
    }
}
