//! A reference model for [`RedBlackTree`]: a sorted `Vec` holding the same multiset of keys.
//!
//! Shared by the property tests and the fuzz targets.

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::RedBlackTree;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks a key already present in the model, wrapping around.
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Search(ItemValue),
    Delete(ItemValue),
    Successor(ItemValue),
    Predecessor(ItemValue),
    Minimum,
    Maximum,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Search(item) => FinalOp::Search(get_value(sorted, item)),
            Op::Delete(item) => FinalOp::Delete(get_value(sorted, item)),
            Op::Successor(item) => FinalOp::Successor(get_value(sorted, item)),
            Op::Predecessor(item) => FinalOp::Predecessor(get_value(sorted, item)),
            Op::Minimum => FinalOp::Minimum,
            Op::Maximum => FinalOp::Maximum,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Search(u32),
    Delete(u32),
    Successor(u32),
    Predecessor(u32),
    Minimum,
    Maximum,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        3 => value_strategy().prop_map(Op::Insert),
        1 => value_strategy().prop_map(Op::Search),
        2 => value_strategy().prop_map(Op::Delete),
        1 => value_strategy().prop_map(Op::Successor),
        1 => value_strategy().prop_map(Op::Predecessor),
        1 => Just(Op::Minimum),
        1 => Just(Op::Maximum),
    ]
}

pub fn run_model_equivalence(ops: Vec<Op>) {
    let mut sorted_values: Vec<u32> = Vec::with_capacity(ops.len());
    let mut tree: RedBlackTree<u32> = RedBlackTree::new();

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        let idx = v.partition_point(|&x| x <= value);
        v.insert(idx, value);
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) -> Option<u32> {
        let idx = v.binary_search(&value).ok()?;
        Some(v.remove(idx))
    }

    // The key that follows `value` in the model. If `value` is duplicated, the neighbour of
    // whichever copy the tree found may be another copy, so `None` is returned for "either".
    fn neighbour(v: &[u32], value: u32, forward: bool) -> Option<Option<u32>> {
        let lo = v.partition_point(|&x| x < value);
        let hi = v.partition_point(|&x| x <= value);

        if hi - lo > 1 {
            return None;
        }

        Some(if forward {
            v.get(hi).copied()
        } else {
            lo.checked_sub(1).map(|i| v[i])
        })
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);
        let len_before = tree.len();

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);
                tree.insert(value);

                assert_eq!(tree.len(), len_before + 1, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Search(value) => {
                let from_model = sorted_values.binary_search(&value).ok().map(|_| value);
                let from_tree = tree.search(&value).key().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Delete(value) => {
                let from_model = remove_sorted(&mut sorted_values, value);
                let from_tree = tree.delete(&value);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");

                let expected_len = len_before - usize::from(from_model.is_some());
                assert_eq!(tree.len(), expected_len, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Successor(value) | FinalOp::Predecessor(value) => {
                let forward = matches!(final_op, FinalOp::Successor(_));
                let node = tree.search(&value);

                if node.is_null() {
                    assert!(tree.successor(node).is_null());
                    assert!(tree.predecessor(node).is_null());
                } else {
                    let next = if forward {
                        tree.successor(node)
                    } else {
                        tree.predecessor(node)
                    };
                    let from_tree = next.key().copied();

                    match neighbour(&sorted_values, value, forward) {
                        Some(from_model) => {
                            assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}")
                        }
                        None => {
                            // Another copy of `value`, or a strictly greater (smaller) key.
                            if let Some(next) = from_tree {
                                if forward {
                                    assert!(next >= value, "FinalOp #{op_id}: {final_op:?}");
                                } else {
                                    assert!(next <= value, "FinalOp #{op_id}: {final_op:?}");
                                }
                            }
                        }
                    }
                }
            }

            FinalOp::Minimum => {
                let from_model = sorted_values.first().copied();
                let from_tree = tree.minimum().key().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Maximum => {
                let from_model = sorted_values.last().copied();
                let from_tree = tree.maximum().key().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        tree.assert_invariants();
        assert_eq!(sorted_values.len(), tree.len());
        assert!(sorted_values.iter().eq(tree.keys()));
    }
}
