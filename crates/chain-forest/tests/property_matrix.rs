use chain_forest::{ChainTree, NodeRef};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..100i32).prop_map(Op::Insert),
        2 => (0..usize::MAX).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn random_interleavings_preserve_every_invariant(
        ops in proptest::collection::vec(op_strategy(), 1..300)
    ) {
        let mut tree = ChainTree::new();
        let mut live: Vec<(NodeRef, i32)> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    let n = tree.alloc(v);
                    let (_, inserted) = tree.insert(n).unwrap();
                    prop_assert_eq!(inserted, n);
                    live.push((n, v));
                }
                Op::Remove(pick) => {
                    if live.is_empty() {
                        continue;
                    }
                    let (r, v) = live.swap_remove(pick % live.len());
                    prop_assert_eq!(tree.remove(r), Some(v));
                    prop_assert_eq!(tree.remove(r), None);
                }
            }
            tree.assert_valid().map_err(TestCaseError::fail)?;
            tree.assert_sorted().map_err(TestCaseError::fail)?;
            prop_assert_eq!(tree.len(), live.len());
        }

        let mut expected: Vec<i32> = live.iter().map(|(_, v)| *v).collect();
        expected.sort_unstable();
        let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn every_inserted_value_is_findable(
        values in proptest::collection::vec(-50..50i32, 1..60)
    ) {
        let mut tree = ChainTree::new();
        for &v in &values {
            let n = tree.alloc(v);
            tree.insert(n).unwrap();
        }

        for v in &values {
            let (parent, node) = tree.find(v).expect("inserted value is found");
            prop_assert_eq!(tree.value(node), Some(v));
            prop_assert_eq!(tree.parent(node), parent);
        }
    }

    #[test]
    fn position_based_appends_match_a_plain_list(
        values in proptest::collection::vec(any::<i32>(), 1..80)
    ) {
        let mut tree = ChainTree::new();
        let mut last = None;
        for &v in &values {
            let n = tree.alloc(v);
            tree.insert_after(last, n).unwrap();
            last = Some(n);
            tree.assert_valid().map_err(TestCaseError::fail)?;
        }

        let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(order, values);
    }
}
