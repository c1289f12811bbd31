use chain_forest::ChainTree;

#[test]
fn insert_three_shapes_black_root_with_red_children() {
    let mut tree = ChainTree::new();
    let a = tree.alloc(10);
    let (parent, n) = tree.insert(a).unwrap();
    assert!(parent.is_none());
    assert_eq!(n, a);

    let b = tree.alloc(20);
    tree.insert(b).unwrap();
    let c = tree.alloc(5);
    tree.insert(c).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(root, a);
    assert_eq!(tree.value(root), Some(&10));
    assert_eq!(tree.is_black(root), Some(true));
    assert_eq!(tree.left(root), Some(c));
    assert_eq!(tree.right(root), Some(b));
    assert_eq!(tree.is_black(b), Some(false));
    assert_eq!(tree.is_black(c), Some(false));

    let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
    assert_eq!(order, vec![5, 10, 20]);
    tree.assert_valid().unwrap();

    let rendered = tree.print();
    assert!(rendered.contains("black"));
    assert!(rendered.contains("red"));
}

#[test]
fn ascending_inserts_rotate_and_stay_shallow() {
    let mut tree = ChainTree::new();
    for v in [10, 20, 30, 40, 50] {
        let n = tree.alloc(v);
        tree.insert(n).unwrap();
        tree.assert_valid().unwrap();
    }

    // A right-leaning chain of 5 must have triggered at least one left
    // rotation; the resulting height is logarithmic.
    assert!(tree.height() <= 3);
    assert_eq!(tree.len(), 5);

    let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
    assert_eq!(order, vec![10, 20, 30, 40, 50]);
    assert_eq!(tree.value(tree.head().unwrap()), Some(&10));
    assert_eq!(tree.value(tree.tail().unwrap()), Some(&50));
}

#[test]
fn shuffled_inserts_keep_list_sorted() {
    for values in [
        [7, 3, 9, 1, 5, 8, 2, 6, 4, 0],
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
        [5, 9, 0, 3, 7, 1, 8, 2, 6, 4],
    ] {
        let mut tree = ChainTree::new();
        for v in values {
            let n = tree.alloc(v);
            tree.insert(n).unwrap();
            tree.assert_valid().unwrap();
            tree.assert_sorted().unwrap();
        }
        let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}

#[test]
fn duplicates_are_kept_not_replaced() {
    let mut tree = ChainTree::new();
    let mut refs = Vec::new();
    for v in [7, 3, 7, 9, 7] {
        let n = tree.alloc(v);
        tree.insert(n).unwrap();
        refs.push(n);
    }

    assert_eq!(tree.len(), 5);
    let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
    assert_eq!(order, vec![3, 7, 7, 7, 9]);
    tree.assert_valid().unwrap();
    tree.assert_sorted().unwrap();

    // Every inserted node is alive and distinct.
    for (i, r) in refs.iter().enumerate() {
        for other in refs.iter().skip(i + 1) {
            assert_ne!(r, other);
        }
        assert!(tree.value(*r).is_some());
    }
}

#[test]
fn find_reports_node_and_its_actual_parent() {
    let mut tree = ChainTree::new();
    for v in [8, 4, 12, 2, 6, 10, 14] {
        let n = tree.alloc(v);
        tree.insert(n).unwrap();
    }

    for v in [8, 4, 12, 2, 6, 10, 14] {
        let (parent, node) = tree.find(&v).expect("inserted value is found");
        assert_eq!(tree.value(node), Some(&v));
        assert_eq!(tree.parent(node), parent);
    }

    assert!(tree.find(&5).is_none());
    assert!(tree.find(&100).is_none());
}

#[test]
fn find_on_empty_tree_is_absent_not_an_error() {
    let tree = ChainTree::<i32>::new();
    assert!(tree.find(&1).is_none());
    assert!(tree.find_insertion_point(&1).is_none());
    assert!(tree.root().is_none());
    assert!(tree.head().is_none());
    assert!(tree.tail().is_none());
}

#[test]
fn insertion_point_does_not_stop_on_equality() {
    let mut tree = ChainTree::new();
    for v in [10, 20, 30] {
        let n = tree.alloc(v);
        tree.insert(n).unwrap();
    }

    // Root is 20 after the fixup. The walk for an equal value descends
    // right past the match and lands on 30's empty left slot.
    let root = tree.root().unwrap();
    assert_eq!(tree.value(root), Some(&20));
    let parent = tree.find_insertion_point(&20).unwrap();
    assert_eq!(tree.value(parent), Some(&30));

    let parent = tree.find_insertion_point(&99).unwrap();
    assert_eq!(Some(parent), tree.tail());
}

#[test]
fn custom_comparator_orders_descending() {
    let mut tree = ChainTree::with_comparator(|a: &i32, b: &i32| b.cmp(a) as i32);
    for v in [1, 3, 2] {
        let n = tree.alloc(v);
        tree.insert(n).unwrap();
    }
    let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
    assert_eq!(order, vec![3, 2, 1]);
    tree.assert_valid().unwrap();
    tree.assert_sorted().unwrap();
}
