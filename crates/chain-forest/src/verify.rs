//! Structural invariant checker and debug printer.

use std::fmt::Debug;

use crate::node::{ChainNode, NIL};
use crate::util::{subtree_first, subtree_last, tree_next, tree_prev};

/// Checks every structural invariant of a tree: sentinel and root color,
/// parent-link symmetry, no red node with a red child, equal black-heights,
/// in-order tree traversal equal to head-to-tail list traversal, list link
/// bidirectionality, and registry consistency (linked slots are exactly the
/// nodes reachable from the root).
///
/// Sort order is deliberately not checked here: position-based insertion is
/// allowed to violate it while every structural invariant still holds.
pub(crate) fn assert_chain_tree<T>(
    arena: &[ChainNode<T>],
    root: u32,
    head: u32,
    tail: u32,
    len: usize,
) -> Result<(), String> {
    let sentinel = &arena[NIL as usize];
    if !sentinel.b {
        return Err("Sentinel is not black".to_string());
    }
    if sentinel.v.is_some() {
        return Err("Sentinel holds a value".to_string());
    }

    let linked_count = arena.iter().skip(1).filter(|n| n.linked).count();

    if root == NIL {
        if head != NIL || tail != NIL {
            return Err("Empty tree has list ends".to_string());
        }
        if len != 0 {
            return Err("Empty tree has nonzero length".to_string());
        }
        if linked_count != 0 {
            return Err("Empty tree has linked slots".to_string());
        }
        return Ok(());
    }

    if arena[root as usize].p != NIL {
        return Err("Root has parent".to_string());
    }
    if !arena[root as usize].b {
        return Err("Root is not black".to_string());
    }

    black_height(arena, root)?;

    let mut in_order = Vec::new();
    let mut curr = subtree_first(arena, root);
    while curr != NIL {
        in_order.push(curr);
        curr = tree_next(arena, curr);
    }

    let mut by_list = Vec::new();
    if arena[head as usize].pv != NIL {
        return Err("Head has a predecessor".to_string());
    }
    let mut curr = head;
    while curr != NIL {
        by_list.push(curr);
        let nx = arena[curr as usize].nx;
        if nx != NIL && arena[nx as usize].pv != curr {
            return Err("Broken back-link in list".to_string());
        }
        if nx == NIL && curr != tail {
            return Err("List ends before tail".to_string());
        }
        curr = nx;
    }

    if in_order != by_list {
        return Err("Tree order differs from list order".to_string());
    }

    let mut reversed = Vec::new();
    let mut curr = subtree_last(arena, root);
    while curr != NIL {
        reversed.push(curr);
        curr = tree_prev(arena, curr);
    }
    reversed.reverse();
    if reversed != in_order {
        return Err("Reverse traversal differs from forward traversal".to_string());
    }
    if in_order.len() != len {
        return Err("Length does not match node count".to_string());
    }
    if linked_count != len {
        return Err("Registry does not match node count".to_string());
    }

    Ok(())
}

fn black_height<T>(arena: &[ChainNode<T>], node: u32) -> Result<usize, String> {
    if node == NIL {
        return Ok(0);
    }

    let n = &arena[node as usize];
    if n.v.is_none() {
        return Err("Reachable node holds no value".to_string());
    }
    if !n.linked {
        return Err("Reachable node is not registered".to_string());
    }

    if n.l != NIL && arena[n.l as usize].p != node {
        return Err("Broken parent link on left child".to_string());
    }
    if n.r != NIL && arena[n.r as usize].p != node {
        return Err("Broken parent link on right child".to_string());
    }

    if !n.b {
        if n.l != NIL && !arena[n.l as usize].b {
            return Err("Red node has red left child".to_string());
        }
        if n.r != NIL && !arena[n.r as usize].b {
            return Err("Red node has red right child".to_string());
        }
    }

    let lh = black_height(arena, n.l)?;
    let rh = black_height(arena, n.r)?;
    if lh != rh {
        return Err("Black height mismatch".to_string());
    }

    Ok(lh + if n.b { 1 } else { 0 })
}

/// Debug printer for the tree shape and colors.
pub(crate) fn print<T: Debug>(arena: &[ChainNode<T>], node: u32, tab: &str) -> String {
    if node == NIL {
        return "∅".to_string();
    }
    let n = &arena[node as usize];
    let color = if n.b { "black" } else { "red" };
    let left = print(arena, n.l, &format!("{tab}  "));
    let right = print(arena, n.r, &format!("{tab}  "));
    format!(
        "Node[{node}] {color} {{ {:?} }}\n{tab}L={left}\n{tab}R={right}",
        n.v.as_ref().expect("reachable node holds a value")
    )
}
