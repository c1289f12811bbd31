//! In-order navigation by tree links only.
//!
//! The threaded list makes these walks unnecessary on the hot path; they
//! exist so the invariant checker can derive the in-order sequence from the
//! tree alone and cross-check it against the list.

use crate::node::{ChainNode, NIL};

/// Leftmost node of the subtree rooted at `n`.
pub(crate) fn subtree_first<T>(arena: &[ChainNode<T>], mut n: u32) -> u32 {
    while arena[n as usize].l != NIL {
        n = arena[n as usize].l;
    }
    n
}

/// Rightmost node of the subtree rooted at `n`.
pub(crate) fn subtree_last<T>(arena: &[ChainNode<T>], mut n: u32) -> u32 {
    while arena[n as usize].r != NIL {
        n = arena[n as usize].r;
    }
    n
}

/// In-order successor of `n` by tree links, `NIL` when `n` is last.
pub(crate) fn tree_next<T>(arena: &[ChainNode<T>], n: u32) -> u32 {
    if arena[n as usize].r != NIL {
        return subtree_first(arena, arena[n as usize].r);
    }
    let mut curr = n;
    let mut pa = arena[n as usize].p;
    while pa != NIL && arena[pa as usize].r == curr {
        curr = pa;
        pa = arena[pa as usize].p;
    }
    pa
}

/// In-order predecessor of `n` by tree links, `NIL` when `n` is first.
pub(crate) fn tree_prev<T>(arena: &[ChainNode<T>], n: u32) -> u32 {
    if arena[n as usize].l != NIL {
        return subtree_last(arena, arena[n as usize].l);
    }
    let mut curr = n;
    let mut pa = arena[n as usize].p;
    while pa != NIL && arena[pa as usize].l == curr {
        curr = pa;
        pa = arena[pa as usize].p;
    }
    pa
}
