//! The ordered container engine.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::balance::{fixup_after_insert, fixup_after_remove, transplant};
use crate::error::ChainError;
use crate::node::{ChainNode, NodeRef, NIL};
use crate::verify;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)
}

fn default_comparator<T: PartialOrd>(a: &T, b: &T) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// A red-black tree and a doubly linked list threaded through the same
/// nodes, so that list order always equals in-order tree traversal.
///
/// Search, insertion and removal are O(log n); stepping to a neighbor and
/// reading the first or last element are O(1). Nodes live in a tree-owned
/// arena and are addressed through [`NodeRef`] handles. Duplicate values
/// are accepted: an equal comparison during the insertion walk always
/// descends right.
pub struct ChainTree<T, C = fn(&T, &T) -> i32>
where
    C: Fn(&T, &T) -> i32,
{
    arena: Vec<ChainNode<T>>,
    root: u32,
    head: u32,
    tail: u32,
    free: u32,
    len: usize,
    comparator: C,
    id: u64,
}

impl<T> ChainTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<T>)
    }
}

impl<T> Default for ChainTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> ChainTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    /// Creates an empty tree ordered by `comparator` (negative, zero or
    /// positive for less, equal, greater).
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: vec![ChainNode::sentinel()],
            root: NIL,
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
            comparator,
            id: next_tree_id(),
        }
    }

    /// Creates a detached node holding `value`. The node takes no
    /// structural role until passed to [`insert`](Self::insert) or
    /// [`insert_after`](Self::insert_after).
    pub fn alloc(&mut self, value: T) -> NodeRef {
        let idx = if self.free != NIL {
            let idx = self.free;
            self.free = self.arena[idx as usize].nx;
            let slot = &mut self.arena[idx as usize];
            slot.v = Some(value);
            slot.p = NIL;
            slot.l = NIL;
            slot.r = NIL;
            slot.nx = NIL;
            slot.pv = NIL;
            slot.b = false;
            slot.linked = false;
            idx
        } else {
            self.arena.push(ChainNode::detached(value));
            (self.arena.len() - 1) as u32
        };
        self.make_ref(idx)
    }

    /// Finds a node equal to `value` under the comparator.
    ///
    /// Returns `(parent, node)`, the parent being `None` for the root.
    /// `None` when no equal node is reached; absence is a normal outcome.
    /// With duplicates present, the node returned is the first equal one on
    /// the walk from the root.
    pub fn find(&self, value: &T) -> Option<(Option<NodeRef>, NodeRef)> {
        let mut curr = self.root;
        while curr != NIL {
            let node = &self.arena[curr as usize];
            let cmp = (self.comparator)(value, node.v.as_ref().expect("linked node holds a value"));
            if cmp == 0 {
                return Some((self.opt_ref(node.p), self.make_ref(curr)));
            }
            curr = if cmp < 0 { node.l } else { node.r };
        }
        None
    }

    /// Finds the would-be parent for a sorted insertion of `value`: the
    /// same walk as [`find`](Self::find), but an equal comparison does not
    /// stop it (ties descend right). `None` on an empty tree.
    pub fn find_insertion_point(&self, value: &T) -> Option<NodeRef> {
        let mut curr = self.root;
        let mut parent = NIL;
        while curr != NIL {
            parent = curr;
            let node = &self.arena[curr as usize];
            let cmp = (self.comparator)(value, node.v.as_ref().expect("linked node holds a value"));
            curr = if cmp < 0 { node.l } else { node.r };
        }
        self.opt_ref(parent)
    }

    /// Inserts a detached node at its sorted position.
    ///
    /// The node is attached as a tree leaf and spliced into the list at the
    /// position its tree attachment implies: a left child goes immediately
    /// before its parent, a right child immediately after. Returns
    /// `(parent, node)`, the parent being `None` when the tree was empty.
    pub fn insert(&mut self, node: NodeRef) -> Result<(Option<NodeRef>, NodeRef), ChainError> {
        let n = self.check_detached(node)?;

        let mut curr = self.root;
        let mut parent = NIL;
        let mut as_left = false;
        while curr != NIL {
            parent = curr;
            let value = self.arena[n as usize]
                .v
                .as_ref()
                .expect("detached node holds a value");
            let other = self.arena[curr as usize]
                .v
                .as_ref()
                .expect("linked node holds a value");
            as_left = (self.comparator)(value, other) < 0;
            curr = if as_left {
                self.arena[curr as usize].l
            } else {
                self.arena[curr as usize].r
            };
        }

        self.attach_leaf(n, parent, as_left);
        Ok((self.opt_ref(parent), node))
    }

    /// Inserts a detached node immediately after `after` in list order
    /// (`None` makes it the new head), deriving the tree attachment point
    /// from list adjacency instead of the comparator.
    ///
    /// Contract: this entry point never consults the comparator, so the
    /// caller is responsible for overall sort-order consistency. Inserting
    /// out of order keeps every structural invariant intact but makes
    /// subsequent [`find`](Self::find) results unspecified; no detection is
    /// attempted.
    pub fn insert_after(
        &mut self,
        after: Option<NodeRef>,
        node: NodeRef,
    ) -> Result<(Option<NodeRef>, NodeRef), ChainError> {
        let n = self.check_detached(node)?;

        let (parent, as_left) = match after {
            None => {
                if self.head == NIL {
                    (NIL, false)
                } else {
                    // The head is leftmost and has no left child.
                    (self.head, true)
                }
            }
            Some(a) => {
                let a = self.check_linked(a)?;
                let succ = self.arena[a as usize].nx;
                if succ == NIL {
                    // `after` is the tail and has no right child.
                    (a, false)
                } else if self.arena[succ as usize].l == NIL {
                    (succ, true)
                } else {
                    // A node whose in-order successor is not its right
                    // child has no right child itself.
                    (a, false)
                }
            }
        };

        self.attach_leaf(n, parent, as_left);
        Ok((self.opt_ref(parent), node))
    }

    /// Removes a node from both structures and returns its value.
    ///
    /// `None` when the reference does not resolve to a linked node (stale,
    /// foreign, already removed, or never inserted); the tree is untouched
    /// in that case. The handle is permanently stale afterwards.
    pub fn remove(&mut self, node: NodeRef) -> Option<T> {
        let z = self.resolve(node)?;
        if !self.arena[z as usize].linked {
            return None;
        }

        // The list successor is the in-order successor; capture it before
        // unsplicing.
        let succ = self.arena[z as usize].nx;
        self.unsplice(z);

        let zl = self.arena[z as usize].l;
        let zr = self.arena[z as usize].r;
        let x;
        let removed_black;

        if zl == NIL {
            x = zr;
            removed_black = self.arena[z as usize].b;
            transplant(&mut self.arena, &mut self.root, z, zr);
        } else if zr == NIL {
            x = zl;
            removed_black = self.arena[z as usize].b;
            transplant(&mut self.arena, &mut self.root, z, zl);
        } else {
            let y = succ;
            debug_assert_eq!(self.arena[y as usize].l, NIL);
            removed_black = self.arena[y as usize].b;
            x = self.arena[y as usize].r;
            if self.arena[y as usize].p == z {
                // `x` may be the sentinel; the fixup needs its parent link.
                self.arena[x as usize].p = y;
            } else {
                transplant(&mut self.arena, &mut self.root, y, x);
                self.arena[y as usize].r = zr;
                self.arena[zr as usize].p = y;
            }
            transplant(&mut self.arena, &mut self.root, z, y);
            self.arena[y as usize].l = zl;
            self.arena[zl as usize].p = y;
            self.arena[y as usize].b = self.arena[z as usize].b;
        }

        if removed_black {
            fixup_after_remove(&mut self.arena, &mut self.root, x);
        }

        self.len -= 1;
        Some(self.retire(z))
    }

    /// Root node, `None` when the tree is empty.
    pub fn root(&self) -> Option<NodeRef> {
        self.opt_ref(self.root)
    }

    /// First node in list order, `None` when the tree is empty.
    pub fn head(&self) -> Option<NodeRef> {
        self.opt_ref(self.head)
    }

    /// Last node in list order, `None` when the tree is empty.
    pub fn tail(&self) -> Option<NodeRef> {
        self.opt_ref(self.tail)
    }

    /// The node's value. Resolves for detached nodes too.
    pub fn value(&self, node: NodeRef) -> Option<&T> {
        let idx = self.resolve(node)?;
        self.arena[idx as usize].v.as_ref()
    }

    /// Mutable access to the node's value.
    ///
    /// Contract: the mutation must not change the value's relative order
    /// under the comparator while the node is linked.
    pub fn value_mut(&mut self, node: NodeRef) -> Option<&mut T> {
        let idx = self.resolve(node)?;
        self.arena[idx as usize].v.as_mut()
    }

    /// List successor of a linked node.
    pub fn next(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.resolve_linked(node)?;
        self.opt_ref(self.arena[idx as usize].nx)
    }

    /// List predecessor of a linked node.
    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.resolve_linked(node)?;
        self.opt_ref(self.arena[idx as usize].pv)
    }

    /// Tree parent of a linked node, `None` for the root.
    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.resolve_linked(node)?;
        self.opt_ref(self.arena[idx as usize].p)
    }

    /// Left tree child of a linked node.
    pub fn left(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.resolve_linked(node)?;
        self.opt_ref(self.arena[idx as usize].l)
    }

    /// Right tree child of a linked node.
    pub fn right(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.resolve_linked(node)?;
        self.opt_ref(self.arena[idx as usize].r)
    }

    /// Color of the node, `true` for black.
    pub fn is_black(&self, node: NodeRef) -> Option<bool> {
        let idx = self.resolve(node)?;
        Some(self.arena[idx as usize].b)
    }

    /// Number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree in nodes, 0 when empty.
    pub fn height(&self) -> usize {
        fn depth<T>(arena: &[ChainNode<T>], n: u32) -> usize {
            if n == NIL {
                return 0;
            }
            1 + depth(arena, arena[n as usize].l).max(depth(arena, arena[n as usize].r))
        }
        depth(&self.arena, self.root)
    }

    /// Drops every node, linked and detached, and invalidates every handle
    /// handed out so far.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.arena.push(ChainNode::sentinel());
        self.root = NIL;
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
        self.len = 0;
        self.id = next_tree_id();
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Head-to-tail iteration, O(1) per step.
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &T)> + '_ {
        let mut curr = self.head;
        std::iter::from_fn(move || {
            if curr == NIL {
                return None;
            }
            let idx = curr;
            curr = self.arena[idx as usize].nx;
            let value = self.arena[idx as usize]
                .v
                .as_ref()
                .expect("linked node holds a value");
            Some((self.make_ref(idx), value))
        })
    }

    /// Checks every structural invariant; `Err` describes the first
    /// violation found.
    pub fn assert_valid(&self) -> Result<(), String> {
        verify::assert_chain_tree(&self.arena, self.root, self.head, self.tail, self.len)
    }

    /// Checks that list order is non-decreasing under the comparator.
    /// Separate from [`assert_valid`](Self::assert_valid) because
    /// position-based insertion may legally violate sort order.
    pub fn assert_sorted(&self) -> Result<(), String> {
        let mut curr = self.head;
        while curr != NIL {
            let nx = self.arena[curr as usize].nx;
            if nx != NIL {
                let a = self.arena[curr as usize]
                    .v
                    .as_ref()
                    .expect("linked node holds a value");
                let b = self.arena[nx as usize]
                    .v
                    .as_ref()
                    .expect("linked node holds a value");
                if (self.comparator)(a, b) > 0 {
                    return Err("Node order violated".to_string());
                }
            }
            curr = nx;
        }
        Ok(())
    }

    /// Debug rendering of the tree shape and colors.
    pub fn print(&self) -> String
    where
        T: std::fmt::Debug,
    {
        verify::print(&self.arena, self.root, "")
    }

    #[inline]
    fn make_ref(&self, idx: u32) -> NodeRef {
        NodeRef {
            tree: self.id,
            idx,
            gen: self.arena[idx as usize].gen,
        }
    }

    #[inline]
    fn opt_ref(&self, idx: u32) -> Option<NodeRef> {
        if idx == NIL {
            None
        } else {
            Some(self.make_ref(idx))
        }
    }

    /// Resolves a handle to a live slot index: the registry lookup. `None`
    /// for foreign, stale or retired references.
    fn resolve(&self, r: NodeRef) -> Option<u32> {
        if r.tree != self.id || r.idx == NIL {
            return None;
        }
        let slot = self.arena.get(r.idx as usize)?;
        if slot.v.is_none() || slot.gen != r.gen {
            return None;
        }
        Some(r.idx)
    }

    fn resolve_linked(&self, r: NodeRef) -> Option<u32> {
        self.resolve(r).filter(|&i| self.arena[i as usize].linked)
    }

    fn check_live(&self, r: NodeRef) -> Result<u32, ChainError> {
        if r.tree != self.id {
            return Err(ChainError::Foreign);
        }
        if r.idx == NIL {
            return Err(ChainError::Stale);
        }
        let slot = self.arena.get(r.idx as usize).ok_or(ChainError::Stale)?;
        if slot.v.is_none() || slot.gen != r.gen {
            return Err(ChainError::Stale);
        }
        Ok(r.idx)
    }

    fn check_detached(&self, r: NodeRef) -> Result<u32, ChainError> {
        let idx = self.check_live(r)?;
        if self.arena[idx as usize].linked {
            return Err(ChainError::AlreadyLinked);
        }
        Ok(idx)
    }

    fn check_linked(&self, r: NodeRef) -> Result<u32, ChainError> {
        let idx = self.check_live(r)?;
        if !self.arena[idx as usize].linked {
            return Err(ChainError::NotLinked);
        }
        Ok(idx)
    }

    /// Attaches detached node `n` as a leaf under `parent` (as its left or
    /// right child), splices it into the list position the tree attachment
    /// implies, registers it and rebalances. `parent == NIL` means the tree
    /// is empty and `n` becomes root, head and tail at once.
    fn attach_leaf(&mut self, n: u32, parent: u32, as_left: bool) {
        {
            let slot = &mut self.arena[n as usize];
            slot.p = parent;
            slot.l = NIL;
            slot.r = NIL;
            slot.b = false;
            slot.linked = true;
        }
        if parent == NIL {
            self.root = n;
            self.head = n;
            self.tail = n;
        } else if as_left {
            debug_assert_eq!(self.arena[parent as usize].l, NIL);
            self.arena[parent as usize].l = n;
            self.splice_before(parent, n);
        } else {
            debug_assert_eq!(self.arena[parent as usize].r, NIL);
            self.arena[parent as usize].r = n;
            self.splice_after(parent, n);
        }
        self.len += 1;
        fixup_after_insert(&mut self.arena, &mut self.root, n);
    }

    /// Splices `n` immediately before `at` in the list.
    fn splice_before(&mut self, at: u32, n: u32) {
        let before = self.arena[at as usize].pv;
        self.arena[n as usize].pv = before;
        self.arena[n as usize].nx = at;
        self.arena[at as usize].pv = n;
        if before == NIL {
            self.head = n;
        } else {
            self.arena[before as usize].nx = n;
        }
    }

    /// Splices `n` immediately after `at` in the list.
    fn splice_after(&mut self, at: u32, n: u32) {
        let after = self.arena[at as usize].nx;
        self.arena[n as usize].nx = after;
        self.arena[n as usize].pv = at;
        self.arena[at as usize].nx = n;
        if after == NIL {
            self.tail = n;
        } else {
            self.arena[after as usize].pv = n;
        }
    }

    /// Unsplices `n` from the list, updating the list ends.
    fn unsplice(&mut self, n: u32) {
        let pv = self.arena[n as usize].pv;
        let nx = self.arena[n as usize].nx;
        if pv == NIL {
            self.head = nx;
        } else {
            self.arena[pv as usize].nx = nx;
        }
        if nx == NIL {
            self.tail = pv;
        } else {
            self.arena[nx as usize].pv = pv;
        }
        self.arena[n as usize].nx = NIL;
        self.arena[n as usize].pv = NIL;
    }

    /// Clears the retired node's relations, bumps the slot generation and
    /// pushes the slot onto the free list. Returns the value by move.
    fn retire(&mut self, idx: u32) -> T {
        let free = self.free;
        let slot = &mut self.arena[idx as usize];
        slot.p = NIL;
        slot.l = NIL;
        slot.r = NIL;
        slot.pv = NIL;
        slot.b = false;
        slot.linked = false;
        slot.gen = slot.gen.wrapping_add(1);
        slot.nx = free;
        let value = slot.v.take().expect("retired node held a value");
        self.free = idx;
        value
    }
}
