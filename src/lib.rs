//! An arena-backed red-black tree.

// Implementation follows the presentation in Cormen, Leiserson, Rivest and Stein, with each pair
// of mirrored cases written once over a direction `dir` and its mirror `!dir`.
//
// The invariants of a red-black tree, as maintained here:
// 1. The root is black (or the tree is empty).
// 2. A red node has no red child.
// 3. For every node, all paths down to a descendant NIL contain the same number of black nodes.
// 4. In-order keys are non-decreasing. Duplicates descend to the right on insertion, but rotations
//    may later move an equal key into a left subtree, so only `left <= node <= right` holds.
// 5. `len` is the number of live nodes.
//
// Nodes live in `nodes`. Slot 0 is the NIL sentinel, which is black, has no key, and is never
// written. Parent links are plain indices and own nothing; the tree owns every slot.

use core::{cmp::Ordering, fmt, mem, ops::Not};
use std::borrow::Borrow;

use log::{debug, trace};

mod error;
mod iter;
mod map;
mod node;
mod render;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use iter::{IterStyle, Keys, Traversal};
pub use map::RedBlackMap;
pub use node::NodeRef;

/// The color of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// A red-black tree holding an ordered multiset of keys.
///
/// Insertion, deletion and lookup complete in _O(log(n))_ time. Equal keys may be inserted any
/// number of times; each insertion creates a distinct node.
pub struct RedBlackTree<K> {
    nodes: Vec<Node<K>>,
    root: NodeId,
    len: usize,
    style: IterStyle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

pub(crate) const NIL: NodeId = NodeId(0);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone)]
struct Node<K> {
    key: Option<K>,
    color: Color,
    parent: NodeId,
    children: [NodeId; 2],
}

impl<K> Node<K> {
    const fn sentinel() -> Self {
        Node {
            key: None,
            color: Color::Black,
            parent: NIL,
            children: [NIL; 2],
        }
    }
}

impl<K> RedBlackTree<K> {
    /// Returns a new empty tree.
    pub fn new() -> RedBlackTree<K> {
        RedBlackTree {
            nodes: vec![Node::sentinel()],
            root: NIL,
            len: 0,
            style: IterStyle::Inorder,
        }
    }

    /// Sets the order in which [`iter`](Self::iter) visits nodes, returning the tree.
    pub fn with_iteration_style(mut self, style: IterStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns `true` if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root == NIL);
        empty
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the order in which [`iter`](Self::iter) visits nodes.
    pub fn iteration_style(&self) -> IterStyle {
        self.style
    }

    /// Sets the order in which [`iter`](Self::iter) visits nodes.
    ///
    /// `name` must be one of `pre`, `in` or `post` (or the long forms `preorder`, `inorder`,
    /// `postorder`). On error the current style is kept.
    pub fn set_iteration_style(&mut self, name: &str) -> Result<(), Error> {
        self.style = name.parse()?;
        Ok(())
    }

    /// Returns a handle to the root node, or the NIL sentinel if the tree is empty.
    pub fn get_root(&self) -> NodeRef<'_, K> {
        self.node_ref(self.root)
    }

    /// Returns the node with the minimum key, or the NIL sentinel if the tree is empty.
    pub fn minimum(&self) -> NodeRef<'_, K> {
        self.node_ref(self.min_in_subtree(self.root))
    }

    /// Returns the node with the maximum key, or the NIL sentinel if the tree is empty.
    pub fn maximum(&self) -> NodeRef<'_, K> {
        self.node_ref(self.max_in_subtree(self.root))
    }

    /// Returns the in-order successor of `node`, or the NIL sentinel if there is none.
    pub fn successor<'tree>(&'tree self, node: NodeRef<'tree, K>) -> NodeRef<'tree, K> {
        debug_assert!(node.belongs_to(self), "`node` must belong to this tree");
        self.node_ref(self.next_id(node.id(), Dir::Right))
    }

    /// Returns the in-order predecessor of `node`, or the NIL sentinel if there is none.
    pub fn predecessor<'tree>(&'tree self, node: NodeRef<'tree, K>) -> NodeRef<'tree, K> {
        debug_assert!(node.belongs_to(self), "`node` must belong to this tree");
        self.node_ref(self.next_id(node.id(), Dir::Left))
    }

    /// Removes every element from the tree. The iteration style is kept.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.root = NIL;
        self.len = 0;
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_, K> {
        NodeRef::new(self, id)
    }

    // Accessors ==============================================================

    #[inline]
    fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        debug_assert_ne!(id, NIL, "the NIL sentinel is immutable");
        &mut self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn key_of(&self, id: NodeId) -> Option<&K> {
        self.node(id).key.as_ref()
    }

    #[inline]
    fn key(&self, id: NodeId) -> &K {
        match self.key_of(id) {
            Some(key) => key,
            None => unreachable!("live nodes always carry a key"),
        }
    }

    #[inline]
    pub(crate) fn key_mut(&mut self, id: NodeId) -> &mut K {
        match self.node_mut(id).key.as_mut() {
            Some(key) => key,
            None => unreachable!("live nodes always carry a key"),
        }
    }

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    #[inline]
    fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    #[inline]
    fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    // Painting the sentinel black is a no-op; painting it red is a bug.
    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        if id == NIL {
            debug_assert_eq!(color, Color::Black, "the NIL sentinel is always black");
            return;
        }

        self.node_mut(id).color = color;
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, dir: Dir) -> NodeId {
        self.node(id).children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> NodeId {
        self.child(id, Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> NodeId {
        self.child(id, Dir::Right)
    }

    #[inline]
    fn set_child(&mut self, id: NodeId, dir: Dir, child: NodeId) -> NodeId {
        mem::replace(&mut self.node_mut(id).children[dir as usize], child)
    }

    #[inline]
    fn maybe_set_parent(&mut self, id: NodeId, parent: NodeId) {
        if id == NIL {
            return;
        }

        self.node_mut(id).parent = parent;
    }

    pub(crate) fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.left(parent) == child {
            Dir::Left
        } else {
            debug_assert_eq!(self.right(parent), child, "`child` must be a child of `parent`");
            Dir::Right
        }
    }

    // Replaces the child link of `parent` pointing at `old_child` with `new_child`, or replaces
    // the root if `parent` is NIL.
    //
    // `new_child`'s parent link is not updated.
    fn replace_child_or_set_root(&mut self, parent: NodeId, old_child: NodeId, new_child: NodeId) {
        if parent == NIL {
            self.root = new_child;
        } else {
            let dir = self.which_child(parent, old_child);
            self.set_child(parent, dir, new_child);
        }
    }

    fn min_in_subtree(&self, root: NodeId) -> NodeId {
        self.extreme_in_subtree(root, Dir::Left)
    }

    fn max_in_subtree(&self, root: NodeId) -> NodeId {
        self.extreme_in_subtree(root, Dir::Right)
    }

    fn extreme_in_subtree(&self, root: NodeId, dir: Dir) -> NodeId {
        let mut cur = root;

        if cur == NIL {
            return NIL;
        }

        while self.child(cur, dir) != NIL {
            cur = self.child(cur, dir);
        }

        cur
    }

    // Returns the in-order neighbour of `node` in direction `dir`: the successor for `Right`, the
    // predecessor for `Left`.
    pub(crate) fn next_id(&self, node: NodeId, dir: Dir) -> NodeId {
        if node == NIL {
            return NIL;
        }

        let child = self.child(node, dir);
        if child != NIL {
            return self.extreme_in_subtree(child, !dir);
        }

        // Climb until we cross a link from the `!dir` side.
        let mut cur = node;
        let mut parent = self.parent(cur);
        while parent != NIL && self.child(parent, dir) == cur {
            cur = parent;
            parent = self.parent(cur);
        }

        parent
    }

    // Rotations ==============================================================

    // Rotates `x` down into its `dir` side; its `!dir` child `y` takes its place.
    //
    //       x                 y
    //      / \               / \
    //     a   y     ->      x   c      (dir = Left)
    //        / \           / \
    //       b   c         a   b
    fn rotate(&mut self, x: NodeId, dir: Dir) {
        let y = self.child(x, !dir);
        debug_assert_ne!(y, NIL, "cannot rotate a NIL child into place");

        trace!("rotate {dir:?} at {x:?}");

        // `across` moves from the `dir` side of `y` to the `!dir` side of `x`.
        let across = self.child(y, dir);
        self.set_child(x, !dir, across);
        self.maybe_set_parent(across, x);

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        self.replace_child_or_set_root(parent, x, y);

        self.set_child(y, dir, x);
        self.node_mut(x).parent = y;
    }

    // Invariant checks =======================================================

    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Ord,
    {
        let nil = self.node(NIL);
        assert_eq!(nil.color, Color::Black, "NIL must be black");
        assert!(nil.key.is_none(), "NIL must not carry a key");
        assert_eq!(nil.children, [NIL; 2], "NIL must not have children");

        if self.root == NIL {
            assert_eq!(self.len, 0);
            assert_eq!(self.nodes.len(), 1);
            return;
        }

        assert!(self.is_black(self.root), "root must be black");
        assert_eq!(self.parent(self.root), NIL, "root must not have a parent");

        let mut count = 0;
        self.assert_invariants_at(self.root, &mut count);
        assert_eq!(count, self.len, "len must match the number of reachable nodes");
        assert_eq!(self.nodes.len(), self.len + 1, "every slot must be reachable");

        // In-order keys are non-decreasing.
        let mut prev: Option<&K> = None;
        for key in self.keys() {
            if let Some(prev) = prev {
                assert!(prev <= key, "in-order keys must be non-decreasing");
            }
            prev = Some(key);
        }
    }

    // Returns the black-height of `node`.
    fn assert_invariants_at(&self, node: NodeId, count: &mut usize) -> usize
    where
        K: Ord,
    {
        if node == NIL {
            return 0;
        }

        *count += 1;
        assert!(self.key_of(node).is_some(), "live node must carry a key");

        let mut heights = [0; 2];
        for dir in [Dir::Left, Dir::Right] {
            let child = self.child(node, dir);
            if child == NIL {
                continue;
            }

            assert_eq!(self.parent(child), node, "child's parent link must point back");

            if self.is_red(node) {
                assert!(self.is_black(child), "red node must not have a red child");
            }

            match dir {
                Dir::Left => assert!(self.key(child) <= self.key(node)),
                Dir::Right => assert!(self.key(node) <= self.key(child)),
            }

            heights[dir as usize] = self.assert_invariants_at(child, count);
        }

        assert_eq!(heights[0], heights[1], "black-heights of siblings must match");

        let own = usize::from(self.is_black(node));
        heights[0] + own
    }
}

impl<K: Ord> RedBlackTree<K> {
    /// Returns the node holding `key`, or the NIL sentinel if no node does.
    ///
    /// If `key` occurs more than once, one of the matching nodes is returned.
    pub fn search<Q>(&self, key: &Q) -> NodeRef<'_, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.node_ref(self.search_id(key))
    }

    /// Returns `true` if the tree contains `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search_id(key) != NIL
    }

    pub(crate) fn search_id<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;

        while cur != NIL {
            match key.cmp(self.key(cur).borrow()) {
                Ordering::Less => cur = self.left(cur),
                Ordering::Equal => return cur,
                Ordering::Greater => cur = self.right(cur),
            }
        }

        NIL
    }

    /// Inserts `key` into the tree. Equal keys are kept side by side.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, key: K) {
        let mut parent = NIL;
        let mut dir = Dir::Left;
        let mut cur = self.root;

        // Descend the tree, looking for a free link. Equal keys go right.
        while cur != NIL {
            parent = cur;
            dir = match key.cmp(self.key(cur)) {
                Ordering::Less => Dir::Left,
                Ordering::Equal | Ordering::Greater => Dir::Right,
            };
            cur = self.child(cur, dir);
        }

        let node = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key: Some(key),
            color: Color::Red,
            parent,
            children: [NIL; 2],
        });

        if parent == NIL {
            self.root = node;
        } else {
            self.set_child(parent, dir, node);
        }

        self.len += 1;
        debug!("inserted {node:?} under {parent:?}, len = {}", self.len);

        self.rebalance_inserted(node);
    }

    // Restores invariant 2 after `node` was linked in as a red leaf.
    fn rebalance_inserted(&mut self, node: NodeId) {
        let mut x = node;

        while self.is_red(self.parent(x)) {
            let parent = self.parent(x);

            // A red parent is never the root, so the grandparent is a real node.
            let grandparent = self.parent(parent);
            let dir = self.which_child(grandparent, parent);
            let uncle = self.child(grandparent, !dir);

            if self.is_red(uncle) {
                // Push the grandparent's blackness down one level and retry two levels up.
                trace!("insert fixup at {x:?}: red uncle, recolor");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                x = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.child(parent, !dir) == x {
                // `x` is an inner child. Straighten the path; the old parent becomes `x`.
                trace!("insert fixup at {x:?}: inner child, rotate parent");
                self.rotate(parent, dir);
                x = parent;
                parent = self.parent(x);
            }

            // `x` is an outer child.
            trace!("insert fixup at {x:?}: outer child, rotate grandparent");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, !dir);
        }

        self.set_color(self.root, Color::Black);
    }

    /// Removes one node holding `key` and returns its key, or returns `None` if no node does.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.search_id(key);
        if target == NIL {
            debug!("delete: key not present");
            return None;
        }

        Some(self.remove_at(target))
    }

    // Unlinks `target` (or its successor, if `target` has two children) and returns the key
    // `target` held.
    pub(crate) fn remove_at(&mut self, target: NodeId) -> K {
        // 1. `target` has two children.
        //
        //    Its successor, the minimum of the right subtree, has no left child. The keys of the
        //    two nodes are exchanged and the successor is spliced out instead.
        //
        // 2. `target` has at most one child and is spliced out directly.
        //
        // Removing a red node leaves every black-height intact. Removing a black node leaves the
        // replacement's side one black short, which the fixup repairs.
        let spliced = if self.left(target) != NIL && self.right(target) != NIL {
            let successor = self.min_in_subtree(self.right(target));
            let successor_key = self.node_mut(successor).key.take();
            let target_key = mem::replace(&mut self.node_mut(target).key, successor_key);
            self.node_mut(successor).key = target_key;
            successor
        } else {
            target
        };

        let replacement = match self.left(spliced) {
            NIL => self.right(spliced),
            left => left,
        };
        let parent = self.parent(spliced);

        self.maybe_set_parent(replacement, parent);
        self.replace_child_or_set_root(parent, spliced, replacement);

        if self.is_black(spliced) {
            self.rebalance_removed(replacement, parent);
        }

        self.len -= 1;
        debug!("removed {spliced:?}, len = {}", self.len);

        let Node { key, .. } = self.release(spliced);
        match key {
            Some(key) => key,
            None => unreachable!("live nodes always carry a key"),
        }
    }

    // Repairs the black deficiency at `x`, a child of `parent`. `x` may be NIL, so its parent is
    // carried alongside rather than read from the sentinel.
    fn rebalance_removed(&mut self, node: NodeId, parent: NodeId) {
        let mut x = node;
        let mut parent = parent;

        while x != self.root && self.is_black(x) {
            // `x` is short one black node, so its sibling's subtree has black-height >= 1 and the
            // sibling is a real node.
            let dir = if self.left(parent) == x {
                Dir::Left
            } else {
                Dir::Right
            };
            let mut sibling = self.child(parent, !dir);

            if self.is_red(sibling) {
                // Bring a black sibling into place.
                trace!("delete fixup at {x:?}: red sibling, rotate parent");
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, dir);
                sibling = self.child(parent, !dir);
            }

            let near = self.child(sibling, dir);
            let far = self.child(sibling, !dir);

            if self.is_black(near) && self.is_black(far) {
                // Remove one black from both sides and move the deficiency up.
                trace!("delete fixup at {x:?}: black nephews, recolor sibling");
                self.set_color(sibling, Color::Red);
                x = parent;
                parent = self.parent(x);
                continue;
            }

            if self.is_black(far) {
                // Rotate the red near nephew into the far position.
                trace!("delete fixup at {x:?}: red near nephew, rotate sibling");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, !dir);
                sibling = self.child(parent, !dir);
            }

            // The far nephew is red; one rotation absorbs the deficiency.
            trace!("delete fixup at {x:?}: red far nephew, rotate parent");
            self.set_color(sibling, self.color(parent));
            self.set_color(parent, Color::Black);
            self.set_color(self.child(sibling, !dir), Color::Black);
            self.rotate(parent, dir);
            x = self.root;
            break;
        }

        self.set_color(x, Color::Black);
    }
}

impl<K> RedBlackTree<K> {
    // Frees the slot of the unlinked node `id` and returns its contents.
    //
    // The last slot is moved into the hole, so the moved node's neighbours are re-pointed.
    fn release(&mut self, id: NodeId) -> Node<K> {
        debug_assert_ne!(id, NIL, "the NIL sentinel is never released");

        let last = NodeId(self.nodes.len() - 1);
        let node = self.nodes.swap_remove(id.0);

        if id != last {
            let parent = self.parent(id);
            self.replace_child_or_set_root(parent, last, id);

            for dir in [Dir::Left, Dir::Right] {
                let child = self.child(id, dir);
                self.maybe_set_parent(child, id);
            }
        }

        node
    }
}

impl<K> Default for RedBlackTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for RedBlackTree<K> {
    fn clone(&self) -> Self {
        RedBlackTree {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            style: self.style,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RedBlackTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<K: Ord> Extend<K> for RedBlackTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for RedBlackTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}
