use core::{fmt, ptr};

use crate::{Color, Dir, Error, NodeId, RedBlackTree, NIL};

/// A read-only handle to a node of a [`RedBlackTree`], or to its NIL sentinel.
///
/// Handles borrow the tree, so they cannot outlive the next mutation.
pub struct NodeRef<'tree, K> {
    tree: &'tree RedBlackTree<K>,
    id: NodeId,
}

impl<'tree, K> NodeRef<'tree, K> {
    pub(crate) fn new(tree: &'tree RedBlackTree<K>, id: NodeId) -> Self {
        NodeRef { tree, id }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn belongs_to(&self, tree: &RedBlackTree<K>) -> bool {
        ptr::eq(self.tree, tree)
    }

    /// Returns `true` if this is the NIL sentinel.
    pub fn is_null(&self) -> bool {
        self.id == NIL
    }

    /// Returns the node's key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NilSentinel`] if this is the NIL sentinel.
    pub fn get_key(&self) -> Result<&'tree K, Error> {
        self.key().ok_or(Error::NilSentinel)
    }

    /// Returns the node's key, or `None` for the NIL sentinel.
    pub fn key(&self) -> Option<&'tree K> {
        self.tree.key_of(self.id)
    }

    /// Returns the node's color. The NIL sentinel is black.
    pub fn color(&self) -> Color {
        self.tree.color(self.id)
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    /// Returns the left child. The children of the NIL sentinel are NIL.
    pub fn left(&self) -> NodeRef<'tree, K> {
        self.tree.node_ref(self.tree.child(self.id, Dir::Left))
    }

    /// Returns the right child. The children of the NIL sentinel are NIL.
    pub fn right(&self) -> NodeRef<'tree, K> {
        self.tree.node_ref(self.tree.child(self.id, Dir::Right))
    }

    /// Returns the parent, or the NIL sentinel for the root.
    pub fn parent(&self) -> NodeRef<'tree, K> {
        self.tree.node_ref(self.tree.parent(self.id))
    }

    /// Returns the in-order successor, or the NIL sentinel if there is none.
    pub fn successor(&self) -> NodeRef<'tree, K> {
        self.tree.node_ref(self.tree.next_id(self.id, Dir::Right))
    }

    /// Returns the in-order predecessor, or the NIL sentinel if there is none.
    pub fn predecessor(&self) -> NodeRef<'tree, K> {
        self.tree.node_ref(self.tree.next_id(self.id, Dir::Left))
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

// Handles are equal when they name the same slot of the same tree.
impl<K> PartialEq for NodeRef<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<K> Eq for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "{key:?}:{:?}", self.color()),
            None => f.write_str("NIL"),
        }
    }
}
