use core::{iter::FusedIterator, str::FromStr};

use crate::{Dir, Error, NodeId, NodeRef, RedBlackTree, NIL};

/// The order in which a traversal visits nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IterStyle {
    /// Each node before its subtrees.
    Preorder,
    /// Left subtree, node, right subtree. Keys come out in non-decreasing order.
    #[default]
    Inorder,
    /// Each node after its subtrees.
    Postorder,
}

impl FromStr for IterStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre" | "preorder" => Ok(IterStyle::Preorder),
            "in" | "inorder" => Ok(IterStyle::Inorder),
            "post" | "postorder" => Ok(IterStyle::Postorder),
            _ => Err(Error::InvalidIterationStyle(s.to_owned())),
        }
    }
}

enum CameFrom {
    Parent,
    LeftChild,
    RightChild,
}

/// A traversal over the nodes of a [`RedBlackTree`].
///
/// The walk follows parent links, so it needs no stack.
pub struct Traversal<'tree, K> {
    tree: &'tree RedBlackTree<K>,
    style: IterStyle,

    cur: NodeId,
    from: CameFrom,

    len: usize,
}

impl<'tree, K> Traversal<'tree, K> {
    pub(crate) fn new(tree: &'tree RedBlackTree<K>, style: IterStyle) -> Self {
        Traversal {
            tree,
            style,

            cur: tree.root,
            from: CameFrom::Parent,
            len: tree.len(),
        }
    }

    fn emit(&mut self, id: NodeId) -> NodeRef<'tree, K> {
        self.len -= 1;
        self.tree.node_ref(id)
    }
}

impl<'tree, K> Iterator for Traversal<'tree, K> {
    type Item = NodeRef<'tree, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;

        while self.cur != NIL {
            let cur = self.cur;

            match self.from {
                CameFrom::Parent => {
                    // Entering a subtree: descend left if possible, otherwise the (empty) left
                    // subtree is already exhausted.
                    let left = tree.left(cur);
                    if left != NIL {
                        self.cur = left;
                    } else {
                        self.from = CameFrom::LeftChild;
                    }

                    if self.style == IterStyle::Preorder {
                        return Some(self.emit(cur));
                    }
                }

                CameFrom::LeftChild => {
                    let right = tree.right(cur);
                    if right != NIL {
                        self.cur = right;
                        self.from = CameFrom::Parent;
                    } else {
                        self.from = CameFrom::RightChild;
                    }

                    if self.style == IterStyle::Inorder {
                        return Some(self.emit(cur));
                    }
                }

                CameFrom::RightChild => {
                    // Both subtrees are exhausted. Ascend one level.
                    let parent = tree.parent(cur);
                    if parent != NIL {
                        self.from = match tree.which_child(parent, cur) {
                            Dir::Left => CameFrom::LeftChild,
                            Dir::Right => CameFrom::RightChild,
                        };
                    }
                    self.cur = parent;

                    if self.style == IterStyle::Postorder {
                        return Some(self.emit(cur));
                    }
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K> ExactSizeIterator for Traversal<'_, K> {}

impl<K> FusedIterator for Traversal<'_, K> {}

/// An iterator over the keys of a [`RedBlackTree`], in non-decreasing order.
pub struct Keys<'tree, K> {
    inner: Traversal<'tree, K>,
}

impl<'tree, K> Iterator for Keys<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().and_then(|node| node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

impl<K> FusedIterator for Keys<'_, K> {}

impl<K> RedBlackTree<K> {
    /// Returns the nodes in preorder: each node before its subtrees.
    pub fn preorder(&self) -> Traversal<'_, K> {
        Traversal::new(self, IterStyle::Preorder)
    }

    /// Returns the nodes in order of non-decreasing key.
    pub fn inorder(&self) -> Traversal<'_, K> {
        Traversal::new(self, IterStyle::Inorder)
    }

    /// Returns the nodes in postorder: each node after its subtrees.
    pub fn postorder(&self) -> Traversal<'_, K> {
        Traversal::new(self, IterStyle::Postorder)
    }

    /// Returns the nodes in the order set by [`set_iteration_style`](Self::set_iteration_style).
    ///
    /// Iterating an unmodified tree twice yields the same sequence.
    pub fn iter(&self) -> Traversal<'_, K> {
        Traversal::new(self, self.style)
    }

    /// Returns the keys in non-decreasing order, regardless of the iteration style.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys {
            inner: self.inorder(),
        }
    }
}

impl<'tree, K> IntoIterator for &'tree RedBlackTree<K> {
    type Item = NodeRef<'tree, K>;
    type IntoIter = Traversal<'tree, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
