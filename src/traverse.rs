//! Lazy traversals over an [`OrderedTree`][crate::linked::OrderedTree].
//!
//! Every traversal keeps its own explicit stack (or queue, for level order) instead of recursing,
//! so walking a degenerate tree that is effectively a linked list can't exhaust the call stack.
//! Each call on the tree starts a fresh traversal.
//!
//! # Examples
//!
//! ```
//! use linked_bst::linked::OrderedTree;
//!
//! let tree: OrderedTree<_> = [2, 1, 3].into_iter().collect();
//!
//! assert_eq!(tree.preorder().copied().collect::<Vec<_>>(), [2, 1, 3]);
//! assert_eq!(tree.inorder().copied().collect::<Vec<_>>(), [1, 2, 3]);
//! assert_eq!(tree.postorder().copied().collect::<Vec<_>>(), [1, 3, 2]);
//! assert_eq!(tree.levelorder().copied().collect::<Vec<_>>(), [2, 1, 3]);
//! ```

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::linked::Node;

/// The default iteration order of a tree, which is preorder.
pub type Iter<'a, T> = Preorder<'a, T>;

/// Visits a node, then its left subtree, then its right subtree.
pub struct Preorder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

/// Manual implementation of `Clone` so we don't require `T: Clone` to clone a handful of
/// references.
impl<T> Clone for Preorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right goes on first so the left subtree is finished before we get to it.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node.item())
    }
}

impl<T> FusedIterator for Preorder<'_, T> {}

/// Visits a node's left subtree, then the node, then its right subtree. For a valid BST this
/// yields items in ascending order.
pub struct Inorder<'a, T> {
    /// Nodes whose left subtree is being (or has been) visited but which haven't been yielded.
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Inorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        let mut inorder = Self { stack: Vec::new() };
        inorder.push_left_spine(root);
        inorder
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<T> Clone for Inorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.item())
    }
}

impl<T> FusedIterator for Inorder<'_, T> {}

/// Visits a node's left subtree, then its right subtree, then the node.
pub struct Postorder<'a, T> {
    /// Each node is paired with whether its children have already been scheduled.
    stack: Vec<(&'a Node<T>, bool)>,
}

impl<'a, T> Postorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: root.map(|n| (n, false)).into_iter().collect(),
        }
    }
}

impl<T> Clone for Postorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(node.item());
            }
            self.stack.push((node, true));
            self.stack.extend(node.right().map(|n| (n, false)));
            self.stack.extend(node.left().map(|n| (n, false)));
        }
    }
}

impl<T> FusedIterator for Postorder<'_, T> {}

/// Visits nodes one depth at a time, left to right, starting at the root.
pub struct Levelorder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

impl<'a, T> Levelorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            queue: root.into_iter().collect(),
        }
    }
}

impl<T> Clone for Levelorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<'a, T> Iterator for Levelorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node.item())
    }
}

impl<T> FusedIterator for Levelorder<'_, T> {}
