//! A link-based BST with on-demand rebalancing. Nodes own their children through `Box`es and
//! have no parent pointers; when a parent is needed it's found again by descending from the root.
//!
//! Nothing is rebalanced as a side effect of [`add`][OrderedTree::add] or
//! [`remove`][OrderedTree::remove], so inserting sorted data produces a tree shaped like a linked
//! list. [`rebalance`][OrderedTree::rebalance] rebuilds the tree with minimal height.
//!
//! # Examples
//!
//! ```
//! use linked_bst::linked::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//! for x in 1..=7 {
//!     tree.add(x);
//! }
//!
//! // Sorted input gives a chain.
//! assert_eq!(tree.height(), 6);
//! assert!(!tree.is_balanced());
//!
//! tree.rebalance();
//! assert_eq!(tree.height(), 2);
//! assert!(tree.is_balanced());
//!
//! assert_eq!(tree.find(&4), Some(&4));
//! assert_eq!(tree.remove(&4), Ok(4));
//! assert_eq!(tree.find(&4), None);
//! assert_eq!(tree.size(), 6);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ptr;

use tracing::{debug, instrument, trace};

use crate::error::{TreeError, TreeResult};
use crate::traverse::{Inorder, Iter, Levelorder, Postorder, Preorder};
use crate::util::Side;

/// The error for node handles that can't be found by descending from this tree's root.
const FOREIGN_NODE: TreeError = TreeError::InvalidArgument("node is not part of this tree");

type Link<T> = Option<Box<Node<T>>>;

/// A single item in a tree along with the subtrees hanging off of it. Handles to nodes are
/// borrowed from a tree with [`OrderedTree::root`], [`OrderedTree::node`] or
/// [`OrderedTree::find_all_nodes`].
pub struct Node<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
}

/// Only the items of the children are shown, so formatting a node never walks its subtrees.
impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("item", &self.item)
            .field("left", &self.left().map(Node::item))
            .field("right", &self.right().map(Node::item))
            .finish()
    }
}

impl<T> Node<T> {
    fn new(item: T) -> Self {
        Self {
            item,
            left: None,
            right: None,
        }
    }

    /// The item stored in this node.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// The root of the subtree holding items smaller than this node's item.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The root of the subtree holding items greater than or equal to this node's item.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn child(&self, side: Side) -> Option<&Self> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    fn link_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Detaches the largest node of the subtree rooted at `top`. Returns its item and what is left
    /// of the subtree. The largest node has no right child so its left child takes its place.
    fn split_max(mut top: Box<Self>) -> (T, Link<T>) {
        let mut link = &mut top.right;
        while link.as_ref().is_some_and(|n| n.right.is_some()) {
            link = match link {
                Some(node) => &mut node.right,
                None => break,
            };
        }

        match link.take() {
            Some(max) => {
                let Node { item, left, .. } = *max;
                *link = left;
                (item, Some(top))
            }
            // `top` had no right child so it's the largest itself.
            None => {
                let Node { item, left, .. } = *top;
                (item, left)
            }
        }
    }
}

/// A Binary Search Tree over totally ordered items. Items smaller than a node go to its left,
/// items greater than or equal to it go to its right, so duplicates are allowed.
pub struct OrderedTree<T> {
    root: Link<T>,
    size: usize,
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OrderedTree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Adding the items back in preorder reproduces the exact shape of the tree.
impl<T> Clone for OrderedTree<T>
where
    T: Clone + Ord,
{
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

/// Lists the items in preorder, which is enough to rebuild the exact shape of the tree.
impl<T> fmt::Debug for OrderedTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedTree")
            .field("size", &self.size)
            .field("items", &DebugItems(self.iter()))
            .finish()
    }
}

/// Formats the items of a traversal as a list.
struct DebugItems<'a, T>(Preorder<'a, T>);

impl<T> fmt::Debug for DebugItems<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

/// Renders the tree rotated 90 degrees counterclockwise: the right subtree comes first and every
/// level of depth is indented with `"| "`.
///
/// ```
/// use linked_bst::linked::OrderedTree;
///
/// let tree: OrderedTree<_> = [2, 1, 3].into_iter().collect();
/// assert_eq!(tree.to_string(), "| 3\n2\n| 1\n");
/// ```
impl<T> fmt::Display for OrderedTree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = Vec::new();
        let mut current = self.root().map(|n| (n, 0));
        loop {
            while let Some((node, level)) = current {
                stack.push((node, level));
                current = node.right().map(|n| (n, level + 1));
            }
            let Some((node, level)) = stack.pop() else {
                return Ok(());
            };
            writeln!(f, "{}{}", "| ".repeat(level), node.item)?;
            current = node.left().map(|n| (n, level + 1));
        }
    }
}

impl<T> FromIterator<T> for OrderedTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for OrderedTree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> OrderedTree<T> {
    /// Generates a new, empty `OrderedTree`.
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// The number of items in the tree, duplicates included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The root node, if the tree isn't empty.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// Removes every item from the tree. Nodes are released one at a time off of a stack rather
    /// than by recursive `Drop`s.
    pub fn clear(&mut self) {
        let mut released = 0usize;
        let mut stack: Vec<Box<Node<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
            released += 1;
        }
        self.size = 0;
        if released > 0 {
            trace!(released, "cleared tree");
        }
    }

    /// Iterates over the items in preorder. This is the default iteration order.
    pub fn iter(&self) -> Iter<'_, T> {
        Preorder::new(self.root())
    }

    /// Iterates over the items in preorder: a node, then its left subtree, then its right
    /// subtree.
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(self.root())
    }

    /// Iterates over the items in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    /// let items: Vec<_> = tree.inorder().copied().collect();
    ///
    /// assert_eq!(items, [1, 3, 4, 5, 7, 8, 9]);
    /// ```
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder::new(self.root())
    }

    /// Iterates over the items in postorder: a node's left subtree, then its right subtree, then
    /// the node.
    pub fn postorder(&self) -> Postorder<'_, T> {
        Postorder::new(self.root())
    }

    /// Iterates over the items one depth at a time, left to right.
    pub fn levelorder(&self) -> Levelorder<'_, T> {
        Levelorder::new(self.root())
    }

    /// Every node of the tree in preorder. Each call walks the tree again.
    pub fn find_all_nodes(&self) -> Vec<&Node<T>> {
        let mut nodes = Vec::with_capacity(self.size);
        let mut stack: Vec<&Node<T>> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.right());
            stack.extend(node.left());
        }
        nodes
    }

    /// Whether `node` is this tree's root. Nodes are compared by identity, not by item.
    pub fn is_root(&self, node: &Node<T>) -> bool {
        self.root().is_some_and(|root| ptr::eq(root, node))
    }

    /// The depth of the deepest node, where the root has depth 0. An empty tree has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<T>, usize)> = self.root().map(|n| (n, 0)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left().map(|n| (n, depth + 1)));
            stack.extend(node.right().map(|n| (n, depth + 1)));
        }
        height
    }

    /// Whether the tree is short enough for its size, i.e. `height < 2 * log2(size + 1) - 1`.
    /// This is a rule of thumb rather than an AVL style guarantee. Note that an empty tree is not
    /// considered balanced.
    pub fn is_balanced(&self) -> bool {
        let limit = 2.0 * ((self.size + 1) as f64).log2() - 1.0;
        (self.height() as f64) < limit
    }

    /// The smallest item in the tree.
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some(&node.item)
    }

    /// The largest item in the tree.
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root()?;
        while let Some(right) = node.right() {
            node = right;
        }
        Some(&node.item)
    }

    /// Takes every item out of the tree in ascending order, leaving it empty.
    fn drain_sorted(&mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.size);
        let mut stack = Vec::new();
        let mut link = self.root.take();
        loop {
            while let Some(mut node) = link {
                link = node.left.take();
                stack.push(node);
            }
            let Some(node) = stack.pop() else {
                break;
            };
            let Node { item, right, .. } = *node;
            items.push(item);
            link = right;
        }
        self.size = 0;
        items
    }
}

impl<T> OrderedTree<T>
where
    T: Ord,
{
    /// Adds the item to the tree. Items equal to one already present are placed in its right
    /// subtree. The tree is not rebalanced.
    pub fn add(&mut self, item: T) {
        let mut link = &mut self.root;
        while let Some(node) = link {
            let side = Side::of(&item, &node.item);
            link = node.link_mut(side);
        }
        *link = Some(Box::new(Node::new(item)));
        self.size += 1;
    }

    /// Potentially finds the given item in the tree. Returns the stored item, which compares
    /// equal to `item`.
    pub fn find(&self, item: &T) -> Option<&T> {
        self.node(item).map(Node::item)
    }

    /// Whether the tree holds an item equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.node(item).is_some()
    }

    /// The topmost node holding an item equal to `item`.
    pub fn node(&self, item: &T) -> Option<&Node<T>> {
        let mut current = self.root();
        while let Some(node) = current {
            match item.cmp(&node.item) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => current = node.right(),
            }
        }
        None
    }

    /// The link that holds the topmost node equal to `item`, or the empty link where the search
    /// for it ended.
    fn slot_mut(&mut self, item: &T) -> &mut Link<T> {
        let mut link = &mut self.root;
        while let Some(side) = link.as_deref().and_then(|node| match item.cmp(&node.item) {
            Ordering::Equal => None,
            _ => Some(Side::of(item, &node.item)),
        }) {
            link = match link {
                Some(node) => node.link_mut(side),
                None => break,
            };
        }
        link
    }

    /// Removes the topmost node equal to `item` and returns its item. If the tree has no such
    /// item it is left untouched and [`TreeError::NotFound`] is returned.
    ///
    /// A node with two children is kept in place and takes the item of the largest node in its
    /// left subtree, which is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::error::TreeError;
    /// use linked_bst::linked::OrderedTree;
    ///
    /// let mut tree: OrderedTree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&2), Ok(2));
    /// assert_eq!(tree.remove(&2), Err(TreeError::NotFound));
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn remove(&mut self, item: &T) -> TreeResult<T> {
        let link = self.slot_mut(item);
        let mut node = link.take().ok_or(TreeError::NotFound)?;

        let removed = match (node.left.take(), node.right.take()) {
            (Some(left), Some(right)) => {
                trace!("lifting largest item of left subtree into removed node");
                let (max, rest) = Node::split_max(left);
                node.left = rest;
                node.right = Some(right);
                let removed = mem::replace(&mut node.item, max);
                *link = Some(node);
                removed
            }
            (child, None) | (None, child) => {
                trace!(has_child = child.is_some(), "splicing out removed node");
                *link = child;
                node.item
            }
        };

        self.size -= 1;
        Ok(removed)
    }

    /// Overwrites the topmost item equal to `item` with `new_item` and returns the old item.
    ///
    /// The tree is not reordered, so `new_item` must sort into the same position as `item` or
    /// later lookups will go astray.
    pub fn replace(&mut self, item: &T, new_item: T) -> Option<T> {
        self.slot_mut(item)
            .as_mut()
            .map(|node| mem::replace(&mut node.item, new_item))
    }

    /// The parent of `node`, found by descending from the root. The root has no parent.
    ///
    /// Returns [`TreeError::InvalidArgument`] when `node` can't be reached from this tree's root,
    /// e.g. because it was borrowed from another tree.
    pub fn parent(&self, node: &Node<T>) -> TreeResult<Option<&Node<T>>> {
        let mut current = match self.root() {
            Some(root) if ptr::eq(root, node) => return Ok(None),
            Some(root) => root,
            None => return Err(FOREIGN_NODE),
        };
        loop {
            match current.child(Side::of(&node.item, &current.item)) {
                Some(child) if ptr::eq(child, node) => return Ok(Some(current)),
                Some(child) => current = child,
                None => return Err(FOREIGN_NODE),
            }
        }
    }

    /// How many edges separate `node` from the root, counted by following parents upwards.
    pub fn depth(&self, node: &Node<T>) -> TreeResult<usize> {
        let mut depth = 0;
        let mut current = node;
        while let Some(parent) = self.parent(current)? {
            depth += 1;
            current = parent;
        }
        Ok(depth)
    }

    /// Every item `x` with `low <= x <= high`, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    ///
    /// assert_eq!(tree.range_find(&3, &8), [&3, &4, &5, &7, &8]);
    /// assert!(tree.range_find(&10, &20).is_empty());
    /// ```
    pub fn range_find(&self, low: &T, high: &T) -> Vec<&T> {
        let mut items = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root();
        loop {
            while let Some(node) = current {
                stack.push(node);
                // Everything on the left is smaller than `node`, so it's only worth visiting if
                // `node` is above the lower bound.
                current = if node.item > *low { node.left() } else { None };
            }
            let Some(node) = stack.pop() else {
                break;
            };
            // Items come out in ascending order so nothing after this can be in range.
            if node.item > *high {
                break;
            }
            if node.item >= *low {
                items.push(&node.item);
            }
            current = node.right();
        }
        items
    }

    /// Rebuilds the tree with minimal height. The items are taken out in sorted order and added
    /// back median first: the middle item of a run is added before the runs to either side of
    /// it.
    #[instrument(level = "debug", skip_all, fields(size = self.size))]
    pub fn rebalance(&mut self) {
        let height_before = self.height();

        let mut items: Vec<Option<T>> = self.drain_sorted().into_iter().map(Some).collect();
        let mut runs = vec![0..items.len()];
        while let Some(run) = runs.pop() {
            if run.is_empty() {
                continue;
            }
            let mid = run.start + run.len() / 2;
            if let Some(item) = items[mid].take() {
                self.add(item);
            }
            runs.push(mid + 1..run.end);
            runs.push(run.start..mid);
        }

        debug!(height_before, height_after = self.height(), "rebalanced tree");
    }

    /// The smallest item strictly greater than `item`. Without an `item` this is the smallest
    /// item in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    ///
    /// assert_eq!(tree.successor(Some(&5)), Some(&7));
    /// assert_eq!(tree.successor(Some(&9)), None);
    /// assert_eq!(tree.successor(None), Some(&1));
    /// ```
    pub fn successor(&self, item: Option<&T>) -> Option<&T> {
        let Some(item) = item else {
            return self.min();
        };

        // The last node where we turned left is the closest one above `item` so far.
        let mut candidate = None;
        let mut current = self.root();
        while let Some(node) = current {
            if node.item > *item {
                candidate = Some(&node.item);
                current = node.left();
            } else {
                current = node.right();
            }
        }
        candidate
    }

    /// The largest item strictly smaller than `item`.
    pub fn predecessor(&self, item: &T) -> Option<&T> {
        let mut candidate = None;
        let mut current = self.root();
        while let Some(node) = current {
            if node.item < *item {
                candidate = Some(&node.item);
                current = node.right();
            } else {
                current = node.left();
            }
        }
        candidate
    }
}
