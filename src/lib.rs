//! This crate exposes a link-based Binary Search Tree (BST) with on-demand rebalancing, mostly
//! for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored items. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores an item and
//! will sometimes have child `Node`s. The most important invariants of the
//! BST in this crate are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have an
//!    item less than its own item.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have an
//!    item greater than or equal to its own item.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for items in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). Inserting items in sorted order gives a tree
//! whose height equals its size, so [`OrderedTree`][linked::OrderedTree] doesn't balance itself
//! while it's being modified. Instead, calling
//! [`rebalance`][linked::OrderedTree::rebalance] rebuilds it with a height of `O(lg N)` (where `N`
//! is the number of nodes in the tree). BSTs also naturally support sorted iteration by visiting
//! the left subtree, then the subtree root, then the right subtree.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod linked;
pub mod traverse;
mod util;
