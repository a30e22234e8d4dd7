use linked_bst::error::TreeError;
use linked_bst::linked::OrderedTree;
use quickcheck_macros::quickcheck;

use std::collections::HashSet;

use crate::{init_tracing, Op};

/// Applies a set of operations to a tree and to a sorted `Vec` holding the same items.
/// This way we can ensure that after a random smattering of adds, removes and
/// rebalances we have the same items in both, in the same order.
fn do_ops<T>(ops: &[Op<T>], tree: &mut OrderedTree<T>, model: &mut Vec<T>) -> bool
where
    T: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Add(x) => {
                tree.add(x.clone());
                let pos = model.partition_point(|y| y <= x);
                model.insert(pos, x.clone());
            }
            Op::Remove(x) => match model.binary_search(x) {
                Ok(pos) => {
                    model.remove(pos);
                    if tree.remove(x).as_ref() != Ok(x) {
                        return false;
                    }
                }
                Err(_) => {
                    if tree.remove(x) != Err(TreeError::NotFound) {
                        return false;
                    }
                }
            },
            Op::Rebalance => tree.rebalance(),
            Op::Inorder => {
                if !tree.inorder().eq(model.iter()) {
                    return false;
                }
            }
        }
    }

    tree.size() == model.len() && tree.inorder().eq(model.iter())
}

/// Keeps the first occurrence of every item.
fn distinct(xs: Vec<i16>) -> Vec<i16> {
    let mut seen = HashSet::new();
    xs.into_iter().filter(|x| seen.insert(*x)).collect()
}

/// `ceil(log2(n + 1))`, the number of bits needed to write `n`.
fn ceil_log2_plus_one(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    init_tracing();
    let mut tree = OrderedTree::new();
    let mut model = Vec::new();

    do_ops(&ops, &mut tree, &mut model)
}

#[quickcheck]
fn inorder_is_sorted(xs: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let items: Vec<_> = tree.inorder().collect();

    items.windows(2).all(|pair| pair[0] <= pair[1]) && items.len() == xs.len()
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.find(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn find_is_idempotent(xs: Vec<i8>, probe: i8) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let before: Vec<_> = tree.iter().copied().collect();

    let first = tree.find(&probe).copied();
    let second = tree.find(&probe).copied();
    let after: Vec<_> = tree.iter().copied().collect();

    first == second && before == after
}

#[quickcheck]
fn size_counts_successful_removes(xs: Vec<i8>, removes: Vec<i8>) -> bool {
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();
    let removed = removes.iter().filter(|x| tree.remove(x).is_ok()).count();

    tree.size() == xs.len() - removed && tree.find_all_nodes().len() == tree.size()
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();
    for delete in &deletes {
        // We may have added the same item multiple times - remove each one.
        while tree.remove(delete).is_ok() {}
    }

    let mut still_present = xs;
    still_present.retain(|x| !deletes.contains(x));

    deletes.iter().all(|x| tree.find(x).is_none())
        && still_present.iter().all(|x| tree.find(x).is_some())
}

#[quickcheck]
fn removing_everything_empties_the_tree(xs: Vec<i16>, rotate_by: usize) -> bool {
    let xs = distinct(xs);
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();

    let mut order = xs.clone();
    if !order.is_empty() {
        let by = rotate_by % order.len();
        order.rotate_left(by);
    }
    let all_removed = order.iter().all(|x| tree.remove(x) == Ok(*x));

    all_removed
        && tree.is_empty()
        && tree.root().is_none()
        && xs.iter().all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn rebalance_keeps_items_and_shrinks_height(xs: Vec<i16>) -> bool {
    init_tracing();
    let xs = distinct(xs);
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();
    let before: Vec<_> = tree.inorder().copied().collect();

    tree.rebalance();
    let after: Vec<_> = tree.inorder().copied().collect();

    before == after
        && tree.size() == xs.len()
        && tree.height() <= ceil_log2_plus_one(tree.size())
}

#[quickcheck]
fn rebalance_keeps_duplicates(xs: Vec<i8>) -> bool {
    let mut tree: OrderedTree<_> = xs.iter().copied().collect();
    let before: Vec<_> = tree.inorder().copied().collect();

    tree.rebalance();

    tree.inorder().copied().eq(before) && tree.size() == xs.len()
}

#[quickcheck]
fn sorted_input_rebalances(len: u8) -> bool {
    let mut tree: OrderedTree<_> = (0..len).collect();
    let chain_height = tree.height();

    tree.rebalance();

    chain_height == (len as usize).saturating_sub(1)
        && tree.height() <= ceil_log2_plus_one(len as usize)
        && tree.inorder().copied().eq(0..len)
}

#[quickcheck]
fn range_find_matches_filter(xs: Vec<i8>, low: i8, high: i8) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let mut expected: Vec<_> = xs.iter().filter(|x| low <= **x && **x <= high).collect();
    expected.sort();

    tree.range_find(&low, &high) == expected
}

#[quickcheck]
fn successor_and_predecessor_match_scan(xs: Vec<i8>, probe: i8) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let successor = xs.iter().filter(|x| **x > probe).min();
    let predecessor = xs.iter().filter(|x| **x < probe).max();

    tree.successor(Some(&probe)) == successor
        && tree.predecessor(&probe) == predecessor
        && tree.successor(None) == xs.iter().min()
}

#[quickcheck]
fn height_is_deepest_parent_chain(xs: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let deepest = tree
        .find_all_nodes()
        .into_iter()
        .map(|node| tree.depth(node))
        .collect::<Result<Vec<_>, _>>()
        .map(|depths| depths.into_iter().max().unwrap_or(0));

    deepest == Ok(tree.height())
}

#[quickcheck]
fn every_node_but_the_root_has_a_parent(xs: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();

    tree.find_all_nodes().into_iter().all(|node| {
        let parent = tree.parent(node);
        if tree.is_root(node) {
            matches!(parent, Ok(None))
        } else {
            matches!(parent, Ok(Some(p))
                if p.left().is_some_and(|c| std::ptr::eq(c, node))
                    || p.right().is_some_and(|c| std::ptr::eq(c, node)))
        }
    })
}

#[quickcheck]
fn clone_is_independent(xs: Vec<i8>, removes: Vec<i8>) -> bool {
    let tree: OrderedTree<_> = xs.iter().copied().collect();
    let mut clone = tree.clone();
    let same_shape = tree.iter().eq(clone.iter());

    for x in &removes {
        let _ = clone.remove(x);
    }

    same_shape && tree.size() == xs.len()
}
