//! In-order traversal: left subtree, node, right subtree
//!
//! Visits values in ascending order under the tree's comparator.

use crate::slab::Ptr;

use super::node::{Nodes, leftmost, rightmost, is_left_child, is_right_child};

pub(super) fn first<T>(nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
    root.map(|root| leftmost(nodes, root))
}

pub(super) fn last<T>(nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
    root.map(|root| rightmost(nodes, root))
}

pub(super) fn next<T>(nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
    if let Some(right) = nodes[ptr].right {
        return Some(leftmost(nodes, right));
    }

    // Climb out of every subtree we are the right edge of. The first ancestor we reach from its
    // left side is next.
    let mut current = ptr;
    while is_right_child(nodes, current) {
        current = nodes[current].parent?;
    }
    nodes[current].parent
}

pub(super) fn prev<T>(nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
    if let Some(left) = nodes[ptr].left {
        return Some(rightmost(nodes, left));
    }

    let mut current = ptr;
    while is_left_child(nodes, current) {
        current = nodes[current].parent?;
    }
    nodes[current].parent
}
