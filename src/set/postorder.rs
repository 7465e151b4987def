//! Post-order traversal: left subtree, right subtree, node
//!
//! The root is always visited last.

use crate::slab::Ptr;

use super::node::{Nodes, leaf_preferring_left};

/// The first node visited is found by always heading left when possible
pub(super) fn first<T>(nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
    root.map(|root| leaf_preferring_left(nodes, root))
}

pub(super) fn last<T>(_nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
    root
}

pub(super) fn next<T>(nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
    let parent = nodes[ptr].parent?;
    let parent_node = &nodes[parent];

    match parent_node.right {
        // A left child is followed by the first node of its right sibling's subtree
        Some(right) if right != ptr => Some(leaf_preferring_left(nodes, right)),
        _ => Some(parent),
    }
}

pub(super) fn prev<T>(nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
    let node = &nodes[ptr];
    if let Some(child) = node.right.or(node.left) {
        return Some(child);
    }

    // Leaf: climb until we come up out of a right subtree whose parent still has a left subtree
    let mut child = ptr;
    while let Some(parent) = nodes[child].parent {
        let parent_node = &nodes[parent];
        match parent_node.left {
            Some(left) if left != child => return Some(left),
            _ => child = parent,
        }
    }

    None
}
