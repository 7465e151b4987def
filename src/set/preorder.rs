//! Pre-order traversal: node, left subtree, right subtree

use crate::slab::Ptr;

use super::node::{Nodes, leaf_preferring_right};

pub(super) fn first<T>(_nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
    root
}

/// The last node visited is found by always heading right when possible
pub(super) fn last<T>(nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
    root.map(|root| leaf_preferring_right(nodes, root))
}

pub(super) fn next<T>(nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
    let node = &nodes[ptr];
    if let Some(child) = node.left.or(node.right) {
        return Some(child);
    }

    // Leaf: climb until we come up out of a left subtree whose parent still has a right subtree
    // to visit
    let mut child = ptr;
    while let Some(parent) = nodes[child].parent {
        let parent_node = &nodes[parent];
        match parent_node.right {
            Some(right) if right != child => return Some(right),
            _ => child = parent,
        }
    }

    None
}

pub(super) fn prev<T>(nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
    let parent = nodes[ptr].parent?;
    let parent_node = &nodes[parent];

    match parent_node.left {
        // A right child comes straight after the last node of its left sibling's subtree
        Some(left) if left != ptr => Some(leaf_preferring_right(nodes, left)),
        _ => Some(parent),
    }
}
