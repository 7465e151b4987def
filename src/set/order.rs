use crate::slab::Ptr;

use super::node::Nodes;
use super::{inorder, preorder, postorder};

/// The rule used to visit the nodes of a tree
///
/// Every order can be walked in both directions using only the links stored in the nodes, so
/// cursors can switch between orders at any time without losing their place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Left subtree, node, right subtree (ascending)
    InOrder,
    /// Node, left subtree, right subtree
    PreOrder,
    /// Left subtree, right subtree, node
    PostOrder,
}

impl Default for Order {
    fn default() -> Self {
        Order::InOrder
    }
}

impl Order {
    /// The first node visited in this order
    pub(crate) fn first<T>(self, nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
        match self {
            Order::InOrder => inorder::first(nodes, root),
            Order::PreOrder => preorder::first(nodes, root),
            Order::PostOrder => postorder::first(nodes, root),
        }
    }

    /// The last node visited in this order
    pub(crate) fn last<T>(self, nodes: &Nodes<T>, root: Option<Ptr>) -> Option<Ptr> {
        match self {
            Order::InOrder => inorder::last(nodes, root),
            Order::PreOrder => preorder::last(nodes, root),
            Order::PostOrder => postorder::last(nodes, root),
        }
    }

    /// The node visited after `ptr`, or `None` if `ptr` is the last node
    pub(crate) fn next<T>(self, nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
        match self {
            Order::InOrder => inorder::next(nodes, ptr),
            Order::PreOrder => preorder::next(nodes, ptr),
            Order::PostOrder => postorder::next(nodes, ptr),
        }
    }

    /// The node visited before `ptr`, or `None` if `ptr` is the first node
    pub(crate) fn prev<T>(self, nodes: &Nodes<T>, ptr: Ptr) -> Option<Ptr> {
        match self {
            Order::InOrder => inorder::prev(nodes, ptr),
            Order::PreOrder => preorder::prev(nodes, ptr),
            Order::PostOrder => postorder::prev(nodes, ptr),
        }
    }

    /// Every traversal order
    pub const ALL: [Order; 3] = [Order::InOrder, Order::PreOrder, Order::PostOrder];
}
