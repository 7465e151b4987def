use std::fmt;
use std::ptr;

use crate::slab::{Ptr, Slab};

/// Storage for a single value of the tree
///
/// `left` and `right` are the owning edges of the tree: a node is reachable (and therefore alive)
/// only through exactly one of them, or through the tree's root. `parent` is a navigation-only
/// back edge and always mirrors one of those forward edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InnerNode<T> {
    pub(crate) value: T,
    pub(crate) parent: Option<Ptr>,
    pub(crate) left: Option<Ptr>,
    pub(crate) right: Option<Ptr>,
}

impl<T> InnerNode<T> {
    pub(crate) fn new(value: T, parent: Option<Ptr>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

pub(crate) type Nodes<T> = Slab<InnerNode<T>>;

/// Returns true if `child` hangs off the left edge of its parent
///
/// The root is neither a left nor a right child.
pub(crate) fn is_left_child<T>(nodes: &Nodes<T>, child: Ptr) -> bool {
    match nodes[child].parent {
        Some(parent) => nodes[parent].left == Some(child),
        None => false,
    }
}

/// Returns true if `child` hangs off the right edge of its parent
pub(crate) fn is_right_child<T>(nodes: &Nodes<T>, child: Ptr) -> bool {
    match nodes[child].parent {
        Some(parent) => nodes[parent].right == Some(child),
        None => false,
    }
}

/// Follows left edges from `ptr` until there are none left
pub(crate) fn leftmost<T>(nodes: &Nodes<T>, mut ptr: Ptr) -> Ptr {
    while let Some(left) = nodes[ptr].left {
        ptr = left;
    }
    ptr
}

/// Follows right edges from `ptr` until there are none left
pub(crate) fn rightmost<T>(nodes: &Nodes<T>, mut ptr: Ptr) -> Ptr {
    while let Some(right) = nodes[ptr].right {
        ptr = right;
    }
    ptr
}

/// Descends from `ptr` to a leaf, taking the left edge whenever there is one
pub(crate) fn leaf_preferring_left<T>(nodes: &Nodes<T>, mut ptr: Ptr) -> Ptr {
    loop {
        let node = &nodes[ptr];
        match node.left.or(node.right) {
            Some(next) => ptr = next,
            None => return ptr,
        }
    }
}

/// Descends from `ptr` to a leaf, taking the right edge whenever there is one
pub(crate) fn leaf_preferring_right<T>(nodes: &Nodes<T>, mut ptr: Ptr) -> Ptr {
    loop {
        let node = &nodes[ptr];
        match node.right.or(node.left) {
            Some(next) => ptr = next,
            None => return ptr,
        }
    }
}

/// A single node of the binary search tree
pub struct Node<'a, T> {
    nodes: &'a Nodes<T>,
    ptr: Ptr,
}

impl<'a, T> fmt::Debug for Node<'a, T>
    where T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", self.value())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<'a, T> Clone for Node<'a, T> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T> Copy for Node<'a, T> {}

impl<'a, T: PartialEq> PartialEq for Node<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        // If the pointers are the same, the values are guaranteed to be equal (similar to `Arc`
        // using `ptr_eq` to optimize its `PartialEq` impl)
        let ptr_eq = ptr::eq(self.nodes, other.nodes) && self.ptr == other.ptr;
        ptr_eq || self.value().eq(other.value())
    }
}

impl<'a, T: Eq> Eq for Node<'a, T> {}

impl<'a, T> Node<'a, T> {
    /// Creates a new `Node`
    ///
    /// `ptr` must be a live pointer into `nodes`.
    pub(crate) fn new(nodes: &'a Nodes<T>, ptr: Ptr) -> Self {
        debug_assert!(nodes.contains(ptr));
        Self {nodes, ptr}
    }

    fn inner(&self) -> &'a InnerNode<T> {
        &self.nodes[self.ptr]
    }

    /// Returns the value of this node
    pub fn value(&self) -> &'a T {
        &self.inner().value
    }

    /// Returns true if this node has a left subtree
    pub fn has_left(&self) -> bool {
        self.inner().left.is_some()
    }

    /// Returns true if this node has a right subtree
    pub fn has_right(&self) -> bool {
        self.inner().right.is_some()
    }

    /// Returns the left child node (subtree) of this node, if any
    pub fn left(&self) -> Option<Self> {
        self.inner().left.map(|ptr| Self::new(self.nodes, ptr))
    }

    /// Returns the right child node (subtree) of this node, if any
    pub fn right(&self) -> Option<Self> {
        self.inner().right.map(|ptr| Self::new(self.nodes, ptr))
    }

    /// Returns the node this node hangs off of, or `None` for the root
    pub fn parent(&self) -> Option<Self> {
        self.inner().parent.map(|ptr| Self::new(self.nodes, ptr))
    }
}
