use std::fmt;
use std::iter::FusedIterator;

use crate::slab::Ptr;

use super::Order;
use super::node::Nodes;

/// An iterator over the values of a tree in a given [`Order`]
///
/// Both ends can be consumed, so `.rev()` walks the order backwards.
pub struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    order: Order,
    front: Option<Ptr>,
    back: Option<Ptr>,
    /// The number of values that have not been yielded from either end
    remaining: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(nodes: &'a Nodes<T>, root: Option<Ptr>, order: Order) -> Self {
        Self {
            nodes,
            order,
            front: order.first(nodes, root),
            back: order.last(nodes, root),
            remaining: nodes.len(),
        }
    }

    /// The order this iterator visits values in
    pub fn order(&self) -> Order {
        self.order
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes;
        let ptr = self.front?;
        self.front = self.order.next(nodes, ptr);
        self.remaining -= 1;

        Some(&nodes[ptr].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes;
        let ptr = self.back?;
        self.back = self.order.prev(nodes, ptr);
        self.remaining -= 1;

        Some(&nodes[ptr].value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}
