use std::fmt;
use std::ptr;

use compare::Natural;

use crate::error::{Error, Result};
use crate::slab::Ptr;

use super::{BSTSet, Node, Order, TreeId};
use super::node::InnerNode;

/// Where a cursor or position sits: on an element or on one of the two boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Slot {
    /// One before the first element of the order
    BeforeBegin,
    At(Ptr),
    /// One past the last element of the order
    End,
}

impl Default for Slot {
    fn default() -> Self {
        Slot::End
    }
}

impl Slot {
    /// The element at `node`, or the end if there is none
    pub(super) fn or_end(node: Option<Ptr>) -> Self {
        node.map_or(Slot::End, Slot::At)
    }

    pub(super) fn node(self) -> Option<Ptr> {
        match self {
            Slot::At(ptr) => Some(ptr),
            Slot::BeforeBegin | Slot::End => None,
        }
    }
}

/// A place in a tree that can be stored and handed back to the tree later
///
/// Unlike a [`Cursor`], a position does not borrow the tree, so it survives mutation: it is what
/// [`BSTSet::insert`] returns and what [`BSTSet::erase`] consumes. Turn it back into a cursor with
/// [`BSTSet::cursor`].
///
/// A default-constructed position is *detached*: it belongs to no tree and every tree rejects it.
/// A position stops being usable once the element it points at is erased. Trees detect that and
/// return [`Violation::Stale`](crate::error::Violation::Stale) rather than handing out some other
/// element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(super) tree: Option<TreeId>,
    pub(super) slot: Slot,
    pub(super) order: Order,
}

impl Position {
    pub(super) fn new(tree: TreeId, slot: Slot, order: Order) -> Self {
        Self {
            tree: Some(tree),
            slot,
            order,
        }
    }

    /// The order that stepping from this position follows
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns the same place in the tree, stepping in a different order from now on
    pub fn with_order(self, order: Order) -> Self {
        Self {order, ..self}
    }

    /// Returns true if this position was never bound to a tree
    pub fn is_detached(&self) -> bool {
        self.tree.is_none()
    }

    /// Returns true if this is the end of some tree, one past its last element
    pub fn is_end(&self) -> bool {
        self.tree.is_some() && self.slot == Slot::End
    }

    /// Returns true if this is the place one before the first element of some tree
    pub fn is_before_begin(&self) -> bool {
        self.tree.is_some() && self.slot == Slot::BeforeBegin
    }
}

/// A bidirectional cursor over the elements of a [`BSTSet`]
///
/// The cursor points at an element or at one of two boundaries: the end, one past the last
/// element of the cursor's order, and the place one before the first element. Stepping backward
/// from the end goes to the last element and stepping forward from before the first element goes
/// to the first one. Stepping further out from a boundary does nothing.
///
/// Stepping uses only the parent and child links of the tree, so each step is `O(depth)` and a
/// whole traversal is `O(n)`.
pub struct Cursor<'a, T, C = Natural<T>> {
    tree: &'a BSTSet<T, C>,
    current: Slot,
    order: Order,
}

impl<'a, T, C> Clone for Cursor<'a, T, C> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T, C> Copy for Cursor<'a, T, C> {}

impl<'a, T, C> PartialEq for Cursor<'a, T, C> {
    /// Two cursors are equal if they point at the same place in the same tree, regardless of
    /// their order
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<'a, T, C> Eq for Cursor<'a, T, C> {}

impl<'a, T: fmt::Debug, C> fmt::Debug for Cursor<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("value", &self.get())
            .field("order", &self.order)
            .finish()
    }
}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(super) fn new(tree: &'a BSTSet<T, C>, current: Slot, order: Order) -> Self {
        Self {tree, current, order}
    }

    /// Moves to the next element in the cursor's order
    ///
    /// Moving forward from the last element lands on the end. At the end the cursor stays put.
    /// Returns true if the cursor now points at an element.
    pub fn move_next(&mut self) -> bool {
        let tree = self.tree;
        self.current = match self.current {
            Slot::At(ptr) => Slot::or_end(self.order.next(&tree.nodes, ptr)),
            Slot::BeforeBegin => Slot::or_end(self.order.first(&tree.nodes, tree.root)),
            Slot::End => return false,
        };

        self.is_valid()
    }

    /// Moves to the previous element in the cursor's order
    ///
    /// Moving backward from the first element lands one before it, where the cursor then stays
    /// put. Returns true if the cursor now points at an element.
    pub fn move_prev(&mut self) -> bool {
        let tree = self.tree;
        self.current = match self.current {
            Slot::At(ptr) => self.order.prev(&tree.nodes, ptr).map_or(Slot::BeforeBegin, Slot::At),
            Slot::End => self.order.last(&tree.nodes, tree.root).map_or(Slot::BeforeBegin, Slot::At),
            Slot::BeforeBegin => return false,
        };

        self.is_valid()
    }

    /// Moves `steps` elements forward, or backward for negative `steps`
    ///
    /// Stops early at either boundary. Returns true if the cursor ends up on an element.
    pub fn move_by(&mut self, steps: isize) -> bool {
        for _ in 0..steps.unsigned_abs() {
            let moved = if steps > 0 { self.move_next() } else { self.move_prev() };
            if !moved {
                break;
            }
        }

        self.is_valid()
    }

    /// Returns the element the cursor points at, or `None` at either boundary
    pub fn get(&self) -> Option<&'a T> {
        let tree = self.tree;
        self.current.node().map(|ptr| &tree.nodes[ptr].value)
    }

    /// Returns the element the cursor points at
    ///
    /// Fails with [`Error::OutOfRange`] at either boundary.
    pub fn value(&self) -> Result<&'a T> {
        self.get().ok_or(Error::OutOfRange)
    }

    /// Returns true if the cursor points at an element
    pub fn is_valid(&self) -> bool {
        self.current.node().is_some()
    }

    /// Returns true if the cursor is at the end, one past the last element
    pub fn is_end(&self) -> bool {
        self.current == Slot::End
    }

    /// Returns true if the cursor is one before the first element
    pub fn is_before_begin(&self) -> bool {
        self.current == Slot::BeforeBegin
    }

    /// The node the cursor points at, for custom traversals
    pub fn node(&self) -> Option<Node<'a, T>> {
        let tree = self.tree;
        self.current.node().map(|ptr| Node::new(&tree.nodes, ptr))
    }

    /// Returns a cursor at the parent of the current element
    ///
    /// Returns a cursor at the end for the root. A cursor at a boundary stays where it is.
    pub fn parent(&self) -> Self {
        self.peek(|node| node.parent, Slot::End)
    }

    /// Returns a cursor at the left child of the current element, or at the end if there is none
    pub fn left(&self) -> Self {
        self.peek(|node| node.left, Slot::End)
    }

    /// Returns a cursor at the right child of the current element, or at the end if there is none
    pub fn right(&self) -> Self {
        self.peek(|node| node.right, Slot::End)
    }

    fn peek(&self, link: impl FnOnce(&InnerNode<T>) -> Option<Ptr>, missing: Slot) -> Self {
        let current = match self.current {
            Slot::At(ptr) => link(&self.tree.nodes[ptr]).map_or(missing, Slot::At),
            boundary => boundary,
        };
        Self::new(self.tree, current, self.order)
    }

    /// The order this cursor steps in
    pub fn order(&self) -> Order {
        self.order
    }

    /// Changes the order this cursor steps in
    ///
    /// The cursor stays on the same element. Only subsequent steps are affected.
    pub fn set_order(&mut self, order: Order) {
        self.order = order;
    }

    /// Detaches this cursor from the tree borrow so it can be passed to mutating methods
    pub fn position(&self) -> Position {
        Position::new(self.tree.id, self.current, self.order)
    }

    /// Returns a cursor at the same place that steps in the opposite direction
    pub fn reversed(self) -> RevCursor<'a, T, C> {
        RevCursor {inner: self}
    }
}

/// A [`Cursor`] with its two step directions swapped
///
/// `move_next` walks the cursor's order from the last element towards the first one, so the end of
/// a reverse cursor is the place one before the first element of the order.
pub struct RevCursor<'a, T, C = Natural<T>> {
    inner: Cursor<'a, T, C>,
}

impl<'a, T, C> Clone for RevCursor<'a, T, C> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T, C> Copy for RevCursor<'a, T, C> {}

impl<'a, T, C> PartialEq for RevCursor<'a, T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<'a, T, C> Eq for RevCursor<'a, T, C> {}

impl<'a, T: fmt::Debug, C> fmt::Debug for RevCursor<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevCursor")
            .field("value", &self.get())
            .field("order", &self.order())
            .finish()
    }
}

impl<'a, T, C> RevCursor<'a, T, C> {
    /// Moves to the previous element of the underlying order
    pub fn move_next(&mut self) -> bool {
        self.inner.move_prev()
    }

    /// Moves to the next element of the underlying order
    pub fn move_prev(&mut self) -> bool {
        self.inner.move_next()
    }

    /// Moves `steps` elements towards the first element of the underlying order, or towards the
    /// last one for negative `steps`
    ///
    /// Stops early at either boundary. Returns true if the cursor ends up on an element.
    pub fn move_by(&mut self, steps: isize) -> bool {
        for _ in 0..steps.unsigned_abs() {
            let moved = if steps > 0 { self.move_next() } else { self.move_prev() };
            if !moved {
                break;
            }
        }

        self.is_valid()
    }

    /// Returns the element the cursor points at, or `None` at either boundary
    pub fn get(&self) -> Option<&'a T> {
        self.inner.get()
    }

    /// Returns the element the cursor points at
    ///
    /// Fails with [`Error::OutOfRange`] at either boundary.
    pub fn value(&self) -> Result<&'a T> {
        self.inner.value()
    }

    /// Returns true if the cursor points at an element
    pub fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    /// Returns true if the cursor is one before the first element of the underlying order
    pub fn is_end(&self) -> bool {
        self.inner.is_before_begin()
    }

    /// The node the cursor points at, for custom traversals
    pub fn node(&self) -> Option<Node<'a, T>> {
        self.inner.node()
    }

    /// Returns a reverse cursor at the parent of the current element
    ///
    /// Returns a cursor at the reverse end for the root. A cursor at a boundary stays where it is.
    pub fn parent(&self) -> Self {
        self.inner.peek(|node| node.parent, Slot::BeforeBegin).reversed()
    }

    /// Returns a reverse cursor at the left child of the current element, or at the reverse end if
    /// there is none
    pub fn left(&self) -> Self {
        self.inner.peek(|node| node.left, Slot::BeforeBegin).reversed()
    }

    /// Returns a reverse cursor at the right child of the current element, or at the reverse end if
    /// there is none
    pub fn right(&self) -> Self {
        self.inner.peek(|node| node.right, Slot::BeforeBegin).reversed()
    }

    /// The order this cursor steps backward through
    pub fn order(&self) -> Order {
        self.inner.order()
    }

    /// Changes the order this cursor steps backward through, staying on the same element
    pub fn set_order(&mut self, order: Order) {
        self.inner.set_order(order)
    }

    /// Detaches this cursor from the tree borrow so it can be passed to mutating methods
    pub fn position(&self) -> Position {
        self.inner.position()
    }

    /// Returns the forward cursor at the same place
    pub fn reversed(self) -> Cursor<'a, T, C> {
        self.inner
    }
}
