mod node;
mod order;
mod preorder;
mod inorder;
mod postorder;
mod cursor;
mod iter;

pub use node::Node;
pub use order::Order;
pub use cursor::{Cursor, RevCursor, Position};
pub use iter::Iter;

use std::fmt;
use std::mem;
use std::cmp::Ordering;
use std::iter::FromIterator;
use std::sync::atomic::{self, AtomicU64};

use tracing::{debug, trace};

use compare::{Compare, Natural};

use crate::error::{Error, Result, Violation};
use crate::slab::Ptr;

use node::{InnerNode, Nodes, leftmost};
use cursor::Slot;

/// Identifies a single tree instance for the lifetime of the process
///
/// Clones get a new identity, moves keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        TreeId(NEXT_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Records that erasing moved a value from the cell at `from` into the cell at `to`
#[derive(Debug, Clone, Copy)]
struct Relocation {
    from: Ptr,
    to: Ptr,
}

/// A binary search tree (BST)
///
/// BST properties: For each node with value `v`:
/// - The value of each node in the left subtree is less than `v`
/// - The value of each node in the right subtree is greater than `v`
///
/// Duplicate values are not allowed. Inserting a value that already exists in the set does not
/// modify the set.
///
/// The tree is not balanced: it takes whatever shape the order of insertions and removals gives
/// it, so its depth is `O(n)` in the worst case.
///
/// Every node knows its parent, which lets [`Cursor`]s walk the tree in-order, pre-order or
/// post-order, in either direction, without recursion or an explicit stack.
pub struct BSTSet<T, C = Natural<T>> {
    nodes: Nodes<T>,
    root: Option<Ptr>,
    id: TreeId,
    cmp: C,
}

impl<T, C: Default> Default for BSTSet<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Clone, C: Clone> Clone for BSTSet<T, C> {
    /// Deep-clones every node. The clone has the same shape, but positions from one tree are not
    /// accepted by the other.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            id: TreeId::next(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BSTSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_inorder()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for BSTSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        // Two trees with the same values can have different shapes depending on insertion order.
        // In-order traversal is sorted, so comparing it compares the contents.
        self.len() == other.len() && self.iter_inorder().eq(other.iter_inorder())
    }
}

impl<T: Eq, C> Eq for BSTSet<T, C> {}

/// Renders the tree sideways, one node per line, children below their parent
///
/// ```text
/// 5
/// ├── 2
/// │   ├── 1
/// │   └── 3
/// └── 8
///     ├── ~
///     └── 9
/// ```
///
/// A missing child is drawn as `~` when its sibling exists.
impl<T: fmt::Display, C> fmt::Display for BSTSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = match self.root {
            Some(root) => root,
            None => return writeln!(f, "~"),
        };

        writeln!(f, "{}", self.nodes[root].value)?;

        let mut stack = Vec::new();
        push_children(&self.nodes, &mut stack, root, String::new());
        while let Some((child, prefix, is_last)) = stack.pop() {
            let connector = if is_last { "└── " } else { "├── " };
            match child {
                Some(ptr) => {
                    writeln!(f, "{}{}{}", prefix, connector, self.nodes[ptr].value)?;

                    let prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                    push_children(&self.nodes, &mut stack, ptr, prefix);
                },

                None => writeln!(f, "{}{}~", prefix, connector)?,
            }
        }

        Ok(())
    }
}

fn push_children<T>(
    nodes: &Nodes<T>,
    stack: &mut Vec<(Option<Ptr>, String, bool)>,
    ptr: Ptr,
    prefix: String,
) {
    let node = &nodes[ptr];
    if node.is_leaf() {
        return;
    }

    // Pushed in reverse so that the left child is drawn first
    stack.push((node.right, prefix.clone(), true));
    stack.push((node.left, prefix, false));
}

impl<T: Ord> BSTSet<T> {
    /// Creates an empty `BSTSet` ordered by `T`'s `Ord` implementation
    ///
    /// The set is initially created with a capacity of 0, so it will not allocate until it is first
    /// inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    /// let mut set: BSTSet<&str> = BSTSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }

    /// Creates an empty set with the specified capacity.
    ///
    /// The set will be able to hold at least `capacity` elements without reallocating. If
    /// `capacity` is 0, the set will not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    /// let mut set: BSTSet<&str> = BSTSet::with_capacity(10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, compare::natural())
    }
}

impl<T, C> BSTSet<T, C> {
    /// Creates an empty set that orders its values with `cmp`
    ///
    /// Any `Fn(&T, &T) -> Ordering` closure is a comparator:
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// set.extend(vec![1, 3, 2]);
    /// let values: Vec<_> = set.iter_inorder().copied().collect();
    /// assert_eq!(values, &[3, 2, 1]);
    /// ```
    ///
    /// A tree must only ever be searched with the ordering it was built with.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }

    /// Creates an empty set with the specified capacity that orders its values with `cmp`
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            nodes: Nodes::with_capacity(capacity),
            root: None,
            id: TreeId::next(),
            cmp,
        }
    }

    /// Returns the ordering used by this set
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of items in the set (i.e. the number of nodes in the binary search tree)
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of elements the set can hold without reallocating.
    ///
    /// Time complexity: `O(1)`
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns true if the set is empty
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// assert!(set.is_empty());
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        debug_assert!(self.nodes.is_empty() == self.root.is_none());
        self.nodes.is_empty()
    }

    /// Returns a cursor at the first element of `order`, or at the end if the set is empty
    pub fn begin(&self, order: Order) -> Cursor<'_, T, C> {
        Cursor::new(self, Slot::or_end(order.first(&self.nodes, self.root)), order)
    }

    /// Returns a cursor at the end, one past the last element of `order`
    pub fn end(&self, order: Order) -> Cursor<'_, T, C> {
        Cursor::new(self, Slot::End, order)
    }

    /// Returns a reverse cursor at the last element of `order`, or at the reverse end if the set is
    /// empty
    pub fn rbegin(&self, order: Order) -> RevCursor<'_, T, C> {
        let last = order.last(&self.nodes, self.root).map_or(Slot::BeforeBegin, Slot::At);
        Cursor::new(self, last, order).reversed()
    }

    /// Returns a reverse cursor at its end, one before the first element of `order`
    pub fn rend(&self, order: Order) -> RevCursor<'_, T, C> {
        Cursor::new(self, Slot::BeforeBegin, order).reversed()
    }

    /// Returns the first value visited by `order`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::{BSTSet, Order};
    ///
    /// let set: BSTSet<_> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(set.front(Order::InOrder), Some(&1));
    /// assert_eq!(set.front(Order::PreOrder), Some(&2));
    /// assert_eq!(set.front(Order::PostOrder), Some(&1));
    /// ```
    pub fn front(&self, order: Order) -> Option<&T> {
        self.begin(order).get()
    }

    /// Returns the last value visited by `order`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::{BSTSet, Order};
    ///
    /// let set: BSTSet<_> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(set.back(Order::InOrder), Some(&3));
    /// assert_eq!(set.back(Order::PreOrder), Some(&3));
    /// assert_eq!(set.back(Order::PostOrder), Some(&2));
    /// ```
    pub fn back(&self, order: Order) -> Option<&T> {
        self.rbegin(order).get()
    }

    /// Returns a cursor at `position`
    ///
    /// Fails if `position` was not produced by this tree or if its element has been erased since.
    pub fn cursor(&self, position: Position) -> Result<Cursor<'_, T, C>> {
        let slot = self.resolve(position)?;
        Ok(Cursor::new(self, slot, position.order))
    }

    /// Iterates over the values of the tree in `order`
    pub fn iter(&self, order: Order) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root, order)
    }

    /// Performs a pre-order traversal of the tree
    pub fn iter_preorder(&self) -> Iter<'_, T> {
        self.iter(Order::PreOrder)
    }

    /// Performs an in-order traversal of the tree
    pub fn iter_inorder(&self) -> Iter<'_, T> {
        self.iter(Order::InOrder)
    }

    /// Performs a post-order traversal of the tree
    pub fn iter_postorder(&self) -> Iter<'_, T> {
        self.iter(Order::PostOrder)
    }

    /// Removes the element at `position` and returns the position of the element that followed
    /// it
    ///
    /// "Followed" is decided by the order of `position` on the tree as it was before the removal.
    /// The returned position has the same order and is the end if nothing followed.
    ///
    /// A node with two children is not unlinked itself. Instead, the value of its in-order
    /// successor moves into it and the successor's node is unlinked. If that moved value is the
    /// one returned, the returned position points at its new node. Any other position that
    /// pointed at the successor's old node becomes stale.
    ///
    /// Fails with [`Error::OutOfRange`] for either boundary and with
    /// [`Error::PreconditionViolation`] for positions this tree cannot resolve. The tree is left
    /// untouched in both cases.
    ///
    /// Time complexity: `O(depth)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set: BSTSet<_> = vec![2, 1, 3].into_iter().collect();
    /// let position = set.find(&2).position();
    /// let next = set.erase(position).unwrap();
    /// assert_eq!(set.cursor(next).unwrap().value(), Ok(&3));
    /// assert_eq!(set.iter_inorder().copied().collect::<Vec<_>>(), &[1, 3]);
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<Position> {
        let ptr = self.resolve(position)?.node().ok_or(Error::OutOfRange)?;
        let order = position.order;

        // Decided before anything moves
        let successor = order.next(&self.nodes, ptr);

        let (_value, relocation) = self.unlink(ptr);
        let successor = match relocation {
            Some(Relocation {from, to}) if successor == Some(from) => Some(to),
            _ => successor,
        };

        Ok(self.position_at(successor, order))
    }

    /// Clears the set, removing all elements
    ///
    /// Every position handed out so far becomes stale. Note that this method has no effect on the
    /// allocated capacity of the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// set.insert("abc");
    /// # let capacity = set.capacity();
    /// assert!(!set.is_empty());
    /// set.clear();
    /// assert!(set.is_empty());
    /// # assert_eq!(set.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        trace!(len = self.len(), "clearing tree");
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// Note that the root can be **any** node inserted into the tree. For a guaranteed ordering,
    /// use the various iteration methods.
    ///
    /// This is a low-level API meant to be used for implementing traversals. The inner structure of
    /// the tree can be anything that satisfies the BST properties.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cursor_bst::{BSTSet, set::Node};
    ///
    /// #[derive(Debug, PartialOrd, Ord, PartialEq, Eq)]
    /// struct Person {
    ///     pub name: String,
    ///     // ...other fields...
    /// }
    ///
    /// // Custom traversal through the values in the set
    /// fn find_name<'a>(node: Option<Node<'a, Person>>, target_name: &str) -> Option<Node<'a, Person>> {
    ///     let node = node?;
    ///     if node.value().name == target_name {
    ///         Some(node)
    ///     } else {
    ///         // Recurse through left and right subtrees, just like you would in a GC'd language!
    ///         find_name(node.left(), target_name)
    ///             .or_else(|| find_name(node.right(), target_name))
    ///     }
    /// }
    ///
    /// fn main() {
    ///     let mut set = BSTSet::new();
    ///
    ///     set.insert(Person {
    ///         name: String::from("Manish"),
    ///         // ...other fields...
    ///     });
    ///     // ...more insertions...
    ///
    ///     // Find the node with name == "Jane"
    ///     println!("{:?}", find_name(set.root(), "Jane"));
    /// }
    /// ```
    pub fn root(&self) -> Option<Node<'_, T>> {
        self.root.map(|ptr| Node::new(&self.nodes, ptr))
    }

    /// Reserves capacity for at least `additional` more elements to be inserted in the set.
    ///
    /// # Panics
    ///
    /// Panics if the new allocation size overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional)
    }

    /// Shrinks the capacity of the set as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit()
    }

    /// The position of `node` in this tree, or the end if there is no node
    fn position_at(&self, node: Option<Ptr>, order: Order) -> Position {
        Position::new(self.id, Slot::or_end(node), order)
    }

    /// Checks that `position` belongs to this tree and still points at a live node
    fn resolve(&self, position: Position) -> Result<Slot> {
        let violation = match position.tree {
            None => Violation::Detached,
            Some(id) if id != self.id => Violation::ForeignTree,
            Some(_) => match position.slot {
                Slot::At(ptr) if !self.nodes.contains(ptr) => Violation::Stale,
                slot => return Ok(slot),
            },
        };

        debug!(%violation, "rejected position");
        Err(violation.into())
    }

    /// Detaches the node at `ptr` from the tree and returns its value
    ///
    /// A node with two children keeps its cell: the value of its in-order successor (the leftmost
    /// node of its right subtree) moves into it and the successor's cell is spliced out instead.
    fn unlink(&mut self, ptr: Ptr) -> (T, Option<Relocation>) {
        let node = &self.nodes[ptr];
        match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let heir = leftmost(&self.nodes, right);
                let heir_value = self.splice_out(heir);
                let value = mem::replace(&mut self.nodes[ptr].value, heir_value);

                trace!(len = self.len(), case = "two children", "erased node");
                (value, Some(Relocation {from: heir, to: ptr}))
            },

            (left, right) => {
                let value = self.splice_out(ptr);

                let case = if left.or(right).is_some() { "one child" } else { "leaf" };
                trace!(len = self.len(), case, "erased node");
                (value, None)
            },
        }
    }

    /// Removes a node with at most one child, moving that child up into its place
    fn splice_out(&mut self, ptr: Ptr) -> T {
        let node = &self.nodes[ptr];
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        let parent = node.parent;

        if let Some(child) = child {
            self.nodes[child].parent = parent;
        }

        match parent {
            None => self.root = child,
            Some(parent) => {
                let parent_node = &mut self.nodes[parent];
                if parent_node.left == Some(ptr) {
                    parent_node.left = child;
                } else {
                    debug_assert_eq!(parent_node.right, Some(ptr));
                    parent_node.right = child;
                }
            },
        }

        self.nodes.take(ptr).value
    }

    fn find_ptr<Q>(&self, value: &Q) -> Option<Ptr>
        where C: Compare<Q, T>,
              Q: ?Sized,
    {
        let mut current = self.root;
        while let Some(ptr) = current {
            let node = &self.nodes[ptr];
            match self.cmp.compare(value, &node.value) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(ptr),
            }
        }

        None
    }

    /// Returns an in-order cursor at the value equal to `value`, or at the end if there
    /// is no such value
    ///
    /// The value may be of any type the set's comparator can compare against the value type, as
    /// long as that comparison agrees with the ordering of the tree.
    ///
    /// Time complexity: `O(depth)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::{BSTSet, Order};
    ///
    /// let set: BSTSet<_> = vec![2, 1, 3].into_iter().collect();
    ///
    /// let mut cursor = set.find(&2);
    /// cursor.move_next();
    /// assert_eq!(cursor.get(), Some(&3));
    ///
    /// assert_eq!(set.find(&4), set.end(Order::InOrder));
    /// ```
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T, C>
        where C: Compare<Q, T>,
              Q: ?Sized,
    {
        Cursor::new(self, Slot::or_end(self.find_ptr(value)), Order::InOrder)
    }

    /// Returns `true` if the set contains the specified value.
    ///
    /// The value may be of any type the set's comparator can compare against the value type, as
    /// long as that comparison agrees with the ordering of the tree.
    ///
    /// Time complexity: `O(depth)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// # assert!(!set.contains(&1));
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&2));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
        where C: Compare<Q, T>,
              Q: ?Sized,
    {
        self.find_ptr(value).is_some()
    }

    /// Returns a reference to the value in the set, or `None` if no such value exists in its binary
    /// search tree
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// set.insert(37);
    /// assert_eq!(set.get(&37), Some(&37));
    /// assert_eq!(set.get(&38), None);
    /// ```
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
        where C: Compare<Q, T>,
              Q: ?Sized,
    {
        self.find_ptr(value).map(|ptr| &self.nodes[ptr].value)
    }

    /// Inserts a new value into the set
    ///
    /// Returns the in-order position of the value and whether it was newly inserted. If the set
    /// already had an equal value, that value is kept, its position is returned with `false`, and
    /// `value` is dropped.
    ///
    /// Time complexity: `O(depth)`
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// # assert!(set.is_empty());
    /// let (position, inserted) = set.insert(37);
    /// assert!(inserted);
    /// assert_eq!(set.cursor(position).unwrap().value(), Ok(&37));
    ///
    /// let (again, inserted) = set.insert(37);
    /// assert!(!inserted);
    /// assert_eq!(again, position);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> (Position, bool)
        where C: Compare<T>,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(ptr) = current {
            let node = &self.nodes[ptr];
            match self.cmp.compare(&value, &node.value) {
                Ordering::Less => {
                    side = Side::Left;
                    current = node.left;
                },

                Ordering::Greater => {
                    side = Side::Right;
                    current = node.right;
                },

                Ordering::Equal => {
                    trace!(len = self.len(), "value already present, not inserted");
                    return (self.position_at(Some(ptr), Order::InOrder), false);
                },
            }

            parent = Some(ptr);
        }

        // Key not found, insert where we stopped
        let ptr = self.nodes.push(InnerNode::new(value, parent));
        match parent {
            None => self.root = Some(ptr),
            Some(parent) => match side {
                Side::Left => self.nodes[parent].left = Some(ptr),
                Side::Right => self.nodes[parent].right = Some(ptr),
            },
        }

        trace!(len = self.len(), "inserted node");
        (self.position_at(Some(ptr), Order::InOrder), true)
    }

    /// Removes a value from the set. Returns whether the value was present in the set.
    ///
    /// The value may be of any type the set's comparator can compare against the value type, as
    /// long as that comparison agrees with the ordering of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// set.insert(37);
    /// assert!(set.remove(&37));
    /// assert!(!set.remove(&37));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
        where C: Compare<Q, T>,
              Q: ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the value in the set, if any, that is equal to the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_bst::BSTSet;
    ///
    /// let mut set = BSTSet::new();
    /// set.insert(37);
    /// assert_eq!(set.take(&37), Some(37));
    /// assert_eq!(set.take(&37), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
        where C: Compare<Q, T>,
              Q: ?Sized,
    {
        let ptr = self.find_ptr(value)?;
        let (value, _) = self.unlink(ptr);
        Some(value)
    }
}

impl<'a, T, C> IntoIterator for &'a BSTSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_inorder()
    }
}

impl<T, C: Compare<T>> Extend<T> for BSTSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for BSTSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::prelude::*;

    use super::test_shape::{build, sample};

    fn values(set: &BSTSet<i32>, order: Order) -> Vec<i32> {
        set.iter(order).copied().collect()
    }

    /// Checks the parent links and the ordering of every node
    fn assert_well_formed<T: Ord + fmt::Debug>(set: &BSTSet<T>) {
        let mut count = 0;
        for ptr in set.iter_ptrs() {
            let node = &set.nodes[ptr];
            count += 1;
            match node.parent {
                Some(parent) => {
                    let parent_node = &set.nodes[parent];
                    assert!(parent_node.left == Some(ptr) || parent_node.right == Some(ptr));
                },
                None => assert_eq!(set.root, Some(ptr)),
            }
            if let Some(left) = node.left {
                assert!(set.nodes[left].value < node.value);
            }
            if let Some(right) = node.right {
                assert!(set.nodes[right].value > node.value);
            }
        }
        assert_eq!(count, set.len());

        let sorted: Vec<_> = set.iter_inorder().collect();
        assert!(sorted.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", sorted);
    }

    impl<T, C> BSTSet<T, C> {
        fn iter_ptrs(&self) -> Vec<Ptr> {
            let mut ptrs = Vec::new();
            let mut current = Order::InOrder.first(&self.nodes, self.root);
            while let Some(ptr) = current {
                ptrs.push(ptr);
                current = Order::InOrder.next(&self.nodes, ptr);
            }
            ptrs
        }
    }

    #[test]
    fn test_set_insert_get() {
        let mut set = BSTSet::new();

        assert!(!set.contains(&3));
        assert!(set.insert(3).1);
        assert!(set.contains(&3));

        assert!(!set.contains(&4));
        assert!(set.insert(4).1);
        assert!(set.contains(&3));
        assert!(set.contains(&4));

        assert!(!set.contains(&0));
        assert!(set.insert(0).1);
        assert!(set.contains(&3));
        assert!(set.contains(&4));
        assert!(set.contains(&0));
        assert_eq!(set.get(&0), Some(&0));
        assert_eq!(set.get(&1), None);
    }

    #[test]
    fn test_set_insert_duplicate() {
        let mut set = BSTSet::new();

        let (three, inserted) = set.insert(3);
        assert!(inserted);
        assert!(set.insert(4).1);

        let (again, inserted) = set.insert(3);
        assert!(!inserted);
        assert_eq!(again, three);
        assert_eq!(set.len(), 2);

        assert!(!set.insert(4).1);
        assert_eq!(values(&set, Order::InOrder), &[3, 4]);
    }

    #[test]
    fn test_duplicate_keeps_stored_value() {
        // Only the first field takes part in the ordering
        #[derive(Debug)]
        struct Entry(i32, &'static str);

        let mut set = BSTSet::with_comparator(|a: &Entry, b: &Entry| a.0.cmp(&b.0));
        set.insert(Entry(1, "first"));
        set.insert(Entry(1, "second"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.front(Order::InOrder).map(|entry| entry.1), Some("first"));
    }

    /// Orders `String`s by their contents and lets them be looked up by `&str`
    #[derive(Debug, Default, Clone, Copy)]
    struct ByStr;

    impl Compare<String> for ByStr {
        fn compare(&self, left: &String, right: &String) -> Ordering {
            left.cmp(right)
        }
    }

    impl Compare<str, String> for ByStr {
        fn compare(&self, left: &str, right: &String) -> Ordering {
            left.cmp(right.as_str())
        }
    }

    #[test]
    fn test_set_insert_get_borrow() {
        let mut set: BSTSet<String, ByStr> = BSTSet::default();

        assert!(!set.contains("abc"));
        assert!(set.insert("abc".to_string()).1);
        assert!(set.contains("abc"));

        assert!(!set.contains("COOL"));
        assert!(set.insert("COOL".to_string()).1);
        assert!(set.contains("abc"));
        assert!(set.contains("COOL"));

        assert!(!set.contains(""));
        assert!(set.insert("".to_string()).1);
        assert!(set.contains("abc"));
        assert!(set.contains("COOL"));
        assert!(set.contains(""));

        assert_eq!(set.find("COOL").value().map(String::as_str), Ok("COOL"));
        assert_eq!(set.get("abc").map(String::as_str), Some("abc"));
        assert_eq!(set.take("abc"), Some(String::from("abc")));
        assert!(!set.remove("abc"));
        assert!(set.remove(&String::from("COOL")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_random_operations() {
        cfg_if::cfg_if! {
            if #[cfg(miri)] {
                const TEST_CASES: usize = 16;
                const OPERATIONS: usize = 24;

                (0..TEST_CASES).into_iter().for_each(|_| test_case());

            } else {
                use rayon::prelude::*;

                const TEST_CASES: usize = 1024;
                const OPERATIONS: usize = 128;

                (0..TEST_CASES).into_par_iter().for_each(|_| test_case());
            }
        }

        fn test_case() {
            let mut set = BSTSet::new();
            // Compare against a HashSet
            let mut expected = HashSet::new();
            // The list of values that have been inserted
            let mut values = Vec::new();

            let mut rng = rand::thread_rng();
            for _ in 0..rng.gen_range(OPERATIONS..=OPERATIONS*2) {
                assert_eq!(set.is_empty(), expected.is_empty());
                assert_eq!(set.len(), expected.len());

                match rng.gen_range(1..=100) {
                    // Check for a value that hasn't been inserted
                    1..=15 => {
                        // Not inserting any negative numbers
                        let value = -rng.gen_range(1..=64);
                        assert_eq!(set.contains(&value), expected.contains(&value));
                        assert!(set.find(&value).is_end());
                    },

                    // Check for a value that has been inserted
                    16..=30 => {
                        let value = match values.choose(&mut rng).copied() {
                            Some(value) => value,
                            None => continue,
                        };

                        assert_eq!(set.contains(&value), expected.contains(&value));
                        assert_eq!(set.get(&value), expected.get(&value));
                    },

                    // Remove an existing value by value
                    31..=45 => {
                        let value = match values.choose(&mut rng).copied() {
                            Some(value) => value,
                            None => continue,
                        };

                        assert_eq!(set.take(&value), expected.take(&value));
                        // Should always be `false` since value has been removed already
                        assert_eq!(set.remove(&value), expected.remove(&value));
                    },

                    // Erase an existing value through a cursor in a random order
                    46..=60 => {
                        let value = match values.choose(&mut rng).copied() {
                            Some(value) => value,
                            None => continue,
                        };
                        if !expected.remove(&value) {
                            assert!(set.find(&value).is_end());
                            continue;
                        }

                        let order = *Order::ALL.choose(&mut rng).unwrap();
                        let visited: Vec<_> = set.iter(order).copied().collect();
                        let index = visited.iter().position(|&v| v == value).unwrap();
                        let following = visited.get(index + 1).copied();

                        let mut cursor = set.find(&value);
                        cursor.set_order(order);
                        let position = cursor.position();
                        let next = set.erase(position).unwrap();
                        assert_eq!(next.order(), order);
                        assert_eq!(set.cursor(next).unwrap().get().copied(), following);
                    },

                    // Insert a value
                    61..=100 => {
                        // Only inserting positive values
                        let value = rng.gen_range(0..=64);
                        values.push(value);

                        assert_eq!(set.contains(&value), expected.contains(&value));

                        let (position, inserted) = set.insert(value);
                        assert_eq!(inserted, expected.insert(value));
                        assert_eq!(set.cursor(position).unwrap().value(), Ok(&value));
                    },

                    _ => unreachable!(),
                }

                assert_well_formed(&set);
            }

            for &value in &values {
                assert_eq!(set.contains(&value), expected.contains(&value));
                assert_eq!(set.get(&value), expected.get(&value));
            }

            set.clear();
            expected.clear();

            assert_eq!(set.is_empty(), expected.is_empty());
            assert_eq!(set.len(), expected.len());

            for &value in &values {
                assert_eq!(set.contains(&value), expected.contains(&value));
                assert_eq!(set.get(&value), expected.get(&value));
            }
        }
    }

    #[test]
    fn traversals() {
        let mut set = BSTSet::new();
        // Create the following tree:
        //      4
        //   2     5
        // 1   3
        //
        // Inserting the tree one level at a time so it makes this shape:
        set.insert(4);
        set.insert(5);
        set.insert(2);
        set.insert(3);
        set.insert(1);

        assert_eq!(values(&set, Order::PreOrder), &[4, 2, 1, 3, 5]);
        assert_eq!(values(&set, Order::InOrder), &[1, 2, 3, 4, 5]);
        assert_eq!(values(&set, Order::PostOrder), &[1, 3, 2, 5, 4]);

        assert_eq!(set.iter_preorder().rev().copied().collect::<Vec<_>>(), &[5, 3, 1, 2, 4]);
        assert_eq!(set.iter_inorder().rev().copied().collect::<Vec<_>>(), &[5, 4, 3, 2, 1]);
        assert_eq!(set.iter_postorder().rev().copied().collect::<Vec<_>>(), &[4, 5, 2, 3, 1]);
    }

    #[test]
    fn insert_two_one_three() {
        let mut set = build(&[2, 1, 3]);

        assert_eq!(values(&set, Order::InOrder), &[1, 2, 3]);
        assert_eq!(values(&set, Order::PreOrder), &[2, 1, 3]);
        assert_eq!(values(&set, Order::PostOrder), &[1, 3, 2]);

        // Two children, the in-order successor is 3
        let next = set.erase(set.find(&2).position()).unwrap();
        assert_eq!(set.cursor(next).unwrap().value(), Ok(&3));
        assert_eq!(values(&set, Order::InOrder), &[1, 3]);
        assert_well_formed(&set);

        set.insert(2);
        assert_eq!(values(&set, Order::InOrder), &[1, 2, 3]);
        assert_well_formed(&set);
    }

    #[test]
    fn find_on_empty() {
        let set: BSTSet<i32> = BSTSet::new();
        assert_eq!(set.find(&1), set.end(Order::InOrder));
        assert_eq!(set.front(Order::InOrder), None);
        assert_eq!(set.back(Order::PostOrder), None);
        assert_eq!(set.root(), None);
    }

    #[test]
    fn erase_leaf() {
        let mut set = build(&[2, 1, 3]);

        let position = set.find(&3).position();
        let next = set.erase(position).unwrap();
        assert!(next.is_end());
        assert_eq!(set.cursor(position).unwrap_err(), Error::PreconditionViolation(Violation::Stale));

        let position = set.find(&1).position().with_order(Order::PreOrder);
        let next = set.erase(position).unwrap();
        assert!(next.is_end());

        assert_eq!(values(&set, Order::InOrder), &[2]);
        assert_well_formed(&set);
    }

    #[test]
    fn erase_one_child() {
        //     5
        //   2
        // 1
        let mut set = build(&[5, 2, 1]);

        let next = set.erase(set.find(&2).position()).unwrap();
        assert_eq!(set.cursor(next).unwrap().value(), Ok(&5));

        let one = set.find(&1);
        assert_eq!(one.parent().value(), Ok(&5));
        assert_eq!(set.root().map(|root| *root.left().unwrap().value()), Some(1));
        assert_well_formed(&set);

        // Erasing the root splices its only child into the root slot
        let next = set.erase(set.find(&5).position()).unwrap();
        assert!(next.is_end());
        assert_eq!(set.root().map(|root| *root.value()), Some(1));
        assert!(set.find(&1).parent().is_end());
        assert_well_formed(&set);
    }

    #[test]
    fn erase_two_children_relocates_successor() {
        //        5
        //     2     8
        //    1 3   7 9
        //         6
        let set = build(&[5, 2, 8, 1, 3, 7, 9, 6]);

        for &order in &Order::ALL {
            let mut set = set.clone();

            let heir = set.find(&6).position();
            let eight = set.find(&8).position();

            let mut cursor = set.find(&5);
            cursor.set_order(order);
            let root = cursor.position();
            let next = set.erase(root).unwrap();

            let next_value = set.cursor(next).unwrap().get().copied();
            match order {
                // The in-order successor is the heir, so its value now lives in the root's cell
                Order::InOrder => {
                    assert_eq!(next_value, Some(6));
                    assert_eq!(next.with_order(Order::InOrder), root.with_order(Order::InOrder));
                    assert!(set.cursor(next).unwrap().parent().is_end());
                },
                Order::PreOrder => assert_eq!(next_value, Some(2)),
                // The root is the last post-order node
                Order::PostOrder => assert_eq!(next_value, None),
            }

            // The heir's old cell is gone, everything else is untouched
            assert_eq!(set.cursor(heir).unwrap_err(), Error::PreconditionViolation(Violation::Stale));
            assert_eq!(set.cursor(eight).unwrap().value(), Ok(&8));
            assert_eq!(set.cursor(eight).unwrap().left().value(), Ok(&7));
            assert!(set.cursor(eight).unwrap().left().left().is_end());

            assert_eq!(values(&set, Order::InOrder), &[1, 2, 3, 6, 7, 8, 9]);
            assert_eq!(values(&set, Order::PreOrder), &[6, 2, 1, 3, 8, 7, 9]);
            assert_well_formed(&set);
        }
    }

    #[test]
    fn erase_minimum_keeps_everything_else() {
        let mut set = build(&[50, 30, 70, 20, 40, 60, 80, 25]);
        let before: Vec<_> = values(&set, Order::InOrder);

        let next = set.erase(set.begin(Order::InOrder).position()).unwrap();
        assert_eq!(set.cursor(next).unwrap().value(), Ok(&25));

        assert_eq!(set.len(), before.len() - 1);
        assert_eq!(values(&set, Order::InOrder), &before[1..]);
        assert_well_formed(&set);
    }

    #[test]
    fn erase_rejects_bad_positions() {
        let mut set = sample();
        let other = sample();

        assert_eq!(set.erase(Position::default()), Err(Error::PreconditionViolation(Violation::Detached)));
        assert_eq!(set.erase(other.find(&4).position()), Err(Error::PreconditionViolation(Violation::ForeignTree)));
        assert_eq!(set.erase(set.end(Order::PreOrder).position()), Err(Error::OutOfRange));
        assert_eq!(set.erase(set.rend(Order::PostOrder).position()), Err(Error::OutOfRange));

        let four = set.find(&4).position();
        assert!(set.erase(set.find(&1).position()).is_ok());
        let three = set.find(&3).position();
        assert!(set.erase(three).is_ok());
        assert_eq!(set.erase(three), Err(Error::PreconditionViolation(Violation::Stale)));

        // Failed calls did not touch the tree
        assert_eq!(values(&set, Order::InOrder), &[2, 4, 5, 6, 7]);
        assert_eq!(set.cursor(four).unwrap().value(), Ok(&4));
        assert_well_formed(&set);
    }

    #[test]
    fn positions_survive_unrelated_mutation() {
        let mut set = sample();
        let seven = set.find(&7).position();

        set.insert(10);
        set.insert(0);
        set.remove(&1);
        set.remove(&4);

        let cursor = set.cursor(seven).unwrap();
        assert_eq!(cursor.value(), Ok(&7));
        assert_eq!(cursor.right().value(), Ok(&10));
    }

    #[test]
    fn clear_invalidates_positions() {
        let mut set = sample();
        let one = set.find(&1).position();
        let end = set.end(Order::InOrder).position();
        let before = set.rend(Order::InOrder).position();

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.cursor(one).unwrap_err(), Error::PreconditionViolation(Violation::Stale));
        // Boundaries never go stale
        assert!(set.cursor(end).unwrap().is_end());
        assert!(set.cursor(before).unwrap().is_before_begin());

        // Reusing the freed cells does not revive old positions
        set.insert(1);
        assert_eq!(set.cursor(one).unwrap_err(), Error::PreconditionViolation(Violation::Stale));
    }

    #[test]
    fn clone_is_deep() {
        let mut set = sample();
        let cloned = set.clone();
        let five = set.find(&5).position();

        set.remove(&4);
        set.insert(8);

        assert_eq!(values(&cloned, Order::PreOrder), &[4, 2, 1, 3, 6, 5, 7]);
        assert_ne!(set, cloned);
        assert_eq!(cloned.cursor(five).unwrap_err(), Error::PreconditionViolation(Violation::ForeignTree));
        assert_well_formed(&cloned);
    }

    #[test]
    fn move_keeps_positions() {
        let mut set = sample();
        let three = set.find(&3).position();

        let moved = mem::take(&mut set);
        assert!(set.is_empty());
        assert_eq!(moved.cursor(three).unwrap().value(), Ok(&3));
        assert_eq!(set.cursor(three).unwrap_err(), Error::PreconditionViolation(Violation::ForeignTree));
    }

    #[test]
    fn equality_ignores_shape() {
        let ascending = build(&[1, 2, 3, 4]);
        let balanced = build(&[3, 2, 4, 1]);

        assert_ne!(values(&ascending, Order::PreOrder), values(&balanced, Order::PreOrder));
        assert_eq!(ascending, balanced);
        assert_ne!(ascending, build(&[1, 2, 3]));
        assert_eq!(BSTSet::<i32>::new(), BSTSet::default());
    }

    #[test]
    fn custom_comparator() {
        let mut set = BSTSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        set.extend(vec![5, 1, 9, 3]);

        assert_eq!(set.iter_inorder().copied().collect::<Vec<_>>(), &[9, 5, 3, 1]);
        assert!(set.contains(&9));
        assert!(!set.contains(&2));
        assert!(set.remove(&5));
        assert_eq!(set.iter_inorder().copied().collect::<Vec<_>>(), &[9, 3, 1]);
    }

    #[test]
    fn display_renders_children() {
        assert_eq!(BSTSet::<i32>::new().to_string(), "~\n");
        assert_eq!(build(&[2, 1, 3]).to_string(), "2\n├── 1\n└── 3\n");

        let rendered = build(&[5, 2, 8, 1, 3, 9]).to_string();
        let expected = "\
5
├── 2
│   ├── 1
│   └── 3
└── 8
    ├── ~
    └── 9
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn debug_lists_values_in_order() {
        assert_eq!(format!("{:?}", build(&[2, 3, 1])), "{1, 2, 3}");
    }

    #[test]
    fn degenerate_tree() {
        // Sorted input makes a linked list, which must not overflow the stack anywhere
        const N: i32 = 10_000;
        let mut set: BSTSet<i32> = (0..N).collect();

        assert_eq!(set.len(), N as usize);
        assert_eq!(set.iter_postorder().next(), Some(&(N - 1)));
        assert_eq!(set.iter_preorder().next_back(), Some(&(N - 1)));
        assert!(set.find(&(N - 1)).is_valid());
        assert_eq!(set.iter_inorder().rev().count(), N as usize);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_custom_traversal() {
        #[derive(Debug, PartialOrd, Ord, PartialEq, Eq)]
        struct Person {
            pub name: String,
        }

        // Custom traversal through the values in the set
        fn find_name<'a>(node: Option<Node<'a, Person>>, target_name: &str) -> Option<Node<'a, Person>> {
            let node = node?;
            if node.value().name == target_name {
                Some(node)
            } else {
                // Recurse through left and right subtrees, just like you would in a GC'd language!
                find_name(node.left(), target_name)
                    .or_else(|| find_name(node.right(), target_name))
            }
        }

        let mut set = BSTSet::new();

        set.insert(Person {
            name: String::from("Manish"),
        });
        set.insert(Person {
            name: String::from("Ada"),
        });

        fn get_name(node: Option<Node<Person>>) -> Option<&str> {
            node.map(|node| &*node.value().name)
        }

        // Find the node with name == "Jane"
        assert_eq!(get_name(find_name(set.root(), "Jane")), None);
        assert_eq!(get_name(find_name(set.root(), "Manish")), Some("Manish"));

        let ada = find_name(set.root(), "Ada").unwrap();
        assert_eq!(get_name(ada.parent()), Some("Manish"));
        assert_eq!(set.find(&Person {name: String::from("Ada")}).node(), Some(ada));
    }
}
