use std::cmp::Ordering;
use std::borrow::Borrow;
use std::iter::FromIterator;

mod node;
mod preorder;
mod inorder;
mod postorder;

pub use node::*;
pub use preorder::*;
pub use inorder::*;
pub use postorder::*;

type Link<T> = Option<Box<Node<T>>>;

/// A "simple" BST set that uses `Box` for internal storage, rather than arena allocating the nodes
///
/// Nodes have no parent links, so there are no cursors and all traversals keep an explicit stack.
/// Removal follows the same rules as the `cursor_bst` crate (a node with two children takes the
/// value of its in-order successor), so both trees end up with the same shape after the same
/// sequence of operations.
///
/// Used to test the `cursor_bst` crate
#[derive(Debug, Clone)]
pub struct SimpleBSTSet<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for SimpleBSTSet<T> {
    fn default() -> Self {
        Self {
            root: None,
            len: 0,
        }
    }
}

impl<T: Ord> PartialEq for SimpleBSTSet<T> {
    fn eq(&self, other: &Self) -> bool {
        // We can't just compare the binary trees structurally, since they may be structured
        // differently while still having all the same elements (e.g. if insertion order is
        // different). Instead, we use in-order traversal since we know that that is guaranteed to
        // produce the elements in sorted order. If their sorted orders are equal, the sets are
        // equal.

        if self.len() != other.len() {
            return false;
        }

        self.iter_inorder().zip(other.iter_inorder()).all(|(v1, v2)| v1.eq(v2))
    }
}

impl<T: Ord> Eq for SimpleBSTSet<T> {}

impl<T: Ord> SimpleBSTSet<T> {
    /// Creates an empty `SimpleBSTSet`
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_bst::SimpleBSTSet;
    /// let mut set: SimpleBSTSet<&str> = SimpleBSTSet::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items in the set
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_bst::SimpleBSTSet;
    ///
    /// let mut set = SimpleBSTSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the set is empty
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        debug_assert!(self.len != 0 || self.root.is_none());
        self.len == 0
    }

    /// Returns `true` if the set contains the specified value.
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_bst::SimpleBSTSet;
    ///
    /// let mut set = SimpleBSTSet::new();
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&2));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.get(value).is_some()
    }

    /// Returns a reference to the value in the set, or `None` if no such value exists
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let mut current = self.root();
        while let Some(node) = current {
            match value.cmp(node.value().borrow()) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => current = node.right(),
                Ordering::Equal => return Some(node.value()),
            }
        }

        None
    }

    /// Inserts a new value into the binary search tree
    ///
    /// Returns `false` and leaves the set unchanged if an equal value is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_bst::SimpleBSTSet;
    ///
    /// let mut set = SimpleBSTSet::new();
    /// assert!(set.insert(37));
    /// assert!(!set.insert(37));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut current = match self.root.as_deref_mut() {
            Some(root) => Some(root),
            None => {
                self.root = Some(Box::new(Node::new(value)));

                debug_assert_eq!(self.len, 0);
                self.len = 1;

                return true;
            },
        };

        while let Some(node) = current.take() {
            match value.cmp(node.value()) {
                Ordering::Less => {
                    // Value not found, insert where we stopped
                    if !node.has_left() {
                        node.set_left(Node::new(value));
                        self.len += 1;
                        return true;
                    }
                    current = node.left_mut();
                },

                Ordering::Greater => {
                    // Value not found, insert where we stopped
                    if !node.has_right() {
                        node.set_right(Node::new(value));
                        self.len += 1;
                        return true;
                    }
                    current = node.right_mut();
                },

                Ordering::Equal => return false,
            }
        }

        unreachable!("the loop always inserts or finds the value")
    }

    /// Removes a value from the set. Returns whether the value was present in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use simple_bst::SimpleBSTSet;
    ///
    /// let mut set = SimpleBSTSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the value in the set, if any, that is equal to the given one.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
        where T: Borrow<Q>,
              Q: Ord + ?Sized,
    {
        let removed = take_from(&mut self.root, value)?;
        self.len -= 1;
        Some(removed)
    }

    /// Clears the set, removing all elements
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Performs a pre-order traversal of the tree
    pub fn iter_preorder(&self) -> IterPreorder<T> {
        IterPreorder::new(self.root())
    }

    /// Performs an in-order traversal of the tree
    pub fn iter_inorder(&self) -> IterInorder<T> {
        IterInorder::new(self.root())
    }

    /// Performs a post-order traversal of the tree
    pub fn iter_postorder(&self) -> IterPostorder<T> {
        IterPostorder::new(self.root())
    }

    /// Returns the root node of the tree, or `None` if the tree is empty
    ///
    /// This is a low-level API meant to be used for implementing traversals.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }
}

/// Removes the value equal to `value` from the subtree at `link`
fn take_from<T, Q>(link: &mut Link<T>, value: &Q) -> Option<T>
    where T: Borrow<Q>,
          Q: Ord + ?Sized,
{
    let node = link.as_mut()?;
    match value.cmp(node.value.borrow()) {
        Ordering::Less => take_from(&mut node.left, value),
        Ordering::Greater => take_from(&mut node.right, value),
        Ordering::Equal => {
            let node = link.as_mut()?;
            match (node.left.take(), node.right.take()) {
                // Keep this node and move the smallest value of the right subtree into it
                (Some(left), Some(right)) => {
                    let mut right = Some(right);
                    let heir = take_min(&mut right)?;
                    node.left = Some(left);
                    node.right = right;
                    Some(std::mem::replace(&mut node.value, heir))
                },

                (child, None) | (None, child) => {
                    let node = link.take()?;
                    *link = child;
                    Some(node.value)
                },
            }
        },
    }
}

/// Removes the smallest value from the subtree at `link`
fn take_min<T>(link: &mut Link<T>) -> Option<T> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        return take_min(&mut node.left);
    }

    let node = link.take()?;
    let Node {value, right, ..} = *node;
    *link = right;
    Some(value)
}

impl<T: Ord> Extend<T> for SimpleBSTSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SimpleBSTSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
