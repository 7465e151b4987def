use std::mem;
use std::num::NonZeroU32;
use std::ops::{Index, IndexMut};

#[cfg(test)]
use static_assertions::const_assert_eq;

/// A generational index into a slab
///
/// The generation is bumped every time the slot at `index` is vacated, so a `Ptr` that outlives
/// the value it was created for will no longer resolve. The generation is never zero, which lets
/// `Option<Ptr>` use the same amount of space as `Ptr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ptr {
    index: u32,
    generation: NonZeroU32,
}

// Tree nodes store three of these, so it matters that the niche is used
#[cfg(test)]
const_assert_eq!(mem::size_of::<Ptr>(), 8);
#[cfg(test)]
const_assert_eq!(mem::size_of::<Option<Ptr>>(), 8);

impl Ptr {
    #[inline(always)]
    fn new(index: u32, generation: NonZeroU32) -> Self {
        Self {index, generation}
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

const FIRST_GENERATION: NonZeroU32 = match NonZeroU32::new(1) {
    Some(generation) => generation,
    None => unreachable!(),
};

#[derive(Debug, Clone)]
enum Entry<T> {
    Occupied {
        generation: NonZeroU32,
        value: T,
    },
    Vacant {
        /// The generation the next value stored in this entry will get
        generation: NonZeroU32,
        /// The index of the next entry in the free list
        next_free: Option<u32>,
    },
}

/// Returns the generation after `generation`, skipping zero on wrap-around
#[inline]
fn next_generation(generation: NonZeroU32) -> NonZeroU32 {
    NonZeroU32::new(generation.get().wrapping_add(1)).unwrap_or(FIRST_GENERATION)
}

/// An allocation primitive similar to `Vec`, but implemented to reuse space from removed entries.
///
/// Items are kept contiguously in memory, but indexes are not shifted when an individual item is
/// removed. Instead of always pushing items after the previously pushed item, this data structure
/// will reuse space from previously removed entries when possible.
///
/// Every `Ptr` handed out by `push` carries the generation of its entry. Looking up a `Ptr` whose
/// entry has since been removed (or removed and reused) fails instead of returning another value.
#[derive(Debug, Clone)]
pub struct Slab<T> {
    entries: Vec<Entry<T>>,
    /// The index of the first entry in the free list or `None` if the free list is empty
    ///
    /// The free list is a linked list stored in `entries` that is used as a stack to track which
    /// entries have space that can be reused in calls to `push`.
    free_list_head: Option<u32>,
    /// The number of occupied entries
    len: usize,
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self {
            entries: Vec::default(),
            free_list_head: None,
            len: 0,
        }
    }
}

impl<T> Slab<T> {
    /// Creates an empty slab with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the number of values in the slab
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the slab contains no values
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of values the slab can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns true if `ptr` refers to a value that is still in the slab
    pub fn contains(&self, ptr: Ptr) -> bool {
        self.get(ptr).is_some()
    }

    /// Returns a reference to the value at `ptr`, or `None` if that value was removed
    pub fn get(&self, ptr: Ptr) -> Option<&T> {
        match self.entries.get(ptr.index()) {
            Some(Entry::Occupied {generation, value}) if *generation == ptr.generation => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value at `ptr`, or `None` if that value was removed
    pub fn get_mut(&mut self, ptr: Ptr) -> Option<&mut T> {
        match self.entries.get_mut(ptr.index()) {
            Some(Entry::Occupied {generation, value}) if *generation == ptr.generation => Some(value),
            _ => None,
        }
    }

    /// Pushes a value into the slab and returns a pointer to it.
    ///
    /// The item may be inserted at the end of the list, or in the space from an item that was
    /// previously removed.
    pub fn push(&mut self, value: T) -> Ptr {
        // Check if we can reuse some space from the free list
        if let Some(free_list_head) = self.free_list_head {
            let entry = &mut self.entries[free_list_head as usize];
            let (generation, next_free) = match *entry {
                Entry::Vacant {generation, next_free} => (generation, next_free),
                Entry::Occupied {..} => panic!("bug: occupied entry found in the slab free list"),
            };

            self.free_list_head = next_free;
            *entry = Entry::Occupied {generation, value};
            self.len += 1;

            return Ptr::new(free_list_head, generation);
        }

        let index = self.entries.len();
        // Indexes are stored as `u32` to keep `Ptr` small
        if index >= u32::MAX as usize {
            panic!("cannot have more than u32::MAX - 1 entries in slab");
        }

        self.entries.push(Entry::Occupied {generation: FIRST_GENERATION, value});
        self.len += 1;

        Ptr::new(index as u32, FIRST_GENERATION)
    }

    /// Removes the value at `ptr` from the slab, returning it, or `None` if it was already removed.
    ///
    /// The space for the value will be reused in future calls to `push`. This does not move or
    /// modify any other entries in the slab. Their pointers remain the same and can still be used.
    pub fn remove(&mut self, ptr: Ptr) -> Option<T> {
        let entry = self.entries.get_mut(ptr.index())?;
        match entry {
            Entry::Occupied {generation, ..} if *generation == ptr.generation => {},
            _ => return None,
        }

        let vacant = Entry::Vacant {
            generation: next_generation(ptr.generation),
            next_free: self.free_list_head,
        };
        self.free_list_head = Some(ptr.index);
        self.len -= 1;

        match mem::replace(entry, vacant) {
            Entry::Occupied {value, ..} => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Removes the value at `ptr` from the slab, returning it
    ///
    /// # Panics
    ///
    /// Panics if `ptr` no longer refers to a value in the slab.
    pub fn take(&mut self, ptr: Ptr) -> T {
        match self.remove(ptr) {
            Some(value) => value,
            None => panic!("`Slab::take()` - `ptr` is invalid!"),
        }
    }

    /// Clears the slab, removing all values.
    ///
    /// Note that this method has no effect on the allocated capacity of the slab. Every pointer
    /// previously returned from `push` is invalidated, even once its entry is reused.
    pub fn clear(&mut self) {
        let mut free_list_head = None;
        // Walk backwards so that the free list hands out low indexes first
        for (index, entry) in self.entries.iter_mut().enumerate().rev() {
            let generation = match *entry {
                Entry::Occupied {generation, ..} => next_generation(generation),
                Entry::Vacant {generation, ..} => generation,
            };

            *entry = Entry::Vacant {generation, next_free: free_list_head};
            free_list_head = Some(index as u32);
        }

        self.free_list_head = free_list_head;
        self.len = 0;
    }

    /// Reserves capacity for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional)
    }

    /// Shrinks the capacity of the slab as much as possible
    ///
    /// Removed entries are kept so that outstanding pointers to them stay detectably invalid.
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit()
    }
}

impl<T> Index<Ptr> for Slab<T> {
    type Output = T;

    fn index(&self, ptr: Ptr) -> &Self::Output {
        match self.get(ptr) {
            Some(value) => value,
            None => panic!("`Slab::index()` - `ptr` is invalid!"),
        }
    }
}

impl<T> IndexMut<Ptr> for Slab<T> {
    fn index_mut(&mut self, ptr: Ptr) -> &mut Self::Output {
        match self.get_mut(ptr) {
            Some(value) => value,
            None => panic!("`Slab::index_mut()` - `ptr` is invalid!"),
        }
    }
}
