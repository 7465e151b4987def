mod slab;

pub mod error;
pub mod set;

pub use compare::{Compare, Natural, natural};
pub use error::{Error, Result, Violation};
pub use set::{BSTSet, Cursor, Order, Position, RevCursor};

#[macro_export(local_inner_macros)]
macro_rules! bstset {
    (@single $($x:tt)*) => (());
    (@count $($rest:expr),*) => (<[()]>::len(&[$(bstset!(@single $rest)),*]));

    ($($key:expr,)+) => { bstset!($($key),+) };
    ($($key:expr),*) => {
        {
            let _cap = bstset!(@count $($key),*);
            let mut _set = $crate::BSTSet::with_capacity(_cap);
            $(
                let _ = _set.insert($key);
            )*
            _set
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn bstset_macro() {
        let set = bstset! {
            1,
            3,
            2, // trailing comma
        };

        let items: Vec<_> = set.iter_inorder().copied().collect();
        assert_eq!(&items, &[1, 2, 3]);
        assert!(set.capacity() >= 3);

        // No trailing comma
        let set = bstset![99];

        let items: Vec<_> = set.iter_inorder().copied().collect();
        assert_eq!(&items, &[99]);

        // Duplicates collapse
        let set = bstset![2, 1, 2];

        let items: Vec<_> = set.iter_preorder().copied().collect();
        assert_eq!(&items, &[2, 1]);

        // Zero items
        let set = bstset!();

        let items: Vec<i32> = set.iter_inorder().copied().collect();
        assert_eq!(&items, &[]);
    }
}
