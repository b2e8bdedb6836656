//! Comparator driven in-memory sorting.
//!
//! Every algorithm lives in its own module below [`stable`] or [`unstable`] and exposes the same
//! four entry points: `sort`, `sort_by`, `sort_by_key` and `sort_by_less`. The most useful ones are
//! re-exported here under the algorithm name, `sort` and `sort_unstable` pick the adaptive merge
//! sort and the introsort respectively.

use std::mem;

use paste::paste;

/// Generates the public entry points of an algorithm module from its implementation function
/// `fn(&mut [T], &mut impl FnMut(&T, &T) -> bool)`.
macro_rules! sort_impl {
    ($name:expr, $sort_fn:path) => {
        pub struct SortImpl;

        impl sort_test_tools::Sort for SortImpl {
            fn name() -> String {
                $name.into()
            }

            #[inline]
            fn sort<T>(arr: &mut [T])
            where
                T: Ord,
            {
                sort(arr);
            }

            #[inline]
            fn sort_by<T, F>(arr: &mut [T], compare: F)
            where
                F: FnMut(&T, &T) -> std::cmp::Ordering,
            {
                sort_by(arr, compare);
            }
        }

        /// Sorts the slice in ascending order.
        #[inline]
        pub fn sort<T>(v: &mut [T])
        where
            T: Ord,
        {
            $sort_fn(v, &mut |a: &T, b: &T| a.lt(b));
        }

        /// Sorts the slice with a comparator function.
        ///
        /// The comparator must define a total order, otherwise the resulting order is unspecified.
        /// It is still a permutation of the input.
        #[inline]
        pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
        where
            F: FnMut(&T, &T) -> std::cmp::Ordering,
        {
            $sort_fn(v, &mut |a: &T, b: &T| {
                compare(a, b) == std::cmp::Ordering::Less
            });
        }

        /// Sorts the slice with a key extraction function, the key is computed on every comparison.
        #[inline]
        pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
        where
            F: FnMut(&T) -> K,
            K: Ord,
        {
            $sort_fn(v, &mut |a: &T, b: &T| f(a).lt(&f(b)));
        }

        /// Sorts the slice with a strict "less than" predicate.
        #[inline]
        pub fn sort_by_less<T, F>(v: &mut [T], mut is_less: F)
        where
            F: FnMut(&T, &T) -> bool,
        {
            $sort_fn(v, &mut is_less);
        }
    };
}

/// Re-exports the entry points of an algorithm module with `prefix` in place of `sort`.
macro_rules! reexport_sort {
    ($($path:ident)::+ => $prefix:ident) => {
        paste! {
            pub use $($path)::+::{
                sort as $prefix,
                sort_by as [<$prefix _by>],
                sort_by_key as [<$prefix _by_key>],
                sort_by_less as [<$prefix _by_less>],
            };
        }
    };
}

mod insertion;
mod merge;
mod scratch;

pub mod stable;
pub mod unstable;

reexport_sort!(stable::tim_sort => sort);
reexport_sort!(unstable::quick_sort => sort_unstable);

reexport_sort!(stable::tim_sort => tim_sort);
reexport_sort!(stable::tim_sort_buffer => tim_sort_buffer);
reexport_sort!(stable::merge_sort => merge_sort);
reexport_sort!(stable::merge_sort_buffer => merge_sort_buffer);
reexport_sort!(stable::merge_sort_in_place => merge_sort_in_place);
reexport_sort!(stable::insertion_sort => insertion_sort);
reexport_sort!(stable::indirect_sort => indirect_sort);

reexport_sort!(unstable::quick_sort => quick_sort);
reexport_sort!(unstable::heap_sort => heap_sort);
reexport_sort!(unstable::shell_sort => shell_sort);

pub use stable::tim_sort::{MergePolicy, TimSortConfig};
pub use unstable::radix_sort::{radix_sort, radix_sort_by_key, radix_sort_by_key_and, RadixKey};

/// Small types without drop glue are cheap to copy and compare. Algorithms pick cheaper sampling
/// and denser gap sequences for them.
pub(crate) const fn is_scalar_like<T>() -> bool {
    !mem::needs_drop::<T>() && mem::size_of::<T>() <= 16
}
