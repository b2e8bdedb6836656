//! Plain insertion sort. Quadratic, only sensible for short or nearly sorted inputs.

use crate::insertion::insertion_sort_shift_left;

sort_impl!("insertion_sort_stable", insertion_sort);

#[inline]
fn insertion_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    insertion_sort_shift_left(v, 1, is_less);
}
