//! Merge sort that only allocates `sqrt(len)` scratch slots for inputs too large for the stack.

use crate::scratch::{fits_stack, with_scratch};
use crate::stable::merge_sort::{merge_sort_recursive, merge_sort_recursive_with_buffer};

sort_impl!("merge_sort_buffer_stable", merge_sort_buffer);

#[inline]
fn merge_sort_buffer<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    if fits_stack::<T>(len / 2) {
        with_scratch(len / 2, |scratch| merge_sort_recursive(v, scratch, is_less));
    } else {
        let capacity = (len as f64).sqrt() as usize;
        with_scratch(capacity, |scratch| {
            merge_sort_recursive_with_buffer(v, scratch, is_less)
        });
    }
}
