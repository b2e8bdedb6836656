//! Top-down merge sort with scratch memory for half the input.

use std::mem::MaybeUninit;

use crate::insertion::insertion_sort_shift_left;
use crate::merge::{merge_2_part, merge_2_part_with_buffer};
use crate::scratch::with_scratch;

sort_impl!("merge_sort_stable", merge_sort);

const MERGE_INSERTION_SORT_THRESHOLD: usize = 32;

#[inline]
fn merge_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.len() < 2 {
        return;
    }

    with_scratch(v.len() / 2, |scratch| {
        merge_sort_recursive(v, scratch, is_less)
    });
}

/// Requires `scratch.len() >= v.len() / 2`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_sort_recursive<T, F>(
    v: &mut [T],
    scratch: &mut [MaybeUninit<T>],
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < MERGE_INSERTION_SORT_THRESHOLD {
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    let mid = len / 2;
    merge_sort_recursive(&mut v[..mid], scratch, is_less);
    merge_sort_recursive(&mut v[mid..], scratch, is_less);
    merge_2_part(v, mid, scratch, is_less);
}

/// Same as [`merge_sort_recursive`] but works with a scratch of any size.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_sort_recursive_with_buffer<T, F>(
    v: &mut [T],
    scratch: &mut [MaybeUninit<T>],
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < MERGE_INSERTION_SORT_THRESHOLD {
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    let mid = len / 2;
    merge_sort_recursive_with_buffer(&mut v[..mid], scratch, is_less);
    merge_sort_recursive_with_buffer(&mut v[mid..], scratch, is_less);
    merge_2_part_with_buffer(v, mid, scratch, is_less);
}
