//! Merge sort without any scratch memory, every merge goes through block rotations.

use crate::stable::merge_sort::merge_sort_recursive_with_buffer;

sort_impl!("merge_sort_in_place_stable", merge_sort_in_place);

#[inline]
fn merge_sort_in_place<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    merge_sort_recursive_with_buffer(v, &mut [], is_less);
}
