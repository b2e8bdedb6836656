//! Adaptive merge sort with scratch memory capped at `sqrt(len)` elements.
//!
//! Inputs that fit into the stack scratch still get full merges, larger ones merge with the
//! rotation based fallback.

use crate::stable::tim_sort::{tim_sort_with_limit, MergePolicy};

sort_impl!("tim_sort_buffer_stable", tim_sort_buffer);

#[inline]
fn tim_sort_buffer<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let max_buffer = (v.len() as f64 + 0.1).sqrt() as usize;
    tim_sort_with_limit(v, max_buffer, MergePolicy::Balanced, is_less);
}
