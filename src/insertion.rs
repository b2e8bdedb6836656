//! Insertion sort family, used as the base case of every other algorithm in this crate.

use std::mem;
use std::ptr;

// When dropped, copies from `src` into `dest`.
struct InsertionHole<T> {
    src: *const T,
    dest: *mut T,
}

impl<T> Drop for InsertionHole<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::copy_nonoverlapping(self.src, self.dest, 1);
        }
    }
}

/// Inserts `v[v.len() - 1]` into pre-sorted sequence `v[..v.len() - 1]` so that whole `v[..]`
/// becomes sorted.
///
/// Equal elements are never moved past each other, so this is stable. Passing a negated predicate
/// `|a, b| !is_less(a, b)` sorts descending while keeping equal elements in reverse input order.
pub(crate) unsafe fn insert_tail<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut unlimited = isize::MAX;
    // SAFETY: forwarded from the caller.
    unsafe {
        insert_tail_limited(v, &mut unlimited, is_less);
    }
}

/// Same as [`insert_tail`] but every shift past the first one consumes one unit of `budget`. When
/// the budget drops to zero the value is placed where it currently is and `false` is returned. An
/// element that is already in place adds one unit to the budget.
///
/// Either way `v` holds every element it held before exactly once.
unsafe fn insert_tail_limited<T, F>(v: &mut [T], budget: &mut isize, is_less: &mut F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(v.len() >= 2);

    let arr_ptr = v.as_mut_ptr();
    let i = v.len() - 1;

    // SAFETY: caller must ensure v is at least len 2.
    unsafe {
        let i_ptr = arr_ptr.add(i);

        // It's important that we use i_ptr here. If this check is positive and we continue,
        // We want to make sure that no other copy of the value was seen by is_less.
        // Otherwise we would have to copy it back.
        if !is_less(&*i_ptr, &*i_ptr.sub(1)) {
            *budget = budget.saturating_add(1);
            return true;
        }

        // From here on `tmp` is the value used for comparison, as it is the value that will be
        // copied back.
        let tmp = mem::ManuallyDrop::new(ptr::read(i_ptr));
        // Intermediate state of the insertion process is always tracked by `hole`, which
        // serves two purposes:
        // 1. Protects integrity of `v` from panics in `is_less`.
        // 2. Fills the remaining hole in `v` in the end, or when giving up early.
        let mut hole = InsertionHole {
            src: &*tmp,
            dest: i_ptr.sub(1),
        };
        ptr::copy_nonoverlapping(hole.dest, i_ptr, 1);

        for j in (0..(i - 1)).rev() {
            let j_ptr = arr_ptr.add(j);
            if !is_less(&*tmp, &*j_ptr) {
                break;
            }

            *budget -= 1;
            if *budget <= 0 {
                return false;
            }

            ptr::copy_nonoverlapping(j_ptr, hole.dest, 1);
            hole.dest = j_ptr;
        }
        // `hole` gets dropped and thus copies `tmp` into the remaining hole in `v`.
    }

    true
}

/// Sort `v` assuming `v[..offset]` is already sorted.
///
/// Never inline this function to avoid code bloat. It still optimizes nicely and has practically no
/// performance impact. Even improving performance in some cases.
#[inline(never)]
pub(crate) fn insertion_sort_shift_left<T, F>(v: &mut [T], offset: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    // This is a logic but not a safety bug.
    debug_assert!(offset <= len);

    // Shift each element of the unsorted region v[i..] as far left as is needed to make v sorted.
    for i in offset.max(1)..len {
        // SAFETY: i >= 1 so the sub-slice is at least len 2.
        unsafe {
            insert_tail(&mut v[..=i], is_less);
        }
    }
}

/// Insertion sort with a shift budget of `limit`, see [`insert_tail_limited`].
///
/// Returns `v.len()` if the whole slice got sorted. Otherwise returns the index of the element
/// whose insertion exhausted the budget. `v[..i]` was sorted before that element got partially
/// inserted.
pub(crate) fn insertion_sort_limit<T, F>(v: &mut [T], mut limit: isize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    for i in 1..len {
        // SAFETY: i >= 1 so the sub-slice is at least len 2.
        let completed = unsafe { insert_tail_limited(&mut v[..=i], &mut limit, is_less) };
        if !completed {
            return i;
        }
    }

    len
}

/// Leaf sort of the quicksort, meant for `v.len() <= 40`.
///
/// A single pass of compare-exchange 13 elements apart moves far away values most of the way
/// before the final insertion sort. Not stable.
pub(crate) fn q_insertion_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    const GAP: usize = 13;

    for i in GAP..v.len() {
        if is_less(&v[i], &v[i - GAP]) {
            v.swap(i, i - GAP);
        }
    }

    insertion_sort_shift_left(v, 1, is_less);
}

#[cfg(test)]
mod tests {
    use super::*;

    use sort_test_tools::patterns;

    fn is_sorted<T: Ord>(v: &[T]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn shift_left_respects_sorted_prefix() {
        let mut v = vec![1, 4, 9, 12, 3, 15, 0, 9, 2];
        insertion_sort_shift_left(&mut v, 4, &mut |a, b| a < b);
        assert_eq!(v, [0, 1, 2, 3, 4, 9, 9, 12, 15]);

        let mut empty: [i32; 0] = [];
        insertion_sort_shift_left(&mut empty, 0, &mut |a, b| a < b);
    }

    #[test]
    fn shift_left_is_stable() {
        let mut v: Vec<(i32, usize)> = patterns::random_uniform(300, 0..8)
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, i))
            .collect();

        insertion_sort_shift_left(&mut v, 1, &mut |a, b| a.0 < b.0);

        assert!(is_sorted(&v));
    }

    #[test]
    fn negated_predicate_sorts_descending_in_reverse_input_order() {
        let mut v = vec![(2, 0), (5, 1), (2, 2), (7, 3), (5, 4)];
        insertion_sort_shift_left(&mut v, 1, &mut |a, b| !(a.0 < b.0));
        assert_eq!(v, [(7, 3), (5, 4), (5, 1), (2, 2), (2, 0)]);
    }

    #[test]
    fn limit_accepts_sorted_and_rejects_reversed() {
        let mut ascending = patterns::ascending(100);
        assert_eq!(
            insertion_sort_limit(&mut ascending, 1, &mut |a, b| a < b),
            100
        );

        let mut descending = patterns::descending(100);
        let sum_before: i64 = descending.iter().map(|x| *x as i64).sum();
        let stopped_at = insertion_sort_limit(&mut descending, 1, &mut |a, b| a < b);
        assert!(stopped_at < 100);
        let sum_after: i64 = descending.iter().map(|x| *x as i64).sum();
        assert_eq!(sum_before, sum_after);
    }

    #[test]
    fn limit_finishes_nearly_sorted() {
        // One out of place element costs a single shift, paid for by the elements before it.
        let mut v: Vec<i32> = (0..50).collect();
        v.swap(30, 31);
        assert_eq!(insertion_sort_limit(&mut v, 1, &mut |a, b| a < b), 50);
        assert!(is_sorted(&v));
    }

    #[test]
    fn q_insertion_sort_small_inputs() {
        for len in 0..=40 {
            let mut v = patterns::random(len);
            q_insertion_sort(&mut v, &mut |a, b| a < b);
            assert!(is_sorted(&v));
        }
    }
}
