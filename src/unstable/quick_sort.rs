//! Introsort: quicksort with randomized pivot sampling, heap sort once the recursion gets too deep
//! and an early exit for partitions that turn out to be sorted already.
//!
//! The pivot randomness comes from an injected [`RngCore`]. The plain entry points use a fresh
//! counter generator per call so results are reproducible.

use std::cmp::Ordering;

use rand::rngs::mock::StepRng;
use rand::RngCore;

use crate::insertion::{insertion_sort_limit, q_insertion_sort};
use crate::is_scalar_like;
use crate::unstable::heap_sort::heap_sort;

sort_impl!("quick_sort_unstable", quick_sort_default);

const QSORT_INSERTION_SORT_THRESHOLD: usize = 40;
const WIDE_PIVOT_THRESHOLD: usize = 16384;

/// Sorts `v` with a comparator function, drawing pivot positions from `rng`.
pub fn sort_by_with_rng<T, R, F>(v: &mut [T], rng: &mut R, mut compare: F)
where
    R: RngCore + ?Sized,
    F: FnMut(&T, &T) -> Ordering,
{
    quick_sort(v, rng, &mut |a: &T, b: &T| compare(a, b) == Ordering::Less);
}

pub(crate) fn default_rng() -> StepRng {
    StepRng::new(0x0fff_ffff, 1)
}

#[inline]
fn quick_sort_default<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    quick_sort(v, &mut default_rng(), is_less);
}

#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn quick_sort<T, R, F>(v: &mut [T], rng: &mut R, is_less: &mut F)
where
    R: RngCore + ?Sized,
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    // log base 1.5 of len, deeper than that and the partitions are unbalanced.
    let limit = ((len as f64).ln() / 1.5f64.ln()) as u32;

    recurse(v, rng, is_less, limit);
}

fn recurse<T, R, F>(mut v: &mut [T], rng: &mut R, is_less: &mut F, mut limit: u32)
where
    R: RngCore + ?Sized,
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let len = v.len();

        if len <= QSORT_INSERTION_SORT_THRESHOLD {
            q_insertion_sort(v, is_less);
            return;
        }

        if limit == 0 {
            heap_sort(v, is_less);
            return;
        }
        limit -= 1;

        let rnd = rng.next_u32() as usize;
        choose_pivot(v, rnd, is_less);
        let (mid, swapped) = partition(v, is_less);

        // Nothing moved and the left side looks ordered, try to finish both sides cheaply.
        if !swapped && mid > 0 && !is_less(&v[mid - 1], &v[0]) {
            if insertion_sort_limit(&mut v[..mid], 1, is_less) == mid {
                let right_len = len - mid - 1;
                if insertion_sort_limit(&mut v[mid + 1..], 1, is_less) == right_len {
                    return;
                }

                let right_start = skip_pivot_equal(v, mid, is_less);
                let (_, right) = v.split_at_mut(right_start);
                v = right;
                continue;
            }
        }

        let right_start = skip_pivot_equal(v, mid, is_less);
        let (left, right) = v.split_at_mut(right_start);
        let left = &mut left[..mid];

        // Recurse into the shorter side to bound the stack depth.
        if left.len() < right.len() {
            recurse(left, rng, is_less, limit);
            v = right;
        } else {
            recurse(right, rng, is_less, limit);
            v = left;
        }
    }
}

/// Moves the chosen pivot to `v[len - 1]`.
///
/// Small scalar-like elements and short inputs take the median of three positions, two of them
/// randomized. Everything else takes the median of three medians over nine positions, which pays
/// off when comparisons are expensive.
fn choose_pivot<T, F>(v: &mut [T], rnd: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(len > QSORT_INSERTION_SORT_THRESHOLD);

    let half = (len - 1) / 2;
    let last = len - 1;

    if is_scalar_like::<T>() || len < WIDE_PIVOT_THRESHOLD {
        median_of_three(v, rnd % half, last, half + rnd % half, is_less);
    } else {
        let spread = half - 3;
        median_of_three(v, 0, last, half + 1, is_less);
        median_of_three(v, 1, half - 1, last - 1, is_less);
        median_of_three(
            v,
            2 + rnd % spread,
            half,
            last - 2 - rnd % spread,
            is_less,
        );
        median_of_three(v, half - 1, last, half, is_less);
    }
}

/// Swaps the median of `v[a]`, `v[b]` and `v[c]` into `v[b]`.
fn median_of_three<T, F>(v: &mut [T], a: usize, b: usize, c: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if is_less(&v[c], &v[b]) {
        if is_less(&v[b], &v[a]) {
            v.swap(a, c);
            return;
        }
        v.swap(b, c);
    }

    if is_less(&v[b], &v[a]) {
        v.swap(b, a);
        if is_less(&v[c], &v[b]) {
            v.swap(b, c);
        }
    }
}

/// Partitions `v` around the pivot at `v[len - 1]` into elements less than the pivot, the pivot
/// and elements greater than or equal to it.
///
/// Returns the final position of the pivot and whether any elements had to be swapped.
fn partition<T, F>(v: &mut [T], is_less: &mut F) -> (usize, bool)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let (rest, pivot_slot) = v.split_at_mut(len - 1);
    let pivot = &pivot_slot[0];

    let mut l = 0;
    let mut r = rest.len();
    let mut swapped = false;

    loop {
        while l < r && is_less(&rest[l], pivot) {
            l += 1;
        }
        while l < r && !is_less(&rest[r - 1], pivot) {
            r -= 1;
        }
        if l >= r {
            break;
        }

        rest.swap(l, r - 1);
        swapped = true;
        l += 1;
        r -= 1;
    }

    v.swap(l, len - 1);
    (l, swapped)
}

/// Returns the end of the run of elements equal to the pivot right after `v[pivot]`. Those are
/// already in their final position.
fn skip_pivot_equal<T, F>(v: &[T], pivot: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    // Everything right of the pivot is not less than it, so one comparison decides equality.
    let mut i = pivot + 1;
    while i < v.len() && !is_less(&v[pivot], &v[i]) {
        i += 1;
    }
    i
}
