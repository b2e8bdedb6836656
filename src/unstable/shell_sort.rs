//! Shell sort over a gap sequence growing by a factor of 2.9.
//!
//! After every pass that didn't move anything, a cheap insertion sort with a tiny shift budget
//! checks whether the slice is sorted already. If it isn't, the sorted prefix it found is skipped
//! by all later passes.

use once_cell::sync::Lazy;

use crate::insertion::{insertion_sort_limit, insertion_sort_shift_left};
use crate::is_scalar_like;

sort_impl!("shell_sort_unstable", shell_sort);

const SHELLSORT_INSERTION_SORT_THRESHOLD: usize = 32;
const GAP_FACTOR: f64 = 2.9;

// Tuned for cheap comparisons.
static SCALAR_GAPS: Lazy<Vec<usize>> = Lazy::new(|| {
    extend_gaps(vec![
        9, 34, 182, 836, 4025, 19001, 90358, 428481, 2034035, 9651787, 45806244, 217378076,
        1031612713,
    ])
});

static OBJECT_GAPS: Lazy<Vec<usize>> = Lazy::new(|| extend_gaps(vec![10]));

fn extend_gaps(mut gaps: Vec<usize>) -> Vec<usize> {
    let limit = (usize::MAX / 4) as f64;

    while let Some(&last) = gaps.last() {
        let next = last as f64 * GAP_FACTOR;
        if next > limit {
            break;
        }
        gaps.push(next as usize);
    }

    gaps
}

#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
fn shell_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len <= SHELLSORT_INSERTION_SORT_THRESHOLD {
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    let gaps: &[usize] = if is_scalar_like::<T>() {
        &SCALAR_GAPS
    } else {
        &OBJECT_GAPS
    };
    let first_gap = gaps
        .iter()
        .position(|&gap| gap as f64 * GAP_FACTOR >= len as f64)
        .unwrap_or(gaps.len() - 1);

    // v[..start] is sorted and not greater than anything in v[start..].
    let mut start = 0;

    for &gap in gaps[..=first_gap].iter().rev() {
        if gapped_insertion_pass(&mut v[start..], gap, is_less) {
            continue;
        }

        let sorted = insertion_sort_limit(&mut v[start..], 1, is_less);
        if sorted == len - start {
            return;
        }

        // The slice is gap-sorted, so everything a full gap before the end of the sorted prefix
        // is already in its final position.
        if sorted >= 2 * gap {
            start += (sorted / gap - 1) * gap;
        }
    }

    insertion_sort_shift_left(&mut v[start..], 1, is_less);
}

/// Insertion sort of every `gap`-th element. Returns `true` if anything moved.
fn gapped_insertion_pass<T, F>(v: &mut [T], gap: usize, is_less: &mut F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    let mut moved = false;

    for i in gap..v.len() {
        let mut j = i;
        while j >= gap && is_less(&v[j], &v[j - gap]) {
            v.swap(j, j - gap);
            j -= gap;
            moved = true;
        }
    }

    moved
}
