//! Adaptive stable merge sort in the style of timsort.
//!
//! The input is consumed as a sequence of runs. Natural runs are found and extended, short ones are
//! padded to a minimum length with insertion sort. The runs are kept on a stack and merged
//! following a [`MergePolicy`] so that merged runs stay roughly balanced. Merges use scratch memory
//! for half the input, or a smaller cap in which case they fall back to rotation based merging.

use std::cmp::{self, Ordering};
use std::mem::{self, MaybeUninit};

use crate::insertion::{insert_tail, insertion_sort_shift_left};
use crate::merge::{merge_2_part, merge_2_part_with_buffer};
use crate::scratch::{fits_stack, with_scratch};

sort_impl!("tim_sort_stable", tim_sort);

const TIMSORT_LAST_RUN_THRESHOLD: usize = 64;
const TIMSORT_MIN_RUN: usize = 32;
const TIMSORT_INSERT_GAP: usize = 8;

/// Decides when runs on the stack get merged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Merges neighbours once they are within a factor of 4/3 of each other.
    #[default]
    Balanced,
    /// The classic timsort stack invariants `C > B + A` and `B > A`.
    Classic,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimSortConfig {
    /// Upper bound for the number of scratch slots, `None` allows `len / 2`. Inputs that fit into
    /// the stack scratch ignore this.
    pub max_buffer: Option<usize>,
    pub policy: MergePolicy,
}

/// Sorts `v` with a comparator function and explicit configuration.
pub fn sort_by_with_config<T, F>(v: &mut [T], config: TimSortConfig, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let max_buffer = config.max_buffer.unwrap_or(v.len());
    tim_sort_with_limit(v, max_buffer, config.policy, &mut |a: &T, b: &T| {
        compare(a, b) == Ordering::Less
    });
}

#[inline]
fn tim_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let max_buffer = v.len();
    tim_sort_with_limit(v, max_buffer, MergePolicy::Balanced, is_less);
}

#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn tim_sort_with_limit<T, F>(
    v: &mut [T],
    max_buffer: usize,
    policy: MergePolicy,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 || mem::size_of::<T>() == 0 {
        return;
    }

    let first_run = create_run(v, is_less);
    if first_run == len {
        return;
    }

    let half = len / 2;
    let capacity = if fits_stack::<T>(len) {
        half
    } else {
        cmp::min(max_buffer, half)
    };
    let bounded = capacity < half;

    log::debug!(
        "tim_sort: len {len}, {capacity} scratch slots, {} merges, {policy:?} policy",
        if bounded { "bounded" } else { "full" }
    );

    with_scratch(capacity, |scratch| {
        let mut runs = RunStack::new(scratch, bounded);
        runs.push(first_run);

        let mut start = first_run;
        while start < len {
            start += create_run(&mut v[start..], is_less);
            runs.push(start);

            match policy {
                MergePolicy::Balanced => runs.collapse_balanced(v, is_less),
                MergePolicy::Classic => runs.collapse_classic(v, is_less),
            }
        }

        runs.force_collapse(v, is_less);
    });
}

/// Sorts a prefix of `v` and returns its length.
///
/// Short inputs are insertion sorted as a whole. Otherwise the natural run at the start is
/// extended to at least [`TIMSORT_MIN_RUN`] elements, and then further by every element that is
/// not less than the one [`TIMSORT_INSERT_GAP`] positions before it. Descending runs are built
/// with the order flipped and reversed at the end.
fn create_run<T, F>(v: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < TIMSORT_LAST_RUN_THRESHOLD {
        insertion_sort_shift_left(v, 1, is_less);
        return len;
    }

    // Orders the first three elements and picks the run direction.
    let descending = if is_less(&v[1], &v[0]) {
        if !is_less(&v[2], &v[0]) {
            v.swap(0, 1);
            false
        } else if is_less(&v[2], &v[1]) {
            true
        } else {
            v.swap(2, 1);
            true
        }
    } else if is_less(&v[2], &v[0]) {
        v.swap(0, 1);
        true
    } else if !is_less(&v[2], &v[1]) {
        false
    } else {
        v.swap(2, 1);
        false
    };

    let mut run = 3;
    if descending {
        while run < len && is_less(&v[run], &v[run - 1]) {
            run += 1;
        }

        // Equal elements end up in reverse input order, the final reverse restores it.
        run = extend_run(v, run, &mut |a: &T, b: &T| !is_less(a, b));
        v[..run].reverse();
    } else {
        while run < len && !is_less(&v[run], &v[run - 1]) {
            run += 1;
        }

        run = extend_run(v, run, is_less);
    }

    run
}

/// Grows the sorted prefix `v[..run]`, requires `v.len() >= TIMSORT_MIN_RUN`.
fn extend_run<T, F>(v: &mut [T], mut run: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(len >= TIMSORT_MIN_RUN && run >= 1);

    if run < TIMSORT_MIN_RUN {
        insertion_sort_shift_left(&mut v[..TIMSORT_MIN_RUN], run, is_less);
        run = TIMSORT_MIN_RUN;
    }

    while run < len && !is_less(&v[run], &v[run - TIMSORT_INSERT_GAP]) {
        // SAFETY: run >= TIMSORT_MIN_RUN so the sub-slice is at least len 2.
        unsafe {
            insert_tail(&mut v[..=run], is_less);
        }
        run += 1;
    }

    run
}

/// `x * 4 / 3` without the risk of overflow.
#[inline]
fn four_thirds(x: usize) -> usize {
    x + x / 3
}

/// Boundaries of the sorted runs found so far, together with the scratch their merges use.
///
/// Run `i` spans `v[bounds[i]..bounds[i + 1]]`. In the policies the top run is called A, the one
/// below it B and the third one C.
struct RunStack<'a, T> {
    bounds: Vec<usize>,
    scratch: &'a mut [MaybeUninit<T>],
    bounded: bool,
}

impl<'a, T> RunStack<'a, T> {
    fn new(scratch: &'a mut [MaybeUninit<T>], bounded: bool) -> Self {
        let mut bounds = Vec::with_capacity(32);
        bounds.push(0);

        Self {
            bounds,
            scratch,
            bounded,
        }
    }

    fn push(&mut self, run_end: usize) {
        debug_assert!(self.top() < run_end);
        self.bounds.push(run_end);
    }

    fn run_count(&self) -> usize {
        self.bounds.len() - 1
    }

    fn top(&self) -> usize {
        self.bounds[self.bounds.len() - 1]
    }

    /// Length of the run `depth` positions below the top.
    fn run_len(&self, depth: usize) -> usize {
        let end = self.bounds.len() - 1 - depth;
        self.bounds[end] - self.bounds[end - 1]
    }

    /// Merges run `i` with run `i + 1`.
    fn merge_at<F>(&mut self, v: &mut [T], i: usize, is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let start = self.bounds[i];
        let mid = self.bounds[i + 1];
        let end = self.bounds[i + 2];

        let runs = &mut v[start..end];
        if self.bounded {
            merge_2_part_with_buffer(runs, mid - start, self.scratch, is_less);
        } else {
            merge_2_part(runs, mid - start, self.scratch, is_less);
        }

        self.bounds.remove(i + 1);
    }

    /// Merges while the input left to process is longer than A and the sizes on top of the stack
    /// are within 4/3 of each other.
    fn collapse_balanced<F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let len = v.len();

        while self.run_count() >= 2 && len - self.top() > self.run_len(0) {
            let a = self.run_len(0);
            let b = self.run_len(1);

            if self.run_count() > 2 && four_thirds(a + b) >= b + self.run_len(2) {
                self.merge_at(v, self.run_count() - 3, is_less);

                while self.run_count() > 2 && four_thirds(self.run_len(1)) >= self.run_len(2) {
                    self.merge_at(v, self.run_count() - 3, is_less);
                }
            } else if four_thirds(a) >= b {
                self.merge_at(v, self.run_count() - 2, is_less);
            } else {
                break;
            }
        }
    }

    fn collapse_classic<F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let len = v.len();

        while self.run_count() >= 2 && len - self.top() > self.run_len(0) {
            let a = self.run_len(0);
            let b = self.run_len(1);
            let count = self.run_count();

            if count > 2 && a + b >= self.run_len(2) {
                if a <= self.run_len(2) {
                    self.merge_at(v, count - 2, is_less);
                    self.merge_at(v, count - 3, is_less);
                } else {
                    self.merge_at(v, count - 3, is_less);
                }
            } else if a >= b {
                self.merge_at(v, count - 2, is_less);
            } else {
                break;
            }
        }
    }

    /// Merges everything into a single run, preferring the merge with the shorter partner.
    fn force_collapse<F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        while self.run_count() > 1 {
            let count = self.run_count();

            if count > 2 && self.run_len(0) > self.run_len(2) {
                self.merge_at(v, count - 3, is_less);
            } else {
                self.merge_at(v, count - 2, is_less);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sort_test_tools::patterns;

    fn is_sorted<T: Ord>(v: &[T]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1])
    }

    fn tagged(keys: Vec<i32>) -> Vec<(i32, usize)> {
        keys.into_iter().enumerate().map(|(i, k)| (k, i)).collect()
    }

    fn key_less(a: &(i32, usize), b: &(i32, usize)) -> bool {
        a.0 < b.0
    }

    /// Builds `v` out of sorted runs with the given lengths.
    fn sorted_runs(lens: &[usize]) -> Vec<i32> {
        let total = lens.iter().sum();
        let mut v = patterns::random(total);
        let mut start = 0;
        for len in lens {
            v[start..start + len].sort();
            start += len;
        }
        v
    }

    #[test]
    fn four_thirds_truncates() {
        for x in 0..1000 {
            assert_eq!(four_thirds(x), x * 4 / 3);
        }
        assert_eq!(four_thirds(usize::MAX / 2), usize::MAX / 2 + usize::MAX / 6);
    }

    #[test]
    fn short_input_is_one_run() {
        let mut v = patterns::random(63);
        assert_eq!(create_run(&mut v, &mut |a, b| a < b), 63);
        assert!(is_sorted(&v));
    }

    #[test]
    fn ascending_input_is_one_run() {
        let mut v = patterns::ascending(1000);
        assert_eq!(create_run(&mut v, &mut |a, b| a < b), 1000);
    }

    #[test]
    fn descending_run_is_reversed_stably() {
        // Descending keys, most of them appear four times in a row.
        let mut v = tagged((0..200).rev().map(|i| (i + 1) / 4).collect());
        let run = create_run(&mut v, &mut key_less);
        assert_eq!(run, 200);
        assert!(is_sorted(&v));
    }

    #[test]
    fn random_run_reaches_min_length() {
        for _ in 0..20 {
            let mut v = tagged(patterns::random_uniform(500, 0..20));
            let run = create_run(&mut v, &mut key_less);
            assert!(run >= TIMSORT_MIN_RUN);
            assert!(is_sorted(&v[..run]));
        }
    }

    #[test]
    fn balanced_policy_merges_similar_runs() {
        let lens = [100, 10, 200];
        let mut v = sorted_runs(&[100, 10, 200, 1000]);
        let mut is_less = |a: &i32, b: &i32| a < b;

        with_scratch(v.len() / 2, |scratch| {
            let mut runs = RunStack::new(scratch, false);
            let mut end = 0;
            for len in lens {
                end += len;
                runs.push(end);
                runs.collapse_balanced(&mut v, &mut is_less);
            }

            // 100 and 10 stay apart, 200 pulls both in.
            assert_eq!(runs.bounds, [0, 310]);
        });

        assert!(is_sorted(&v[..310]));
    }

    #[test]
    fn balanced_policy_leaves_decreasing_runs() {
        let mut v = sorted_runs(&[400, 200, 100, 1000]);
        let mut is_less = |a: &i32, b: &i32| a < b;

        with_scratch(v.len() / 2, |scratch| {
            let mut runs = RunStack::new(scratch, false);
            for end in [400, 600, 700] {
                runs.push(end);
                runs.collapse_balanced(&mut v, &mut is_less);
            }
            assert_eq!(runs.bounds, [0, 400, 600, 700]);
        });
    }

    #[test]
    fn classic_policy_keeps_invariants() {
        let lens = [300, 200, 60, 50, 400];
        let mut v = sorted_runs(&[300, 200, 60, 50, 400, 5000]);
        let mut is_less = |a: &i32, b: &i32| a < b;

        with_scratch(v.len() / 2, |scratch| {
            let mut runs = RunStack::new(scratch, false);
            let mut end = 0;
            for len in lens {
                end += len;
                runs.push(end);
                runs.collapse_classic(&mut v, &mut is_less);

                let count = runs.run_count();
                for depth in 0..count.saturating_sub(1) {
                    assert!(runs.run_len(depth) < runs.run_len(depth + 1));
                }
                for depth in 0..count.saturating_sub(2) {
                    let upper = runs.run_len(depth) + runs.run_len(depth + 1);
                    assert!(upper < runs.run_len(depth + 2));
                }
            }
        });
    }

    #[test]
    fn force_collapse_sorts_everything() {
        let lens = [70, 33, 500, 64, 64, 1];
        let mut v = sorted_runs(&lens);
        let mut is_less = |a: &i32, b: &i32| a < b;

        for bounded in [false, true] {
            let capacity = if bounded { 8 } else { v.len() / 2 };
            with_scratch(capacity, |scratch| {
                let mut runs = RunStack::new(scratch, bounded);
                let mut end = 0;
                for len in lens {
                    end += len;
                    runs.push(end);
                }
                runs.force_collapse(&mut v, &mut is_less);
                assert_eq!(runs.run_count(), 1);
            });

            assert!(is_sorted(&v));
            v = sorted_runs(&lens);
        }
    }

    #[test]
    fn config_variants_sort_stably() {
        let configs = [
            TimSortConfig::default(),
            TimSortConfig {
                max_buffer: Some(0),
                policy: MergePolicy::Balanced,
            },
            TimSortConfig {
                max_buffer: Some(17),
                policy: MergePolicy::Classic,
            },
            TimSortConfig {
                max_buffer: None,
                policy: MergePolicy::Classic,
            },
        ];

        // Large enough to not fit the stack scratch.
        for config in configs {
            let mut v = tagged(patterns::random_uniform(10_000, 0..100));
            sort_by_with_config(&mut v, config, |a, b| a.0.cmp(&b.0));
            assert!(is_sorted(&v), "{config:?}");
        }
    }
}
