//! Merging two adjacent sorted runs `v[..mid]` and `v[mid..]` into one.
//!
//! All merges are stable: of two equal elements the one from the left run ends up first. They come
//! in three flavours that differ in how much scratch memory they need:
//!
//! - [`merge_2_part`]: scratch holds the shorter run.
//! - [`merge_2_part_with_buffer`]: scratch of any size, larger scratch means fewer element moves.
//! - [`merge_2_part_without_buffer`]: no scratch at all.

use std::cmp;
use std::mem::{self, MaybeUninit};
use std::ptr;

use crate::insertion::insertion_sort_shift_left;

const MERGE_2_PART_INSERTION_SORT_THRESHOLD: usize = 32;
const FIND_SWAP_BOUND_OPTIMIZE_THRESHOLD: usize = 256;

/// Merges `v[..mid]` and `v[mid..]`, `scratch` must be able to hold the shorter of the two after
/// the already ordered head and tail have been trimmed off.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_2_part<T, F>(
    v: &mut [T],
    mid: usize,
    scratch: &mut [MaybeUninit<T>],
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let Some((start, end)) = trim_merge_range(v, mid, is_less) else {
        return;
    };
    let v = &mut v[start..end];
    let mid = mid - start;

    if v.len() < MERGE_2_PART_INSERTION_SORT_THRESHOLD {
        insertion_sort_shift_left(v, mid, is_less);
        return;
    }

    merge_2_part_force(v, mid, scratch, is_less);
}

/// Merges `v[..mid]` and `v[mid..]` by moving the shorter run into `scratch` and merging it back.
///
/// Panics if `scratch` can't hold the shorter run.
pub(crate) fn merge_2_part_force<T, F>(
    v: &mut [T],
    mid: usize,
    scratch: &mut [MaybeUninit<T>],
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if mid == 0 || mid >= len || mem::size_of::<T>() == 0 {
        return;
    }

    assert!(scratch.len() >= cmp::min(mid, len - mid));

    // SAFETY: checked above, `scratch` is a separate allocation from `v`.
    unsafe {
        merge_with_hole(v, mid, scratch.as_mut_ptr() as *mut T, is_less);
    }
}

/// Merges `v[..mid]` and `v[mid..]` with a scratch of arbitrary size, including zero.
///
/// If the shorter run fits `scratch` this is [`merge_2_part_force`]. Otherwise a pair of split
/// points is searched so that exchanging the blocks between them leaves two independent and
/// smaller merges, which are then handled recursively.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_2_part_with_buffer<T, F>(
    v: &mut [T],
    mid: usize,
    scratch: &mut [MaybeUninit<T>],
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let Some((start, end)) = trim_merge_range(v, mid, is_less) else {
        return;
    };
    let v = &mut v[start..end];
    let mid = mid - start;
    let len = v.len();

    if len < MERGE_2_PART_INSERTION_SORT_THRESHOLD || len - mid < 3 || mid < 3 {
        insertion_sort_shift_left(v, mid, is_less);
        return;
    }

    if len - mid <= scratch.len() || mid <= scratch.len() {
        merge_2_part_force(v, mid, scratch, is_less);
        return;
    }

    let (pivot_l, pivot_r) = find_swap_bound(v, mid, is_less);

    // A consistent order always yields bounds that shrink both sub-merges. Anything else would
    // recurse forever, so hand those over to the iterative merge.
    let valid = pivot_l <= mid && mid <= pivot_r && pivot_r <= len && pivot_l < pivot_r;
    if !valid || (pivot_l == mid && pivot_r == len) || (pivot_l == 0 && pivot_r == mid) {
        merge_2_part_without_buffer(v, mid, is_less);
        return;
    }

    // v[pivot_l..mid] all belong behind v[mid..pivot_r].
    let swap_mid = pivot_l + rotate_with_buffer(&mut v[pivot_l..pivot_r], mid - pivot_l, scratch);

    if pivot_l > 0 {
        merge_2_part_with_buffer(&mut v[..swap_mid], pivot_l, scratch, is_less);
    }
    if pivot_r < len {
        merge_2_part_with_buffer(&mut v[swap_mid..], pivot_r - swap_mid, scratch, is_less);
    }
}

/// Merges `v[..mid]` and `v[mid..]` in place without any scratch memory.
///
/// Repeatedly looks up where the first (or last) element of the shorter run belongs in the other
/// run and rotates the block in between, so the cost is roughly `O(m * log(n) + m * n)` for runs of
/// length `m <= n`. Iterative, uses constant stack space.
pub(crate) fn merge_2_part_without_buffer<T, F>(v: &mut [T], mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if mid == 0 || mid >= len || !is_less(&v[mid], &v[mid - 1]) {
        return;
    }

    let (mut beg, mut mid, mut end) = (0, mid, len);

    if mid - beg < end - mid {
        while beg < mid {
            // Right run elements that have to go in front of v[beg].
            let p = mid + lower_bound(&v[mid..end], &v[beg], is_less);
            if p != mid {
                rotate(&mut v[beg..p], mid - beg);
                beg += p - mid;
                mid = p;
            }
            if mid == end {
                break;
            }
            // Skip the left run elements that are already placed.
            beg += 1;
            while beg < mid && !is_less(&v[mid], &v[beg]) {
                beg += 1;
            }
        }
    } else {
        while mid < end {
            // Left run elements that have to go behind v[end - 1].
            let p = beg + upper_bound(&v[beg..mid], &v[end - 1], is_less);
            if p != mid {
                rotate(&mut v[p..end], mid - p);
                end -= mid - p;
                mid = p;
            }
            if beg == mid {
                break;
            }
            end -= 1;
            while end > mid && !is_less(&v[end - 1], &v[mid - 1]) {
                end -= 1;
            }
        }
    }
}

/// Rotates `v` so that `v[mid..]` comes first, without scratch memory.
///
/// Returns the new position of the element formerly at `v[0]`.
pub(crate) fn rotate<T>(v: &mut [T], mid: usize) -> usize {
    rotate_with_buffer(v, mid, &mut [])
}

/// Rotates `v` so that `v[mid..]` comes first.
///
/// Swaps equal length blocks until the shorter remaining side fits into `scratch`, which then
/// finishes the rotation with three bulk copies. Returns `v.len() - mid`, the new position of the
/// element formerly at `v[0]`.
pub(crate) fn rotate_with_buffer<T>(
    v: &mut [T],
    mid: usize,
    scratch: &mut [MaybeUninit<T>],
) -> usize {
    let len = v.len();
    debug_assert!(mid <= len);

    let new_start = len - mid;
    let (mut beg, mut mid, mut end) = (0, mid, len);

    loop {
        let left = mid - beg;
        let right = end - mid;

        if left <= right {
            if left == 0 {
                return new_start;
            }

            if left > scratch.len() {
                block_swap(v, beg, mid, left);
                beg = mid;
                mid += left;
            } else {
                // SAFETY: `scratch` holds at least `left` elements and doesn't alias `v`. No user
                // code runs while an element lives only in `scratch`.
                unsafe {
                    let arr_ptr = v.as_mut_ptr();
                    let buf = scratch.as_mut_ptr() as *mut T;
                    ptr::copy_nonoverlapping(arr_ptr.add(beg), buf, left);
                    ptr::copy(arr_ptr.add(mid), arr_ptr.add(beg), right);
                    ptr::copy_nonoverlapping(buf, arr_ptr.add(beg + right), left);
                }
                return new_start;
            }
        } else if right > scratch.len() {
            block_swap(v, mid - right, mid, right);
            end = mid;
            mid -= right;
        } else {
            // SAFETY: see above, with the roles of the two sides swapped.
            unsafe {
                let arr_ptr = v.as_mut_ptr();
                let buf = scratch.as_mut_ptr() as *mut T;
                ptr::copy_nonoverlapping(arr_ptr.add(mid), buf, right);
                ptr::copy(arr_ptr.add(beg), arr_ptr.add(end - left), left);
                ptr::copy_nonoverlapping(buf, arr_ptr.add(beg), right);
            }
            return new_start;
        }
    }
}

/// Swaps `v[a..a + count]` with `v[b..b + count]`, requires `a + count <= b`.
fn block_swap<T>(v: &mut [T], a: usize, b: usize, count: usize) {
    let (head, tail) = v.split_at_mut(b);
    head[a..a + count].swap_with_slice(&mut tail[..count]);
}

/// Index of the first element in `v` that is not less than `key`.
fn lower_bound<T, F>(v: &[T], key: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.partition_point(|elem| is_less(elem, key))
}

/// Index of the first element in `v` that is greater than `key`.
fn upper_bound<T, F>(v: &[T], key: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.partition_point(|elem| !is_less(key, elem))
}

/// Returns `None` if `v[..mid]` and `v[mid..]` are already in order. Otherwise returns the range
/// `start..end` that still has to be merged, everything outside of it is in its final position.
fn trim_merge_range<T, F>(v: &[T], mid: usize, is_less: &mut F) -> Option<(usize, usize)>
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if mid == 0 || mid >= len || !is_less(&v[mid], &v[mid - 1]) {
        return None;
    }

    let mut start = 0;
    while start < mid && !is_less(&v[mid], &v[start]) {
        start += 1;
    }
    if start == mid {
        return None;
    }

    let mut last = len - 1;
    while mid - 1 < last && !is_less(&v[last], &v[mid - 1]) {
        last -= 1;
    }
    if last == mid - 1 {
        return None;
    }

    Some((start, last + 1))
}

/// Finds `(pivot_l, pivot_r)` with `pivot_l <= mid <= pivot_r` so that after rotating
/// `v[pivot_l..pivot_r]` at `mid`, the ranges `v[..pivot_l] + v[mid..pivot_r]` and
/// `v[pivot_l..mid] + v[pivot_r..]` can be merged independently.
///
/// That holds if every element of `v[mid..pivot_r]` is less than `v[pivot_l]` and every element of
/// `v[pivot_r..]` is not less than any element of `v[..pivot_l]`.
///
/// Expects both runs to be trimmed, `v[0] > v[mid]` and `v[mid - 1] > v[len - 1]`, and at least 3
/// elements per side.
fn find_swap_bound<T, F>(v: &[T], mid: usize, is_less: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < FIND_SWAP_BOUND_OPTIMIZE_THRESHOLD {
        let anchor = cmp::min(mid + (len - mid) / 2 + 1, len - 1);
        let pivot_l = upper_bound(&v[..mid], &v[anchor], is_less);
        let pivot_r = anchor + lower_bound(&v[anchor..], &v[pivot_l], is_less);

        return (pivot_l, pivot_r);
    }

    // Larger merges search for the split that makes both exchanged blocks about the same length,
    // which keeps the two sub-merges balanced.
    let mut pivot_l = 0;
    let mut pivot_l_map = mid + lower_bound(&v[mid..], &v[pivot_l], is_less);

    if pivot_l_map - mid > (len - mid) / 2 || mid - pivot_l <= pivot_l_map - mid {
        return (pivot_l, pivot_l_map);
    }

    let mut pivot_r = lower_bound(&v[..mid], &v[len - 1], is_less);
    let mut pivot_r_map = mid + lower_bound(&v[mid..], &v[pivot_r], is_less);

    if mid - pivot_r > mid / 2 || mid - pivot_r >= pivot_r_map - mid {
        return (pivot_r, pivot_r_map);
    }

    loop {
        if pivot_r <= pivot_l {
            return (pivot_l, pivot_l_map);
        }

        let anchor = pivot_l + (pivot_r - pivot_l) / 2;
        let mut pivot_m = pivot_l + lower_bound(&v[pivot_l..pivot_r], &v[anchor], is_less);

        if pivot_m == pivot_l {
            pivot_m = pivot_l + upper_bound(&v[pivot_l..pivot_r], &v[pivot_m], is_less);

            if pivot_m == pivot_r {
                // v[pivot_l..pivot_r] are all equal, any split inside of it is valid.
                let diff = (mid - pivot_l) as isize - (pivot_l_map - mid) as isize;
                let split = pivot_l as isize + diff;
                if diff >= 0 && split <= pivot_r as isize {
                    return (split as usize, pivot_l_map);
                }

                let diff = (mid - pivot_r) as isize - (pivot_r_map - mid) as isize;
                let split_map = pivot_r_map as isize + diff;
                if pivot_l_map as isize <= split_map && split_map >= mid as isize {
                    return (pivot_r, split_map as usize);
                }

                return (pivot_l, pivot_l_map);
            }
        }

        if pivot_m <= pivot_l || pivot_m >= pivot_r {
            return (pivot_l, pivot_l_map);
        }

        let map_lo = pivot_l_map;
        let map_hi = cmp::max(pivot_r_map, map_lo);
        let pivot_m_map = map_lo + lower_bound(&v[map_lo..map_hi], &v[pivot_m], is_less);

        let diff = (mid - pivot_m) as isize - (pivot_m_map - mid) as isize;
        match diff.cmp(&0) {
            cmp::Ordering::Greater => {
                pivot_l = pivot_m;
                pivot_l_map = pivot_m_map;
            }
            cmp::Ordering::Less => {
                pivot_r = pivot_m;
                pivot_r_map = pivot_m_map;
            }
            cmp::Ordering::Equal => return (pivot_m, pivot_m_map),
        }
    }
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` using `buf` as temporary storage, and
/// stores the result into `v[..]`.
///
/// # Safety
///
/// `0 < mid < v.len()`, `buf` must hold `min(mid, v.len() - mid)` elements without overlapping
/// `v`, and `T` must not be zero-sized.
unsafe fn merge_with_hole<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let arr_ptr = v.as_mut_ptr();
    let (v_mid, v_end) = unsafe { (arr_ptr.add(mid), arr_ptr.add(len)) };

    // The merge process first copies the shorter run into `buf`. Then it traces the newly copied
    // run and the longer run forwards (or backwards), comparing their next unconsumed elements and
    // copying the lesser (or greater) one into `v`.
    //
    // As soon as the shorter run is fully consumed, the process is done. If the longer run gets
    // consumed first, then we must copy whatever is left of the shorter run into the remaining
    // hole in `v`.
    //
    // Intermediate state of the process is always tracked by `hole`, which serves two purposes:
    // 1. Protects integrity of `v` from panics in `is_less`.
    // 2. Fills the remaining hole in `v` if the longer run gets consumed first.
    let mut hole;

    if mid <= len - mid {
        // The left run is shorter.
        unsafe {
            ptr::copy_nonoverlapping(arr_ptr, buf, mid);
            hole = MergeHole {
                start: buf,
                end: buf.add(mid),
                dest: arr_ptr,
            };
        }

        // Initially, these pointers point to the beginnings of their arrays.
        let left = &mut hole.start;
        let mut right = v_mid;
        let out = &mut hole.dest;

        while *left < hole.end && right < v_end {
            // Consume the lesser side.
            // If equal, prefer the left run to maintain stability.
            unsafe {
                let to_copy = if is_less(&*right, &**left) {
                    get_and_increment(&mut right)
                } else {
                    get_and_increment(left)
                };
                ptr::copy_nonoverlapping(to_copy, get_and_increment(out), 1);
            }
        }
    } else {
        // The right run is shorter.
        unsafe {
            ptr::copy_nonoverlapping(v_mid, buf, len - mid);
            hole = MergeHole {
                start: buf,
                end: buf.add(len - mid),
                dest: v_mid,
            };
        }

        // Initially, these pointers point past the ends of their arrays.
        let left = &mut hole.dest;
        let right = &mut hole.end;
        let mut out = v_end;

        while arr_ptr < *left && buf < *right {
            // Consume the greater side.
            // If equal, prefer the right run to maintain stability.
            unsafe {
                let to_copy = if is_less(&*right.sub(1), &*left.sub(1)) {
                    decrement_and_get(left)
                } else {
                    decrement_and_get(right)
                };
                ptr::copy_nonoverlapping(to_copy, decrement_and_get(&mut out), 1);
            }
        }
    }
    // Finally, `hole` gets dropped. If the shorter run was not fully consumed, whatever remains of
    // it will now be copied into the hole in `v`.

    unsafe fn get_and_increment<T>(ptr: &mut *mut T) -> *mut T {
        let old = *ptr;
        *ptr = unsafe { ptr.add(1) };
        old
    }

    unsafe fn decrement_and_get<T>(ptr: &mut *mut T) -> *mut T {
        *ptr = unsafe { ptr.sub(1) };
        *ptr
    }

    // When dropped, copies the range `start..end` into `dest..`.
    struct MergeHole<T> {
        start: *mut T,
        end: *mut T,
        dest: *mut T,
    }

    impl<T> Drop for MergeHole<T> {
        fn drop(&mut self) {
            // `T` is not a zero-sized type, and these are pointers into a slice's elements.
            unsafe {
                let len = self.end.offset_from(self.start) as usize;
                ptr::copy_nonoverlapping(self.start, self.dest, len);
            }
        }
    }
}
