//! In-place most significant digit radix sort over byte digits.
//!
//! Elements are distributed into 256 buckets by cyclic swaps (American flag sort), then every
//! bucket is sorted by the next lower byte. Short buckets are finished by insertion sort, buckets
//! whose bytes are exhausted by quicksort when a comparator refines the key order.

use std::cmp::Ordering;

use crate::insertion::q_insertion_sort;
use crate::unstable::quick_sort::{default_rng, quick_sort};

const RADIX_INSERTION_SORT_THRESHOLD: usize = 40;
const BUCKETS: usize = 256;

/// Keys that map to an unsigned integer with the same order.
pub trait RadixKey: Copy {
    fn to_radix(self) -> u64;
}

macro_rules! impl_radix_key_unsigned {
    ($($t:ty),*) => {
        $(
            impl RadixKey for $t {
                #[inline]
                fn to_radix(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

// Flipping the sign bit moves negative values below the positive ones.
macro_rules! impl_radix_key_signed {
    ($($t:ty => $u:ty),*) => {
        $(
            impl RadixKey for $t {
                #[inline]
                fn to_radix(self) -> u64 {
                    (self as $u ^ (1 << (<$u>::BITS - 1))) as u64
                }
            }
        )*
    };
}

impl_radix_key_unsigned!(u8, u16, u32, u64, usize, bool, char);
impl_radix_key_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, isize => usize);

/// Sorts `v` by the keys themselves.
pub fn radix_sort<K>(v: &mut [K])
where
    K: RadixKey,
{
    radix_sort_by_key(v, |&key| key);
}

/// Sorts `v` by the key `f` extracts. The key is computed several times per element, `f` must
/// return the same key every time.
///
/// Elements with equal keys end up in unspecified order.
pub fn radix_sort_by_key<T, K, F>(v: &mut [T], f: F)
where
    K: RadixKey,
    F: FnMut(&T) -> K,
{
    radix_sort_impl::<T, K, F, fn(&T, &T) -> bool>(v, f, None);
}

/// Sorts `v` by the key `f` extracts and orders short buckets and elements with equal keys with
/// `compare`.
///
/// `compare` must agree with the key order: whenever `f(a) < f(b)` it has to return
/// [`Ordering::Less`]. It refines the order of elements whose keys are equal.
pub fn radix_sort_by_key_and<T, K, F, C>(v: &mut [T], f: F, mut compare: C)
where
    K: RadixKey,
    F: FnMut(&T) -> K,
    C: FnMut(&T, &T) -> Ordering,
{
    radix_sort_impl(
        v,
        f,
        Some(&mut |a: &T, b: &T| compare(a, b) == Ordering::Less),
    );
}

fn radix_sort_impl<T, K, F, C>(v: &mut [T], mut f: F, is_less: Option<&mut C>)
where
    K: RadixKey,
    F: FnMut(&T) -> K,
    C: FnMut(&T, &T) -> bool,
{
    if v.len() < 2 {
        return;
    }

    let mut radix = |elem: &T| f(elem).to_radix();

    let max_key = v.iter().map(&mut radix).max().unwrap_or(0);
    let offset = max_offset(max_key);

    msd_radix_sort(v, offset, &mut radix, is_less);
}

/// Shift of the most significant non-zero byte of `key`.
fn max_offset(mut key: u64) -> u32 {
    let mut offset = 0;
    while key >= BUCKETS as u64 {
        key >>= 8;
        offset += 8;
    }
    offset
}

/// Sorts `v` by the bytes of the radix at `offset` and below.
///
/// Without `is_less` short buckets compare whole radix keys and buckets at offset zero are left
/// as they are, all of their keys are equal. With it both get sorted by `is_less`.
fn msd_radix_sort<T, R, C>(
    v: &mut [T],
    mut offset: u32,
    radix: &mut R,
    mut is_less: Option<&mut C>,
) where
    R: FnMut(&T) -> u64,
    C: FnMut(&T, &T) -> bool,
{
    loop {
        let len = v.len();
        if len < RADIX_INSERTION_SORT_THRESHOLD {
            match is_less {
                Some(is_less) => q_insertion_sort(v, is_less),
                None => q_insertion_sort(v, &mut |a: &T, b: &T| radix(a) < radix(b)),
            }
            return;
        }

        let mut digit = |elem: &T| ((radix(elem) >> offset) & 0xff) as usize;

        let mut counts = [0usize; BUCKETS];
        for elem in v.iter() {
            counts[digit(elem)] += 1;
        }

        let mut bucket_ends = [0usize; BUCKETS];
        let mut sum = 0;
        for (end, count) in bucket_ends.iter_mut().zip(counts) {
            sum += count;
            *end = sum;
        }

        let non_empty = counts.iter().filter(|&&count| count > 0).count();
        if non_empty > 1 {
            distribute(v, &bucket_ends, &mut digit);

            let mut start = 0;
            for end in bucket_ends {
                if end - start > 1 {
                    let bucket = &mut v[start..end];
                    if offset == 0 {
                        sort_equal_keys(bucket, is_less.as_deref_mut());
                    } else {
                        msd_radix_sort(bucket, offset - 8, radix, is_less.as_deref_mut());
                    }
                }
                start = end;
            }
            return;
        }

        // Everything shares this digit.
        if offset == 0 {
            sort_equal_keys(v, is_less);
            return;
        }
        offset -= 8;
    }
}

// The radix has no bytes left to tell these elements apart.
fn sort_equal_keys<T, C>(v: &mut [T], is_less: Option<&mut C>)
where
    C: FnMut(&T, &T) -> bool,
{
    if let Some(is_less) = is_less {
        quick_sort(v, &mut default_rng(), is_less);
    }
}

/// Moves every element into its bucket with cyclic swaps. Bucket `b` ends up in
/// `v[bucket_ends[b - 1]..bucket_ends[b]]`.
fn distribute<T, F>(v: &mut [T], bucket_ends: &[usize; BUCKETS], digit: &mut F)
where
    F: FnMut(&T) -> usize,
{
    let mut next = [0usize; BUCKETS];
    next[1..].copy_from_slice(&bucket_ends[..BUCKETS - 1]);

    for bucket in 0..BUCKETS {
        while next[bucket] < bucket_ends[bucket] {
            let target = digit(&v[next[bucket]]);
            if target == bucket {
                next[bucket] += 1;
            } else {
                // Buckets below `bucket` are complete, so `target` is a later one.
                v.swap(next[bucket], next[target]);
                next[target] += 1;
            }
        }
    }
}
