//! Stable sort on top of the unstable quicksort.
//!
//! Sorts a vector of indices instead of the elements, breaking ties by index, and then applies the
//! resulting permutation in place. Elements are only moved in that final step, which makes this
//! useful for large elements with cheap comparisons. Needs `len` extra `usize`.

use crate::unstable::quick_sort::{default_rng, quick_sort};

sort_impl!("indirect_sort_stable", indirect_sort);

#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
fn indirect_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..len).collect();
    {
        let v = &*v;
        quick_sort(
            &mut order,
            &mut default_rng(),
            &mut |&a: &usize, &b: &usize| {
                is_less(&v[a], &v[b]) || (!is_less(&v[b], &v[a]) && a < b)
            },
        );
    }

    apply_permutation(v, &mut order);
}

/// Reorders `v` so that `v[i]` becomes the old `v[order[i]]`. Leaves `order` as the identity.
fn apply_permutation<T>(v: &mut [T], order: &mut [usize]) {
    debug_assert_eq!(v.len(), order.len());

    for start in 0..order.len() {
        if order[start] == start {
            continue;
        }

        // Walk the cycle through `start`, pulling every element into place.
        let mut current = start;
        loop {
            let source = order[current];
            order[current] = current;
            if source == start {
                break;
            }
            v.swap(current, source);
            current = source;
        }
    }
}
