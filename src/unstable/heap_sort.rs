//! Binary max-heap sort. *O*(*n* \* log(*n*)) worst-case, no extra memory.

sort_impl!("heap_sort_unstable", heap_sort);

#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn heap_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    // Bottom-up construction, leaves are already valid heaps.
    for node in (0..len / 2).rev() {
        sift_down(v, node, is_less);
    }

    for end in (1..len).rev() {
        v.swap(0, end);
        sift_down(&mut v[..end], 0, is_less);
    }
}

/// Restores `parent >= child` below `node`, assuming both subtrees already are heaps.
fn sift_down<T, F>(heap: &mut [T], mut node: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = heap.len();

    loop {
        let mut child = 2 * node + 1;
        if child >= len {
            return;
        }

        if child + 1 < len && is_less(&heap[child], &heap[child + 1]) {
            child += 1;
        }

        if !is_less(&heap[node], &heap[child]) {
            return;
        }

        heap.swap(node, child);
        node = child;
    }
}
