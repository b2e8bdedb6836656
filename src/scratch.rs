//! Scoped scratch memory for the merge based sorts.

use std::mem::{self, MaybeUninit};

/// Size of the stack storage tried before falling back to a heap allocation.
pub(crate) const STACK_SCRATCH_BYTES: usize = 16384;

// Zero length array aligns the storage for `T`.
#[repr(C)]
struct AlignedStorage<T> {
    _align: [T; 0],
    storage: [MaybeUninit<u8>; STACK_SCRATCH_BYTES],
}

impl<T> AlignedStorage<T> {
    fn new() -> Self {
        Self {
            _align: [],
            storage: [MaybeUninit::uninit(); STACK_SCRATCH_BYTES],
        }
    }

    fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        let len = STACK_SCRATCH_BYTES / mem::size_of::<T>();

        // SAFETY: `_align` ensures we are correctly aligned, `len` elements of `T` fit into the
        // storage and uninitialized bytes are a valid `MaybeUninit<T>`.
        unsafe { std::slice::from_raw_parts_mut(self.storage.as_mut_ptr().cast(), len) }
    }
}

/// Returns `true` if `len` elements of `T` fit into the stack storage.
pub(crate) const fn fits_stack<T>(len: usize) -> bool {
    let size = mem::size_of::<T>();
    size == 0 || len <= STACK_SCRATCH_BYTES / size
}

/// Calls `f` with `capacity` uninitialized slots of `T`.
///
/// The slots live on the stack if they fit into [`STACK_SCRATCH_BYTES`], otherwise in a fresh heap
/// allocation. Either way they are released when `f` returns or unwinds. `f` must not leave live
/// values in the slots, they are never dropped.
pub(crate) fn with_scratch<T, R>(capacity: usize, f: impl FnOnce(&mut [MaybeUninit<T>]) -> R) -> R {
    if capacity == 0 || mem::size_of::<T>() == 0 {
        return f(&mut []);
    }

    if fits_stack::<T>(capacity) {
        log::trace!(
            "scratch: {capacity} x {} on the stack",
            std::any::type_name::<T>()
        );
        let mut stack_storage = AlignedStorage::<T>::new();
        return f(&mut stack_storage.as_uninit_slice_mut()[..capacity]);
    }

    log::trace!(
        "scratch: {capacity} x {} on the heap",
        std::any::type_name::<T>()
    );
    let mut heap_storage = Vec::<T>::with_capacity(capacity);
    f(&mut heap_storage.spare_capacity_mut()[..capacity])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_capacity_depends_on_element_size() {
        assert!(fits_stack::<u8>(STACK_SCRATCH_BYTES));
        assert!(!fits_stack::<u8>(STACK_SCRATCH_BYTES + 1));
        assert!(fits_stack::<u64>(STACK_SCRATCH_BYTES / 8));
        assert!(!fits_stack::<u64>(STACK_SCRATCH_BYTES / 8 + 1));
        assert!(fits_stack::<()>(usize::MAX));
    }

    #[test]
    fn provides_exact_capacity() {
        for capacity in [0, 1, 100, STACK_SCRATCH_BYTES / 8, STACK_SCRATCH_BYTES] {
            let len = with_scratch::<u64, _>(capacity, |scratch| scratch.len());
            assert_eq!(len, capacity);
        }

        assert_eq!(with_scratch::<(), _>(50, |scratch| scratch.len()), 0);
    }

    #[test]
    fn stack_scratch_is_aligned() {
        with_scratch::<u128, _>(16, |scratch| {
            assert_eq!(scratch.as_ptr() as usize % mem::align_of::<u128>(), 0);
        });
    }

    #[test]
    fn scratch_is_writable() {
        let sum = with_scratch::<u32, _>(10_000, |scratch| {
            for (i, slot) in scratch.iter_mut().enumerate() {
                slot.write(i as u32);
            }
            scratch
                .iter()
                .map(|slot| unsafe { slot.assume_init() } as u64)
                .sum::<u64>()
        });
        assert_eq!(sum, (0..10_000u64).sum());
    }
}
