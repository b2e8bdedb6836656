//! Sorts that may reorder equal elements.

pub mod heap_sort;
pub mod quick_sort;
pub mod radix_sort;
pub mod shell_sort;
