//! Sorts that keep equal elements in their input order.

pub mod indirect_sort;
pub mod insertion_sort;
pub mod merge_sort;
pub mod merge_sort_buffer;
pub mod merge_sort_in_place;
pub mod tim_sort;
pub mod tim_sort_buffer;
