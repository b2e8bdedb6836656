//! Shared test and benchmark support for the sorting crate.

/// Common interface of every sort implementation, used to instantiate the generic tests and
/// benchmarks once per algorithm.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

pub mod patterns;
pub mod types;
