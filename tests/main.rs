use std::cmp::Ordering;

use sortlib::{MergePolicy, TimSortConfig};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

mod tim_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::tim_sort::SortImpl);
}

/// Runs the shared suite on `sort_by_with_config` with a fixed configuration.
macro_rules! instantiate_tim_sort_config_tests {
    ($mod_name:ident, $config:expr) => {
        mod $mod_name {
            use std::cmp::Ordering;

            use sortlib::{MergePolicy, TimSortConfig};

            const CONFIG: TimSortConfig = $config;

            pub struct SortImpl;

            impl sort_test_tools::Sort for SortImpl {
                fn name() -> String {
                    format!("tim_sort_{}", stringify!($mod_name))
                }

                fn sort<T>(arr: &mut [T])
                where
                    T: Ord,
                {
                    <Self as sort_test_tools::Sort>::sort_by(arr, T::cmp);
                }

                fn sort_by<T, F>(arr: &mut [T], compare: F)
                where
                    F: FnMut(&T, &T) -> Ordering,
                {
                    sortlib::stable::tim_sort::sort_by_with_config(arr, CONFIG, compare);
                }
            }

            sort_test_tools::instantiate_sort_tests!(SortImpl);
        }
    };
}

// Every merge runs without scratch memory under the classic invariants.
instantiate_tim_sort_config_tests!(
    classic_no_buffer,
    TimSortConfig {
        max_buffer: Some(0),
        policy: MergePolicy::Classic,
    }
);

// Most merges need more scratch than the cap and fall back to the bounded rotation merge.
instantiate_tim_sort_config_tests!(
    balanced_buffer_17,
    TimSortConfig {
        max_buffer: Some(17),
        policy: MergePolicy::Balanced,
    }
);

mod tim_sort_buffer {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::tim_sort_buffer::SortImpl);
}

mod merge_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::merge_sort::SortImpl);
}

mod merge_sort_buffer {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::merge_sort_buffer::SortImpl);
}

mod merge_sort_in_place {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::merge_sort_in_place::SortImpl);
}

mod insertion_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::insertion_sort::SortImpl);
}

mod indirect_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::stable::indirect_sort::SortImpl);
}

mod quick_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::unstable::quick_sort::SortImpl);
}

mod heap_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::unstable::heap_sort::SortImpl);
}

mod shell_sort {
    sort_test_tools::instantiate_sort_tests!(sortlib::unstable::shell_sort::SortImpl);
}

type SortFn = fn(&mut [i32]);

const ALL_SORTS: [(&str, SortFn); 10] = [
    ("tim_sort", sortlib::tim_sort as SortFn),
    ("tim_sort_buffer", sortlib::tim_sort_buffer as SortFn),
    ("merge_sort", sortlib::merge_sort as SortFn),
    ("merge_sort_buffer", sortlib::merge_sort_buffer as SortFn),
    ("merge_sort_in_place", sortlib::merge_sort_in_place as SortFn),
    ("insertion_sort", sortlib::insertion_sort as SortFn),
    ("indirect_sort", sortlib::indirect_sort as SortFn),
    ("quick_sort", sortlib::quick_sort as SortFn),
    ("heap_sort", sortlib::heap_sort as SortFn),
    ("shell_sort", sortlib::shell_sort as SortFn),
];

#[test]
fn default_sorts() {
    let mut v = [5, 1, 4, 1, 3];
    sortlib::sort(&mut v);
    assert_eq!(v, [1, 1, 3, 4, 5]);

    let mut v = [5, 1, 4, 1, 3];
    sortlib::sort_unstable(&mut v);
    assert_eq!(v, [1, 1, 3, 4, 5]);
}

#[test]
fn small_mixed_input() {
    init_logger();

    for (name, sort_fn) in ALL_SORTS {
        let mut v = [5, 3, 1, 4, 1, 5, 9, 2, 6];
        sort_fn(&mut v);
        assert_eq!(v, [1, 1, 2, 3, 4, 5, 5, 6, 9], "{name}");
    }
}

#[test]
fn descending_input() {
    init_logger();

    for (name, sort_fn) in ALL_SORTS {
        let mut v = [9, 8, 7, 6, 5, 4, 3, 2, 1];
        sort_fn(&mut v);
        assert_eq!(v, [1, 2, 3, 4, 5, 6, 7, 8, 9], "{name}");
    }
}

#[test]
fn equal_keys_keep_input_order() {
    init_logger();

    let input = [(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
    let expected = [(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')];

    let stable_sorts: [fn(&mut [(i32, char)], fn(&(i32, char), &(i32, char)) -> Ordering); 7] = [
        sortlib::tim_sort_by,
        sortlib::tim_sort_buffer_by,
        sortlib::merge_sort_by,
        sortlib::merge_sort_buffer_by,
        sortlib::merge_sort_in_place_by,
        sortlib::insertion_sort_by,
        sortlib::indirect_sort_by,
    ];

    for sort_fn in stable_sorts {
        let mut v = input;
        sort_fn(&mut v, |a, b| a.0.cmp(&b.0));
        assert_eq!(v, expected);
    }
}

#[test]
fn radix_small_keys() {
    let mut v = [300u32, 1, 42, 7, 256];
    sortlib::radix_sort(&mut v);
    assert_eq!(v, [1, 7, 42, 256, 300]);

    let mut v = [3i64, -1, i64::MIN, 0, i64::MAX, -300];
    sortlib::radix_sort(&mut v);
    assert_eq!(v, [i64::MIN, -300, -1, 0, 3, i64::MAX]);

    let mut v: [u8; 0] = [];
    sortlib::radix_sort(&mut v);
}

#[test]
fn radix_matches_comparison_sort() {
    let mut v: Vec<(i32, usize)> = sort_test_tools::patterns::random(20_000)
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key, i))
        .collect();
    let mut expected = v.clone();
    expected.sort_by_key(|elem| elem.0);

    sortlib::radix_sort_by_key(&mut v, |elem| elem.0);
    let keys: Vec<i32> = v.iter().map(|elem| elem.0).collect();
    let expected_keys: Vec<i32> = expected.iter().map(|elem| elem.0).collect();
    assert_eq!(keys, expected_keys);
}

#[test]
fn radix_comparator_orders_records_with_equal_keys() {
    let mut v: Vec<(u16, String)> = sort_test_tools::patterns::random_uniform(10_000, 0..300)
        .into_iter()
        .zip(sort_test_tools::patterns::random(10_000))
        .map(|(key, name)| (key as u16, name.to_string()))
        .collect();
    let mut expected = v.clone();
    expected.sort();

    sortlib::radix_sort_by_key_and(&mut v, |elem| elem.0, |a, b| a.cmp(b));
    assert_eq!(v, expected);
}

#[test]
fn tim_sort_configurations() {
    init_logger();

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

    for config in configs {
        for len in [0, 1, 2, 63, 64, 65, 1_000, 40_000] {
            let original: Vec<(i32, usize)> = sort_test_tools::patterns::random_uniform(len, 0..50)
                .into_iter()
                .enumerate()
                .map(|(i, key)| (key, i))
                .collect();

            let mut v = original.clone();
            sortlib::stable::tim_sort::sort_by_with_config(&mut v, config, |a, b| a.0.cmp(&b.0));

            // Ties are broken by the original index, a stable sort has to produce the fully
            // ordered sequence.
            let mut expected = original;
            expected.sort();
            assert_eq!(v, expected, "{config:?} len: {len}");
        }
    }
}

#[test]
fn sort_by_less_predicate() {
    let mut v = sort_test_tools::patterns::random(5_000);
    sortlib::sort_by_less(&mut v, |a, b| a > b);
    assert!(v.windows(2).all(|w| w[0] >= w[1]));

    let mut v = sort_test_tools::patterns::random(5_000);
    sortlib::sort_unstable_by_less(&mut v, |a, b| a > b);
    assert!(v.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn sort_by_key_descending() {
    let mut v: Vec<String> = sort_test_tools::patterns::random(2_000)
        .into_iter()
        .map(|x| x.to_string())
        .collect();
    sortlib::merge_sort_in_place_by_key(&mut v, |s| std::cmp::Reverse(s.len()));
    assert!(v.windows(2).all(|w| w[0].len() >= w[1].len()));
}
