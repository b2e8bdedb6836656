//! Input generators for tests and benchmarks. Every generator returns `len` values of `i32`.
//!
//! Random generators draw from a seed that stays fixed for the whole process, see
//! [`random_init_seed`]. Set `OVERRIDE_SEED` to replay a failure.

use std::env;
use std::sync::Mutex;

use rand::prelude::*;
use rand::distributions::Uniform;

use zipf::ZipfDistribution;

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    let mut rng = seeded_rng();
    (0..len).map(|_| rng.gen()).collect()
}

/// Uniformly distributed values from `range`, for example `0..16` for many duplicates.
pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<Uniform<i32>>,
{
    let dist: Uniform<i32> = range.into();
    seeded_rng().sample_iter(dist).take(len).collect()
}

/// Zipf distributed ranks in `1..=len`, a few values dominate.
pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    let dist = ZipfDistribution::new(len, exponent).expect("zipf needs len > 0 and exponent > 0");
    seeded_rng()
        .sample_iter(dist)
        .take(len)
        .map(|rank: usize| rank as i32)
        .collect()
}

/// Random values whose first `sorted_percent` percent are already sorted, like new elements
/// appended to a sorted collection.
pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    let mut v = random(len);
    let sorted_len = ((len as f64) * sorted_percent / 100.0).round() as usize;
    v[..sorted_len.min(len)].sort_unstable();
    v
}

pub fn all_equal(len: usize) -> Vec<i32> {
    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    (0..len as i32).rev().collect()
}

/// `saw_count` ascending runs of random values.
pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    saws(len, fixed_run_len(len, saw_count), |_| Direction::Ascending)
}

/// `saw_count` descending runs of random values.
pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    saws(len, fixed_run_len(len, saw_count), |_| Direction::Descending)
}

/// `saw_count` runs of random values, each one ascending or descending at random.
pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    let run_len = fixed_run_len(len, saw_count);
    let directions = random_directions(len / run_len.start + 1);
    saws(len, run_len, |i| directions[i])
}

/// Runs of random direction with a random length from `run_lens`.
pub fn saw_mixed_range(len: usize, run_lens: std::ops::Range<usize>) -> Vec<i32> {
    let directions = random_directions(len / run_lens.start.max(1) + 1);
    saws(len, run_lens, |i| directions[i])
}

/// An ascending half followed by a descending one.
pub fn pipe_organ(len: usize) -> Vec<i32> {
    let mut v = random(len);
    let (front, back) = v.split_at_mut(len / 2);
    sort_run(front, Direction::Ascending);
    sort_run(back, Direction::Descending);
    v
}

pub fn xor_1(len: usize) -> Vec<i32> {
    //  . . . .
    // .:.:.:.:
    // Ascending pairs, each pair swapped.

    (0..len).map(|n| n as i32 ^ 1).collect()
}

pub fn rev_xor_1(len: usize) -> Vec<i32> {
    // . . . .
    // :.:.:.:.
    // Descending pairs, each pair swapped.

    (0..len).map(|n| (1_000_000_000 - n as i32) ^ 1).collect()
}

pub fn xor_31(len: usize) -> Vec<i32> {
    // Ascending blocks of 32, each block descending.

    (0..len).map(|n| n as i32 ^ 31).collect()
}

pub fn half_equal(len: usize) -> Vec<i32> {
    // Shuffled, every value appears twice.

    let period = std::cmp::max(len / 2, 1);
    shuffled((0..len).map(|n| (n % period) as i32).collect())
}

pub fn mod_32(len: usize) -> Vec<i32> {
    //    .:   .:   .:
    //  .:::  .:::  .:::
    // 32 distinct values, repeating ascending saws.

    (0..len).map(|n| (n % 32) as i32).collect()
}

pub fn mod_32_shuffled(len: usize) -> Vec<i32> {
    shuffled(mod_32(len))
}

pub fn mod_sqrt(len: usize) -> Vec<i32> {
    // Saws of length sqrt(len / 2).

    let period = std::cmp::max(((len / 2) as f64 + 0.5).sqrt() as usize, 1);
    (0..len).map(|n| (n % period) as i32).collect()
}

pub fn shell_adversary(len: usize) -> Vec<i32> {
    // Shuffled and then pre-sorted with the large gaps of a 3x+1 shell sort, which leaves
    // exactly the structure a shell sort with a different gap sequence handles worst.

    let mut v = shuffled((0..len as i32).collect());

    let mut gap = 1;
    while gap < len / 3 {
        gap = gap * 3 + 1;
    }

    while gap >= 10 {
        for i in gap..len {
            let mut j = i;
            while j >= gap && v[j] < v[j - gap] {
                v.swap(j, j - gap);
                j -= gap;
            }
        }
        gap /= 3;
    }

    v
}

pub fn heap_adversary(len: usize) -> Vec<i32> {
    // Shuffled, then arranged as a min-heap, then the first half again as a min-heap. Max-heap
    // based sorts have to sift nearly every element all the way down.

    let mut v = shuffled((0..len as i32).collect());
    make_min_heap(&mut v);
    make_min_heap(&mut v[..len / 2]);

    v
}

/// Makes every random generator draw from a fresh seed on each call, which benchmarks want. By
/// default all calls in a process share one seed.
///
/// Panics if `OVERRIDE_SEED` is set, the two contradict each other.
pub fn use_random_seed_each_time() {
    if let SeedMode::Override(_) = seed_mode() {
        panic!("use_random_seed_each_time conflicts with OVERRIDE_SEED");
    }

    *SEED_MODE.lock().unwrap() = Some(SeedMode::EachCall);
}

/// The seed the next random generator draws from.
pub fn random_init_seed() -> u64 {
    match seed_mode() {
        SeedMode::PerProcess(seed) | SeedMode::Override(seed) => seed,
        SeedMode::EachCall => thread_rng().gen(),
    }
}

// --- Private ---

#[derive(Copy, Clone)]
enum SeedMode {
    PerProcess(u64),
    Override(u64),
    EachCall,
}

static SEED_MODE: Mutex<Option<SeedMode>> = Mutex::new(None);

fn seed_mode() -> SeedMode {
    *SEED_MODE
        .lock()
        .unwrap()
        .get_or_insert_with(|| match env::var("OVERRIDE_SEED") {
            Ok(seed) => SeedMode::Override(seed.parse().expect("OVERRIDE_SEED is not a u64")),
            Err(_) => SeedMode::PerProcess(thread_rng().gen()),
        })
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

fn shuffled(mut v: Vec<i32>) -> Vec<i32> {
    v.shuffle(&mut seeded_rng());
    v
}

#[derive(Copy, Clone)]
enum Direction {
    Ascending,
    Descending,
}

fn sort_run(run: &mut [i32], direction: Direction) {
    match direction {
        Direction::Ascending => run.sort_unstable(),
        Direction::Descending => run.sort_unstable_by(|a, b| b.cmp(a)),
    }
}

fn random_directions(count: usize) -> Vec<Direction> {
    random_uniform(count, 0..=1)
        .into_iter()
        .map(|coin| {
            if coin == 0 {
                Direction::Ascending
            } else {
                Direction::Descending
            }
        })
        .collect()
}

// A range holding a single length, `saws` then cuts runs of exactly that length.
fn fixed_run_len(len: usize, saw_count: usize) -> std::ops::Range<usize> {
    let run_len = (len / saw_count.max(1)).max(1);
    run_len..run_len + 1
}

/// Random values cut into consecutive runs with lengths drawn from `run_lens`, run `i` sorted in
/// `direction(i)`.
fn saws(
    len: usize,
    run_lens: std::ops::Range<usize>,
    mut direction: impl FnMut(usize) -> Direction,
) -> Vec<i32> {
    let mut v = random(len);
    let run_count = len / run_lens.start.max(1) + 1;
    let lens = random_uniform(run_count, run_lens.start as i32..run_lens.end as i32);

    let mut start = 0;
    for (i, run_len) in lens.into_iter().enumerate() {
        if start >= len {
            break;
        }
        let end = (start + run_len as usize).min(len);
        sort_run(&mut v[start..end], direction(i));
        start = end;
    }

    v
}

fn make_min_heap(v: &mut [i32]) {
    let len = v.len();
    for start in (0..len / 2).rev() {
        let mut node = start;
        loop {
            let mut child = 2 * node + 1;
            if child >= len {
                break;
            }
            if child + 1 < len && v[child + 1] < v[child] {
                child += 1;
            }
            if v[node] <= v[child] {
                break;
            }
            v.swap(node, child);
            node = child;
        }
    }
}
