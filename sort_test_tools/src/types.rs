//! Element types with unusual size or comparison cost.

use std::cmp::Ordering;

const KILO_BYTE_WORDS: usize = 1024 / 8;

/// 1 KiB element, moving it is far more expensive than comparing it.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct OneKiloByte {
    words: [i64; KILO_BYTE_WORDS],
}

impl OneKiloByte {
    pub fn new(val: i32) -> Self {
        let mut words = [0i64; KILO_BYTE_WORDS];
        // Filled through `black_box` so the compiler can not reduce the element to its key.
        for (offset, word) in words.iter_mut().enumerate() {
            *word = std::hint::black_box(val as i64 + offset as i64);
        }
        Self { words }
    }

    // Reads words spread over the element, the whole value has to be in cache to compare it.
    fn key(&self) -> i64 {
        self.words[3] + self.words[64] + self.words[KILO_BYTE_WORDS - 1]
    }
}

impl PartialOrd for OneKiloByte {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OneKiloByte {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// 16 byte element without drop glue, comparing it involves two float divisions.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct F128 {
    num: f64,
    den: f64,
}

impl F128 {
    pub fn new(val: i32) -> Self {
        // Shifted into the positive range, `ln` then keeps the ratio monotonic in `val`.
        let shifted = val as f64 - i32::MIN as f64 + 16.0;
        let num = shifted + 0.25;
        let den = shifted.ln();

        debug_assert!(num.is_normal() && den.is_normal() && den < num);
        Self { num, den }
    }

    fn ratio(&self) -> f64 {
        self.num / self.den
    }
}

// `new` only produces normal floats.
impl Eq for F128 {}

impl PartialOrd for F128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F128 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ratio().total_cmp(&other.ratio())
    }
}
