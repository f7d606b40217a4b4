//! Ranking of a finished count table

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of entries shown when no limit is given
pub const DEFAULT_TOP_N: usize = 10;

/// One ranked (word, count) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Count descending, then word ascending for equal counts
pub fn compare(a: &WordCount, b: &WordCount) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word))
}

/// Order every entry of `counts` and keep the first `top_n`
pub fn rank(counts: HashMap<String, u64>, top_n: usize) -> Vec<WordCount> {
    let mut entries: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount::new(word, count))
        .collect();

    if top_n < entries.len() {
        // Partition first so only the kept prefix needs a full sort
        entries.select_nth_unstable_by(top_n, compare);
        entries.truncate(top_n);
    }
    entries.sort_unstable_by(compare);
    entries
}
