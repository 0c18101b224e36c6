use std::hash::Hash;

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Sequences shorter than this never have popular elements.
const AUTOJUNK_MIN_LEN: usize = 200;

/// `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Tuning for [`matching_blocks_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Leave elements that make up more than 1% of a long `b` (at least 200
    /// items) out of the match index. Whitespace and punctuation tokens then
    /// cannot seed a block, though a block still grows across them.
    pub autojunk: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { autojunk: true }
    }
}

/// Greedy longest-common-run matching with default options.
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchBlock> {
    matching_blocks_with(a, b, MatchOptions::default())
}

/// Greedy longest-common-run matching.
///
/// Finds the longest run of elements identical in both sequences (ties go to
/// the earliest start in `a`, then in `b`), then repeats on the region before
/// it and the region after it. Every step removes the matched run from both
/// regions, so the loop terminates. The result is sorted by position, holds no
/// empty blocks, and merges blocks that touch in both sequences.
///
/// This is an approximation: the blocks need not form a longest common
/// subsequence.
pub fn matching_blocks_with<T: Eq + Hash>(
    a: &[T],
    b: &[T],
    options: MatchOptions,
) -> Vec<MatchBlock> {
    let b2j = index_positions(b, options);
    let mut rows = RunRows::new(b.len());

    let mut blocks = Vec::new();
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let found = find_longest_match(a, b, &b2j, &mut rows, alo, ahi, blo, bhi);
        if found.size == 0 {
            continue;
        }
        if alo < found.a && blo < found.b {
            pending.push((alo, found.a, blo, found.b));
        }
        if found.a + found.size < ahi && found.b + found.size < bhi {
            pending.push((found.a + found.size, ahi, found.b + found.size, bhi));
        }
        blocks.push(found);
    }

    blocks.sort_by_key(|m| (m.a, m.b));
    merge_adjacent(blocks)
}

/// Ascending positions of each element of `b`, minus popular elements.
fn index_positions<T: Eq + Hash>(b: &[T], options: MatchOptions) -> FxHashMap<&T, Vec<usize>> {
    let mut b2j: FxHashMap<&T, Vec<usize>> = FxHashMap::default();
    for (j, item) in b.iter().enumerate() {
        b2j.entry(item).or_default().push(j);
    }

    if options.autojunk && b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        let popular: FxHashSet<&T> = b2j
            .iter()
            .filter(|(_, positions)| positions.len() > limit)
            .map(|(item, _)| *item)
            .collect();
        for item in popular {
            b2j.remove(item);
        }
    }
    b2j
}

/// Two DP rows over `b`, indexed by `j + 1`.
///
/// `prev[j + 1]` is the length of the run ending at `a[i - 1]` and `b[j]`.
/// Only written slots are cleared, so a row costs what the matches cost, not
/// the width of `b`. Both rows are all zero between calls.
struct RunRows {
    prev: Vec<usize>,
    cur: Vec<usize>,
    prev_touched: Vec<usize>,
    cur_touched: Vec<usize>,
}

impl RunRows {
    fn new(b_len: usize) -> Self {
        Self {
            prev: vec![0; b_len + 1],
            cur: vec![0; b_len + 1],
            prev_touched: Vec::new(),
            cur_touched: Vec::new(),
        }
    }

    fn set(&mut self, slot: usize, len: usize) {
        self.cur[slot] = len;
        self.cur_touched.push(slot);
    }

    /// Make the current row the previous one and start an empty current row.
    fn advance(&mut self) {
        for &slot in &self.prev_touched {
            self.prev[slot] = 0;
        }
        self.prev_touched.clear();
        std::mem::swap(&mut self.prev, &mut self.cur);
        std::mem::swap(&mut self.prev_touched, &mut self.cur_touched);
    }

    /// Clear the last row of a finished scan.
    fn reset(&mut self) {
        self.advance();
    }
}

#[allow(clippy::too_many_arguments)]
fn find_longest_match<T: Eq + Hash>(
    a: &[T],
    b: &[T],
    b2j: &FxHashMap<&T, Vec<usize>>,
    rows: &mut RunRows,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a: alo,
        b: blo,
        size: 0,
    };

    for (i, item) in a.iter().enumerate().take(ahi).skip(alo) {
        if let Some(positions) = b2j.get(item) {
            let start = positions.partition_point(|&j| j < blo);
            for &j in positions[start..].iter().take_while(|&&j| j < bhi) {
                // Slot `blo` is never written in this call, so runs stay inside the window.
                let k = rows.prev[j] + 1;
                rows.set(j + 1, k);
                if k > best.size {
                    best = MatchBlock {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        rows.advance();
    }
    rows.reset();

    // Grow across equal elements left out of the index.
    while best.a > alo && best.b > blo && a[best.a - 1] == b[best.b - 1] {
        best.a -= 1;
        best.b -= 1;
        best.size += 1;
    }
    while best.a + best.size < ahi
        && best.b + best.size < bhi
        && a[best.a + best.size] == b[best.b + best.size]
    {
        best.size += 1;
    }

    best
}

fn merge_adjacent(blocks: Vec<MatchBlock>) -> Vec<MatchBlock> {
    let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            if last.a + last.size == block.a && last.b + last.size == block.b {
                last.size += block.size;
                continue;
            }
        }
        merged.push(block);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn block(a: usize, b: usize, size: usize) -> MatchBlock {
        MatchBlock { a, b, size }
    }

    #[test]
    fn identical_sequences_form_one_block() {
        let a = chars("abcdef");
        assert_eq!(matching_blocks(&a, &a), vec![block(0, 0, 6)]);
    }

    #[test]
    fn disjoint_sequences_have_no_blocks() {
        assert!(matching_blocks(&chars("abc"), &chars("xyz")).is_empty());
    }

    #[test]
    fn empty_side_has_no_blocks() {
        assert!(matching_blocks(&chars(""), &chars("abc")).is_empty());
        assert!(matching_blocks(&chars("abc"), &chars("")).is_empty());
    }

    #[test]
    fn longest_run_is_found_first_then_sides() {
        // "bcd" is the longest run; "x" on the left and nothing on the right.
        let blocks = matching_blocks(&chars("xabcdq"), &chars("xzbcdy"));
        assert_eq!(blocks, vec![block(0, 0, 1), block(2, 2, 3)]);
    }

    #[test]
    fn ties_prefer_earliest_in_a_then_b() {
        // "ab" and "cd" are both length 2; "ab" starts first in a.
        let blocks = matching_blocks(&chars("abcd"), &chars("cdab"));
        assert_eq!(blocks, vec![block(0, 2, 2)]);

        // Same element twice in b: the earliest j wins.
        let blocks = matching_blocks(&chars("a"), &chars("aa"));
        assert_eq!(blocks, vec![block(0, 0, 1)]);
    }

    #[test]
    fn crossing_matches_are_not_both_taken() {
        // After matching "abc", "x" lies before it in a but after it in b.
        let blocks = matching_blocks(&chars("xabc"), &chars("abcx"));
        assert_eq!(blocks, vec![block(1, 0, 3)]);
    }

    #[test]
    fn blocks_are_sorted_and_valid() {
        let a = chars("the quick brown fox jumps over the lazy dog");
        let b = chars("a quick brown dog jumps over a lazy fox");
        let blocks = matching_blocks(&a, &b);
        for w in blocks.windows(2) {
            assert!(w[0].a + w[0].size <= w[1].a);
            assert!(w[0].b + w[0].size <= w[1].b);
        }
        for m in &blocks {
            assert!(m.size > 0);
            assert_eq!(a[m.a..m.a + m.size], b[m.b..m.b + m.size]);
        }
    }

    fn spaced_words(n: usize) -> Vec<String> {
        (0..n).flat_map(|i| [format!("v{i}"), " ".to_string()]).collect()
    }

    #[test]
    fn popular_elements_are_bridged_not_indexed() {
        // 300 items, " " is half of them: far above the 1% cut.
        let a = spaced_words(150);
        let mut b = a.clone();
        b[150] = "w75".to_string();

        let expected = vec![block(0, 0, 150), block(151, 151, 149)];
        assert_eq!(matching_blocks(&a, &b), expected);
        let exact = MatchOptions { autojunk: false };
        assert_eq!(matching_blocks_with(&a, &b, exact), expected);
        assert_eq!(matching_blocks(&a, &a), vec![block(0, 0, 300)]);
    }

    #[test]
    fn all_popular_sequence_still_matches() {
        let a = vec!["."; 250];
        assert_eq!(matching_blocks(&a, &a), vec![block(0, 0, 250)]);
    }

    #[test]
    fn short_sequences_keep_every_element() {
        // Below 200 items nothing is popular, even at 50% frequency.
        let a = chars("a.b.c.d.");
        let b = chars("a.b.x.d.");
        assert_eq!(
            matching_blocks(&a, &b),
            matching_blocks_with(&a, &b, MatchOptions { autojunk: false })
        );
        assert_eq!(matching_blocks(&a, &b), vec![block(0, 0, 4), block(5, 5, 3)]);
    }
}
