//! Area functions: how promising an LCP-interval is as the next rule.
//!
//! Every strategy reads the pattern length off the interval's l-value and
//! scores 0 when the pattern is too short to be worth a rule.

use crate::augmented::{AugmentedText, LcpInterval};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Added to the width by [`Area::WidthFirst`].
const WIDTH_BONUS: u64 = 9;

/// Upper bound of the width term of [`Area::HeightAdvantage`].
const MAX_WIDTH_ADVANTAGE: u64 = 9;

/// Scoring strategy used to prioritise LCP-intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Area {
    /// Longest pattern first.
    #[default]
    LengthFirst,
    /// Most frequent pattern first.
    WidthFirst,
    /// Pattern length times width, with the length taken from the raw LCP range.
    Naive,
    /// Squared length plus the number of non-overlapping occurrences.
    DepthWithAdd,
    /// Symbols saved by replacing every occurrence.
    PotentialCompression,
    /// Length first, ties broken by the logarithm of the width.
    HeightAdvantage,
}

impl Area {
    pub const ALL: [Area; 6] = [
        Area::LengthFirst,
        Area::WidthFirst,
        Area::Naive,
        Area::DepthWithAdd,
        Area::PotentialCompression,
        Area::HeightAdvantage,
    ];

    /// Scores an LCP-interval.
    ///
    /// Returns `None` when the represented pattern is shorter than 2 symbols
    /// or the strategy sees nothing to gain.
    pub fn score(
        &self,
        text: &AugmentedText<'_>,
        interval: &LcpInterval,
    ) -> Option<ScoredCandidate> {
        let len = match self {
            Area::Naive => text.min_lcp(interval.low, interval.high),
            _ => text.l_value(interval.low, interval.high),
        };
        if len <= 1 {
            return None;
        }

        let width = interval.width() as u64;
        let pattern = len as u64;

        let score = match self {
            Area::LengthFirst => pattern,
            Area::WidthFirst => width + WIDTH_BONUS,
            Area::Naive => pattern * width,
            Area::DepthWithAdd => {
                let mut positions = text.positions(interval).to_vec();
                positions.sort_unstable();
                let occurrences = non_overlapping_count(&positions, len);
                if occurrences <= 1 {
                    return None;
                }
                pattern * pattern + occurrences as u64
            }
            Area::PotentialCompression => (pattern - 1) * (width + 1),
            Area::HeightAdvantage => {
                let advantage = (width.max(1) as f64).ln() as u64;
                10 * pattern + advantage.min(MAX_WIDTH_ADVANTAGE)
            }
        };

        if score == 0 {
            return None;
        }

        Some(ScoredCandidate {
            low: interval.low,
            high: interval.high,
            score,
            pattern_length: len,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Area::LengthFirst => "LengthFirstArea",
            Area::WidthFirst => "WidthFirstArea",
            Area::Naive => "NaiveArea",
            Area::DepthWithAdd => "DepthWithAddArea",
            Area::PotentialCompression => "PotentialCompressionArea",
            Area::HeightAdvantage => "HeightAdvantageArea",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of occurrences left after greedily skipping every one that
/// overlaps the previously counted one.
///
/// `positions` must be sorted.
fn non_overlapping_count(positions: &[usize], len: usize) -> usize {
    let mut next_free = 0;
    positions
        .iter()
        .filter(|&&position| {
            if position >= next_free {
                next_free = position + len;
                true
            } else {
                false
            }
        })
        .count()
}

/// An LCP-interval together with its priority.
///
/// The occurrences are not stored; they are read off the suffix array in
/// `[low, high]` when the candidate is taken from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate {
    /// Suffix-array bounds of the interval (inclusive)
    pub low: usize,
    pub high: usize,
    pub score: u64,
    pub pattern_length: usize,
}

impl Ord for ScoredCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score first, then longer pattern, then lower interval
        self.score
            .cmp(&other.score)
            .then_with(|| self.pattern_length.cmp(&other.pattern_length))
            .then_with(|| other.low.cmp(&self.low))
            .then_with(|| other.high.cmp(&self.high))
    }
}

impl PartialOrd for ScoredCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn interval_for(text: &AugmentedText<'_>, l_value: usize) -> LcpInterval {
        text.lcp_intervals(2)
            .into_iter()
            .find(|interval| interval.l_value == l_value)
            .expect("interval with requested l-value")
    }

    #[test]
    fn test_length_first() {
        let text = AugmentedText::new(b"abcabcabc");
        let interval = interval_for(&text, 6);
        let candidate = Area::LengthFirst.score(&text, &interval).unwrap();
        assert_eq!(candidate.score, 6);
        assert_eq!(candidate.pattern_length, 6);
        let mut positions = text.positions(&interval).to_vec();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 3]);
    }

    #[test]
    fn test_width_based_scores() {
        let text = AugmentedText::new(b"abcabcabc");
        // "abc" occurs three times: width 2
        let interval = interval_for(&text, 3);
        assert_eq!(interval.width(), 2);

        let score = |area: Area| area.score(&text, &interval).unwrap().score;
        assert_eq!(score(Area::WidthFirst), 11);
        assert_eq!(score(Area::Naive), 6);
        assert_eq!(score(Area::PotentialCompression), 6);
        assert_eq!(score(Area::HeightAdvantage), 30);
    }

    #[test]
    fn test_depth_with_add_filters_overlaps() {
        let text = AugmentedText::new(b"aaaa");
        let interval = interval_for(&text, 2);
        // "aa" at 0, 1 and 2 leaves 0 and 2
        let candidate = Area::DepthWithAdd.score(&text, &interval).unwrap();
        assert_eq!(candidate.score, 4 + 2);

        // "aaa" at 0 and 1 overlap, leaving a single occurrence
        let interval = interval_for(&text, 3);
        assert_eq!(Area::DepthWithAdd.score(&text, &interval), None);
    }

    #[test]
    fn test_short_patterns_score_nothing() {
        let text = AugmentedText::new(b"abab");
        let interval = LcpInterval {
            low: 0,
            high: 0,
            l_value: 0,
        };
        for area in Area::ALL {
            assert_eq!(area.score(&text, &interval), None, "{}", area);
        }
    }

    #[test]
    fn test_non_overlapping_count() {
        assert_eq!(non_overlapping_count(&[0, 1, 2, 3, 4, 7], 2), 4);
        assert_eq!(non_overlapping_count(&[0, 1, 2], 3), 1);
        assert_eq!(non_overlapping_count(&[], 2), 0);
    }

    #[test]
    fn test_heap_order() {
        let candidate = |score, pattern_length, low| ScoredCandidate {
            low,
            high: low + 1,
            score,
            pattern_length,
        };
        let mut heap = BinaryHeap::new();
        heap.push(candidate(3, 3, 5));
        heap.push(candidate(5, 2, 9));
        heap.push(candidate(3, 4, 1));
        heap.push(candidate(3, 3, 2));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|c| (c.score, c.pattern_length, c.low))
            .collect();
        assert_eq!(order, vec![(5, 2, 9), (3, 4, 1), (3, 3, 2), (3, 3, 5)]);
    }

    #[test]
    fn test_serde_names() {
        let area: Area = serde_json::from_str("\"potential-compression\"").unwrap();
        assert_eq!(area, Area::PotentialCompression);
        assert_eq!(serde_json::to_string(&Area::LengthFirst).unwrap(), "\"length-first\"");
    }
}
