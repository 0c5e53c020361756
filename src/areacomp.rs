//! The AreaComp compressor: greedy factorization of repeats found through
//! the suffix array.
//!
//! All LCP-intervals are scored once up front and drained from a priority
//! queue. Each popped candidate becomes a new rule if at least two of its
//! occurrences still fit into the rule regions created so far.

use crate::area::{Area, ScoredCandidate};
use crate::augmented::AugmentedText;
use crate::config::AreaCompConfig;
use crate::export::export;
use crate::grammar::Grammar;
use crate::id_gen::IdGenerator;
use crate::region::RegionIndex;
use ahash::AHashSet as HashSet;
use std::collections::BinaryHeap;
use tracing::{debug, trace};

/// A text-to-grammar compressor.
pub trait Compressor {
    /// Builds a grammar producing exactly `text`.
    fn compress(&self, text: &[u8]) -> Grammar;

    /// Identifies the algorithm and its settings, e.g. `AreaComp/LengthFirstArea`.
    fn name(&self) -> String;
}

/// Counters collected during one factorization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Candidates placed in the queue
    pub candidates: usize,
    /// Candidates turned into rules
    pub accepted: usize,
    /// Candidates left with fewer than two usable occurrences
    pub rejected_boundary: usize,
    /// Candidates whose occurrences all alias one existing region
    pub rejected_aliased: usize,
    /// Rules created, including the start rule. Rules used only once are
    /// inlined on export, so the grammar may hold fewer.
    pub rules: usize,
}

/// Grammar compressor driven by an [`Area`] scoring strategy.
///
/// # Example
///
/// ```
/// use areacomp_rs::{Area, AreaComp, Compressor};
///
/// let grammar = AreaComp::new(Area::LengthFirst).compress(b"abcabcabc");
/// assert!(grammar.verify("abcabcabc"));
/// assert!(grammar.size() < 9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaComp {
    config: AreaCompConfig,
}

impl AreaComp {
    pub fn new(area: Area) -> Self {
        Self::with_config(AreaCompConfig::new(area))
    }

    pub fn with_config(config: AreaCompConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AreaCompConfig {
        &self.config
    }

    /// Compresses `text`, also returning the run's counters.
    pub fn compress_with_stats(&self, text: &[u8]) -> (Grammar, CompressionStats) {
        let augmented = AugmentedText::new(text);
        self.run(&augmented)
    }

    /// Compresses `text` using a suffix array and LCP array computed elsewhere.
    ///
    /// Both arrays describe `text` followed by a sentinel smaller than every
    /// byte and are trusted as given.
    pub fn compress_with_arrays(
        &self,
        text: &[u8],
        suffix_array: Vec<usize>,
        lcp: Vec<usize>,
    ) -> Grammar {
        let augmented = AugmentedText::from_parts(text, suffix_array, lcp);
        self.run(&augmented).0
    }

    fn run(&self, text: &AugmentedText<'_>) -> (Grammar, CompressionStats) {
        let (index, stats) = self.factorize(text);
        (export(text.text(), &index), stats)
    }

    /// Runs the greedy loop and returns the resulting region overlay.
    pub(crate) fn factorize(&self, text: &AugmentedText<'_>) -> (RegionIndex, CompressionStats) {
        let mut factorizer = Factorizer::new(text.len());

        let mut queue: BinaryHeap<ScoredCandidate> = text
            .lcp_intervals(self.config.effective_min_l_value())
            .iter()
            .filter_map(|interval| self.config.area.score(text, interval))
            .collect();
        factorizer.stats.candidates = queue.len();

        while let Some(candidate) = queue.pop() {
            if candidate.pattern_length <= 1 {
                break;
            }
            factorizer.consider(text, candidate);
        }

        factorizer.stats.rules = factorizer.ids.allocated() as usize;
        debug!(
            area = %self.config.area,
            text_len = text.len(),
            candidates = factorizer.stats.candidates,
            accepted = factorizer.stats.accepted,
            rejected_boundary = factorizer.stats.rejected_boundary,
            rejected_aliased = factorizer.stats.rejected_aliased,
            "areacomp: factorization completed"
        );

        (factorizer.index, factorizer.stats)
    }
}

impl Compressor for AreaComp {
    fn compress(&self, text: &[u8]) -> Grammar {
        self.compress_with_stats(text).0
    }

    fn name(&self) -> String {
        format!("AreaComp/{}", self.config.area)
    }
}

/// Mutable state of one run.
struct Factorizer {
    index: RegionIndex,
    ids: IdGenerator,
    stats: CompressionStats,
    /// Reused buffer for the occurrences of the current candidate
    positions: Vec<usize>,
}

impl Factorizer {
    fn new(len: usize) -> Self {
        let mut ids = IdGenerator::new();
        let root = ids.get();
        Self {
            index: RegionIndex::new(root, len),
            ids,
            stats: CompressionStats::default(),
            positions: Vec::new(),
        }
    }

    fn consider(&mut self, text: &AugmentedText<'_>, candidate: ScoredCandidate) {
        let len = candidate.pattern_length;
        let mut positions = std::mem::take(&mut self.positions);
        positions.clear();
        positions.extend_from_slice(&text.suffix_array()[candidate.low..=candidate.high]);
        positions.sort_unstable();
        self.clean_positions(&mut positions, len);
        self.factorize_positions(&candidate, &positions);
        self.positions = positions;
    }

    /// Turns the cleaned occurrences into a new rule, unless there are too
    /// few of them or they only alias existing regions.
    fn factorize_positions(&mut self, candidate: &ScoredCandidate, positions: &[usize]) {
        let len = candidate.pattern_length;

        if positions.len() < 2 {
            self.stats.rejected_boundary += 1;
            trace!(
                low = candidate.low,
                high = candidate.high,
                len,
                "areacomp: too few occurrences fit the regions"
            );
            return;
        }

        if !self.differing_occurrences(positions) {
            self.stats.rejected_aliased += 1;
            trace!(
                low = candidate.low,
                high = candidate.high,
                len,
                "areacomp: occurrences alias one region"
            );
            return;
        }

        let rule_id = self.ids.get();
        for &position in positions {
            self.index.mark(rule_id, position, position + len - 1);
        }
        self.stats.accepted += 1;
        trace!(
            rule_id,
            len,
            occurrences = positions.len(),
            score = candidate.score,
            "areacomp: new rule"
        );
    }

    /// Keeps the sorted positions whose occurrence neither overlaps the
    /// previously kept one nor crosses a region boundary.
    fn clean_positions(&self, positions: &mut Vec<usize>, len: usize) {
        let mut next_free = 0;
        positions.retain(|&position| {
            if position >= next_free && self.substitution_allowed(position, position + len - 1) {
                next_free = position + len;
                true
            } else {
                false
            }
        });
    }

    /// Whether `[from, to]` is a run of consecutive symbols of one region.
    ///
    /// A position that starts a region may stand for the whole nested chain
    /// starting there, so `from` climbs while it starts the current interval.
    /// Likewise `to` climbs while it ends the current interval. The range is
    /// allowed when both climbs meet in the same interval. Ranges whose
    /// endpoints merely align with a nested region boundary can be rejected
    /// even though a factorization would exist.
    fn substitution_allowed(&self, from: usize, to: usize) -> bool {
        let index = &self.index;

        let mut from_key = index.deepest_containing(from, from);
        loop {
            let interval = index.interval(from_key);
            if from != interval.start || to <= interval.end {
                break;
            }
            match index.parent(from_key) {
                Some(parent) => from_key = parent,
                None => break,
            }
        }
        let from_interval = *index.interval(from_key);
        if to > from_interval.end {
            return false;
        }

        let mut to_key = index.deepest_containing(to, to);
        loop {
            let interval = index.interval(to_key);
            if interval.contains(&from_interval) || to != interval.end {
                break;
            }
            match index.parent(to_key) {
                Some(parent) => to_key = parent,
                None => break,
            }
        }

        from_key == to_key
    }

    /// Whether the occurrences are more than copies of one already
    /// factorized occurrence.
    ///
    /// Occurrences lying in different regions of the same rule only repeat
    /// what that rule already captures. The positions count as differing
    /// once one of them lies in a region of another rule, or two of them lie
    /// in the same region.
    fn differing_occurrences(&self, positions: &[usize]) -> bool {
        let Some((&first, rest)) = positions.split_first() else {
            return false;
        };

        let first_interval = self.index.deepest_containing_interval(first, first);
        let mut starts: HashSet<usize> = HashSet::default();
        starts.insert(first_interval.start);

        for &position in rest {
            let interval = self.index.deepest_containing_interval(position, position);
            if interval.rule_id != first_interval.rule_id || !starts.insert(interval.start) {
                return true;
            }
        }

        false
    }
}
