//! Nested rule regions over the text.
//!
//! Every factorized occurrence of a rule owns a contiguous text range, a
//! [`RuleInterval`]. The intervals form a properly nested forest under the
//! root interval of the start rule: two intervals are either disjoint or one
//! contains the other. Intervals are bucketed by start index, each bucket
//! holding the chain of intervals that start there, shallowest first.

use slotmap::{new_key_type, SlotMap};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included};

new_key_type! {
    /// Handle to an interval stored in a [`RegionIndex`].
    pub struct IntervalKey;
}

/// A text range `[start, end]` (inclusive) owned by one occurrence of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleInterval {
    pub rule_id: u32,
    pub start: usize,
    pub end: usize,
    /// Number of enclosing intervals; the root has depth 0.
    pub depth: u32,
}

impl RuleInterval {
    pub fn new(rule_id: u32, start: usize, end: usize, depth: u32) -> Self {
        Self {
            rule_id,
            start,
            end,
            depth,
        }
    }

    /// Number of text symbols covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, other: &RuleInterval) -> bool {
        self.contains_range(other.start, other.end)
    }

    pub fn contains_range(&self, from: usize, to: usize) -> bool {
        self.start <= from && to <= self.end
    }
}

#[derive(Debug)]
struct IntervalNode {
    interval: RuleInterval,
    parent: Option<IntervalKey>,
}

/// The nested-interval overlay that partitions the text into rule regions.
#[derive(Debug)]
pub struct RegionIndex {
    nodes: SlotMap<IntervalKey, IntervalNode>,
    /// Start index -> intervals starting there, ordered by ascending depth
    starts: BTreeMap<usize, Vec<IntervalKey>>,
    root: Option<IntervalKey>,
    root_rule_id: u32,
    len: usize,
}

impl RegionIndex {
    /// Creates the overlay for a text of length `len`, covered entirely by
    /// the root rule.
    pub fn new(root_rule_id: u32, len: usize) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut starts = BTreeMap::new();

        let root = (len > 0).then(|| {
            let key = nodes.insert(IntervalNode {
                interval: RuleInterval::new(root_rule_id, 0, len - 1, 0),
                parent: None,
            });
            starts.insert(0, vec![key]);
            key
        });

        Self {
            nodes,
            starts,
            root,
            root_rule_id,
            len,
        }
    }

    /// Length of the covered text.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of intervals, including the root.
    pub fn interval_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root interval; `None` for an empty text.
    pub fn root(&self) -> Option<IntervalKey> {
        self.root
    }

    pub fn root_rule_id(&self) -> u32 {
        self.root_rule_id
    }

    pub fn interval(&self, key: IntervalKey) -> &RuleInterval {
        &self.nodes[key].interval
    }

    pub fn parent(&self, key: IntervalKey) -> Option<IntervalKey> {
        self.nodes[key].parent
    }

    /// The shallowest interval sharing `key`'s start index.
    pub fn first_at_start(&self, key: IntervalKey) -> IntervalKey {
        let start = self.nodes[key].interval.start;
        self.starts[&start][0]
    }

    /// Every interval, in no particular order.
    pub fn intervals(&self) -> impl Iterator<Item = &RuleInterval> + '_ {
        self.nodes.values().map(|node| &node.interval)
    }

    /// Start indices with their interval chains (shallowest first), in
    /// ascending order of start index.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[IntervalKey])> + '_ {
        self.starts.iter().map(|(&start, keys)| (start, keys.as_slice()))
    }

    /// Intervals starting exactly at `index`, shallowest first.
    pub fn intervals_at_start(&self, index: usize) -> Vec<RuleInterval> {
        self.check_index(index);
        self.starts
            .get(&index)
            .map(|keys| keys.iter().map(|&key| self.nodes[key].interval).collect())
            .unwrap_or_default()
    }

    /// The most deeply nested interval containing `[from, to]`.
    ///
    /// Starts at the deepest interval of the closest start index at or before
    /// `from` and climbs towards the root until the end covers `to`. Whole
    /// start buckets are skipped when their shallowest interval cannot cover
    /// `to` either.
    pub fn deepest_containing(&self, from: usize, to: usize) -> IntervalKey {
        self.check_range(from, to);

        let (_, bucket) = self
            .starts
            .range(..=from)
            .next_back()
            .expect("root interval starts at 0");
        let mut current = bucket[bucket.len() - 1];

        loop {
            if to <= self.nodes[current].interval.end {
                return current;
            }

            let first = self.first_at_start(current);
            let next = if to <= self.nodes[first].interval.end {
                self.nodes[current].parent
            } else {
                self.nodes[first].parent
            };
            current = next.expect("root interval contains every in-range index");
        }
    }

    /// Copy of the most deeply nested interval containing `[from, to]`.
    pub fn deepest_containing_interval(&self, from: usize, to: usize) -> RuleInterval {
        *self.interval(self.deepest_containing(from, to))
    }

    /// Rule id of the deepest interval containing `index`.
    pub fn deepest_rule_id_at(&self, index: usize) -> u32 {
        self.deepest_containing_interval(index, index).rule_id
    }

    /// Start index of the deepest interval containing `index`.
    pub fn interval_start_at(&self, index: usize) -> usize {
        self.deepest_containing_interval(index, index).start
    }

    /// Marks `[start, end]` as an occurrence of `rule_id`.
    ///
    /// The new interval becomes a child of the deepest interval containing it
    /// and adopts every existing interval it encloses. Panics when the range
    /// is out of bounds, duplicates an existing interval or partially
    /// overlaps one: those would break the forest.
    pub fn mark(&mut self, rule_id: u32, start: usize, end: usize) -> IntervalKey {
        self.check_range(start, end);

        let parent = self.deepest_containing(start, end);
        let parent_interval = self.nodes[parent].interval;
        assert!(
            parent_interval.start != start || parent_interval.end != end,
            "interval [{start}, {end}] of R{rule_id} duplicates R{}",
            parent_interval.rule_id
        );

        // Every interval between the deepest one holding `start` and the
        // parent must start exactly at `start`, otherwise it straddles it.
        let mut climb = self.deepest_containing(start, start);
        while climb != parent {
            let interval = &self.nodes[climb].interval;
            assert!(
                interval.start == start,
                "interval [{start}, {end}] of R{rule_id} straddles R{} [{}, {}]",
                interval.rule_id,
                interval.start,
                interval.end
            );
            climb = self.nodes[climb]
                .parent
                .expect("parent is an ancestor of every interval it contains");
        }

        let depth = parent_interval.depth + 1;
        let key = self.nodes.insert(IntervalNode {
            interval: RuleInterval::new(rule_id, start, end, depth),
            parent: Some(parent),
        });

        // Intervals starting strictly inside the new one are all enclosed.
        for (_, keys) in self.starts.range((Excluded(start), Included(end))) {
            let first = &mut self.nodes[keys[0]];
            assert!(
                first.interval.end <= end,
                "interval [{start}, {end}] of R{rule_id} straddles R{} [{}, {}]",
                first.interval.rule_id,
                first.interval.start,
                first.interval.end
            );
            if first.parent == Some(parent) {
                first.parent = Some(key);
            }
            for &enclosed in keys {
                self.nodes[enclosed].interval.depth += 1;
            }
        }

        let bucket = self.starts.entry(start).or_default();
        let position = bucket.partition_point(|&other| self.nodes[other].interval.depth < depth);
        if let Some(&next) = bucket.get(position) {
            let next_node = &mut self.nodes[next];
            if next_node.parent == Some(parent) {
                next_node.parent = Some(key);
            }
        }
        for &deeper in &bucket[position..] {
            self.nodes[deeper].interval.depth += 1;
        }
        bucket.insert(position, key);

        key
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index {index} out of range for length {}",
            self.len
        );
    }

    fn check_range(&self, from: usize, to: usize) {
        assert!(from <= to, "to ({to}) < from ({from})");
        self.check_index(to);
    }
}
