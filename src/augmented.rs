//! Text augmented with its suffix array, LCP array and child table.
//!
//! The child table follows Abouelhoda, Kurtz and Ohlebusch ("Replacing suffix
//! trees with enhanced suffix arrays"): `up`, `down` and `next_l_index` let the
//! LCP-interval tree be walked top-down without materialising it, and give the
//! l-value of any LCP-interval in constant time.

use crate::suffix::{rank_array, SuffixData};

/// An LCP-interval `[low, high]` of the suffix array.
///
/// Every suffix in the range shares a prefix of exactly `l_value` symbols,
/// and the range is maximal with that property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LcpInterval {
    pub low: usize,
    pub high: usize,
    pub l_value: usize,
}

impl LcpInterval {
    /// `high - low`; one less than the number of suffixes in the interval.
    pub fn width(&self) -> usize {
        self.high - self.low
    }

    /// Number of suffixes (pattern occurrences) in the interval.
    pub fn occurrences(&self) -> usize {
        self.high - self.low + 1
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ChildEntry {
    up: Option<usize>,
    down: Option<usize>,
    next_l_index: Option<usize>,
}

/// A text together with the arrays describing its sorted suffixes.
#[derive(Debug, Clone)]
pub struct AugmentedText<'a> {
    text: &'a [u8],
    suffix_array: Vec<usize>,
    inverse: Vec<usize>,
    lcp: Vec<usize>,
    /// One entry per suffix-array slot plus a virtual slot at `n + 1`.
    child_table: Vec<ChildEntry>,
}

impl<'a> AugmentedText<'a> {
    /// Sorts the suffixes of `text` and builds the child table.
    pub fn new(text: &'a [u8]) -> Self {
        let (suffix_array, lcp) = SuffixData::build(text).into_parts();
        Self::from_parts(text, suffix_array, lcp)
    }

    /// Wraps externally computed arrays for `text + sentinel`.
    ///
    /// The arrays are trusted: both must have length `text.len() + 1` and
    /// `lcp[0]` must be 0. Inconsistent arrays give meaningless intervals.
    pub fn from_parts(text: &'a [u8], suffix_array: Vec<usize>, mut lcp: Vec<usize>) -> Self {
        debug_assert_eq!(suffix_array.len(), text.len() + 1, "suffix array length");
        debug_assert_eq!(lcp.len(), text.len() + 1, "lcp array length");

        if let Some(first) = lcp.first_mut() {
            *first = 0;
        }

        let inverse = rank_array(&suffix_array);
        let child_table = child_table(&lcp);

        Self {
            text,
            suffix_array,
            inverse,
            lcp,
            child_table,
        }
    }

    /// Length of the text, without the sentinel.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    pub fn suffix_array(&self) -> &[usize] {
        &self.suffix_array
    }

    pub fn lcp(&self) -> &[usize] {
        &self.lcp
    }

    /// Text offset of the `i`-th smallest suffix.
    pub fn suffix_index(&self, i: usize) -> usize {
        self.suffix_array[i]
    }

    /// Suffix-array slot of the suffix starting at text offset `i`.
    pub fn suffix_array_index(&self, i: usize) -> usize {
        self.inverse[i]
    }

    fn up(&self, i: usize) -> Option<usize> {
        self.child_table.get(i).and_then(|entry| entry.up)
    }

    fn down(&self, i: usize) -> Option<usize> {
        self.child_table.get(i).and_then(|entry| entry.down)
    }

    fn next_l_index(&self, i: usize) -> Option<usize> {
        self.child_table.get(i).and_then(|entry| entry.next_l_index)
    }

    /// The first l-index of the LCP-interval `[low, high]`.
    fn first_l_index(&self, low: usize, high: usize) -> Option<usize> {
        match self.up(high + 1) {
            Some(up) if low < up && up <= high => Some(up),
            _ => self.down(low),
        }
    }

    /// The l-value of the LCP-interval `[low, high]`: the minimum of
    /// `lcp[low + 1..=high]`.
    ///
    /// Only meaningful for ranges that are LCP-intervals (as produced by
    /// [`lcp_intervals`](Self::lcp_intervals)); arbitrary ranges give
    /// arbitrary answers. The root interval is never passed here.
    pub fn l_value(&self, low: usize, high: usize) -> usize {
        if low >= high {
            return 0;
        }
        self.first_l_index(low, high).map_or(0, |index| self.lcp[index])
    }

    /// Minimum of the raw LCP range `lcp[low + 1..=high]`, for any range.
    pub fn min_lcp(&self, low: usize, high: usize) -> usize {
        if low >= high {
            return 0;
        }
        self.lcp[low + 1..=high].iter().copied().min().unwrap_or(0)
    }

    /// Text offsets of the suffixes in suffix-array slots `[low, high]`.
    pub fn positions(&self, interval: &LcpInterval) -> &[usize] {
        &self.suffix_array[interval.low..=interval.high]
    }

    /// Every non-root LCP-interval with an l-value of at least `min_l_value`.
    ///
    /// Intervals with an l-value below 2 are never returned. The walk is
    /// iterative, so deeply nested interval trees are fine.
    pub fn lcp_intervals(&self, min_l_value: usize) -> Vec<LcpInterval> {
        let min_l_value = min_l_value.max(2);
        let mut intervals = Vec::new();

        if self.suffix_array.len() < 2 {
            return intervals;
        }

        let mut stack = Vec::new();
        self.push_children(0, self.suffix_array.len() - 1, true, &mut stack);

        while let Some((low, high)) = stack.pop() {
            let l_value = self.l_value(low, high);
            if l_value >= min_l_value {
                intervals.push(LcpInterval {
                    low,
                    high,
                    l_value,
                });
            }
            self.push_children(low, high, false, &mut stack);
        }

        intervals
    }

    /// Pushes the non-singleton child intervals of `[low, high]`.
    fn push_children(
        &self,
        low: usize,
        high: usize,
        is_root: bool,
        stack: &mut Vec<(usize, usize)>,
    ) {
        let first = if is_root {
            self.next_l_index(0)
        } else {
            self.first_l_index(low, high)
        };

        let Some(mut current) = first else {
            return;
        };

        let mut child_low = low;
        loop {
            if current - 1 > child_low {
                stack.push((child_low, current - 1));
            }
            child_low = current;

            match self.next_l_index(current) {
                Some(next) if next <= high => current = next,
                _ => break,
            }
        }

        if high > child_low {
            stack.push((child_low, high));
        }
    }
}

/// Builds `up`/`down` (with a virtual trailing slot whose LCP is 0) and
/// `next_l_index`.
fn child_table(lcp: &[usize]) -> Vec<ChildEntry> {
    let len = lcp.len();
    let mut table = vec![ChildEntry::default(); len + 1];
    if len == 0 {
        return table;
    }

    let lcp_at = |i: usize| if i < len { lcp[i] } else { 0 };

    // up / down
    let mut stack = vec![0_usize];
    let mut last_index = None;
    for i in 1..=len {
        let current = lcp_at(i);
        while let Some(&top) = stack.last() {
            if current >= lcp[top] || stack.len() == 1 {
                break;
            }
            stack.pop();
            last_index = Some(top);

            let new_top = stack[stack.len() - 1];
            if current <= lcp[new_top] && lcp[new_top] != lcp[top] {
                table[new_top].down = Some(top);
            }
        }

        if let Some(last) = last_index.take() {
            table[i].up = Some(last);
        }
        if i < len {
            stack.push(i);
        }
    }

    // next_l_index
    stack.clear();
    stack.push(0);
    for (i, &current) in lcp.iter().enumerate().skip(1) {
        while let Some(&top) = stack.last() {
            if current >= lcp[top] || stack.len() == 1 {
                break;
            }
            stack.pop();
        }

        let top = stack[stack.len() - 1];
        if current == lcp[top] {
            stack.pop();
            table[top].next_l_index = Some(i);
        }
        stack.push(i);
    }

    table
}
