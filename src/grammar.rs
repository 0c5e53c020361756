//! The exported grammar: a start rule plus one symbol list per rule.

use crate::error::{GrammarError, Result};
use crate::symbol::Symbol;
use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A straight-line grammar producing exactly one text.
///
/// Every grammar value is valid: the start rule exists, every referenced
/// rule exists and no rule (transitively) references itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrammar")]
pub struct Grammar {
    start: u32,
    rules: BTreeMap<u32, Vec<Symbol>>,
}

#[derive(Deserialize)]
struct RawGrammar {
    start: u32,
    rules: BTreeMap<u32, Vec<Symbol>>,
}

impl TryFrom<RawGrammar> for Grammar {
    type Error = GrammarError;

    fn try_from(raw: RawGrammar) -> Result<Self> {
        Grammar::from_rules(raw.start, raw.rules)
    }
}

impl Grammar {
    /// Validates and wraps an externally built rule set.
    pub fn from_rules(start: u32, rules: BTreeMap<u32, Vec<Symbol>>) -> Result<Self> {
        if !rules.contains_key(&start) {
            return Err(GrammarError::MissingStartRule(start));
        }

        let grammar = Self { start, rules };
        grammar.post_order()?;
        Ok(grammar)
    }

    /// Wraps rules produced by the exporter, which are valid by construction.
    pub(crate) fn from_exported(start: u32, rules: BTreeMap<u32, Vec<Symbol>>) -> Self {
        let grammar = Self { start, rules };
        debug_assert!(grammar.post_order().is_ok(), "exported grammar is invalid");
        grammar
    }

    pub fn start_rule(&self) -> u32 {
        self.start
    }

    pub fn rules(&self) -> &BTreeMap<u32, Vec<Symbol>> {
        &self.rules
    }

    /// The right-hand side of a rule.
    pub fn rule(&self, id: u32) -> Option<&[Symbol]> {
        self.rules.get(&id).map(Vec::as_slice)
    }

    /// Number of rules, including the start rule.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Total number of symbols over all right-hand sides.
    pub fn size(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Reconstructs the text.
    pub fn expand(&self) -> Vec<u8> {
        self.iter().collect()
    }

    /// Whether the grammar produces exactly `reference`.
    pub fn verify(&self, reference: impl AsRef<[u8]>) -> bool {
        self.iter().eq(reference.as_ref().iter().copied())
    }

    /// Mean right-hand side length.
    pub fn average_rule_length(&self) -> f64 {
        self.size() as f64 / self.rule_count() as f64
    }

    /// How often each rule is referenced from other right-hand sides.
    ///
    /// The start rule is always present, usually with a count of 0.
    pub fn usage_counts(&self) -> HashMap<u32, usize> {
        let mut counts: HashMap<u32, usize> = HashMap::default();
        counts.insert(self.start, 0);
        for id in self.rules.values().flatten().filter_map(Symbol::rule_id) {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }

    /// Height of the derivation tree of the start rule.
    ///
    /// A rule made of literals only has depth 1.
    pub fn depth(&self) -> usize {
        let order = self
            .post_order()
            .expect("grammar values are always acyclic");

        let mut depths: HashMap<u32, usize> = HashMap::default();
        for id in order {
            let depth = 1 + self.rules[&id]
                .iter()
                .filter_map(Symbol::rule_id)
                .map(|child| depths[&child])
                .max()
                .unwrap_or(0);
            depths.insert(id, depth);
        }
        depths[&self.start]
    }

    /// Summary figures for this grammar.
    pub fn stats(&self) -> GrammarStats {
        GrammarStats {
            input_length: self.expanded_len(),
            grammar_symbols: self.size(),
            num_rules: self.rule_count(),
            depth: self.depth(),
        }
    }

    /// Length of the text without expanding it.
    fn expanded_len(&self) -> usize {
        let order = self
            .post_order()
            .expect("grammar values are always acyclic");

        let mut lengths: HashMap<u32, usize> = HashMap::default();
        for id in order {
            let len = self.rules[&id]
                .iter()
                .map(|symbol| match symbol {
                    Symbol::Literal(_) => 1,
                    Symbol::Rule(child) => lengths[child],
                })
                .sum();
            lengths.insert(id, len);
        }
        lengths[&self.start]
    }

    /// Every rule id, children before the rules referencing them.
    ///
    /// Fails when a reference is dangling or rules form a cycle. Iterative,
    /// so deep grammars do not exhaust the call stack.
    fn post_order(&self) -> Result<Vec<u32>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            InProgress,
            Done,
        }

        let mut marks: HashMap<u32, Mark> = HashMap::default();
        let mut order = Vec::with_capacity(self.rules.len());

        for &root in self.rules.keys() {
            if marks.contains_key(&root) {
                continue;
            }

            marks.insert(root, Mark::InProgress);
            let mut stack = vec![(root, 0_usize)];

            while let Some(frame) = stack.last_mut() {
                let id = frame.0;
                let Some(symbol) = self.rules[&id].get(frame.1) else {
                    marks.insert(id, Mark::Done);
                    order.push(id);
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                let Symbol::Rule(child) = *symbol else {
                    continue;
                };
                if !self.rules.contains_key(&child) {
                    return Err(GrammarError::UnknownRule {
                        rule: id,
                        missing: child,
                    });
                }
                match marks.get(&child) {
                    Some(Mark::Done) => {}
                    Some(Mark::InProgress) => return Err(GrammarError::CyclicRule(child)),
                    None => {
                        marks.insert(child, Mark::InProgress);
                        stack.push((child, 0));
                    }
                }
            }
        }

        Ok(order)
    }
}

impl fmt::Display for Grammar {
    /// One line per rule: usage count, then `R<id> -> symbols`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let usage = self.usage_counts();
        writeln!(f, "Top level rule id: {}", self.start)?;
        for (id, symbols) in &self.rules {
            write!(f, " {:<4}R{id} ->", usage.get(id).copied().unwrap_or(0))?;
            for symbol in symbols {
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Statistics about a grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrammarStats {
    /// Length of the produced text
    pub input_length: usize,
    /// Total symbols in the grammar
    pub grammar_symbols: usize,
    /// Number of rules, including the start rule
    pub num_rules: usize,
    /// Height of the derivation tree
    pub depth: usize,
}

impl GrammarStats {
    /// Returns the compression ratio as a percentage.
    ///
    /// Lower is better. 100% means no compression.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_length == 0 {
            0.0
        } else {
            (self.grammar_symbols as f64 / self.input_length as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol::{Literal, Rule};

    fn rules(entries: Vec<(u32, Vec<Symbol>)>) -> BTreeMap<u32, Vec<Symbol>> {
        entries.into_iter().collect()
    }

    fn sample() -> Grammar {
        Grammar::from_rules(
            0,
            rules(vec![
                (0, vec![Rule(1), Literal(b' '), Rule(1)]),
                (1, vec![Rule(2), Rule(2), Literal(b'c')]),
                (2, vec![Literal(b'a'), Literal(b'b')]),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_expand_and_verify() {
        let g = sample();
        assert_eq!(g.expand(), b"ababc ababc");
        assert!(g.verify("ababc ababc"));
        assert!(!g.verify("ababc ababd"));
        assert!(!g.verify("ababc"));
    }

    #[test]
    fn test_size_and_counts() {
        let g = sample();
        assert_eq!(g.size(), 8);
        assert_eq!(g.rule_count(), 3);
        assert!((g.average_rule_length() - 8.0 / 3.0).abs() < 1e-9);

        let usage = g.usage_counts();
        assert_eq!(usage[&0], 0);
        assert_eq!(usage[&1], 2);
        assert_eq!(usage[&2], 2);
    }

    #[test]
    fn test_depth_and_stats() {
        let g = sample();
        assert_eq!(g.depth(), 3);

        let stats = g.stats();
        assert_eq!(stats.input_length, 11);
        assert_eq!(stats.grammar_symbols, 8);
        assert_eq!(stats.num_rules, 3);
        assert!(stats.compression_ratio() < 100.0);
    }

    #[test]
    fn test_empty_start_rule() {
        let g = Grammar::from_rules(0, rules(vec![(0, vec![])])).unwrap();
        assert_eq!(g.expand(), b"");
        assert!(g.verify(""));
        assert_eq!(g.size(), 0);
        assert_eq!(g.depth(), 1);
        assert_eq!(g.stats().compression_ratio(), 0.0);
    }

    #[test]
    fn test_missing_start_rule() {
        let err = Grammar::from_rules(3, rules(vec![(0, vec![])])).unwrap_err();
        assert_eq!(err, GrammarError::MissingStartRule(3));
    }

    #[test]
    fn test_unknown_rule() {
        let err = Grammar::from_rules(0, rules(vec![(0, vec![Literal(b'a'), Rule(7)])]))
            .unwrap_err();
        assert_eq!(err, GrammarError::UnknownRule { rule: 0, missing: 7 });
    }

    #[test]
    fn test_cycle_detected() {
        let err = Grammar::from_rules(
            0,
            rules(vec![
                (0, vec![Rule(1)]),
                (1, vec![Literal(b'a'), Rule(2)]),
                (2, vec![Rule(1)]),
            ]),
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::CyclicRule(1));
        assert_eq!(err.to_string(), "rule R1 references itself");
    }

    #[test]
    fn test_self_reference_detected() {
        let err = Grammar::from_rules(0, rules(vec![(0, vec![Rule(0)])])).unwrap_err();
        assert_eq!(err, GrammarError::CyclicRule(0));
    }

    #[test]
    fn test_display() {
        let g = sample();
        let listing = g.to_string();
        assert_eq!(
            listing,
            "Top level rule id: 0\n 0   R0 -> R1 _ R1\n 2   R1 -> R2 R2 c\n 2   R2 -> a b\n"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let g = sample();
        let json = serde_json::to_string(&g).unwrap();
        let back: Grammar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let json = r#"{"start":0,"rules":{"0":[{"Rule":1}]}}"#;
        assert!(serde_json::from_str::<Grammar>(json).is_err());
    }
}
