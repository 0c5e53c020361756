//! Turns a region overlay into an explicit grammar in one sweep over the text.

use crate::grammar::Grammar;
use crate::region::{RegionIndex, RuleInterval};
use crate::symbol::Symbol;
use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use std::collections::BTreeMap;

/// Builds the grammar described by `index` over `text`.
///
/// Walks the text once, keeping the chain of currently open intervals on a
/// stack together with the symbols collected for each. When several
/// intervals belong to the same rule the last one closed defines the rule;
/// they all cover identical text, so any of them would do. Rules referenced
/// only once from that body selection are then spliced into their user.
pub(crate) fn export(text: &[u8], index: &RegionIndex) -> Grammar {
    debug_assert_eq!(text.len(), index.len());

    let mut rules: BTreeMap<u32, Vec<Symbol>> = BTreeMap::new();
    let mut open: Vec<(RuleInterval, Vec<Symbol>)> = Vec::new();
    let mut buckets = index.buckets().peekable();

    for (i, &byte) in text.iter().enumerate() {
        while open.last().is_some_and(|(interval, _)| interval.end < i) {
            close(&mut open, &mut rules);
        }

        if let Some((_, keys)) = buckets.next_if(|&(start, _)| start == i) {
            for &key in keys {
                open.push((*index.interval(key), Vec::new()));
            }
        }

        open.last_mut()
            .expect("root interval covers the whole text")
            .1
            .push(Symbol::Literal(byte));
    }

    while !open.is_empty() {
        close(&mut open, &mut rules);
    }

    // An empty text has no root interval, only an empty start rule.
    rules.entry(index.root_rule_id()).or_default();

    let start = index.root_rule_id();
    Grammar::from_exported(start, inline_single_use(start, rules))
}

/// Replaces every reference to a rule used only once by that rule's body and
/// drops rules the start rule no longer reaches.
///
/// Each splice removes one symbol, so the grammar never grows.
fn inline_single_use(
    start: u32,
    mut rules: BTreeMap<u32, Vec<Symbol>>,
) -> BTreeMap<u32, Vec<Symbol>> {
    let mut usage: HashMap<u32, usize> = HashMap::default();
    let mut reachable: HashSet<u32> = HashSet::default();
    reachable.insert(start);
    let mut pending = vec![start];
    while let Some(id) = pending.pop() {
        for child in rules[&id].iter().filter_map(Symbol::rule_id) {
            *usage.entry(child).or_insert(0) += 1;
            if reachable.insert(child) {
                pending.push(child);
            }
        }
    }

    let mut kept = BTreeMap::new();
    let mut pending = vec![start];
    while let Some(id) = pending.pop() {
        // Shared rules are queued once per reference.
        let Some(body) = rules.remove(&id) else {
            continue;
        };

        let mut flat = Vec::with_capacity(body.len());
        let mut stack = vec![body.into_iter()];
        while let Some(symbols) = stack.last_mut() {
            let Some(symbol) = symbols.next() else {
                stack.pop();
                continue;
            };
            match symbol {
                Symbol::Rule(child) if usage[&child] == 1 => {
                    let inner = rules.remove(&child).expect("single-use rule is spliced once");
                    stack.push(inner.into_iter());
                }
                Symbol::Rule(child) => {
                    flat.push(symbol);
                    pending.push(child);
                }
                Symbol::Literal(_) => flat.push(symbol),
            }
        }
        kept.insert(id, flat);
    }
    kept
}

fn close(open: &mut Vec<(RuleInterval, Vec<Symbol>)>, rules: &mut BTreeMap<u32, Vec<Symbol>>) {
    let Some((interval, symbols)) = open.pop() else {
        return;
    };
    rules.insert(interval.rule_id, symbols);
    if let Some((_, parent)) = open.last_mut() {
        parent.push(Symbol::Rule(interval.rule_id));
    }
}
