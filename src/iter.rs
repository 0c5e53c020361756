use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// Iterator that reconstructs the original text by expanding rules.
///
/// Keeps one frame per rule currently being expanded, so memory is bounded
/// by the grammar depth rather than the text length.
pub struct GrammarIter<'a> {
    grammar: &'a Grammar,
    stack: Vec<(&'a [Symbol], usize)>,
}

impl<'a> GrammarIter<'a> {
    pub(crate) fn new(grammar: &'a Grammar) -> Self {
        let start = grammar
            .rule(grammar.start_rule())
            .expect("start rule should exist");

        Self {
            grammar,
            stack: vec![(start, 0)],
        }
    }
}

impl Iterator for GrammarIter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let symbols = frame.0;

            let Some(&symbol) = symbols.get(frame.1) else {
                // End of rule, resume the parent
                self.stack.pop();
                continue;
            };
            frame.1 += 1;

            match symbol {
                Symbol::Literal(byte) => return Some(byte),
                Symbol::Rule(rule_id) => {
                    let body = self
                        .grammar
                        .rule(rule_id)
                        .expect("grammar defines every referenced rule");
                    self.stack.push((body, 0));
                }
            }
        }
    }
}

impl Grammar {
    /// Returns an iterator over the reconstructed text.
    pub fn iter(&self) -> GrammarIter<'_> {
        GrammarIter::new(self)
    }
}

impl<'a> IntoIterator for &'a Grammar {
    type Item = u8;
    type IntoIter = GrammarIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
