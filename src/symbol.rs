use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbol on the right-hand side of a grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// A terminal symbol from the input.
    Literal(u8),

    /// A reference to a rule (non-terminal).
    Rule(u32),
}

impl Symbol {
    pub fn is_literal(&self) -> bool {
        matches!(self, Symbol::Literal(_))
    }

    /// The referenced rule id, if this is a non-terminal.
    pub fn rule_id(&self) -> Option<u32> {
        match self {
            Symbol::Rule(id) => Some(*id),
            Symbol::Literal(_) => None,
        }
    }
}

impl fmt::Display for Symbol {
    /// Rules print as `R<id>`; literals print as themselves, with whitespace
    /// and non-printable bytes escaped so rule listings stay on one line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Symbol::Rule(id) => write!(f, "R{id}"),
            Symbol::Literal(b' ') => f.write_str("_"),
            Symbol::Literal(byte) => write!(f, "{}", byte.escape_ascii()),
        }
    }
}
