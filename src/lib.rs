//! # AreaComp - Suffix-Array-Guided Grammar Compression
//!
//! Builds a context-free grammar that produces exactly one input text and is
//! smaller than the text whenever the text contains repeats.
//!
//! Repeated substrings are read off the LCP-intervals of the text's suffix
//! array, scored by an [`Area`] strategy and factorized greedily, best score
//! first. Each accepted pattern becomes a rule whose occurrences are marked as
//! nested regions over the text:
//! 1. **Proper nesting**: Two regions are disjoint or one contains the other
//! 2. **Region fidelity**: All regions of a rule cover identical text
//!
//! The grammar is produced from the regions in one final sweep.
//!
//! ## Example
//!
//! ```
//! use areacomp_rs::{AreaComp, Compressor, Symbol};
//!
//! let grammar = AreaComp::default().compress(b"aaaa");
//!
//! // R0 -> R1 R1, R1 -> a a
//! assert_eq!(grammar.rule(0).unwrap(), &[Symbol::Rule(1), Symbol::Rule(1)]);
//! assert_eq!(grammar.expand(), b"aaaa");
//!
//! println!("{grammar}");
//! ```
//!
//! ## Performance
//!
//! - Suffix sorting in O(n log n) via `cdivsufsort`, LCP-intervals in O(n)
//! - Every candidate is scored once; there is no re-enumeration after a rule
//!   is created
//! - Region lookups are logarithmic in the number of distinct region starts

mod area;
mod areacomp;
mod augmented;
mod config;
mod error;
mod export;
mod grammar;
mod id_gen;
mod iter;
mod region;
mod suffix;
mod symbol;


pub use area::{Area, ScoredCandidate};
pub use areacomp::{AreaComp, CompressionStats, Compressor};
pub use augmented::{AugmentedText, LcpInterval};
pub use config::{AreaCompConfig, MIN_PATTERN_LENGTH};
pub use error::{ConfigError, GrammarError, Result};
pub use grammar::{Grammar, GrammarStats};
pub use iter::GrammarIter;
pub use region::{IntervalKey, RegionIndex, RuleInterval};
pub use suffix::SuffixData;
pub use symbol::Symbol;
