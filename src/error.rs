//! Errors that can occur outside the factorization core.
//!
//! Invariant violations inside the region overlay are engine bugs and panic;
//! only externally supplied data can produce these values.

/// Errors raised while validating a grammar that was not built by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// The declared start rule has no right-hand side.
    #[error("start rule R{0} is not defined")]
    MissingStartRule(u32),

    /// A rule references a rule id that has no right-hand side.
    #[error("rule R{rule} references undefined rule R{missing}")]
    UnknownRule { rule: u32, missing: u32 },

    /// A rule (transitively) references itself.
    #[error("rule R{0} references itself")]
    CyclicRule(u32),
}

/// Errors raised while loading a compressor configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for grammar validation.
pub type Result<T> = std::result::Result<T, GrammarError>;
