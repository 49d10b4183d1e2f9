//! Error types for facet-diagram parsing.

use thiserror::Error;

/// Errors that can occur while reading a facet diagram.
#[derive(Error, Debug)]
pub enum AscError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No `a` instruction line anywhere in the input.
    #[error("no facet instructions found")]
    NoInstructions,

    /// Facet instructions appeared before any index gear line.
    #[error("no index gear line (`g <n>`) before the facet instructions")]
    MissingRotation,

    /// An index gear line whose value is absent, malformed, or not positive.
    #[error("invalid index gear line {line:?}")]
    InvalidRotation {
        /// The offending line, verbatim.
        line: String,
    },

    /// A bare value with no facet set to receive it.
    #[error("instruction token {token:?} outside any facet set")]
    UnexpectedToken {
        /// The offending token.
        token: String,
    },

    /// A token that should have been a number but does not parse as one.
    #[error("expected {expected}, got {token:?}")]
    InvalidNumber {
        /// What the grammar called for at this point.
        expected: &'static str,
        /// The offending token.
        token: String,
    },

    /// Input ended, or a new facet set began, while the current facet
    /// set's angle or radius was still missing.
    #[error("facet set ends before its angle and radius are complete")]
    UnterminatedFacetSet,
}
