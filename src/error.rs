//! Errors raised at the edges of the engine.
//!
//! Simulation itself never fails; these cover parsing identifiers,
//! loading configuration and the truth-table input bound.

use thiserror::Error;

/// Errors produced while building circuits or configuring the engine.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// The part number is not in the catalog.
    #[error("Unknown IC type: {0}")]
    UnknownIcType(String),

    /// The string is not a `pin-N` identifier in range.
    #[error("Invalid pin id: {0}")]
    InvalidPinId(String),

    /// A truth table was requested over more inputs than allowed.
    #[error("Truth table over {requested} inputs exceeds the limit of {limit}")]
    TooManyInputs {
        /// Number of inputs requested.
        requested: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// Configuration could not be parsed.
    #[error("Invalid simulation config: {0}")]
    Config(#[from] serde_json::Error),
}
