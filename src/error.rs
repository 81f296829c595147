//! Error type shared by the tree and codec layers.

use thiserror::Error;

/// Errors produced while building, mutating, or converting topology trees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// No registered codec matches the first non-blank line of the input.
    /// Raised by dispatch only, never by an individual codec.
    #[error("file format is not supported: no codec matches {0:?}")]
    UnsupportedFormat(String),

    /// A codec recognized the signature but the body violates that
    /// format's grammar.
    #[error("{0}")]
    Format(String),

    /// A structural tree invariant would be violated.
    #[error("{0}")]
    InvalidOperation(String),

    /// A tree lookup was called with an argument it cannot serve.
    #[error("{0}")]
    InvalidArgument(String),

    /// Wiring failure: a codec could not be constructed or the export
    /// codec is missing. Not reachable through the standard registry.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
