//! Error types for the primitives crate.

/// Failures parsing or encoding primitive types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveError {
    /// Account address could not be parsed.
    #[error("invalid address {0}")]
    InvalidAddress(String),
}

/// Failures decoding a JSON-CDC value into a concrete shape.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// The JSON document is not a valid JSON-CDC value.
    #[error("malformed JSON-CDC value: {0}")]
    Json(#[from] serde_json::Error),

    /// A value had a different type than expected.
    #[error("expected {expected}, got {got}")]
    UnexpectedType {
        expected: &'static str,
        got: &'static str,
    },

    /// A struct did not carry a required field.
    #[error("missing struct field {0:?}")]
    MissingField(&'static str),

    /// A numeric value did not fit or did not parse.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}
