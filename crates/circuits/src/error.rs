//! Error types for the commitment state engine.

use thiserror::Error;

/// Errors from field-element parsing and encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid field element encoding: {0}")]
    InvalidEncoding(String),
    #[error("value {0} does not fit in the scalar field")]
    OutOfRange(String),
}

/// Errors from commitment tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("unsupported tree depth {0}")]
    InvalidDepth(usize),
    #[error("tree is full: capacity {capacity} reached at depth {depth}")]
    CapacityExhausted { depth: usize, capacity: u64 },
    #[error("no leaf at index {0}")]
    LeafNotFound(u64),
    #[error("imported root {expected} does not match recomputed root {computed}")]
    RootMismatch { expected: String, computed: String },
    #[error("invalid tree state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}
