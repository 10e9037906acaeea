//! Error types for easy-hash core.
//!
//! Canonicalization itself never fails. These errors only come from building
//! value graphs and byte views.

use thiserror::Error;

use crate::value::NodeId;

/// Errors raised while building a value graph in a [`Heap`](crate::Heap).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("{kind} node {id:?} has no keyed entries")]
    NotKeyed { id: NodeId, kind: &'static str },

    #[error("{kind} node {id:?} does not accept members")]
    NotSequence { id: NodeId, kind: &'static str },

    #[error("{kind} node {id:?} is not a map")]
    NotMap { id: NodeId, kind: &'static str },
}

/// Errors raised when a byte view does not fit its backing buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("window {offset}+{length} exceeds buffer of {buffer_len} bytes")]
    OutOfBounds {
        offset: usize,
        length: usize,
        buffer_len: usize,
    },

    #[error("{kind} window {offset}+{length} is not aligned to {width} bytes")]
    Misaligned {
        kind: &'static str,
        width: usize,
        offset: usize,
        length: usize,
    },
}

/// Error parsing an arbitrary-precision integer literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid integer literal: {0:?}")]
pub struct BigIntParseError(pub String);

/// Result type for heap operations.
pub type Result<T> = std::result::Result<T, HeapError>;
