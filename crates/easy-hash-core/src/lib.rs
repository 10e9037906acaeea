//! # easy-hash core
//!
//! Pure primitives for easy-hash: value graphs, byte views, and the
//! deterministic canonicalization used as the hash pre-image.
//!
//! This crate contains no I/O and no hashing. It turns any [`Value`] into
//! text such that equal values always produce identical output and values
//! of different categories never do.
//!
//! ## Key Types
//!
//! - [`Value`] - Closed sum type over every supported value category
//! - [`Heap`] / [`NodeId`] - Arena of containers; a handle is an identity
//! - [`ByteView`] - Raw buffer or typed window over one
//! - [`Canonical`] - A graph lowered to an acyclic tree
//!
//! ## Canonicalization
//!
//! ```rust
//! use easy_hash_core::{to_deterministic_json, Heap, Value};
//!
//! let mut heap = Heap::new();
//! let obj = heap.object_from([("b", 1), ("a", 2)]);
//! heap.insert(obj, "self", obj).unwrap();
//!
//! assert_eq!(
//!     to_deterministic_json(&heap, &Value::Ref(obj)),
//!     r#"{"a":2,"b":1,"self":{{Circular($)}}}"#
//! );
//! ```

pub mod buffer;
pub mod canonical;
pub mod error;
pub mod value;

pub use buffer::{BufferKind, ByteView};
pub use canonical::{
    canonical_bytes, format_date, has_circular_references, render_path,
    replace_circular_references, stringify, to_deterministic_json, Canonical,
};
pub use error::{BigIntParseError, HeapError, ViewError};
pub use value::{
    BigInt, Heap, Node, NodeId, PathSegment, Properties, Symbol, Value, MAX_DATE_MILLIS,
};
