//! # easy-hash
//!
//! Deterministic content hashing of arbitrary values.
//!
//! ## Overview
//!
//! Hashing is two steps:
//!
//! 1. Pick the pre-image. Text is UTF-8 encoded, buffers contribute their
//!    exact byte window, and any other value is canonicalized into a
//!    deterministic JSON-like string.
//! 2. Hand the bytes to a [`DigestProvider`] and render the result as bytes
//!    or lowercase hex.
//!
//! The default algorithm is SHA-256. [`legacy_hash`] and
//! [`HasherConfig::legacy`] default to SHA-1 for compatibility with digests
//! produced by older releases.
//!
//! ## Usage
//!
//! ```rust
//! use easy_hash::{easy_hash, Heap, Value};
//!
//! let mut heap = Heap::new();
//! let a = heap.object_from([("name", "Ishmael"), ("ship", "Pequod")]);
//! let b = heap.object_from([("ship", "Pequod"), ("name", "Ishmael")]);
//!
//! assert_eq!(
//!     easy_hash(&heap, &Value::Ref(a)).unwrap(),
//!     easy_hash(&heap, &Value::Ref(b)).unwrap()
//! );
//! ```
//!
//! ## Re-exports
//!
//! - `easy_hash::core` - Value model and canonicalization
//! - `easy_hash::digest` - Algorithms and digest providers

pub mod config;
pub mod error;
pub mod hasher;

// Re-export component crates
pub use easy_hash_core as core;
pub use easy_hash_digest as digest;

pub use config::HasherConfig;
pub use error::{HashError, Result, ValidationError};
pub use hasher::{
    basic_hash, browser_hash, buffer_hash, easy_hash, easy_hash_with, legacy_hash, HashInput,
    Hasher,
};

// Re-export commonly used types
pub use easy_hash_core::{
    has_circular_references, replace_circular_references, to_deterministic_json, BigInt,
    BufferKind, ByteView, Heap, NodeId, Symbol, Value,
};
pub use easy_hash_digest::{
    AsyncDigestProvider, Digest, DigestAlgorithm, DigestError, DigestProvider, RustCryptoProvider,
};
