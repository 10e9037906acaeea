//! # easy-hash digest
//!
//! Digest primitives for easy-hash: algorithm names, the provider seam, and
//! hex rendering.
//!
//! ## Algorithms
//!
//! | Name      | Output |
//! |-----------|--------|
//! | `SHA-1`   | 20 B   |
//! | `SHA-256` | 32 B   |
//! | `SHA-384` | 48 B   |
//! | `SHA-512` | 64 B   |
//! | `BLAKE3`  | 32 B   |
//!
//! Node-style names (`sha256`) are accepted as well.

pub mod algorithm;
pub mod digest;
pub mod error;
pub mod provider;

pub use algorithm::DigestAlgorithm;
pub use digest::{bytes_to_hex, hex_to_bytes, Digest};
pub use error::{DigestError, Result};
pub use provider::{AsyncDigestProvider, DigestProvider, RustCryptoProvider};
