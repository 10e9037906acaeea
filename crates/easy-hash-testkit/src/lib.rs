//! # easy-hash testkit
//!
//! Testing utilities for easy-hash.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed digests and canonical forms every build must reproduce
//! - **Generators**: Proptest strategies for value trees, byte windows and cyclic graphs
//! - **Fixtures**: Prebuilt graphs and recording/failing digest providers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use easy_hash_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, actual);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use easy_hash_core::{to_deterministic_json, Heap};
//! use easy_hash_testkit::generators::{import_reversed, json_value};
//!
//! proptest! {
//!     #[test]
//!     fn key_order_is_irrelevant(json in json_value()) {
//!         let mut heap = Heap::new();
//!         let a = heap.import_json(&json);
//!         let b = import_reversed(&mut heap, &json);
//!         prop_assert_eq!(to_deterministic_json(&heap, &a), to_deterministic_json(&heap, &b));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    crew_record, deep_chain, mutual_pair, self_referential, wide_object, FailingProvider,
    RecordingProvider,
};
pub use generators::{graph_from_params, import_reversed, json_value, GraphParams};
pub use vectors::{all_vectors, canonical_vectors, verify_all_vectors, CanonicalVector, GoldenVector};
