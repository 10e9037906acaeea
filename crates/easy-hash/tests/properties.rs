//! Property tests over the public hashing API.

use easy_hash::{basic_hash, browser_hash, easy_hash, to_deterministic_json, ByteView, DigestAlgorithm, Heap, Value};
use easy_hash_testkit::generators::{import_reversed, json_value};
use proptest::prelude::*;

fn algorithm() -> impl Strategy<Value = DigestAlgorithm> {
    prop::sample::select(DigestAlgorithm::ALL.to_vec())
}

proptest! {
    #[test]
    fn hex_length_matches_algorithm(text in ".*", alg in algorithm()) {
        let hex = basic_hash(&text, alg.name()).unwrap();
        prop_assert_eq!(hex.len(), alg.output_len() * 2);
        prop_assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn text_and_buffer_agree(text in ".*", alg in algorithm()) {
        let heap = Heap::new();
        let as_text = browser_hash(&heap, &Value::String(text.clone()), alg.name()).unwrap();
        let as_buffer = browser_hash(&heap, &Value::Buffer(ByteView::from_utf8(&text)), alg.name()).unwrap();
        prop_assert_eq!(as_text, as_buffer);
    }

    #[test]
    fn structured_hash_is_hash_of_canonical_text(json in json_value()) {
        let mut heap = Heap::new();
        let value = heap.import_json(&json);
        prop_assume!(!matches!(value, Value::String(_)));

        let text = to_deterministic_json(&heap, &value);
        prop_assert_eq!(easy_hash(&heap, &value).unwrap(), basic_hash(&text, "SHA-256").unwrap());
    }

    #[test]
    fn insertion_order_never_changes_the_hash(json in json_value()) {
        let mut heap = Heap::new();
        let forward = heap.import_json(&json);
        let backward = import_reversed(&mut heap, &json);
        prop_assert_eq!(easy_hash(&heap, &forward).unwrap(), easy_hash(&heap, &backward).unwrap());
    }
}
