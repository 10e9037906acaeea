//! Golden digests through the public API.
//!
//! Every entry point must reproduce the testkit vectors byte for byte, and
//! the strict entry points must reject anything that is not text or a buffer.

use bytes_window::windowed;
use easy_hash::{
    basic_hash, browser_hash, buffer_hash, easy_hash, easy_hash_with, legacy_hash, BufferKind,
    ByteView, DigestError, HashError, HashInput, Hasher, HasherConfig, Heap, ValidationError,
    Value,
};
use easy_hash_testkit::{
    all_vectors, crew_record, deep_chain, self_referential, FailingProvider, RecordingProvider,
};

const ISHMAEL_SHA256: &str = "1aa0fcc1147088ab255380f60b7d1b6394fd447a33ef5a067c188b79f9b81d94";
const PEQUOD_SHA256: &str = "01c66c73fdc47f95e37e12bdbd637c07d6ce116eb5409d188b6baa4c23ab0e3a";
const ISHMAEL_SHA1: &str = "5cf59925a1926d4907a6bf56f42f0355b34a5812";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

mod bytes_window {
    use easy_hash::{BufferKind, ByteView};

    /// A view over `inner` embedded at `offset` in a larger buffer of junk.
    pub fn windowed(inner: &[u8], offset: usize) -> ByteView {
        let mut backing = vec![0xffu8; offset];
        backing.extend_from_slice(inner);
        backing.extend_from_slice(&[0xee; 7]);
        ByteView::new(BufferKind::Uint8Array, backing.into(), offset, inner.len())
            .expect("window in bounds")
    }
}

#[test]
fn basic_hash_matches_vectors() {
    init_tracing();
    for v in all_vectors() {
        assert_eq!(
            basic_hash(v.input, v.algorithm.name()).unwrap(),
            v.expected_hex,
            "{}",
            v.name
        );
        assert_eq!(
            basic_hash(v.input, v.algorithm.node_name()).unwrap(),
            v.expected_hex,
            "{} (node name)",
            v.name
        );
    }
}

#[test]
fn easy_hash_defaults_to_sha256() {
    let heap = Heap::new();
    assert_eq!(easy_hash(&heap, &Value::from("Ishmael")).unwrap(), ISHMAEL_SHA256);
    assert_eq!(
        easy_hash_with(&heap, &Value::from("Pequod"), "SHA-256").unwrap(),
        PEQUOD_SHA256
    );
}

#[test]
fn legacy_hash_defaults_to_sha1() {
    let heap = Heap::new();
    assert_eq!(legacy_hash(&heap, &Value::from("Ishmael")).unwrap(), ISHMAEL_SHA1);
    assert_eq!(Hasher::legacy().hex("Ishmael").unwrap(), ISHMAEL_SHA1);
}

#[test]
fn structured_values_hash_their_canonical_text() {
    init_tracing();
    let mut heap = Heap::new();
    let a = heap.object_from([("name", "Ishmael"), ("ship", "Pequod")]);
    let b = heap.object_from([("ship", "Pequod"), ("name", "Ishmael")]);

    let expected = basic_hash(r#"{"name":"Ishmael","ship":"Pequod"}"#, "SHA-256").unwrap();
    assert_eq!(easy_hash(&heap, &Value::Ref(a)).unwrap(), expected);
    assert_eq!(easy_hash(&heap, &Value::Ref(b)).unwrap(), expected);
}

#[test]
fn string_is_not_hashed_as_json_literal() {
    let heap = Heap::new();
    let quoted = basic_hash(r#""Ishmael""#, "SHA-256").unwrap();
    assert_ne!(easy_hash(&heap, &Value::from("Ishmael")).unwrap(), quoted);
}

#[test]
fn cyclic_values_hash_deterministically() {
    let mut heap = Heap::new();
    let obj = Value::Ref(self_referential(&mut heap));
    let first = easy_hash(&heap, &obj).unwrap();
    for _ in 0..5 {
        assert_eq!(easy_hash(&heap, &obj).unwrap(), first);
    }
    assert_eq!(
        first,
        basic_hash(r#"{"self":{{Circular($)}}}"#, "SHA-256").unwrap()
    );
}

#[test]
fn deeply_nested_values_hash() {
    let mut heap = Heap::new();
    let chain = deep_chain(&mut heap, 200_000);
    let text = format!("{}null{}", "[".repeat(200_000), "]".repeat(200_000));
    assert_eq!(
        easy_hash(&heap, &chain).unwrap(),
        basic_hash(&text, "SHA-256").unwrap()
    );
}

#[test]
fn buffers_hash_like_their_text() {
    let heap = Heap::new();
    let buf = Value::Buffer(ByteView::from_utf8("Ishmael"));
    assert_eq!(browser_hash(&heap, &buf, "SHA-256").unwrap(), ISHMAEL_SHA256);
    assert_eq!(easy_hash(&heap, &buf).unwrap(), ISHMAEL_SHA256);
    assert_eq!(
        buffer_hash(&heap, &buf, "SHA-256").unwrap().to_hex(),
        ISHMAEL_SHA256
    );
    assert_eq!(
        browser_hash(&heap, &Value::from("Ishmael"), "SHA-256").unwrap(),
        ISHMAEL_SHA256
    );
}

#[test]
fn windowed_view_hashes_only_its_window() {
    let heap = Heap::new();
    let view = windowed(b"Pequod", 5);
    assert_eq!(hex::encode(view.as_bytes()), "506571756f64");
    assert_eq!(
        browser_hash(&heap, &Value::Buffer(view.clone()), "SHA-256").unwrap(),
        PEQUOD_SHA256
    );
    assert_eq!(Hasher::native().hex(&view).unwrap(), PEQUOD_SHA256);
}

#[test]
fn raw_buffer_kinds_are_accepted() {
    let heap = Heap::new();
    let raw = Value::Buffer(ByteView::array_buffer(b"Ishmael".to_vec()));
    assert_eq!(browser_hash(&heap, &raw, "SHA-256").unwrap(), ISHMAEL_SHA256);

    let wide = ByteView::new(BufferKind::Uint16Array, b"Pequod".to_vec().into(), 0, 6).unwrap();
    assert_eq!(
        browser_hash(&heap, &Value::Buffer(wide), "SHA-256").unwrap(),
        PEQUOD_SHA256
    );
}

#[test]
fn strict_entry_points_reject_non_buffers() {
    let mut heap = Heap::new();
    let arr = heap.array(vec![Value::from(1), Value::from(2)]);
    let obj = heap.object_from([("a", 1)]);
    // Looks like a typed array to a duck-typing check, but is a plain object.
    let inner = heap.object();
    let wrapper = heap.object_from([("buffer", Value::Ref(inner))]);

    let cases = [
        (Value::Bool(true), "boolean"),
        (Value::Number(42.0), "number"),
        (Value::Ref(arr), "Array"),
        (Value::Ref(obj), "Object"),
        (Value::Ref(wrapper), "Object"),
    ];

    for (value, found) in cases {
        let expected = HashError::Validation(ValidationError::NotABuffer { found });
        assert_eq!(browser_hash(&heap, &value, "SHA-256").unwrap_err(), expected);
        assert_eq!(buffer_hash(&heap, &value, "SHA-256").unwrap_err(), expected);
        // The canonicalizing path accepts the same values.
        assert!(easy_hash(&heap, &value).is_ok());
    }
}

#[test]
fn unknown_algorithm_propagates_unchanged() {
    let heap = Heap::new();
    let err = easy_hash_with(&heap, &Value::from("x"), "MD5").unwrap_err();
    assert_eq!(
        err,
        HashError::Digest(DigestError::UnsupportedAlgorithm("MD5".into()))
    );
    assert!(browser_hash(&heap, &Value::from("x"), "SHA-3").is_err());
}

#[test]
fn provider_sees_the_preimage() {
    let mut heap = Heap::new();
    let record = Value::Ref(crew_record(&mut heap));
    let hasher = Hasher::new(RecordingProvider::new(), HasherConfig::default());

    hasher.digest(HashInput::from_value(&heap, &record)).unwrap();
    hasher.digest_with("Pequod", "sha1").unwrap();
    hasher.digest(&ByteView::from_utf8("Ishmael")).unwrap();

    let calls = hasher.provider().calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, "SHA-256");
    assert_eq!(
        calls[0].1,
        easy_hash::to_deterministic_json(&heap, &record).into_bytes()
    );
    assert_eq!(calls[1], ("sha1".to_string(), b"Pequod".to_vec()));
    assert_eq!(calls[2].1, b"Ishmael".to_vec());
}

#[test]
fn provider_errors_are_not_retried() {
    let hasher = Hasher::new(FailingProvider("unavailable".into()), HasherConfig::default());
    assert_eq!(
        hasher.hex("Ishmael").unwrap_err(),
        HashError::Digest(DigestError::Provider("unavailable".into()))
    );
}

#[tokio::test]
async fn async_paths_match_sync() {
    init_tracing();
    let mut heap = Heap::new();
    let record = Value::Ref(crew_record(&mut heap));
    let hasher = Hasher::native();

    let input = HashInput::from_value(&heap, &record);
    assert_eq!(
        hasher.hex_async(input, None).await.unwrap(),
        hasher.hex(input).unwrap()
    );
    assert_eq!(
        hasher.hex_async(HashInput::Text("Ishmael"), Some("SHA-1")).await.unwrap(),
        ISHMAEL_SHA1
    );
    assert_eq!(
        hasher
            .digest_async(HashInput::Text("Pequod"), None)
            .await
            .unwrap()
            .to_hex(),
        PEQUOD_SHA256
    );
    assert!(hasher.hex_async(HashInput::Text(""), Some("nope")).await.is_err());
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            tokio::spawn(async move {
                let mut heap = Heap::new();
                let obj = heap.object_from([("i", i)]);
                heap.insert(obj, "self", obj).unwrap();
                easy_hash(&heap, &Value::Ref(obj)).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let hex = handle.await.unwrap();
        let expected = basic_hash(&format!(r#"{{"i":{i},"self":{{{{Circular($)}}}}}}"#), "SHA-256").unwrap();
        assert_eq!(hex, expected);
    }
}
