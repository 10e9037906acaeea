//! Golden test vectors for cross-implementation verification.
//!
//! Digest vectors pin the output of every algorithm for a few fixed
//! strings. Canonical vectors pin the exact text a value graph renders to,
//! since that text is the pre-image every digest is computed over.

use easy_hash_core::{to_deterministic_json, BigInt, ByteView, Heap, Symbol, Value};
use easy_hash_digest::{bytes_to_hex, DigestAlgorithm, RustCryptoProvider};

/// A digest vector: fixed text hashed with a fixed algorithm.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    pub name: &'static str,
    pub input: &'static str,
    pub algorithm: DigestAlgorithm,
    /// Expected digest (lowercase hex).
    pub expected_hex: &'static str,
}

/// A canonicalization vector: a graph and the text it must render to.
#[derive(Clone)]
pub struct CanonicalVector {
    pub name: &'static str,
    pub build: fn(&mut Heap) -> Value,
    pub expected: &'static str,
}

/// UTF-8 hex of the sample inputs.
pub const ISHMAEL_UTF8_HEX: &str = "4973686d61656c";
pub const PEQUOD_UTF8_HEX: &str = "506571756f64";

/// Get all digest vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    use DigestAlgorithm::*;

    vec![
        GoldenVector {
            name: "Ishmael SHA-1",
            input: "Ishmael",
            algorithm: Sha1,
            expected_hex: "5cf59925a1926d4907a6bf56f42f0355b34a5812",
        },
        GoldenVector {
            name: "Ishmael SHA-256",
            input: "Ishmael",
            algorithm: Sha256,
            expected_hex: "1aa0fcc1147088ab255380f60b7d1b6394fd447a33ef5a067c188b79f9b81d94",
        },
        GoldenVector {
            name: "Ishmael SHA-384",
            input: "Ishmael",
            algorithm: Sha384,
            expected_hex: "3d3b80670e87851bbd736a13907a9eb0a45653b394dc02be57bf82daeb69facf7ff680c084fdeb74e87069d1b7ec94dd",
        },
        GoldenVector {
            name: "Ishmael SHA-512",
            input: "Ishmael",
            algorithm: Sha512,
            expected_hex: "f92b4aeb5b6b830bed40bc10e077ae0726adf1d35518b202cb4b069367b0c39b121033786b12c7830068d8b773763267dcdf4ff214d3901d2e5424bf7a3c2f0f",
        },
        GoldenVector {
            name: "Pequod SHA-1",
            input: "Pequod",
            algorithm: Sha1,
            expected_hex: "ea0e21a524d542f9bf1d0eccfbcf66657b949aaf",
        },
        GoldenVector {
            name: "Pequod SHA-256",
            input: "Pequod",
            algorithm: Sha256,
            expected_hex: "01c66c73fdc47f95e37e12bdbd637c07d6ce116eb5409d188b6baa4c23ab0e3a",
        },
        GoldenVector {
            name: "Pequod SHA-384",
            input: "Pequod",
            algorithm: Sha384,
            expected_hex: "a6667805adda8df625f1822b54c722b14b3c351c7fba98893d8afad0388be3e7544d1c0e6a91a9211f1f488272094721",
        },
        GoldenVector {
            name: "Pequod SHA-512",
            input: "Pequod",
            algorithm: Sha512,
            expected_hex: "58b30c7b31e2bb76eab7f92cf8f09e7a3dbabbd2b22bd2806793fca53d75314977ca8727a17536872f9e942c75a57550f13cc5625af82e85cc090dd76b48c953",
        },
        GoldenVector {
            name: "empty SHA-1",
            input: "",
            algorithm: Sha1,
            expected_hex: "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        },
        GoldenVector {
            name: "empty SHA-256",
            input: "",
            algorithm: Sha256,
            expected_hex: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        GoldenVector {
            name: "empty SHA-384",
            input: "",
            algorithm: Sha384,
            expected_hex: "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b",
        },
        GoldenVector {
            name: "empty SHA-512",
            input: "",
            algorithm: Sha512,
            expected_hex: "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
        },
        GoldenVector {
            name: "empty BLAKE3",
            input: "",
            algorithm: Blake3,
            expected_hex: "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
        },
    ]
}

/// Get all canonicalization vectors.
pub fn canonical_vectors() -> Vec<CanonicalVector> {
    vec![
        CanonicalVector {
            name: "sorted keys",
            build: |heap| Value::Ref(heap.object_from([("ship", "Pequod"), ("name", "Ishmael")])),
            expected: r#"{"name":"Ishmael","ship":"Pequod"}"#,
        },
        CanonicalVector {
            name: "self reference",
            build: |heap| {
                let obj = heap.object();
                heap.insert(obj, "self", obj).expect("vector");
                Value::Ref(obj)
            },
            expected: r#"{"self":{{Circular($)}}}"#,
        },
        CanonicalVector {
            name: "exotic scalars",
            build: |heap| {
                Value::Ref(heap.array(vec![
                    Value::Undefined,
                    Value::Number(f64::NAN),
                    Value::Number(f64::NEG_INFINITY),
                    Value::BigInt(BigInt::from(42)),
                    Value::Symbol(Symbol::new("id")),
                ]))
            },
            expected: r#"[{{undefined}},{{Number(NaN)}},{{Number(-Infinity)}},{{BigInt(42)}},{{Symbol("id")}}]"#,
        },
        CanonicalVector {
            name: "map and set",
            build: |heap| {
                let map = heap.map();
                heap.map_insert(map, "b", 2).expect("vector");
                heap.map_insert(map, "a", 1).expect("vector");
                let set = heap.set();
                heap.push(set, 1).expect("vector");
                heap.push(set, 1).expect("vector");
                Value::Ref(heap.object_from([("m", map), ("s", set)]))
            },
            expected: r#"{"m":{{Map({"a":1,"b":2})}},"s":{{Set([1])}}}"#,
        },
        CanonicalVector {
            name: "date",
            build: |heap| Value::Ref(heap.date_from_millis(1_000)),
            expected: "{{Date(1970-01-01T00:00:01.000Z)}}",
        },
        CanonicalVector {
            name: "date past year 9999",
            build: |heap| Value::Ref(heap.date_from_millis(8_640_000_000_000_000)),
            expected: "{{Date(+275760-09-13T00:00:00.000Z)}}",
        },
        CanonicalVector {
            name: "cycle under an empty key",
            build: |heap| {
                let root = heap.object();
                let child = heap.object();
                heap.insert(root, "", child).expect("vector");
                heap.insert(child, "x", child).expect("vector");
                Value::Ref(root)
            },
            expected: r#"{"":{"x":{{Circular($."")}}}}"#,
        },
        CanonicalVector {
            name: "buffer",
            build: |_| Value::Buffer(ByteView::from_utf8("Ishmael")),
            expected: "{{Uint8Array(4973686d61656c)}}",
        },
    ]
}

/// Verify all golden vectors against the native provider.
///
/// Returns `(name, matches, actual)` for every digest and canonical vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let provider = RustCryptoProvider::new();

    let digests = all_vectors().into_iter().map(|v| {
        let hex = bytes_to_hex(&provider.digest_with(v.algorithm, v.input.as_bytes()));
        (v.name.to_string(), hex == v.expected_hex, hex)
    });

    let canonical = canonical_vectors().into_iter().map(|v| {
        let mut heap = Heap::new();
        let value = (v.build)(&mut heap);
        let text = to_deterministic_json(&heap, &value);
        (v.name.to_string(), text == v.expected, text)
    });

    digests.chain(canonical).collect()
}
