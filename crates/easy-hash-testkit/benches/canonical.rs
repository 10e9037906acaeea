//! Canonicalization and hashing throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use easy_hash_core::{to_deterministic_json, Heap, Value};
use easy_hash_digest::{DigestAlgorithm, RustCryptoProvider};
use easy_hash_testkit::{crew_record, deep_chain, mutual_pair, wide_object};

fn bench_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical");

    for width in [16usize, 256, 4096] {
        let mut heap = Heap::new();
        let obj = Value::Ref(wide_object(&mut heap, width));
        group.bench_with_input(BenchmarkId::new("wide_object", width), &obj, |b, obj| {
            b.iter(|| to_deterministic_json(&heap, black_box(obj)))
        });
    }

    let mut heap = Heap::new();
    let chain = deep_chain(&mut heap, 256);
    group.bench_function("deep_chain_256", |b| {
        b.iter(|| to_deterministic_json(&heap, black_box(&chain)))
    });

    let mut heap = Heap::new();
    let (a, _) = mutual_pair(&mut heap);
    let record = crew_record(&mut heap);
    heap.insert(a, "record", record).expect("bench graph");
    let cyclic = Value::Ref(a);
    group.bench_function("cyclic_record", |b| {
        b.iter(|| to_deterministic_json(&heap, black_box(&cyclic)))
    });

    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let provider = RustCryptoProvider::new();
    let data = vec![0x5au8; 64 * 1024];
    let mut group = c.benchmark_group("digest_64k");

    for alg in DigestAlgorithm::ALL {
        group.bench_function(alg.name(), |b| {
            b.iter(|| provider.digest_with(alg, black_box(&data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_canonical, bench_digest);
criterion_main!(benches);
