//! Test fixtures and helpers.
//!
//! Common graphs for integration tests, plus digest providers that record
//! or fail their calls.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use easy_hash_core::{Heap, NodeId, Value};
use easy_hash_digest::{DigestError, DigestProvider, Result, RustCryptoProvider};

/// An object whose `self` key points back at it.
pub fn self_referential(heap: &mut Heap) -> NodeId {
    let obj = heap.object();
    heap.insert(obj, "self", obj).expect("fixture");
    obj
}

/// Two objects pointing at each other: `a.peer = b`, `b.peer = a`.
pub fn mutual_pair(heap: &mut Heap) -> (NodeId, NodeId) {
    let a = heap.object();
    let b = heap.object_from([("peer", a)]);
    heap.insert(a, "peer", b).expect("fixture");
    (a, b)
}

/// A small record touching most value categories.
pub fn crew_record(heap: &mut Heap) -> NodeId {
    let crew = heap.array(vec![
        Value::from("Ahab"),
        Value::from("Starbuck"),
        Value::from("Queequeg"),
    ]);

    let departed = match Utc.with_ymd_and_hms(1841, 1, 3, 0, 0, 0).single() {
        Some(instant) => heap.date(instant),
        None => heap.invalid_date(),
    };

    let ports = heap.set();
    heap.push(ports, "Nantucket").expect("fixture");
    heap.push(ports, "New Bedford").expect("fixture");

    let log = heap.map();
    heap.map_insert(log, 1, "sailed").expect("fixture");
    heap.map_insert(log, "1", "signed on").expect("fixture");

    heap.object_from([
        ("ship", Value::from("Pequod")),
        ("narrator", Value::from("Ishmael")),
        ("crew", Value::Ref(crew)),
        ("departed", Value::Ref(departed)),
        ("ports", Value::Ref(ports)),
        ("log", Value::Ref(log)),
        ("whales", Value::Number(1.0)),
    ])
}

/// A linear chain of `depth` arrays, each holding the next.
pub fn deep_chain(heap: &mut Heap, depth: usize) -> Value {
    let mut value = Value::Null;
    for _ in 0..depth {
        value = Value::Ref(heap.array(vec![value]));
    }
    value
}

/// An object with `width` keys, inserted in descending order.
pub fn wide_object(heap: &mut Heap, width: usize) -> NodeId {
    heap.object_from((0..width).rev().map(|i| (format!("key{i:05}"), i as f64)))
}

/// A provider that records every call before delegating to the native one.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    calls: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(algorithm, bytes)` pair seen so far.
    pub fn calls(&self) -> Vec<(String, Vec<u8>)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DigestProvider for RecordingProvider {
    fn digest(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((algorithm.to_string(), data.to_vec()));
        RustCryptoProvider::new().digest(algorithm, data)
    }
}

/// A provider that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingProvider(pub String);

impl DigestProvider for FailingProvider {
    fn digest(&self, _algorithm: &str, _data: &[u8]) -> Result<Vec<u8>> {
        Err(DigestError::Provider(self.0.clone()))
    }
}
