//! Proptest generators for property-based testing.
//!
//! Trees are generated as `serde_json::Value` and imported into a [`Heap`],
//! which keeps shrinking cheap. Graph parameters describe arbitrary edge
//! sets, cycles included.

use bytes::Bytes;
use proptest::prelude::*;
use serde_json::Value as Json;

use easy_hash_core::{BigInt, BufferKind, ByteView, Heap, NodeId, Symbol, Value};

/// Generate an object key, including keys that look like sentinels.
pub fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{0,6}",
        1 => Just("{{Circular($)}}".to_string()),
        1 => "[\\PC]{0,4}",
    ]
}

/// Generate a JSON leaf.
pub fn json_leaf() -> impl Strategy<Value = Json> {
    prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i32>().prop_map(Json::from),
        (-1.0e12f64..1.0e12).prop_map(Json::from),
        "[\\PC]{0,12}".prop_map(Json::String),
    ]
}

/// Generate a JSON tree of bounded depth.
pub fn json_value() -> impl Strategy<Value = Json> {
    json_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Json::Array),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|m| Json::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate a scalar that has no plain JSON form.
pub fn exotic_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Number(f64::NAN)),
        Just(Value::Number(f64::INFINITY)),
        Just(Value::Number(f64::NEG_INFINITY)),
        any::<i64>().prop_map(|n| Value::BigInt(BigInt::from(n))),
        prop::option::of("[a-z]{0,6}").prop_map(|d| Value::Symbol(match d {
            Some(d) => Symbol::new(d),
            None => Symbol::anonymous(),
        })),
        byte_view().prop_map(Value::Buffer),
    ]
}

/// Generate a `Uint8Array` window at an arbitrary offset into a larger buffer.
pub fn byte_view() -> impl Strategy<Value = ByteView> {
    prop::collection::vec(any::<u8>(), 0..32).prop_flat_map(|buf| {
        let len = buf.len();
        (Just(buf), 0..=len).prop_flat_map(move |(buf, offset)| {
            (Just(buf), Just(offset), 0..=len - offset)
        })
    })
    .prop_filter_map("window in bounds", |(buf, offset, length)| {
        ByteView::new(BufferKind::Uint8Array, Bytes::from(buf), offset, length).ok()
    })
}

/// Generate Unix milliseconds inside the representable date range.
pub fn date_millis() -> impl Strategy<Value = i64> {
    -8_640_000_000_000_000i64..=8_640_000_000_000_000i64
}

/// Build `json` into `heap`, inserting every object's keys in reverse.
///
/// The result is structurally equal to [`Heap::import_json`] but differs in
/// insertion order at every level.
pub fn import_reversed(heap: &mut Heap, json: &Json) -> Value {
    match json {
        Json::Array(items) => {
            let items: Vec<Value> = items.iter().map(|item| import_reversed(heap, item)).collect();
            Value::Ref(heap.array(items))
        }
        Json::Object(map) => {
            let entries: Vec<(String, Value)> = map
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), import_reversed(heap, v)))
                .collect();
            Value::Ref(heap.object_from(entries))
        }
        other => heap.import_json(other),
    }
}

/// Parameters for a graph of plain objects.
///
/// Node `from` gets key `k<to>` pointing at node `to`. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct GraphParams {
    pub nodes: usize,
    pub edges: Vec<(usize, usize)>,
}

impl Arbitrary for GraphParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (1usize..8)
            .prop_flat_map(|nodes| {
                (
                    Just(nodes),
                    prop::collection::vec((0..nodes, 0..nodes), 0..16),
                )
            })
            .prop_map(|(nodes, edges)| GraphParams { nodes, edges })
            .boxed()
    }
}

/// Build a graph from parameters, returning the root.
pub fn graph_from_params(heap: &mut Heap, params: &GraphParams) -> NodeId {
    let ids: Vec<NodeId> = (0..params.nodes).map(|_| heap.object()).collect();
    for &(from, to) in &params.edges {
        heap.insert(ids[from], format!("k{to}"), ids[to]).expect("graph edge");
    }
    ids[0]
}

/// True when `params` has a cycle reachable from node 0.
pub fn reachable_cycle(params: &GraphParams) -> bool {
    fn visit(node: usize, params: &GraphParams, on_path: &mut Vec<bool>, done: &mut Vec<bool>) -> bool {
        if on_path[node] {
            return true;
        }
        if done[node] {
            return false;
        }
        on_path[node] = true;
        let found = params
            .edges
            .iter()
            .filter(|(from, _)| *from == node)
            .any(|&(_, to)| visit(to, params, on_path, done));
        on_path[node] = false;
        done[node] = true;
        found
    }

    visit(
        0,
        params,
        &mut vec![false; params.nodes],
        &mut vec![false; params.nodes],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use easy_hash_core::{has_circular_references, to_deterministic_json};

    proptest! {
        #[test]
        fn test_canonical_deterministic(json in json_value()) {
            let mut heap = Heap::new();
            let value = heap.import_json(&json);
            prop_assert_eq!(
                to_deterministic_json(&heap, &value),
                to_deterministic_json(&heap, &value)
            );
        }

        #[test]
        fn test_insertion_order_irrelevant(json in json_value()) {
            let mut heap = Heap::new();
            let forward = heap.import_json(&json);
            let backward = import_reversed(&mut heap, &json);
            prop_assert_eq!(
                to_deterministic_json(&heap, &forward),
                to_deterministic_json(&heap, &backward)
            );
        }

        #[test]
        fn test_plain_json_output_is_fixed_point(json in json_value()) {
            // Without cycles or exotic values the output is valid JSON that
            // canonicalizes back to itself.
            let mut heap = Heap::new();
            let value = heap.import_json(&json);
            let text = to_deterministic_json(&heap, &value);

            let reparsed: Json = serde_json::from_str(&text).unwrap();
            let again = heap.import_json(&reparsed);
            prop_assert_eq!(to_deterministic_json(&heap, &again), text);
        }

        #[test]
        fn test_shared_subgraph_equals_copies(json in json_value()) {
            let mut heap = Heap::new();
            let once = heap.import_json(&json);
            let shared = heap.array(vec![once.clone(), once]);

            let first = heap.import_json(&json);
            let second = heap.import_json(&json);
            let copied = heap.array(vec![first, second]);

            prop_assert_eq!(
                to_deterministic_json(&heap, &Value::Ref(shared)),
                to_deterministic_json(&heap, &Value::Ref(copied))
            );
        }

        #[test]
        fn test_graph_cycles_detected(params: GraphParams) {
            let mut heap = Heap::new();
            let root = Value::Ref(graph_from_params(&mut heap, &params));
            let cyclic = reachable_cycle(&params);

            prop_assert_eq!(has_circular_references(&heap, &root), cyclic);

            let text = to_deterministic_json(&heap, &root);
            prop_assert_eq!(text.contains("{{Circular("), cyclic);
            prop_assert_eq!(text, to_deterministic_json(&heap, &root));
        }

        #[test]
        fn test_exotic_scalars_are_sentinels(value in exotic_scalar()) {
            let heap = Heap::new();
            let text = to_deterministic_json(&heap, &value);
            prop_assert!(text.starts_with("{{") && text.ends_with("}}"));
        }

        #[test]
        fn test_dates_render_as_sentinels(millis in date_millis()) {
            let mut heap = Heap::new();
            let date = heap.date_from_millis(millis);
            let text = to_deterministic_json(&heap, &Value::Ref(date));
            prop_assert!(text.starts_with("{{Date(") && text.ends_with(")}}"));
            prop_assert!(!text.contains("Invalid Date"));
        }

        #[test]
        fn test_distinct_dates_render_distinctly(a in date_millis(), b in date_millis()) {
            prop_assume!(a != b);
            let mut heap = Heap::new();
            let first = heap.date_from_millis(a);
            let second = heap.date_from_millis(b);
            prop_assert_ne!(
                to_deterministic_json(&heap, &Value::Ref(first)),
                to_deterministic_json(&heap, &Value::Ref(second))
            );
        }

        #[test]
        fn test_windows_hash_only_their_bytes(view in byte_view()) {
            prop_assert_eq!(view.as_bytes().len(), view.byte_length());
            let start = view.byte_offset();
            prop_assert_eq!(view.as_bytes(), &view.buffer()[start..start + view.byte_length()]);
        }
    }
}
