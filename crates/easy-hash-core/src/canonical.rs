//! Deterministic canonical JSON for arbitrary value graphs.
//!
//! The output is JSON-like text with these rules:
//! - Object keys are sorted by byte order; arrays keep their order
//! - Values plain JSON cannot represent become `{{...}}` sentinels
//! - A container reachable from itself becomes `{{Circular(<path>)}}`,
//!   where `<path>` is where that container was entered
//!
//! Sentinels are written as raw text, never inside a string literal. A JSON
//! value cannot begin with `{{`, so no string or object collides with one.
//!
//! Paths start at `$`, the root. Each step is `.key` for an object entry or
//! own property, `[i]` for an array element or set member, and `[i,0]` or
//! `[i,1]` for the key or value of map entry `i`. Keys outside
//! `[A-Za-z0-9_]+` are written as JSON string literals, so every path reads
//! back to exactly one sequence of steps.
//!
//! All passes walk the graph with an explicit stack; nesting depth is
//! bounded by memory, not by the thread's call stack.
//!
//! **This encoding is the hash pre-image.** Changing any rule changes every
//! digest computed from a structured value.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::mem;
use tracing::{debug, trace};

use crate::value::{Heap, Node, NodeId, PathSegment, Properties, Value};

/// Opening bracket reserved for sentinels.
pub const SENTINEL_OPEN: &str = "{{";
/// Closing bracket reserved for sentinels.
pub const SENTINEL_CLOSE: &str = "}}";

/// Path of the value passed to canonicalization.
pub const PATH_ROOT: &str = "$";

/// Text form of an invalid date.
const INVALID_DATE: &str = "Invalid Date";

/// Milliseconds in 400 Gregorian years, the period of the calendar.
const GREGORIAN_CYCLE_MILLIS: i64 = 146_097 * 86_400_000;

/// Entries of a keyed container, in insertion order.
pub type Entries = Vec<(String, Canonical)>;

/// A value graph lowered to an owned, acyclic tree.
///
/// Produced by [`replace_circular_references`]; rendered by [`stringify`].
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical {
    /// Any non-container value. Never holds [`Value::Ref`].
    Scalar(Value),
    Object(Entries),
    Array(Vec<Canonical>),
    Function { source: String, props: Entries },
    /// Unix milliseconds; `None` is an invalid date.
    Date { millis: Option<i64>, props: Entries },
    Map {
        entries: Vec<(Canonical, Canonical)>,
        props: Entries,
    },
    Set { members: Vec<Canonical>, props: Entries },
    /// Back-reference to an ancestor, holding the rendered path where it was entered.
    Circular(String),
    /// A handle with no node in the heap it was resolved against.
    Dangling(NodeId),
}

impl Canonical {
    /// Move every direct child onto `stack`, leaving this node without children.
    fn detach_children(&mut self, stack: &mut Vec<Canonical>) {
        match self {
            Self::Object(entries) => stack.extend(mem::take(entries).into_iter().map(|(_, c)| c)),
            Self::Array(items) => stack.append(items),
            Self::Function { props, .. } | Self::Date { props, .. } => {
                stack.extend(mem::take(props).into_iter().map(|(_, c)| c));
            }
            Self::Map { entries, props } => {
                for (key, value) in mem::take(entries) {
                    stack.push(key);
                    stack.push(value);
                }
                stack.extend(mem::take(props).into_iter().map(|(_, c)| c));
            }
            Self::Set { members, props } => {
                stack.append(members);
                stack.extend(mem::take(props).into_iter().map(|(_, c)| c));
            }
            Self::Scalar(_) | Self::Circular(_) | Self::Dangling(_) => {}
        }
    }
}

// Deep trees are flattened before they are freed.
impl Drop for Canonical {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.detach_children(&mut stack);
        }
    }
}

/// Canonicalize `value` to its deterministic text form.
///
/// Never fails: cycles, non-finite numbers, big integers, symbols and
/// dangling handles all have a sentinel.
pub fn to_deterministic_json(heap: &Heap, value: &Value) -> String {
    let cyclic = has_circular_references(heap, value);
    let tree = if cyclic {
        debug!("cyclic input, rewriting back-references");
        replace_circular_references(heap, value)
    } else {
        Lowering::plain(heap).lower(value)
    };

    let out = stringify(&tree);
    trace!(len = out.len(), cyclic, "canonicalized value");
    out
}

/// Canonical form as UTF-8 bytes, ready for hashing.
pub fn canonical_bytes(heap: &Heap, value: &Value) -> Vec<u8> {
    to_deterministic_json(heap, value).into_bytes()
}

/// Check whether any container in `value` is reachable from itself.
pub fn has_circular_references(heap: &Heap, value: &Value) -> bool {
    let mut ancestors = HashSet::new();
    let mut stack: Vec<(NodeId, std::vec::IntoIter<(PathSegment<'_>, &Value)>)> = Vec::new();

    if let Value::Ref(id) = value {
        if let Some(node) = heap.get(*id) {
            ancestors.insert(*id);
            stack.push((*id, node.children().into_iter()));
        }
    }

    while let Some((_, children)) = stack.last_mut() {
        match children.next() {
            Some((_, Value::Ref(id))) => {
                if ancestors.contains(id) {
                    return true;
                }
                if let Some(node) = heap.get(*id) {
                    ancestors.insert(*id);
                    stack.push((*id, node.children().into_iter()));
                }
            }
            Some(_) => {}
            None => {
                if let Some((id, _)) = stack.pop() {
                    ancestors.remove(&id);
                }
            }
        }
    }
    false
}

/// Lower `value` to a tree, replacing back-references with [`Canonical::Circular`].
///
/// Only true cycles are replaced: a container shared by two siblings is
/// expanded at both places, so it renders the same as two deep copies.
pub fn replace_circular_references(heap: &Heap, value: &Value) -> Canonical {
    Lowering::tracking(heap).lower(value)
}

/// Walks a heap into a [`Canonical`] tree.
struct Lowering<'h> {
    heap: &'h Heap,
    /// Ancestor handle -> number of path segments leading to it. `None` when
    /// the input is known to be acyclic.
    ancestors: Option<HashMap<NodeId, usize>>,
}

/// A container whose children are being lowered.
struct Frame<'h> {
    id: NodeId,
    node: &'h Node,
    children: std::vec::IntoIter<(PathSegment<'h>, &'h Value)>,
    done: Vec<Canonical>,
}

enum Entered<'h> {
    Leaf(Canonical),
    Open(Frame<'h>),
}

impl<'h> Lowering<'h> {
    fn plain(heap: &'h Heap) -> Self {
        Self {
            heap,
            ancestors: None,
        }
    }

    fn tracking(heap: &'h Heap) -> Self {
        Self {
            heap,
            ancestors: Some(HashMap::new()),
        }
    }

    fn lower(&mut self, root: &'h Value) -> Canonical {
        let mut frames: Vec<Frame<'h>> = Vec::new();
        let mut path: Vec<PathSegment<'h>> = Vec::new();
        let mut next = root;

        'descend: loop {
            let mut tree = match self.enter(next, &path) {
                Entered::Leaf(tree) => tree,
                Entered::Open(mut frame) => match frame.children.next() {
                    Some((segment, child)) => {
                        frames.push(frame);
                        path.push(segment);
                        next = child;
                        continue 'descend;
                    }
                    None => self.leave(frame),
                },
            };

            // Hand the finished subtree to its parent, closing every parent
            // that has no children left.
            loop {
                let Some(mut parent) = frames.pop() else {
                    return tree;
                };
                parent.done.push(tree);
                path.pop();
                match parent.children.next() {
                    Some((segment, child)) => {
                        frames.push(parent);
                        path.push(segment);
                        next = child;
                        continue 'descend;
                    }
                    None => tree = self.leave(parent),
                }
            }
        }
    }

    fn enter(&mut self, value: &'h Value, path: &[PathSegment<'h>]) -> Entered<'h> {
        let id = match value {
            Value::Ref(id) => *id,
            scalar => return Entered::Leaf(Canonical::Scalar(scalar.clone())),
        };

        if let Some(&depth) = self.ancestors.as_ref().and_then(|a| a.get(&id)) {
            return Entered::Leaf(Canonical::Circular(render_path(&path[..depth])));
        }
        let heap = self.heap;
        let Some(node) = heap.get(id) else {
            return Entered::Leaf(Canonical::Dangling(id));
        };

        if let Some(ancestors) = self.ancestors.as_mut() {
            ancestors.insert(id, path.len());
        }
        let children = node.children();
        Entered::Open(Frame {
            id,
            node,
            done: Vec::with_capacity(children.len()),
            children: children.into_iter(),
        })
    }

    fn leave(&mut self, frame: Frame<'h>) -> Canonical {
        if let Some(ancestors) = self.ancestors.as_mut() {
            ancestors.remove(&frame.id);
        }
        frame.finish()
    }
}

impl Frame<'_> {
    /// Reassemble the node from its lowered children, which arrive in
    /// [`Node::children`] order.
    fn finish(self) -> Canonical {
        let mut done = self.done.into_iter();
        match self.node {
            Node::Object(props) => Canonical::Object(keyed(props, &mut done)),
            Node::Array(_) => Canonical::Array(done.collect()),
            Node::Function { source, props } => Canonical::Function {
                source: source.clone(),
                props: keyed(props, &mut done),
            },
            Node::Date { millis, props } => Canonical::Date {
                millis: *millis,
                props: keyed(props, &mut done),
            },
            Node::Map { entries, props } => {
                let mut pairs = Vec::with_capacity(entries.len());
                for _ in 0..entries.len() {
                    if let (Some(key), Some(value)) = (done.next(), done.next()) {
                        pairs.push((key, value));
                    }
                }
                Canonical::Map {
                    entries: pairs,
                    props: keyed(props, &mut done),
                }
            }
            Node::Set { members, props } => Canonical::Set {
                members: done.by_ref().take(members.len()).collect(),
                props: keyed(props, &mut done),
            },
        }
    }
}

fn keyed(props: &Properties, done: &mut std::vec::IntoIter<Canonical>) -> Entries {
    props.keys().cloned().zip(done).collect()
}

/// Render a sequence of path segments, starting from [`PATH_ROOT`].
pub fn render_path(path: &[PathSegment<'_>]) -> String {
    let mut out = String::from(PATH_ROOT);
    for segment in path {
        match segment {
            PathSegment::Key(key) if is_bare_key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathSegment::Key(key) => {
                out.push('.');
                write_string(&mut out, key);
            }
            PathSegment::Index(i) => {
                let _ = write!(out, "[{i}]");
            }
            PathSegment::MapKey(i) => {
                let _ = write!(out, "[{i},0]");
            }
            PathSegment::MapValue(i) => {
                let _ = write!(out, "[{i},1]");
            }
        }
    }
    out
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Render a lowered tree to canonical text.
pub fn stringify(tree: &Canonical) -> String {
    let mut writer = Writer::default();
    let mut tasks = vec![Task::Tree(tree)];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Tree(tree) => writer.tree(tree, &mut tasks),
            Task::Raw(text) => writer.out().push_str(text),
            Task::Key(key) => write_string(writer.out(), key),
            Task::Capture => writer.captures.push(String::new()),
            Task::Release => {
                if let Some(text) = writer.captures.pop() {
                    writer.captured.push(text);
                }
            }
            Task::MapEntries(count) => writer.map_entries(count),
        }
    }
    writer.base
}

/// Pending output, popped last-in first-out.
enum Task<'t> {
    Tree(&'t Canonical),
    Raw(&'static str),
    /// Object key, written as a JSON string literal.
    Key(&'t str),
    /// Redirect output into a fresh buffer.
    Capture,
    /// Close the innermost buffer and keep its text for [`Task::MapEntries`].
    Release,
    /// Sort and write the last `n` captured key/value pairs.
    MapEntries(usize),
}

#[derive(Default)]
struct Writer {
    base: String,
    /// Open capture buffers, innermost last.
    captures: Vec<String>,
    /// Released captures waiting for their map.
    captured: Vec<String>,
}

impl Writer {
    fn out(&mut self) -> &mut String {
        self.captures.last_mut().unwrap_or(&mut self.base)
    }

    /// Write the parts of `tree` that need no children and schedule the rest.
    fn tree<'t>(&mut self, tree: &'t Canonical, tasks: &mut Vec<Task<'t>>) {
        let mut seq = Vec::new();
        let out = self.out();
        match tree {
            Canonical::Scalar(value) => write_scalar(out, value),
            Canonical::Object(entries) => object_tasks(entries, &mut seq),
            Canonical::Array(items) => array_tasks(items, &mut seq),
            Canonical::Function { source, props } => {
                out.push_str(SENTINEL_OPEN);
                out.push_str("Function(");
                write_string(out, source);
                out.push(')');
                props_tasks(props, &mut seq);
                seq.push(Task::Raw(SENTINEL_CLOSE));
            }
            Canonical::Date { millis, props } => {
                out.push_str(SENTINEL_OPEN);
                out.push_str("Date(");
                match millis {
                    Some(millis) => out.push_str(&format_date(*millis)),
                    None => out.push_str(INVALID_DATE),
                }
                out.push(')');
                props_tasks(props, &mut seq);
                seq.push(Task::Raw(SENTINEL_CLOSE));
            }
            Canonical::Map { entries, props } => {
                out.push_str(SENTINEL_OPEN);
                out.push_str("Map(");
                if let [(key, value)] = entries.as_slice() {
                    seq.extend([Task::Raw("{"), Task::Tree(key), Task::Raw(":"), Task::Tree(value)]);
                    seq.push(Task::Raw("}"));
                } else {
                    map_tasks(entries, &mut seq);
                }
                seq.push(Task::Raw(")"));
                props_tasks(props, &mut seq);
                seq.push(Task::Raw(SENTINEL_CLOSE));
            }
            Canonical::Set { members, props } => {
                out.push_str(SENTINEL_OPEN);
                out.push_str("Set(");
                array_tasks(members, &mut seq);
                seq.push(Task::Raw(")"));
                props_tasks(props, &mut seq);
                seq.push(Task::Raw(SENTINEL_CLOSE));
            }
            Canonical::Circular(path) => write_sentinel(out, "Circular", path),
            Canonical::Dangling(id) => write_sentinel(out, "Dangling", &id.index().to_string()),
        }
        tasks.extend(seq.into_iter().rev());
    }

    /// Write map entries as a mapping keyed by each key's canonical text.
    ///
    /// String keys stay quoted and other keys are bare, so `"1"` and `1`
    /// remain distinct. Entries are sorted by key text, then value text.
    fn map_entries(&mut self, count: usize) {
        let start = self.captured.len().saturating_sub(count * 2);
        let mut texts = self.captured.split_off(start).into_iter();
        let mut rendered = Vec::with_capacity(count);
        while let (Some(key), Some(value)) = (texts.next(), texts.next()) {
            rendered.push((key, value));
        }
        rendered.sort();

        let out = self.out();
        out.push('{');
        for (i, (key, value)) in rendered.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push(':');
            out.push_str(value);
        }
        out.push('}');
    }
}

fn write_scalar(out: &mut String, value: &Value) {
    match value {
        Value::Undefined => {
            out.push_str(SENTINEL_OPEN);
            out.push_str("undefined");
            out.push_str(SENTINEL_CLOSE);
        }
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) if n.is_finite() => out.push_str(&format_number(*n)),
        Value::Number(n) => {
            let text = if n.is_nan() {
                "NaN"
            } else if *n > 0.0 {
                "Infinity"
            } else {
                "-Infinity"
            };
            write_sentinel(out, "Number", text);
        }
        Value::BigInt(n) => write_sentinel(out, "BigInt", n.as_str()),
        Value::String(s) => write_string(out, s),
        Value::Symbol(symbol) => {
            out.push_str(SENTINEL_OPEN);
            out.push_str("Symbol(");
            if let Some(description) = symbol.description() {
                write_string(out, description);
            }
            out.push(')');
            out.push_str(SENTINEL_CLOSE);
        }
        Value::Buffer(view) => write_sentinel(out, view.kind().name(), &view.to_hex()),
        Value::Ref(id) => write_sentinel(out, "Dangling", &id.index().to_string()),
    }
}

/// Write `{{<tag>(<text>)}}`.
fn write_sentinel(out: &mut String, tag: &str, text: &str) {
    let _ = write!(out, "{SENTINEL_OPEN}{tag}({text}){SENTINEL_CLOSE}");
}

/// Write a JSON string literal.
fn write_string(out: &mut String, s: &str) {
    out.push_str(&serde_json::Value::from(s).to_string());
}

/// Capture every key and value so [`Task::MapEntries`] can sort them.
fn map_tasks<'t>(entries: &'t [(Canonical, Canonical)], seq: &mut Vec<Task<'t>>) {
    for (key, value) in entries {
        seq.extend([
            Task::Capture,
            Task::Tree(key),
            Task::Release,
            Task::Capture,
            Task::Tree(value),
            Task::Release,
        ]);
    }
    seq.push(Task::MapEntries(entries.len()));
}

fn array_tasks<'t>(items: &'t [Canonical], seq: &mut Vec<Task<'t>>) {
    seq.push(Task::Raw("["));
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            seq.push(Task::Raw(","));
        }
        seq.push(Task::Tree(item));
    }
    seq.push(Task::Raw("]"));
}

/// Schedule an object with keys sorted by byte order.
fn object_tasks<'t>(entries: &'t [(String, Canonical)], seq: &mut Vec<Task<'t>>) {
    let mut sorted: Vec<&'t (String, Canonical)> = entries.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    seq.push(Task::Raw("{"));
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            seq.push(Task::Raw(","));
        }
        seq.push(Task::Key(key));
        seq.push(Task::Raw(":"));
        seq.push(Task::Tree(value));
    }
    seq.push(Task::Raw("}"));
}

/// Own properties as `<{...}>`, or nothing when there are none.
fn props_tasks<'t>(props: &'t [(String, Canonical)], seq: &mut Vec<Task<'t>>) {
    if props.is_empty() {
        return;
    }
    seq.push(Task::Raw("<"));
    object_tasks(props, seq);
    seq.push(Task::Raw(">"));
}

/// ISO-8601 text for a date in Unix milliseconds.
///
/// Years `0..=9999` print with four digits; others print signed with six,
/// e.g. `+275760-09-13T00:00:00.000Z`. The calendar repeats every 400
/// years, so the fields come from the matching instant in the first cycle
/// after the epoch.
pub fn format_date(millis: i64) -> String {
    let cycles = millis.div_euclid(GREGORIAN_CYCLE_MILLIS);
    // `DateTime<Utc>` defaults to the epoch.
    let within = DateTime::<Utc>::default()
        + TimeDelta::milliseconds(millis.rem_euclid(GREGORIAN_CYCLE_MILLIS));
    let year = i64::from(within.year()) + 400 * cycles;

    let mut out = String::with_capacity(27);
    if (0..=9999).contains(&year) {
        let _ = write!(out, "{year:04}");
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        let _ = write!(out, "{sign}{:06}", year.unsigned_abs());
    }
    let _ = write!(
        out,
        "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        within.month(),
        within.day(),
        within.hour(),
        within.minute(),
        within.second(),
        within.timestamp_subsec_millis()
    );
    out
}

/// Format a finite number: shortest round-trip digits, exponent form
/// outside `[1e-6, 1e21)`, and `-0` as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{n}");
    }

    let sci = format!("{n:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}
