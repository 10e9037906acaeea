//! The value model: scalars plus arena-allocated containers.
//!
//! Containers (objects, arrays, functions, dates, maps, sets) live in a
//! [`Heap`] and are referenced through [`NodeId`] handles. A handle is the
//! container's identity: two handles to the same node are the same object,
//! which is what makes self-referential graphs expressible.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::ByteView;
use crate::error::{BigIntParseError, HeapError, Result};

/// Own enumerable string-keyed properties, in insertion order.
pub type Properties = IndexMap<String, Value>;

/// Largest distance from the Unix epoch, in milliseconds, a valid date may have.
pub const MAX_DATE_MILLIS: i64 = 8_640_000_000_000_000;

/// Handle to a container node in a [`Heap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its heap.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Arbitrary-precision integer, kept as normalized decimal text.
///
/// No leading zeros, and zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInt(String);

impl BigInt {
    /// Parse a decimal literal with an optional sign.
    pub fn parse(s: &str) -> std::result::Result<Self, BigIntParseError> {
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BigIntParseError(s.to_string()));
        }

        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return Ok(Self("0".to_string()));
        }
        if negative {
            Ok(Self(format!("-{trimmed}")))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Decimal text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BigInt {
    type Err = BigIntParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! bigint_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigInt {
                fn from(n: $t) -> Self {
                    Self(n.to_string())
                }
            }
        )*
    };
}

bigint_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(0);

/// A unique token with an optional description.
///
/// Each constructor call mints a fresh identity and clones share it, so two
/// symbols with the same description are still different keys. Canonical
/// text shows only the description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: u64,
    description: Option<String>,
}

impl Symbol {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: Some(description.into()),
        }
    }

    /// A symbol created without a description.
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// Any value that can be canonicalized.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Symbol(Symbol),
    Buffer(ByteView),
    /// A container allocated in a [`Heap`].
    Ref(NodeId),
}

impl Value {
    /// Category name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Buffer(_) => "buffer",
            Self::Ref(_) => "object",
        }
    }

    /// Key equality used by sets and maps.
    ///
    /// `NaN` equals itself and `0` equals `-0`. Containers compare by
    /// handle and symbols by identity. Buffers never match: every
    /// [`ByteView`] is its own view object, even over the same bytes.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Ref(a), Self::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Self::BigInt(n)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Self::Symbol(s)
    }
}

impl From<ByteView> for Value {
    fn from(view: ByteView) -> Self {
        Self::Buffer(view)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Self::Ref(id)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// A container stored in a [`Heap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain key-value mapping.
    Object(Properties),
    Array(Vec<Value>),
    /// Callable with its source text. Functions may carry attached data.
    Function { source: String, props: Properties },
    /// Unix milliseconds within [`MAX_DATE_MILLIS`]; `None` is an invalid date.
    Date {
        millis: Option<i64>,
        props: Properties,
    },
    /// Key-value collection with arbitrary keys, in insertion order.
    Map {
        entries: Vec<(Value, Value)>,
        props: Properties,
    },
    /// Collection of distinct members, in insertion order.
    Set { members: Vec<Value>, props: Properties },
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "Object",
            Self::Array(_) => "Array",
            Self::Function { .. } => "Function",
            Self::Date { .. } => "Date",
            Self::Map { .. } => "Map",
            Self::Set { .. } => "Set",
        }
    }

    fn keyed_mut(&mut self) -> Option<&mut Properties> {
        match self {
            Self::Object(props)
            | Self::Function { props, .. }
            | Self::Date { props, .. }
            | Self::Map { props, .. }
            | Self::Set { props, .. } => Some(props),
            Self::Array(_) => None,
        }
    }

    /// Every directly contained value, paired with its path segment.
    ///
    /// Order: object entries, array elements, map entries (key then value)
    /// or set members first, own properties last.
    pub fn children(&self) -> Vec<(PathSegment<'_>, &Value)> {
        let mut out = Vec::new();
        match self {
            Self::Object(props) => out.extend(props.iter().map(keyed)),
            Self::Array(items) => {
                out.extend(items.iter().enumerate().map(|(i, v)| (PathSegment::Index(i), v)));
            }
            Self::Function { props, .. } | Self::Date { props, .. } => {
                out.extend(props.iter().map(keyed));
            }
            Self::Map { entries, props } => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    out.push((PathSegment::MapKey(i), k));
                    out.push((PathSegment::MapValue(i), v));
                }
                out.extend(props.iter().map(keyed));
            }
            Self::Set { members, props } => {
                out.extend(members.iter().enumerate().map(|(i, v)| (PathSegment::Index(i), v)));
                out.extend(props.iter().map(keyed));
            }
        }
        out
    }
}

fn keyed<'a>((key, value): (&'a String, &'a Value)) -> (PathSegment<'a>, &'a Value) {
    (PathSegment::Key(key), value)
}

/// One step from a container to a directly contained value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// Object entry or own property.
    Key(&'a str),
    /// Array element or set member.
    Index(usize),
    /// Key of the map entry at this insertion index.
    MapKey(usize),
    /// Value of the map entry at this insertion index.
    MapValue(usize),
}

/// Arena owning every container of a value graph.
///
/// A heap is built by the caller and only read during canonicalization.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    nodes: Vec<Node>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(HeapError::UnknownNode(id))
    }

    /// Look up a node by handle.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate an empty plain object.
    pub fn object(&mut self) -> NodeId {
        self.alloc(Node::Object(Properties::new()))
    }

    /// Allocate a plain object from entries, in the given insertion order.
    pub fn object_from<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> NodeId
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let props = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.alloc(Node::Object(props))
    }

    pub fn array(&mut self, items: impl IntoIterator<Item = Value>) -> NodeId {
        self.alloc(Node::Array(items.into_iter().collect()))
    }

    pub fn function(&mut self, source: impl Into<String>) -> NodeId {
        self.alloc(Node::Function {
            source: source.into(),
            props: Properties::new(),
        })
    }

    pub fn date(&mut self, instant: DateTime<Utc>) -> NodeId {
        self.date_from_millis(instant.timestamp_millis())
    }

    /// Allocate a date from Unix milliseconds.
    ///
    /// Anything farther than [`MAX_DATE_MILLIS`] from the epoch yields an
    /// invalid date.
    pub fn date_from_millis(&mut self, millis: i64) -> NodeId {
        self.alloc(Node::Date {
            millis: (-MAX_DATE_MILLIS..=MAX_DATE_MILLIS)
                .contains(&millis)
                .then_some(millis),
            props: Properties::new(),
        })
    }

    pub fn invalid_date(&mut self) -> NodeId {
        self.alloc(Node::Date {
            millis: None,
            props: Properties::new(),
        })
    }

    pub fn map(&mut self) -> NodeId {
        self.alloc(Node::Map {
            entries: Vec::new(),
            props: Properties::new(),
        })
    }

    pub fn set(&mut self) -> NodeId {
        self.alloc(Node::Set {
            members: Vec::new(),
            props: Properties::new(),
        })
    }

    /// Set an object entry, or an own property on an exotic node.
    ///
    /// Overwriting an existing key keeps its original position.
    pub fn insert(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let node = self.node_mut(id)?;
        let kind = node.kind_name();
        let props = node.keyed_mut().ok_or(HeapError::NotKeyed { id, kind })?;
        props.insert(key.into(), value.into());
        Ok(())
    }

    /// Append an array element, or add a set member if not already present.
    pub fn push(&mut self, id: NodeId, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self.node_mut(id)? {
            Node::Array(items) => items.push(value),
            Node::Set { members, .. } => {
                if !members.iter().any(|m| m.same_value_zero(&value)) {
                    members.push(value);
                }
            }
            other => {
                return Err(HeapError::NotSequence {
                    id,
                    kind: other.kind_name(),
                })
            }
        }
        Ok(())
    }

    /// Set a map entry. An existing equal key keeps its position.
    pub fn map_insert(
        &mut self,
        id: NodeId,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let (key, value) = (key.into(), value.into());
        match self.node_mut(id)? {
            Node::Map { entries, .. } => {
                match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
                Ok(())
            }
            other => Err(HeapError::NotMap {
                id,
                kind: other.kind_name(),
            }),
        }
    }

    /// Build a value from parsed JSON, allocating its objects and arrays.
    pub fn import_json(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                let items: Vec<Value> = items.iter().map(|item| self.import_json(item)).collect();
                Value::Ref(self.array(items))
            }
            serde_json::Value::Object(map) => {
                let entries: Vec<(String, Value)> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.import_json(v)))
                    .collect();
                Value::Ref(self.object_from(entries))
            }
        }
    }
}
