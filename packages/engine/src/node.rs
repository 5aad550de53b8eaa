//! Document model for the tagwalk engine
//!
//! A document is a tree of [`Node`]s with exactly three shapes:
//!
//! - **Scalar** - a leaf, never traversed. Besides the JSON scalars this
//!   includes [`Opaque`] host values (dates, functions, handles) that a
//!   transform function produced or the caller embedded.
//! - **Sequence** - an ordered list of nodes.
//! - **Mapping** - an insertion-ordered list of uniquely named nodes.
//!
//! Mapping order is load-bearing: a mapping dispatches on the first of its
//! keys that names a registered tag. [`Mapping`] therefore keeps insertion
//! order, and the serde implementations below read and write keys in
//! document order for both JSON and YAML.

use crate::error::{EngineError, Result};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Node
// =============================================================================

/// A value at any position of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf value, returned as-is by the walk (modulo the leaf hook)
    Scalar(Scalar),
    /// Ordered children, walked left to right
    Sequence(Vec<Node>),
    /// Named children, walked in insertion order
    Mapping(Mapping),
}

/// Leaf values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Null/None value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Host value the engine carries but never looks inside
    Opaque(Opaque),
}

/// Shape classification of a node, as seen by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

impl Node {
    /// The null scalar.
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Embed a host value as an opaque scalar.
    pub fn opaque<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Node::Scalar(Scalar::Opaque(Opaque::new(value)))
    }

    /// Shape of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Check if node is the null scalar
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// Try to get node as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Try to get node as i64
    ///
    /// Floats are truncated toward zero, so `1.9` becomes `1`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Int(i)) => Some(*i),
            Node::Scalar(Scalar::Float(f)) => Some(*f as i64),
            _ => None,
        }
    }

    /// Try to get node as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Float(f)) => Some(*f),
            Node::Scalar(Scalar::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get node as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Try to get node as a slice of children
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get node as mapping reference
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get node as an opaque host value
    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Node::Scalar(Scalar::Opaque(o)) => Some(o),
            _ => None,
        }
    }

    /// Borrow the host value inside an opaque scalar, if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_opaque().and_then(Opaque::downcast_ref::<T>)
    }

    /// Look up a mapping entry by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Look up a sequence element by position.
    pub fn at(&self, index: usize) -> Option<&Node> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Parse a node from JSON text, keeping mapping order.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize this node to JSON text.
    ///
    /// Fails with [`EngineError::OpaqueValue`] if the tree holds an opaque
    /// scalar.
    pub fn to_json_string(&self) -> Result<String> {
        self.check_serializable()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Convert into a `serde_json::Value`, failing on opaque scalars.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::Value::try_from(self.clone())
    }

    fn check_serializable(&self) -> Result<()> {
        match self {
            Node::Scalar(Scalar::Opaque(o)) => Err(EngineError::OpaqueValue(o.type_name())),
            Node::Scalar(_) => Ok(()),
            Node::Sequence(items) => items.iter().try_for_each(Node::check_serializable),
            Node::Mapping(m) => m.values().try_for_each(Node::check_serializable),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::Mapping(m)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<u32> for Node {
    fn from(i: u32) -> Self {
        Node::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<usize> for Node {
    fn from(i: usize) -> Self {
        match i64::try_from(i) {
            Ok(i) => Node::Scalar(Scalar::Int(i)),
            Err(_) => Node::Scalar(Scalar::Float(i as f64)),
        }
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Scalar(Scalar::Float(f))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(v: Vec<T>) -> Self {
        Node::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Node::null(),
        }
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Node::Mapping(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for Node {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Node::null(),
            serde_json::Value::Bool(b) => Node::from(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::from(i)
                } else if let Some(f) = n.as_f64() {
                    Node::from(f)
                } else {
                    Node::null()
                }
            }
            serde_json::Value::String(s) => Node::from(s),
            serde_json::Value::Array(arr) => {
                Node::Sequence(arr.into_iter().map(Node::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Node::Mapping(obj.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Node> for serde_json::Value {
    type Error = EngineError;

    fn try_from(node: Node) -> Result<Self> {
        Ok(match node {
            Node::Scalar(Scalar::Null) => serde_json::Value::Null,
            Node::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            Node::Scalar(Scalar::Int(i)) => serde_json::json!(i),
            // Non-finite floats have no JSON form and become null
            Node::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Node::Scalar(Scalar::String(s)) => serde_json::Value::String(s),
            Node::Scalar(Scalar::Opaque(o)) => {
                return Err(EngineError::OpaqueValue(o.type_name()))
            }
            Node::Sequence(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_>>()?,
            ),
            Node::Mapping(m) => {
                let mut obj = serde_json::Map::with_capacity(m.len());
                for (k, v) in m {
                    obj.insert(k, serde_json::Value::try_from(v)?);
                }
                serde_json::Value::Object(obj)
            }
        })
    }
}

// =============================================================================
// Opaque host values
// =============================================================================

/// A host value carried through a document without being inspected.
///
/// Cloning shares the value. Two opaque scalars are equal only when they
/// share the same allocation.
#[derive(Clone)]
pub struct Opaque {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the host value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Check the type of the host value.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Name of the host type, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// Insertion-ordered mapping with unique keys.
///
/// Inserting an existing key replaces its value in place, so the key keeps
/// its original position. Removing a key shifts the entries after it.
/// Equality compares entries in order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<String, Node>,
}

impl Mapping {
    /// Create a new empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// First key in insertion order.
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.values()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Node::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Node::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            Node::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
            Node::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Node::Scalar(Scalar::Opaque(o)) => Err(ser::Error::custom(format!(
                "cannot serialize opaque value of type {}",
                o.type_name()
            ))),
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Node::from(i),
            Err(_) => Node::from(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Node, D::Error> {
        Node::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Node, A::Error> {
        let mut mapping = Mapping::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, Node>()? {
            mapping.insert(k, v);
        }
        Ok(Node::Mapping(mapping))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
