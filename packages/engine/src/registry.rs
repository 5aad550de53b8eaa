//! Tag registry for mapping tag names to entries.
//!
//! An entry is either a constant, returned as-is whenever its tag matches,
//! or a transform function invoked with the node's arguments and the call
//! context. Registries are plain values: a [`Transformer`](crate::Transformer)
//! owns one, and a caller may layer a second one on top for a single call
//! through a [`RegistryView`].

use crate::error::{EngineError, Result};
use crate::loader::{parse_document, DocumentFormat};
use crate::node::Node;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Transform function stored in a registry.
///
/// Receives the arguments computed by the argument-shape rule (`None` when
/// the tag stood alone) and the caller's context.
pub type TransformFn<C> = Arc<dyn Fn(Option<Node>, &mut C) -> Result<Node> + Send + Sync>;

/// A registry entry.
pub enum Entry<C = ()> {
    /// Returned as-is, arguments are ignored
    Constant(Node),
    /// Invoked with the arguments and the context
    Function(TransformFn<C>),
}

impl<C> Entry<C> {
    /// Create a constant entry.
    pub fn constant(value: impl Into<Node>) -> Self {
        Entry::Constant(value.into())
    }

    /// Create a function entry.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Option<Node>, &mut C) -> Result<Node> + Send + Sync + 'static,
    {
        Entry::Function(Arc::new(f))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Entry::Constant(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Entry::Function(_))
    }

    /// Produce the replacement value for a matched tag.
    ///
    /// Constants ignore `args`. Errors from the function are returned
    /// unchanged.
    pub fn resolve(&self, args: Option<Node>, context: &mut C) -> Result<Node> {
        match self {
            Entry::Constant(value) => Ok(value.clone()),
            Entry::Function(f) => f(args, context),
        }
    }

    /// Short name of the entry kind, used in log fields.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Entry::Constant(_) => "constant",
            Entry::Function(_) => "function",
        }
    }
}

impl<C> Clone for Entry<C> {
    fn clone(&self) -> Self {
        match self {
            Entry::Constant(value) => Entry::Constant(value.clone()),
            Entry::Function(f) => Entry::Function(Arc::clone(f)),
        }
    }
}

impl<C> fmt::Debug for Entry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Entry::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

/// Registry mapping tag names to entries.
pub struct Registry<C = ()> {
    entries: HashMap<String, Entry<C>>,
}

impl<C> Registry<C> {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add a constant entry, builder style.
    #[must_use]
    pub fn with_constant(mut self, tag: impl Into<String>, value: impl Into<Node>) -> Self {
        self.insert(tag, Entry::constant(value));
        self
    }

    /// Add a function entry, builder style.
    #[must_use]
    pub fn with_function<F>(mut self, tag: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<Node>, &mut C) -> Result<Node> + Send + Sync + 'static,
    {
        self.insert(tag, Entry::function(f));
        self
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn insert(&mut self, tag: impl Into<String>, entry: Entry<C>) -> Option<Entry<C>> {
        self.entries.insert(tag.into(), entry)
    }

    pub fn remove(&mut self, tag: &str) -> Option<Entry<C>> {
        self.entries.remove(tag)
    }

    /// Copy every entry of `other` into this registry; `other` wins on clashes.
    pub fn extend(&mut self, other: &Registry<C>) {
        for (tag, entry) in &other.entries {
            self.entries.insert(tag.clone(), entry.clone());
        }
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Entry<C>> {
        self.entries.get(tag)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return set of all registered tag names.
    #[must_use]
    pub fn tags(&self) -> HashSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Build a constants-only registry from a mapping node.
    ///
    /// Every key becomes a tag whose constant is the corresponding value.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidRegistry` if `node` is not a mapping.
    pub fn from_node(node: Node) -> Result<Self> {
        let mapping = match node {
            Node::Mapping(mapping) => mapping,
            other => {
                return Err(EngineError::InvalidRegistry(format!(
                    "expected a mapping of tag names to values, got a {:?}",
                    other.kind()
                )))
            }
        };

        let mut registry = Self::new();
        for (tag, value) in mapping {
            registry.insert(tag, Entry::Constant(value));
        }
        Ok(registry)
    }

    /// Parse a constants-only registry from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let registry = Self::from_node(parse_document(content, DocumentFormat::Json)?)?;
        tracing::debug!(tags = registry.len(), "Parsed registry from JSON");
        Ok(registry)
    }

    /// Parse a constants-only registry from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let registry = Self::from_node(parse_document(content, DocumentFormat::Yaml)?)?;
        tracing::debug!(tags = registry.len(), "Parsed registry from YAML");
        Ok(registry)
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("Registry").field("tags", &tags).finish()
    }
}

impl<C, T: Into<String>> FromIterator<(T, Entry<C>)> for Registry<C> {
    fn from_iter<I: IntoIterator<Item = (T, Entry<C>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Read-only view of a base registry with an optional per-call overlay.
///
/// Lookups consult the overlay first, so overlay entries shadow base
/// entries of the same name. Neither registry is modified or copied.
pub struct RegistryView<'a, C> {
    base: &'a Registry<C>,
    overlay: Option<&'a Registry<C>>,
}

impl<'a, C> RegistryView<'a, C> {
    pub fn new(base: &'a Registry<C>, overlay: Option<&'a Registry<C>>) -> Self {
        Self { base, overlay }
    }

    /// Find the entry for a tag, overlay first.
    pub fn lookup(&self, tag: &str) -> Option<&'a Entry<C>> {
        self.overlay
            .and_then(|overlay| overlay.get(tag))
            .or_else(|| self.base.get(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

impl<C> Clone for RegistryView<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for RegistryView<'_, C> {}
