//! Configuration for the tagwalk engine
//!
//! Holds the engine-wide limits and the [`Configuration`] bundle a
//! [`Transformer`](crate::Transformer) is compiled from.
//!
//! # Limits
//!
//! - [`DEFAULT_MAX_DEPTH`] bounds recursion when the caller does not pick a
//!   depth. Exceeding it truncates the walk, it is never an error.
//! - [`MAX_DOCUMENT_SIZE`] bounds the size of documents parsed from text.
//!
//! # Example
//!
//! ```
//! use tagwalk_engine::{Configuration, Node, Registry};
//!
//! let registry: Registry = Registry::new().with_constant("%data%", vec![4, 7, 8]);
//! let config = Configuration::new()
//!     .with_registry(registry)
//!     .with_max_depth(32)
//!     .with_leaf_hook(|node: Node| Ok(node));
//!
//! assert_eq!(config.max_depth(), 32);
//! assert!(config.has_leaf_hook());
//! ```

use crate::error::Result;
use crate::node::Node;
use crate::registry::Registry;
use std::fmt;
use std::sync::Arc;

/// Default recursion ceiling for a walk.
///
/// Deep enough for any hand-written template, shallow enough to stop
/// pathological or self-referencing input well before the stack runs out.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Maximum size in bytes of a document parsed from text (1 MB).
pub const MAX_DOCUMENT_SIZE: usize = 1_000_000;

/// Hook applied to every scalar reached by the walk.
pub type LeafHook = Arc<dyn Fn(Node) -> Result<Node> + Send + Sync>;

/// Hook applied to each direct child of a root mapping, with its key.
pub type LevelOneHook<C> = Arc<dyn Fn(Node, &str, &mut C) -> Result<Node> + Send + Sync>;

/// Hook applied once to the fully walked document.
pub type RootHook<C> = Arc<dyn Fn(Node, &mut C) -> Result<Node> + Send + Sync>;

/// Immutable bundle of registry, recursion limit and hooks.
///
/// Built with the `with_*` methods and handed to a
/// [`Transformer`](crate::Transformer), which never mutates it. No validation
/// happens here: a misbehaving transform function surfaces at first use.
pub struct Configuration<C = ()> {
    registry: Registry<C>,
    max_depth: usize,
    leaf_hook: Option<LeafHook>,
    level_one_hook: Option<LevelOneHook<C>>,
    root_hook: Option<RootHook<C>>,
}

impl<C> Configuration<C> {
    /// Create a configuration with an empty registry, the default depth and
    /// no hooks.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            leaf_hook: None,
            level_one_hook: None,
            root_hook: None,
        }
    }

    /// Set the registry.
    pub fn with_registry(mut self, registry: Registry<C>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the recursion ceiling.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the hook applied to every scalar.
    pub fn with_leaf_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Node) -> Result<Node> + Send + Sync + 'static,
    {
        self.leaf_hook = Some(Arc::new(hook));
        self
    }

    /// Set the hook applied to each direct child of a root mapping.
    ///
    /// The hook runs right after that child's own walk, before the next
    /// sibling is walked, so it can publish results into the context for
    /// later siblings to read.
    pub fn with_level_one_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Node, &str, &mut C) -> Result<Node> + Send + Sync + 'static,
    {
        self.level_one_hook = Some(Arc::new(hook));
        self
    }

    /// Set the hook applied once to the final result.
    pub fn with_root_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Node, &mut C) -> Result<Node> + Send + Sync + 'static,
    {
        self.root_hook = Some(Arc::new(hook));
        self
    }

    /// The configured registry.
    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    /// The recursion ceiling.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn has_leaf_hook(&self) -> bool {
        self.leaf_hook.is_some()
    }

    pub fn has_level_one_hook(&self) -> bool {
        self.level_one_hook.is_some()
    }

    pub fn has_root_hook(&self) -> bool {
        self.root_hook.is_some()
    }

    pub(crate) fn leaf_hook(&self) -> Option<&LeafHook> {
        self.leaf_hook.as_ref()
    }

    pub(crate) fn level_one_hook(&self) -> Option<&LevelOneHook<C>> {
        self.level_one_hook.as_ref()
    }

    pub(crate) fn root_hook(&self) -> Option<&RootHook<C>> {
        self.root_hook.as_ref()
    }
}

impl<C> Default for Configuration<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Configuration<C> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            max_depth: self.max_depth,
            leaf_hook: self.leaf_hook.clone(),
            level_one_hook: self.level_one_hook.clone(),
            root_hook: self.root_hook.clone(),
        }
    }
}

impl<C> fmt::Debug for Configuration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .field("leaf_hook", &self.has_leaf_hook())
            .field("level_one_hook", &self.has_level_one_hook())
            .field("root_hook", &self.has_root_hook())
            .finish()
    }
}
