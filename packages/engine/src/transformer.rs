//! Compiled transformers
//!
//! A [`Transformer`] binds a [`Configuration`] once and can then be called
//! any number of times, from any number of threads. Each call walks the
//! document bottom-up, optionally with extra registry entries that apply to
//! that call only, and finally hands the result to the root hook.

use crate::config::Configuration;
use crate::error::Result;
use crate::node::Node;
use crate::registry::{Registry, RegistryView};
use crate::walker::Walker;
use std::fmt;
use std::sync::Arc;

/// A reusable transformer bound to one configuration.
///
/// Cloning is cheap: clones share the configuration.
///
/// # Example
///
/// ```
/// use tagwalk_engine::{Configuration, Node, Registry, Transformer};
///
/// let registry: Registry = Registry::new().with_function("%offset%", |args, _| {
///     let n = args.and_then(|a| a.as_int()).unwrap_or(0);
///     Ok(Node::from(n + 100))
/// });
/// let transformer = Transformer::new(Configuration::new().with_registry(registry));
///
/// let doc = Node::from_json_str(r#"{"position": ["%offset%", 5]}"#).unwrap();
/// let out = transformer.apply(doc).unwrap();
/// assert_eq!(out.get("position"), Some(&Node::from(105)));
/// ```
pub struct Transformer<C = ()> {
    config: Arc<Configuration<C>>,
}

impl<C> Transformer<C> {
    pub fn new(config: Configuration<C>) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration this transformer was built from.
    pub fn config(&self) -> &Configuration<C> {
        &self.config
    }

    /// Transform a document with the configured registry.
    pub fn transform(&self, document: Node, context: &mut C) -> Result<Node> {
        self.call(document, context, None)
    }

    /// Transform a document with `extra` layered over the configured
    /// registry for this call only.
    pub fn transform_with(
        &self,
        document: Node,
        context: &mut C,
        extra: &Registry<C>,
    ) -> Result<Node> {
        self.call(document, context, Some(extra))
    }

    /// Transform a document, optionally with extra registry entries.
    ///
    /// The document is walked from depth 0, then the root hook (if any) is
    /// applied once to the result. Any error from a transform function or
    /// hook aborts the call and is returned as-is.
    pub fn call(
        &self,
        document: Node,
        context: &mut C,
        extra: Option<&Registry<C>>,
    ) -> Result<Node> {
        let registry = RegistryView::new(self.config.registry(), extra);
        tracing::debug!(
            max_depth = self.config.max_depth(),
            extra_tags = extra.map_or(0, Registry::len),
            kind = ?document.kind(),
            "Starting transform"
        );

        let walked = Walker::new(&self.config, registry)
            .walk(document, 0, context)?;
        let result = match self.config.root_hook() {
            Some(hook) => hook(walked, context)?,
            None => walked,
        };

        tracing::debug!(
            kind = ?result.kind(),
            root_hook = self.config.has_root_hook(),
            "Transform complete"
        );
        Ok(result)
    }
}

impl Transformer<()> {
    /// Transform a document that needs no context.
    pub fn apply(&self, document: Node) -> Result<Node> {
        self.transform(document, &mut ())
    }
}

impl<C> Clone for Transformer<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
        }
    }
}

impl<C> fmt::Debug for Transformer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("config", &self.config)
            .finish()
    }
}

impl<C> From<Configuration<C>> for Transformer<C> {
    fn from(config: Configuration<C>) -> Self {
        Self::new(config)
    }
}

/// Compile a configuration into a plain transform function.
///
/// The returned closure takes the document, the context and an optional
/// per-call registry, exactly like [`Transformer::call`].
///
/// ```
/// use tagwalk_engine::{make_transformer, Configuration, Node, Registry};
///
/// let config: Configuration = Configuration::new()
///     .with_registry(Registry::new().with_constant("%data%", vec![4, 7, 8]));
/// let transform = make_transformer(config);
///
/// let doc = Node::from_json_str(r#"{"values": ["%data%"]}"#).unwrap();
/// let out = transform(doc, &mut (), None).unwrap();
/// assert_eq!(out.get("values"), Some(&Node::from(vec![4, 7, 8])));
/// ```
pub fn make_transformer<C>(
    config: Configuration<C>,
) -> impl Fn(Node, &mut C, Option<&Registry<C>>) -> Result<Node> + Clone + Send + Sync {
    let transformer = Transformer::new(config);
    move |document: Node, context: &mut C, extra: Option<&Registry<C>>| {
        transformer.call(document, context, extra)
    }
}
