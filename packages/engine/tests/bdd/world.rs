//! World struct for Cucumber BDD tests
//!
//! Contains the test state that persists across steps in a scenario.

use cucumber::World;
use std::fmt;
use tagwalk_engine::{Configuration, EngineError, Mapping, Node, Registry, Transformer};

use crate::helpers::tags::standard_tags;

/// Context threaded through every transform in the BDD suite.
pub type Context = Mapping;

/// Hooks a scenario can switch on. Closures are built when the document is
/// transformed, so the world itself stays `Debug`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HookSelection {
    /// Lowercase every string scalar
    pub lowercase_leaves: bool,
    /// Store each top-level field in the context under its key
    pub publish_fields: bool,
    /// Add one to every top-level numeric field
    pub increment_fields: bool,
    /// Wrap the final result in a one-element sequence
    pub wrap_root: bool,
}

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(World)]
#[world(init = Self::new)]
pub struct TagwalkWorld {
    /// Configured registry
    pub registry: Registry<Context>,
    /// Registry layered on top for a single call
    pub extra: Option<Registry<Context>>,
    /// Recursion ceiling, `None` for the default
    pub max_depth: Option<usize>,
    /// Hooks to install
    pub hooks: HookSelection,
    /// Caller-owned context
    pub context: Context,
    /// Last transform result (if successful)
    pub result: Option<Node>,
    /// Last error (if the transform failed)
    pub error: Option<EngineError>,
}

impl fmt::Debug for TagwalkWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagwalkWorld")
            .field("registry", &self.registry)
            .field("extra", &self.extra)
            .field("max_depth", &self.max_depth)
            .field("hooks", &self.hooks)
            .field("context", &self.context)
            .field("result", &self.result)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl Default for TagwalkWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TagwalkWorld {
    /// Create a new world with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            extra: None,
            max_depth: None,
            hooks: HookSelection::default(),
            context: Mapping::new(),
            result: None,
            error: None,
        }
    }

    /// Register the standard test tags.
    pub fn register_standard_tags(&mut self) {
        self.registry.extend(&standard_tags());
    }

    /// Build a transformer from the scenario's settings.
    pub fn transformer(&self) -> Transformer<Context> {
        let mut config = Configuration::new().with_registry(self.registry.clone());
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }

        if self.hooks.lowercase_leaves {
            config = config.with_leaf_hook(|node: Node| {
                Ok(match node.as_str() {
                    Some(s) => Node::from(s.to_lowercase()),
                    None => node,
                })
            });
        }

        let publish = self.hooks.publish_fields;
        let increment = self.hooks.increment_fields;
        if publish || increment {
            config = config.with_level_one_hook(move |value: Node, key: &str, ctx: &mut Context| {
                let value = match (increment, value.as_int()) {
                    (true, Some(n)) => Node::from(n + 1),
                    _ => value,
                };
                if publish {
                    ctx.insert(key, value.clone());
                }
                Ok(value)
            });
        }

        if self.hooks.wrap_root {
            config = config.with_root_hook(|node: Node, _: &mut Context| {
                Ok(Node::from(vec![node]))
            });
        }

        Transformer::new(config)
    }

    /// Transform a document and store the result or error
    pub fn transform(&mut self, document: Node) {
        let transformer = self.transformer();
        match transformer.call(document, &mut self.context, self.extra.as_ref()) {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e);
            }
        }
    }

    /// Check if the last transform was successful
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// Get error message if the transform failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}
