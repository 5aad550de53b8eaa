//! Bottom-up tree walker and tag dispatcher
//!
//! The walker visits a document depth-first, post-order: every child is
//! fully resolved before its parent is looked at. Once a sequence or
//! mapping has its children resolved, it is matched against the registry:
//!
//! - **Sequence** - the tag is the first element, when that element is a
//!   string. The remaining elements become the arguments, following the
//!   argument-shape rule (see [`sequence_arguments`]).
//! - **Mapping** - the tag is the first key, in insertion order, that names
//!   a registered entry. Its value is the argument and every other entry is
//!   dropped from the result.
//!
//! A registry miss leaves the node as it is, children already transformed.
//! Beyond `max_depth` nodes are returned untouched, children included.
//!
//! The walker has no error cases of its own; every `?` in here forwards an
//! error raised by a transform function or hook.

use crate::config::Configuration;
use crate::error::Result;
use crate::node::{Mapping, Node};
use crate::registry::RegistryView;

/// One walk over one document.
///
/// Holds the configuration and the registry view for the duration of a
/// single transform call.
pub(crate) struct Walker<'a, C> {
    config: &'a Configuration<C>,
    registry: RegistryView<'a, C>,
}

impl<'a, C> Walker<'a, C> {
    pub(crate) fn new(config: &'a Configuration<C>, registry: RegistryView<'a, C>) -> Self {
        Self { config, registry }
    }

    /// Walk `node`, found at `depth` below the document root.
    pub(crate) fn walk(&self, node: Node, depth: usize, context: &mut C) -> Result<Node> {
        if depth > self.config.max_depth() {
            tracing::debug!(
                depth,
                max_depth = self.config.max_depth(),
                kind = ?node.kind(),
                "Depth limit reached, returning subtree unexpanded"
            );
            return Ok(node);
        }

        match node {
            Node::Sequence(items) => {
                let mut walked = Vec::with_capacity(items.len());
                for item in items {
                    walked.push(self.walk(item, depth + 1, context)?);
                }
                self.dispatch_sequence(walked, depth, context)
            }
            Node::Mapping(entries) => {
                let mut walked = Mapping::with_capacity(entries.len());
                for (key, value) in entries {
                    let mut value = self.walk(value, depth + 1, context)?;
                    if depth == 0 {
                        if let Some(hook) = self.config.level_one_hook() {
                            value = hook(value, &key, context)?;
                        }
                    }
                    walked.insert(key, value);
                }
                self.dispatch_mapping(walked, depth, context)
            }
            scalar => match self.config.leaf_hook() {
                Some(hook) => hook(scalar),
                None => Ok(scalar),
            },
        }
    }

    fn dispatch_sequence(&self, items: Vec<Node>, depth: usize, context: &mut C) -> Result<Node> {
        let found = items
            .first()
            .and_then(Node::as_str)
            .and_then(|tag| {
                self.registry
                    .lookup(tag)
                    .map(|entry| (tag.to_string(), entry))
            });
        let Some((tag, entry)) = found else {
            return Ok(Node::Sequence(items));
        };

        tracing::trace!(
            tag = %tag,
            entry = entry.kind_name(),
            depth,
            "Dispatching sequence tag"
        );
        entry.resolve(sequence_arguments(items), context)
    }

    fn dispatch_mapping(
        &self,
        mut mapping: Mapping,
        depth: usize,
        context: &mut C,
    ) -> Result<Node> {
        let found = mapping
            .keys()
            .find_map(|key| {
                self.registry
                    .lookup(key)
                    .map(|entry| (key.to_string(), entry))
            });
        let Some((tag, entry)) = found else {
            return Ok(Node::Mapping(mapping));
        };

        tracing::trace!(
            tag = %tag,
            entry = entry.kind_name(),
            depth,
            "Dispatching mapping tag"
        );
        entry.resolve(mapping.remove(&tag), context)
    }
}

/// Compute the arguments of a tagged sequence from its resolved items.
///
/// - no elements after the tag: `None`
/// - one element after the tag: that element
/// - several elements after the tag, the first not a sequence: all of them,
///   as a sequence (`["%tag%", a, b]` is shorthand for `["%tag%", [a, b]]`)
/// - several elements after the tag, the first a sequence: that sequence;
///   the elements after it are dropped
pub fn sequence_arguments(mut items: Vec<Node>) -> Option<Node> {
    match items.len() {
        0 | 1 => None,
        2 => items.pop(),
        len => {
            let mut rest = items.split_off(1);
            if rest[0].is_sequence() {
                tracing::debug!(
                    discarded = len - 2,
                    "Explicit argument list followed by extra elements, dropping them"
                );
                rest.truncate(1);
                rest.pop()
            } else {
                Some(Node::Sequence(rest))
            }
        }
    }
}
