//! Given step definitions
//!
//! Steps that set up the registry, hooks and context for scenarios.

use cucumber::{gherkin::Step, given};
use tagwalk_engine::{Entry, Registry};

use crate::helpers::documents::docstring_node;
use crate::world::TagwalkWorld;

// =============================================================================
// Registry steps
// =============================================================================

#[given("the standard test tags are registered")]
fn register_standard_tags(world: &mut TagwalkWorld) {
    world.register_standard_tags();
}

#[given(expr = "the constant {string} is registered as:")]
fn register_constant(world: &mut TagwalkWorld, tag: String, step: &Step) {
    world.registry.insert(tag, Entry::constant(docstring_node(step)));
}

#[given(expr = "the per-call constant {string} is:")]
fn register_per_call_constant(world: &mut TagwalkWorld, tag: String, step: &Step) {
    world
        .extra
        .get_or_insert_with(Registry::new)
        .insert(tag, Entry::constant(docstring_node(step)));
}

#[given("the following constants registry:")]
fn load_constants_registry(world: &mut TagwalkWorld, step: &Step) {
    let registry = Registry::from_node(docstring_node(step))
        .unwrap_or_else(|e| panic!("Invalid registry: {e}"));
    world.registry.extend(&registry);
}

// =============================================================================
// Configuration steps
// =============================================================================

#[given(expr = "the maximum depth is {int}")]
fn set_max_depth(world: &mut TagwalkWorld, depth: usize) {
    world.max_depth = Some(depth);
}

#[given("a leaf hook that lowercases strings")]
fn lowercase_leaves(world: &mut TagwalkWorld) {
    world.hooks.lowercase_leaves = true;
}

#[given("a level-one hook that stores each field in the context")]
fn publish_fields(world: &mut TagwalkWorld) {
    world.hooks.publish_fields = true;
}

#[given("a level-one hook that adds one to numeric fields")]
fn increment_fields(world: &mut TagwalkWorld) {
    world.hooks.increment_fields = true;
}

#[given("a root hook that wraps the result in a sequence")]
fn wrap_root(world: &mut TagwalkWorld) {
    world.hooks.wrap_root = true;
}

// =============================================================================
// Context steps
// =============================================================================

#[given(expr = "the context field {string} is:")]
fn set_context_field(world: &mut TagwalkWorld, key: String, step: &Step) {
    world.context.insert(key, docstring_node(step));
}
