//! When step definitions
//!
//! Steps that run a transform.

use cucumber::{gherkin::Step, when};

use crate::helpers::documents::docstring_node;
use crate::world::TagwalkWorld;

#[when("the document is transformed:")]
fn transform_document(world: &mut TagwalkWorld, step: &Step) {
    world.transform(docstring_node(step));
}

#[when("the same document is transformed again without the per-call registry:")]
fn transform_without_extra(world: &mut TagwalkWorld, step: &Step) {
    world.extra = None;
    world.transform(docstring_node(step));
}
