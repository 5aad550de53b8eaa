//! Then step definitions
//!
//! Steps that verify results, errors and context contents.

use cucumber::{gherkin::Step, then};

use crate::helpers::documents::docstring_node;
use crate::world::TagwalkWorld;

#[then("the result is:")]
fn assert_result(world: &mut TagwalkWorld, step: &Step) {
    assert!(
        world.is_success(),
        "Expected successful transform, got error: {:?}",
        world.error_message()
    );

    let expected = docstring_node(step);
    assert_eq!(
        world.result.as_ref(),
        Some(&expected),
        "Unexpected transform result"
    );
}

#[then(expr = "the transform fails with {string}")]
fn assert_failure(world: &mut TagwalkWorld, message: String) {
    assert!(
        !world.is_success(),
        "Expected transform to fail, got result: {:?}",
        world.result
    );
    assert_eq!(world.error_message().as_deref(), Some(message.as_str()));
}

#[then(expr = "the context field {string} equals:")]
fn assert_context_field(world: &mut TagwalkWorld, key: String, step: &Step) {
    let expected = docstring_node(step);
    assert_eq!(
        world.context.get(&key),
        Some(&expected),
        "Unexpected context field {key}"
    );
}

#[then(expr = "the context has no field {string}")]
fn assert_no_context_field(world: &mut TagwalkWorld, key: String) {
    assert!(
        !world.context.contains_key(&key),
        "Expected no context field {key}, found {:?}",
        world.context.get(&key)
    );
}

#[then(expr = "the registry still has no tag {string}")]
fn assert_registry_unchanged(world: &mut TagwalkWorld, tag: String) {
    assert!(!world.transformer().config().registry().contains(&tag));
}
