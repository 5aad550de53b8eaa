//! Docstring parsing for steps

use cucumber::gherkin::Step;
use tagwalk_engine::{parse_document, DocumentFormat, Node};

/// Parse the JSON docstring attached to a step.
pub fn docstring_node(step: &Step) -> Node {
    let text = step
        .docstring
        .as_deref()
        .unwrap_or_else(|| panic!("Step '{}' needs a JSON docstring", step.value));
    parse_document(text, DocumentFormat::Json)
        .unwrap_or_else(|e| panic!("Invalid JSON docstring in '{}': {e}", step.value))
}
