//! Tagwalk Engine
//!
//! A declarative tree-rewriting engine for JSON/YAML-shaped documents.
//! This library provides functionality for:
//! - Registering tags that stand for constants or transform functions
//! - Walking a document bottom-up and replacing tagged sequences
//!   (`["%tag%", args...]`) and tagged mappings (`{"%tag%": args}`) by the
//!   value their registry entry produces
//! - Leaf, level-one and root hooks around the walk
//! - Loading documents and constant registries from JSON or YAML
//!
//! # Example
//!
//! ```
//! use tagwalk_engine::{Configuration, Node, Registry, Transformer};
//!
//! let registry: Registry = Registry::new()
//!     .with_constant("%data%", vec![4, 7, 8])
//!     .with_function("%offset%", |args, _| {
//!         let n = args.and_then(|a| a.as_int()).unwrap_or(0);
//!         Ok(Node::from(n + 100))
//!     });
//! let transformer = Transformer::new(Configuration::new().with_registry(registry));
//!
//! let doc = Node::from_json_str(r#"{"position": ["%offset%", 5], "values": ["%data%"]}"#)?;
//! let out = transformer.apply(doc)?;
//!
//! assert_eq!(out.to_json_string()?, r#"{"position":105,"values":[4,7,8]}"#);
//! # Ok::<(), tagwalk_engine::EngineError>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod node;
pub mod registry;
pub mod transformer;
pub mod walker;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used items
pub use config::{Configuration, LeafHook, LevelOneHook, RootHook, DEFAULT_MAX_DEPTH};
pub use error::{EngineError, Result};
pub use loader::{load_document, parse_document, DocumentFormat};
pub use node::{Mapping, Node, NodeKind, Opaque, Scalar};
pub use registry::{Entry, Registry, RegistryView, TransformFn};
pub use transformer::{make_transformer, Transformer};
pub use walker::sequence_arguments;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
