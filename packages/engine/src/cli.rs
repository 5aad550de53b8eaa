//! Command-line interface for the `tagwalk` binary.
//!
//! Expands a document against a constants registry. Only constant tags are
//! available from the command line; transform functions need the library.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{Configuration, DEFAULT_MAX_DEPTH};
use crate::error::Result;
use crate::loader::{load_document, parse_document, DocumentFormat};
use crate::node::Node;
use crate::registry::Registry;
use crate::transformer::Transformer;

/// Tagwalk - expand tagged JSON/YAML documents.
#[derive(Parser, Debug)]
#[command(name = "tagwalk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Document to transform ("-" reads stdin)
    #[arg(default_value = "-")]
    pub document: String,

    /// Constants registry (JSON or YAML mapping of tag to value)
    #[arg(short, long)]
    pub registry: Option<PathBuf>,

    /// Format of a document read from stdin
    #[arg(long, value_enum, default_value_t = DocumentFormat::Json)]
    pub input_format: DocumentFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = DocumentFormat::Json)]
    pub output_format: DocumentFormat,

    /// Maximum recursion depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = execute(&cli)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

/// Transform the document named by `cli` and render the result.
pub fn execute(cli: &Cli) -> Result<String> {
    let registry = match &cli.registry {
        Some(path) => load_registry(path)?,
        None => Registry::new(),
    };
    tracing::debug!(
        tags = registry.len(),
        max_depth = cli.max_depth,
        "Building transformer"
    );

    let transformer = Transformer::new(
        Configuration::new()
            .with_registry(registry)
            .with_max_depth(cli.max_depth),
    );

    let document = read_document(&cli.document, cli.input_format)?;
    let result = transformer.apply(document)?;
    render(&result, cli.output_format, cli.pretty)
}

fn load_registry(path: &Path) -> Result<Registry> {
    let registry = Registry::from_node(load_document(path)?)?;
    tracing::debug!(tags = registry.len(), "Loaded registry");
    Ok(registry)
}

fn read_document(source: &str, format: DocumentFormat) -> Result<Node> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        parse_document(&content, format)
    } else {
        load_document(source)
    }
}

/// Render a node in the requested format.
pub fn render(node: &Node, format: DocumentFormat, pretty: bool) -> Result<String> {
    let value = node.to_json()?;
    Ok(match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(&value)?,
        DocumentFormat::Json => serde_json::to_string(&value)?,
        DocumentFormat::Yaml => serde_yaml_ng::to_string(&value)?,
    })
}
