//! Document loading
//!
//! Parses JSON or YAML text into a [`Node`] tree, keeping mapping key order
//! so that mapping dispatch and level-one hook order match the source text.
//!
//! # Security Features
//!
//! - **Size limits**: documents above [`config::MAX_DOCUMENT_SIZE`] are
//!   rejected before parsing
//! - **Sanitized errors**: file errors do not echo the full path

use crate::config;
use crate::error::{EngineError, Result};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension.
    ///
    /// `.yaml` and `.yml` are YAML, anything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            DocumentFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Parse a document from text.
///
/// # Errors
///
/// Returns an error if:
/// - The content exceeds [`config::MAX_DOCUMENT_SIZE`]
/// - The content is not valid JSON or YAML
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Node> {
    check_size(content.len())?;

    let node = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml_ng::from_str(content)?,
    };

    tracing::debug!(format = %format, size = content.len(), "Parsed document");
    Ok(node)
}

/// Load a document from a file, picking the format from its extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, exceeds the size limit or
/// fails to parse.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading document");

    let metadata = fs::metadata(path).map_err(|_| {
        EngineError::LoadError("Failed to access document file".to_string())
    })?;
    check_size(usize::try_from(metadata.len()).unwrap_or(usize::MAX))?;

    let content = fs::read_to_string(path).map_err(|_| {
        EngineError::LoadError("Failed to read document file".to_string())
    })?;

    parse_document(&content, DocumentFormat::from_path(path))
}

fn check_size(size: usize) -> Result<()> {
    if size > config::MAX_DOCUMENT_SIZE {
        tracing::warn!(
            size,
            max = config::MAX_DOCUMENT_SIZE,
            "Document exceeds size limit"
        );
        return Err(EngineError::LoadError(format!(
            "Document exceeds maximum size limit ({} bytes)",
            config::MAX_DOCUMENT_SIZE
        )));
    }
    Ok(())
}
