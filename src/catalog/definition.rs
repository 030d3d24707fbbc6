//! Tool definition files
//!
//! One JSON file per tool. Only the fields the catalog needs are read; input and
//! output schemas, provider settings and anything else in the file are ignored.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Category assigned when a definition omits `metadata.category`
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Extension of definition files inside the tools directory
pub const DEFINITION_EXTENSION: &str = "json";

fn default_enabled() -> bool {
    true
}

fn default_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

/// Metadata block of a tool definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolMetadata {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for ToolMetadata {
    fn default() -> Self {
        Self {
            category: default_category(),
            tags: Vec::new(),
        }
    }
}

/// A tool definition as it appears on disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub metadata: ToolMetadata,
}

impl ToolDefinition {
    /// Parse a definition from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Name of the tool, falling back to the file stem when the file has none
    pub fn resolved_name(&self, path: &Path) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Whether a path looks like a definition file
pub fn is_definition_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == DEFINITION_EXTENSION)
}
