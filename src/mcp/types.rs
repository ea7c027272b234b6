use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{Completion, Definition, Hover, LoadWarning};

// ============================================================
// Parameter Types
// ============================================================

/// Parameters for tools that only need a project.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParams {
    /// Absolute path to the project root (or any directory below the config file)
    pub project_root_path: String,
}

/// Parameters for hover, complete and definition.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionParams {
    /// Absolute path to the project root (or any directory below the config file)
    pub project_root_path: String,
    /// Full text of the source line containing the reference
    pub line_text: String,
    /// 0-based character column of the cursor. For `complete`, the column of
    /// the trigger `.`
    pub column: u32,
    /// Language id of the source buffer, e.g. "typescript". Defaults to resolving
    /// regardless of the configured languages.
    #[serde(default)]
    pub language_id: Option<String>,
}

// ============================================================
// Config Types (get_config)
// ============================================================

/// Configuration DTO for MCP
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    /// Directory translation paths are resolved against
    pub root: String,
    pub config: ConfigValues,
    /// Error from re-reading the config file; the last good configuration
    /// is still in use while set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}

/// Effective configuration, with defaults filled in.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    pub matches: Vec<String>,
    pub languages: Vec<String>,
    pub paths: Vec<String>,
    pub lenient: bool,
}

impl From<&crate::config::Config> for ConfigValues {
    fn from(c: &crate::config::Config) -> Self {
        Self {
            matches: c.effective_matches(),
            languages: c.effective_languages(),
            paths: c.paths.clone(),
            lenient: c.lenient,
        }
    }
}

// ============================================================
// Documents Types (list_documents)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResult {
    pub documents: Vec<DocumentEntry>,
    /// Error from re-reading the config file; the last good configuration
    /// is still in use while set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}

/// A single loaded translation file
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    /// Language label, the file name without extension
    pub label: String,
    pub file_path: String,
    /// Number of top-level keys
    pub key_count: usize,
    /// Load error; the document resolves nothing while set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================
// Resolution Types (hover, complete, definition)
// ============================================================

/// Result of a position tool. `result` is null when nothing resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult<T: Serialize> {
    /// False when the buffer's language is not configured
    pub applicable: bool,
    pub result: Option<T>,
    /// Translation files that failed to load
    pub warnings: Vec<LoadWarning>,
    /// Error from re-reading the config file; the last good configuration
    /// is still in use while set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}

pub type HoverResult = ResolveResult<Hover>;
pub type CompleteResult = ResolveResult<Completion>;
pub type DefinitionResult = ResolveResult<Definition>;
