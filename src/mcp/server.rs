use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::debug;

use crate::workspace::Workspace;

use super::types::{
    CompleteResult, ConfigDto, ConfigValues, DefinitionResult, DocumentEntry, DocumentsResult,
    HoverResult, PositionParams, ProjectParams, ResolveResult,
};

#[derive(Clone)]
pub struct TranskeyMcpServer {
    tool_router: ToolRouter<Self>,
    /// One watched workspace per canonical project root, least recently used
    /// first.
    workspaces: Arc<Mutex<IndexMap<PathBuf, Workspace>>>,
}

impl Default for TranskeyMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl TranskeyMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            workspaces: Arc::new(Mutex::new(IndexMap::new())),
        }
    }

    /// Show the value of a translation key in every language
    #[tool(
        description = "Resolve the translation key under the cursor and return its value in every loaded language. `column` is the 0-based character offset of the cursor in `lineText`."
    )]
    pub async fn hover(
        &self,
        params: Parameters<PositionParams>,
    ) -> Result<CallToolResult, McpError> {
        let result: HoverResult =
            self.resolve(&params.0, |ws, line, offset| ws.hover_at(line, offset))?;
        json_content(&result)
    }

    /// List child keys for a reference ending in `.`
    #[tool(
        description = "List the child keys that can follow a translation reference ending in `.`. `column` is the 0-based offset of the trigger `.` in `lineText`. Leaf children carry their value per language."
    )]
    pub async fn complete(
        &self,
        params: Parameters<PositionParams>,
    ) -> Result<CallToolResult, McpError> {
        let result: CompleteResult =
            self.resolve(&params.0, |ws, line, offset| ws.completions_at(line, offset))?;
        json_content(&result)
    }

    /// Locate a translation key in the translation files
    #[tool(
        description = "Find the file and 0-based line where the translation key under the cursor is defined, in every language that has it."
    )]
    pub async fn definition(
        &self,
        params: Parameters<PositionParams>,
    ) -> Result<CallToolResult, McpError> {
        let result: DefinitionResult =
            self.resolve(&params.0, |ws, line, offset| ws.definition_at(line, offset))?;
        json_content(&result)
    }

    /// List loaded translation files
    #[tool(
        description = "List the configured translation files with their language label, top-level key count and load error if any."
    )]
    pub async fn list_documents(
        &self,
        params: Parameters<ProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.with_workspace(&params.0.project_root_path, |ws| {
            let documents = ws
                .store()
                .get_all()
                .values()
                .map(|doc| DocumentEntry {
                    label: doc.label.clone(),
                    file_path: doc.path.to_string_lossy().to_string(),
                    key_count: doc.tree.len(),
                    error: doc.error.clone(),
                })
                .collect();
            DocumentsResult {
                documents,
                config_error: ws.config_error().map(str::to_string),
            }
        })?;
        json_content(&result)
    }

    /// Get project configuration
    #[tool(
        description = "Get the effective transkey configuration: reference prefixes, languages and translation file paths."
    )]
    pub async fn get_config(
        &self,
        params: Parameters<ProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        let config_dto = self.with_workspace(&params.0.project_root_path, |ws| ConfigDto {
            from_file: ws.from_file(),
            root: ws.root().to_string_lossy().to_string(),
            config: ConfigValues::from(ws.config()),
            config_error: ws.config_error().map(str::to_string),
        })?;
        json_content(&config_dto)
    }
}

impl TranskeyMcpServer {
    /// Most project roots kept open at once.
    pub const MAX_WORKSPACES: usize = 8;

    /// Number of project roots with an open workspace.
    pub fn open_workspaces(&self) -> usize {
        self.workspaces.lock().len()
    }

    /// Run `f` against the cached workspace for `root`, opening it on first use
    /// and picking up configuration changes otherwise.
    fn with_workspace<T>(
        &self,
        root: &str,
        f: impl FnOnce(&Workspace) -> T,
    ) -> Result<T, McpError> {
        let requested = Path::new(root).canonicalize();

        let mut workspaces = self.workspaces.lock();
        workspaces.retain(|cached, ws| {
            let keep = cached.is_dir();
            if !keep {
                debug!(root = %cached.display(), "dropping workspace for removed root");
                ws.store().dispose();
            }
            keep
        });

        let root = requested.map_err(|e| {
            McpError::invalid_params(format!("Invalid project root {}: {}", root, e), None)
        })?;

        let ws = match workspaces.shift_remove(&root) {
            Some(mut ws) => {
                // A failed refresh shows up in `config_error`.
                let _ = ws.refresh_config();
                ws
            }
            None => {
                let ws = Workspace::open(&root, true).map_err(|e| {
                    McpError::internal_error(format!("Failed to open workspace: {:#}", e), None)
                })?;
                debug!(root = %root.display(), "caching workspace");
                ws
            }
        };
        let value = f(&ws);
        workspaces.insert(root, ws);

        while workspaces.len() > Self::MAX_WORKSPACES {
            if let Some((evicted, ws)) = workspaces.shift_remove_index(0) {
                debug!(root = %evicted.display(), "evicting workspace");
                ws.store().dispose();
            }
        }
        Ok(value)
    }

    fn resolve<T: Serialize>(
        &self,
        params: &PositionParams,
        f: impl FnOnce(&Workspace, &str, usize) -> Option<T>,
    ) -> Result<ResolveResult<T>, McpError> {
        let offset = params.column as usize;
        let width = params.line_text.chars().count();
        if offset > width {
            return Err(McpError::invalid_params(
                format!("column {} is past the end of the line ({} characters)", offset, width),
                None,
            ));
        }

        self.with_workspace(&params.project_root_path, |ws| {
            let applicable = params
                .language_id
                .as_deref()
                .is_none_or(|language| ws.applies_to(language));
            let result = if applicable {
                f(ws, &params.line_text, offset)
            } else {
                None
            };
            ResolveResult {
                applicable,
                result,
                warnings: ws.warnings(),
                config_error: ws.config_error().map(str::to_string),
            }
        })
    }
}

fn json_content<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

#[tool_handler]
impl ServerHandler for TranskeyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Transkey MCP resolves dotted translation references such as \
                 `this._translate.CONTROLL.buy` against the project's JSON translation files.\n\n\
                 Available tools:\n\
                 1. get_config - Get reference prefixes, languages and translation file paths\n\
                 2. list_documents - Get loaded translation files and their load status\n\
                 3. hover - Get a key's value in every language\n\
                 4. complete - Get the child keys after a trailing `.`\n\
                 5. definition - Get the file and line defining a key\n\n\
                 Position tools take the full source line as `lineText` and a 0-based \
                 character `column`."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = TranskeyMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
