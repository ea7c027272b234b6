use std::path::PathBuf;

use serde::Serialize;

use super::super::{args::OutputFormat, exit_status::ExitStatus};
use crate::core::{Completion, Definition, Hover, LoadWarning};

/// The source line a position command looked at.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub file_path: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub label: String,
    pub file_path: String,
    pub key_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

#[derive(Debug)]
pub enum CommandSummary {
    Hover(Option<Hover>),
    Complete(Option<Completion>),
    Definition(Option<Definition>),
    Documents(Vec<DocumentInfo>),
    Init(InitSummary),
    /// The source file's language is not configured for resolution.
    NotApplicable { language: String },
}

/// Result of running transkey commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub format: OutputFormat,
    /// Root translation paths were resolved against.
    pub root: PathBuf,
    pub source: Option<SourceLine>,
    /// Translation files that failed to load.
    pub warnings: Vec<LoadWarning>,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        let found = match &self.summary {
            CommandSummary::Hover(hover) => hover.is_some(),
            CommandSummary::Complete(completion) => {
                completion.as_ref().is_some_and(|c| !c.suggestions.is_empty())
            }
            CommandSummary::Definition(definition) => definition.is_some(),
            CommandSummary::Documents(_) | CommandSummary::Init(_) => true,
            CommandSummary::NotApplicable { .. } => false,
        };
        ExitStatus::from_found(found)
    }
}
