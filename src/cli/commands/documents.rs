use anyhow::Result;

use super::super::args::DocumentsCommand;
use super::position::project_root;
use super::{CommandResult, CommandSummary, DocumentInfo};
use crate::workspace::Workspace;

pub fn documents(cmd: DocumentsCommand) -> Result<CommandResult> {
    let workspace = Workspace::open(&project_root(&cmd.common)?, false)?;
    let root = workspace.root().to_path_buf();

    let infos = workspace
        .store()
        .get_all()
        .values()
        .map(|doc| DocumentInfo {
            label: doc.label.clone(),
            file_path: doc
                .path
                .strip_prefix(&root)
                .unwrap_or(&doc.path)
                .display()
                .to_string(),
            key_count: doc.tree.len(),
            error: doc.error.clone(),
        })
        .collect();

    Ok(CommandResult {
        summary: CommandSummary::Documents(infos),
        format: cmd.common.format,
        warnings: workspace.warnings(),
        root,
        source: None,
    })
}
