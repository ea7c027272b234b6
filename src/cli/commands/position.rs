use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result, ensure};

use super::super::args::{CommonArgs, PositionArgs, PositionCommand};
use super::{CommandResult, CommandSummary, SourceLine};
use crate::workspace::{Workspace, language_id_for};

/// A workspace plus the source line a position command points at.
struct Located {
    workspace: Workspace,
    source: SourceLine,
    /// 0-based character offset of the cursor within `source.text`.
    offset: usize,
}

enum Prepared {
    Located(Located),
    NotApplicable {
        workspace: Workspace,
        language: String,
    },
}

pub fn hover(cmd: PositionCommand) -> Result<CommandResult> {
    run(cmd, |ws, line, offset| {
        CommandSummary::Hover(ws.hover_at(line, offset))
    })
}

pub fn complete(cmd: PositionCommand) -> Result<CommandResult> {
    run(cmd, |ws, line, offset| {
        CommandSummary::Complete(ws.completions_at(line, offset))
    })
}

pub fn definition(cmd: PositionCommand) -> Result<CommandResult> {
    run(cmd, |ws, line, offset| {
        CommandSummary::Definition(ws.definition_at(line, offset))
    })
}

fn run<F>(cmd: PositionCommand, resolve: F) -> Result<CommandResult>
where
    F: FnOnce(&Workspace, &str, usize) -> CommandSummary,
{
    let format = cmd.common.format;
    match prepare(&cmd.position, &cmd.common)? {
        Prepared::Located(Located {
            workspace,
            source,
            offset,
        }) => {
            let summary = resolve(&workspace, &source.text, offset);
            Ok(CommandResult {
                summary,
                format,
                root: workspace.root().to_path_buf(),
                warnings: workspace.warnings(),
                source: Some(source),
            })
        }
        Prepared::NotApplicable {
            workspace,
            language,
        } => Ok(CommandResult {
            summary: CommandSummary::NotApplicable { language },
            format,
            root: workspace.root().to_path_buf(),
            warnings: workspace.warnings(),
            source: None,
        }),
    }
}

/// Directory to look for configuration from: `--root`, or the current directory.
pub fn project_root(common: &CommonArgs) -> Result<PathBuf> {
    match &common.root {
        Some(root) => Ok(root.clone()),
        None => env::current_dir().context("Failed to determine the current directory"),
    }
}

fn prepare(position: &PositionArgs, common: &CommonArgs) -> Result<Prepared> {
    ensure!(position.line >= 1, "--line is 1-based and must be at least 1");
    ensure!(
        position.column >= 1,
        "--column is 1-based and must be at least 1"
    );

    let workspace = Workspace::open(&project_root(common)?, false)?;

    let language = position
        .language
        .clone()
        .or_else(|| language_id_for(&position.file))
        .unwrap_or_default();
    if !workspace.applies_to(&language) {
        return Ok(Prepared::NotApplicable {
            workspace,
            language,
        });
    }

    let content = fs::read_to_string(&position.file)
        .with_context(|| format!("Failed to read source file: {}", position.file.display()))?;
    let text = content
        .lines()
        .nth(position.line - 1)
        .with_context(|| {
            format!(
                "{} has no line {}",
                position.file.display(),
                position.line
            )
        })?
        .to_string();

    let width = text.chars().count();
    ensure!(
        position.column <= width + 1,
        "Column {} is past the end of line {} ({} characters)",
        position.column,
        position.line,
        width
    );

    Ok(Prepared::Located(Located {
        workspace,
        offset: position.column - 1,
        source: SourceLine {
            file_path: position.file.display().to_string(),
            line: position.line,
            column: position.column,
            text,
        },
    }))
}
