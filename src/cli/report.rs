//! Report formatting and printing utilities.
//!
//! Text output follows the cargo diagnostic layout: a headline, a clickable
//! `-->` location, the source line with carets under the reference, and `=`
//! notes carrying the resolved values.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use serde_json::json;
use unicode_width::UnicodeWidthStr;

use super::{
    args::OutputFormat,
    commands::{CommandResult, CommandSummary, DocumentInfo, InitSummary, SourceLine},
};
use crate::core::{Completion, Definition, Hover, LoadWarning};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult) {
    match result.format {
        OutputFormat::Text => {
            print_warnings_to(&result.warnings, &result.root, &mut io::stderr().lock());
            print_text_to(result, &mut io::stdout().lock());
        }
        OutputFormat::Json => print_json_to(result, &mut io::stdout().lock()),
    }
}

/// Print a command result as text to a custom writer.
pub fn print_text_to<W: Write>(result: &CommandResult, writer: &mut W) {
    let root = result.root.as_path();
    match &result.summary {
        CommandSummary::Hover(hover) => print_hover(hover.as_ref(), result.source.as_ref(), writer),
        CommandSummary::Complete(completion) => {
            print_completion(completion.as_ref(), result.source.as_ref(), writer)
        }
        CommandSummary::Definition(definition) => {
            print_definition(definition.as_ref(), result.source.as_ref(), root, writer)
        }
        CommandSummary::Documents(infos) => print_documents(infos, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
        CommandSummary::NotApplicable { language } => {
            let language = if language.is_empty() {
                "(unknown)"
            } else {
                language
            };
            let _ = writeln!(
                writer,
                "{} Language {} is not configured for translation lookups",
                FAILURE_MARK.red(),
                language.bold()
            );
        }
    }
}

/// Print a command result as a JSON document to a custom writer.
pub fn print_json_to<W: Write>(result: &CommandResult, writer: &mut W) {
    let (command, value) = match &result.summary {
        CommandSummary::Hover(hover) => ("hover", json!(hover)),
        CommandSummary::Complete(completion) => ("complete", json!(completion)),
        CommandSummary::Definition(definition) => ("definition", json!(definition)),
        CommandSummary::Documents(infos) => ("documents", json!(infos)),
        CommandSummary::Init(summary) => (
            "init",
            json!({ "path": summary.path.display().to_string() }),
        ),
        CommandSummary::NotApplicable { language } => {
            ("notApplicable", json!({ "language": language }))
        }
    };
    let report = json!({
        "command": command,
        "root": result.root.display().to_string(),
        "result": value,
        "warnings": result.warnings,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => {
            let _ = writeln!(writer, "{}", text);
        }
        Err(err) => {
            let _ = writeln!(writer, "{{\"error\": \"{}\"}}", err);
        }
    }
}

/// Print one warning per translation file that failed to load.
pub fn print_warnings_to<W: Write>(warnings: &[LoadWarning], root: &Path, writer: &mut W) {
    for warning in warnings {
        let _ = writeln!(
            writer,
            "{} {} ({}) was not loaded: {}",
            "warning:".bold().yellow(),
            warning.label.bold(),
            relative(Path::new(&warning.file_path), root),
            warning.error
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_hover<W: Write>(hover: Option<&Hover>, source: Option<&SourceLine>, writer: &mut W) {
    let Some(hover) = hover else {
        print_nothing("No translation key found", source, writer);
        return;
    };

    print_headline("hover", hover.key.as_str(), writer);
    let width = gutter_width(source);
    if let Some(source) = source {
        print_source(source, hover.span.start, hover.span.end, width, writer);
    }
    for entry in &hover.entries {
        print_note(&entry.label, &entry.value, width, writer);
    }
}

fn print_completion<W: Write>(
    completion: Option<&Completion>,
    source: Option<&SourceLine>,
    writer: &mut W,
) {
    let Some(completion) = completion.filter(|c| !c.suggestions.is_empty()) else {
        print_nothing("No child keys to complete", source, writer);
        return;
    };

    print_headline("complete", completion.parent.as_str(), writer);
    let width = gutter_width(source);
    if let Some(source) = source {
        let dot = source.column - 1;
        print_source(source, dot, dot + 1, width, writer);
    }

    let key_width = completion
        .suggestions
        .iter()
        .map(|s| UnicodeWidthStr::width(s.key.as_str()))
        .max()
        .unwrap_or(0);
    for suggestion in &completion.suggestions {
        let docs = suggestion.documentation.join("; ");
        let _ = writeln!(
            writer,
            "{:>width$} {} {:<key_width$}  {}",
            "",
            "=".blue(),
            suggestion.key.bold(),
            docs.dimmed(),
            width = width,
            key_width = key_width
        );
    }
}

fn print_definition<W: Write>(
    definition: Option<&Definition>,
    source: Option<&SourceLine>,
    root: &Path,
    writer: &mut W,
) {
    let Some(definition) = definition else {
        print_nothing("No definition found", source, writer);
        return;
    };

    print_headline("definition", definition.key.as_str(), writer);
    let width = gutter_width(source);
    if let Some(source) = source {
        print_source(source, definition.span.start, definition.span.end, width, writer);
    }
    for target in &definition.targets {
        let location = format!("{}:{}", relative(&target.file_path, root), target.line + 1);
        print_note(&target.label, &location, width, writer);
    }
}

fn print_documents<W: Write>(infos: &[DocumentInfo], writer: &mut W) {
    if infos.is_empty() {
        let _ = writeln!(
            writer,
            "{} No translation files configured",
            FAILURE_MARK.red()
        );
        return;
    }

    let label_width = infos
        .iter()
        .map(|i| UnicodeWidthStr::width(i.label.as_str()))
        .max()
        .unwrap_or(0);
    for info in infos {
        let status = match &info.error {
            Some(error) => format!("error: {}", error).red().to_string(),
            None => format!("{} keys", info.key_count).dimmed().to_string(),
        };
        let _ = writeln!(
            writer,
            "{:<label_width$}  {}  {}",
            info.label.bold(),
            info.file_path,
            status,
            label_width = label_width
        );
    }

    let loaded = infos.iter().filter(|i| i.error.is_none()).count();
    let mark = if loaded == infos.len() {
        SUCCESS_MARK.green()
    } else {
        FAILURE_MARK.red()
    };
    let _ = writeln!(
        writer,
        "\n{} {} of {} translation file(s) loaded",
        mark,
        loaded,
        infos.len()
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    let name = summary
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| summary.path.display().to_string());
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", name).green()
    );
}

fn print_headline<W: Write>(command: &str, key: &str, writer: &mut W) {
    let key = if key.is_empty() { "(root)" } else { key };
    let _ = writeln!(writer, "{}: {}", command.bold().green(), key.bold());
}

fn print_nothing<W: Write>(message: &str, source: Option<&SourceLine>, writer: &mut W) {
    match source {
        Some(source) => {
            let _ = writeln!(
                writer,
                "{} {} at {}:{}:{}",
                FAILURE_MARK.red(),
                message,
                source.file_path,
                source.line,
                source.column
            );
        }
        None => {
            let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), message);
        }
    }
}

/// Print the location and source line with carets under chars `start..end`.
fn print_source<W: Write>(
    source: &SourceLine,
    start: usize,
    end: usize,
    width: usize,
    writer: &mut W,
) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        source.file_path,
        source.line,
        source.column
    );
    let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = width);
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        source.line.to_string().blue(),
        "|".blue(),
        source.text,
        width = width
    );

    let prefix: String = source.text.chars().take(start).collect();
    let marked: String = source
        .text
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    let padding = UnicodeWidthStr::width(prefix.as_str());
    let carets = "^".repeat(UnicodeWidthStr::width(marked.as_str()).max(1));
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        carets.green(),
        width = width,
        padding = padding
    );
}

fn print_note<W: Write>(label: &str, text: &str, width: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{:>width$} {} {} {}",
        "",
        "=".blue(),
        format!("{}:", label).bold(),
        text,
        width = width
    );
}

fn gutter_width(source: Option<&SourceLine>) -> usize {
    source.map_or(1, |s| s.line.to_string().len())
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================
// Tests
// ============================================================
