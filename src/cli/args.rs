//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `hover`: Show every language's value for the key under the cursor
//! - `complete`: List child keys after a trigger `.`
//! - `definition`: Locate the key in the translation files
//! - `documents`: List loaded translation files
//! - `init`: Initialize transkey configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to search for the config file from (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// A cursor position inside a source file.
#[derive(Debug, Clone, Args)]
pub struct PositionArgs {
    /// Source file containing the reference
    pub file: PathBuf,

    /// Line number (1-based)
    #[arg(short, long)]
    pub line: usize,

    /// Column (1-based). For `complete`, the column of the trigger `.`
    #[arg(short, long)]
    pub column: usize,

    /// Language id of the source (inferred from the file extension by default)
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Debug, Args)]
pub struct PositionCommand {
    #[command(flatten)]
    pub position: PositionArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct DocumentsCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the value of the translation key under the cursor in every language
    Hover(PositionCommand),
    /// Suggest child keys for a translation reference ending in `.`
    Complete(PositionCommand),
    /// Find the line defining the translation key under the cursor
    Definition(PositionCommand),
    /// List configured translation files and their load status
    Documents(DocumentsCommand),
    /// Initialize a new .transkeyrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
