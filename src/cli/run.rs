use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult,
        documents::documents,
        init::init,
        position::{complete, definition, hover},
    },
};

/// Dispatch a parsed command line to its command handler.
pub fn run(Arguments { command, .. }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Hover(cmd)) => hover(cmd),
        Some(Command::Complete(cmd)) => complete(cmd),
        Some(Command::Definition(cmd)) => definition(cmd),
        Some(Command::Documents(cmd)) => documents(cmd),
        Some(Command::Init) => init(),
        Some(Command::Serve) => {
            // Serve command is handled in main.rs before calling run()
            bail!("Serve command should be handled before run()")
        }
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
