pub mod commands;
pub mod prompt;

pub use commands::{Flow, MenuCommand};
pub use prompt::{PromptError, Prompter};

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use log::info;
use thiserror::Error;

use crate::storage::{Catalog, CatalogStorage, JsonFile};

#[derive(Error, Debug)]
pub enum ReplError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Input reached its end before the user confirmed an exit
    #[error("input closed; unsaved changes were discarded")]
    InputClosed,
}

/// Starts a catalog menu session on the terminal
pub fn start_repl(path: PathBuf) -> Result<(), ReplError> {
    let mut catalog = Catalog::open(JsonFile::new(path));
    info!(
        "opened catalog at {} with {} books",
        catalog.storage().path().display(),
        catalog.len()
    );
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());

    run(&mut catalog, &mut prompter)
}

/// Runs the menu loop until the user confirms an exit
pub fn run<S, R, W>(
    catalog: &mut Catalog<S>,
    prompter: &mut Prompter<R, W>,
) -> Result<(), ReplError>
where
    S: CatalogStorage,
    R: BufRead,
    W: Write,
{
    loop {
        prompter.say("\nMenu:")?;
        for command in MenuCommand::ALL {
            prompter.say(format!("{}. {}", command.key(), command.label()))?;
        }

        let input = match prompter.read_line("Enter an action number: ") {
            Ok(input) => input,
            Err(e) => {
                recover(prompter, e)?;
                continue;
            }
        };

        let command: MenuCommand = match input.as_str().try_into() {
            Ok(command) => command,
            Err(e) => {
                prompter.say(format!("Error: {e} Try again."))?;
                continue;
            }
        };

        match command.execute(catalog, prompter) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => recover(prompter, e)?,
        }
    }
}

/// Reports an interrupted prompt, or ends the session when input can't resume
fn recover<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    error: PromptError,
) -> Result<(), ReplError> {
    match error {
        PromptError::Interrupted => {
            prompter.say("Error: input was interrupted. Try again.")?;
            Ok(())
        }
        PromptError::Closed => {
            prompter.say("Input closed; unsaved changes were discarded.")?;
            Err(ReplError::InputClosed)
        }
        PromptError::Io(e) => Err(e.into()),
    }
}
