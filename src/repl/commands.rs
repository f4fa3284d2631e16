use std::io::{BufRead, Write};

use crate::storage::{Book, Catalog, CatalogStorage, SearchField, Status};

use super::prompt::{Prompter, Result};

/// What the session does once a command has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Entries of the main menu.
///
/// Each command reads whatever extra input it needs through the [Prompter]
/// and reports its outcome there; only prompt failures are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Add,
    Remove,
    Search,
    List,
    UpdateStatus,
    Save,
    Exit,
}

impl MenuCommand {
    /// Commands in the order the menu shows them
    pub const ALL: [MenuCommand; 7] = [
        Self::Add,
        Self::Remove,
        Self::Search,
        Self::List,
        Self::UpdateStatus,
        Self::Save,
        Self::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Add => "1",
            Self::Remove => "2",
            Self::Search => "3",
            Self::List => "4",
            Self::UpdateStatus => "5",
            Self::Save => "6",
            Self::Exit => "0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "Add a book",
            Self::Remove => "Remove a book",
            Self::Search => "Search books",
            Self::List => "List all books",
            Self::UpdateStatus => "Change book status",
            Self::Save => "Save changes",
            Self::Exit => "Exit",
        }
    }

    pub fn execute<S, R, W>(
        &self,
        catalog: &mut Catalog<S>,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Flow>
    where
        S: CatalogStorage,
        R: BufRead,
        W: Write,
    {
        match self {
            Self::Add => {
                let title = prompter.non_empty("Enter the book title: ")?;
                let author = prompter.non_empty("Enter the book author: ")?;
                let year: i32 = prompter.integer("Enter the publication year: ")?;

                match catalog.add(&title, &author, year) {
                    Ok(book) => {
                        let id = book.id();
                        prompter.say(format!("Book added with id {id}."))?
                    }
                    Err(e) => prompter.say(format!("Error: {e}."))?,
                }
            }
            Self::Remove => {
                if catalog.is_empty() {
                    prompter.say("Error: the catalog is empty; nothing to remove.")?;
                    return Ok(Flow::Continue);
                }

                let id: u64 = prompter.integer("Enter the id of the book to remove: ")?;
                if catalog.remove(id) {
                    prompter.say("Book removed.")?;
                } else {
                    prompter.say(format!("Error: no book with id {id}."))?;
                }
            }
            Self::Search => {
                let field: SearchField =
                    prompter.select("Choose a field to search", &SearchField::CHOICES)?;
                let query = prompter.non_empty("Enter a search query: ")?;

                let found = catalog.search(&query, field);
                if found.is_empty() {
                    prompter.say("Nothing found.")?;
                } else {
                    prompter.say("Found the following books:")?;
                    for book in found {
                        prompter.say(entry(book))?;
                    }
                }
            }
            Self::List => {
                if catalog.is_empty() {
                    prompter.say("The catalog is empty.")?;
                } else {
                    prompter.say("All books:")?;
                    for book in catalog.list_all() {
                        prompter.say(entry(book))?;
                    }
                }
            }
            Self::UpdateStatus => {
                if catalog.is_empty() {
                    prompter.say("Error: the catalog is empty; nothing to update.")?;
                    return Ok(Flow::Continue);
                }

                let id: u64 = prompter.integer("Enter the book id: ")?;
                let status: Status = prompter.select("Enter the new status", &Status::CHOICES)?;
                if !catalog.update_status(id, status) {
                    prompter.say(format!("Error: no book with id {id}."))?;
                } else if let Some(book) = catalog.get(id) {
                    prompter.say(format!("Book status updated: {}", entry(book)))?;
                }
            }
            Self::Save => match catalog.save() {
                Ok(()) => prompter.say("Catalog saved.")?,
                Err(e) => prompter.say(format!("Error: failed to save the catalog: {e}"))?,
            },
            Self::Exit => {
                if !prompter.confirm("Are you sure you want to exit?")? {
                    return Ok(Flow::Continue);
                }

                // Stay in the session when the final save fails so nothing is lost
                match catalog.save() {
                    Ok(()) => {
                        prompter.say("Catalog saved. Goodbye.")?;
                        return Ok(Flow::Exit);
                    }
                    Err(e) => prompter.say(format!("Error: failed to save the catalog: {e}"))?,
                }
            }
        }

        Ok(Flow::Continue)
    }
}

impl TryFrom<&str> for MenuCommand {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|command| command.key() == value.trim())
            .ok_or_else(|| format!("unknown menu option `{value}`."))
    }
}

fn entry(book: &Book) -> String {
    format!("{}. {book}", book.id())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_menu_keys() {
        for command in MenuCommand::ALL {
            assert_eq!(MenuCommand::try_from(command.key()), Ok(command));
        }

        assert_eq!(MenuCommand::try_from(" 4 "), Ok(MenuCommand::List));
        assert!(MenuCommand::try_from("7").is_err());
        assert!(MenuCommand::try_from("add").is_err());
    }

    #[test]
    fn entry_includes_id() {
        let book = Book::new(12, "Dune", "Frank Herbert", 1965).with_status(Status::CheckedOut);

        assert_eq!(entry(&book), "12. Dune, Frank Herbert, 1965, checked-out");
    }
}
