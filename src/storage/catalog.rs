use log::{debug, info, warn};

use super::{
    error::{CatalogError, Result},
    file::{CatalogStorage, JsonFile},
    record::{Book, SearchField, Status},
};

/// In-memory book collection bound to its durable storage.
///
/// The collection is loaded once when the catalog is opened and only written
/// back by [`Catalog::save`].
pub struct Catalog<S = JsonFile> {
    storage: S,
    books: Vec<Book>,
}

impl<S: CatalogStorage> Catalog<S> {
    /// Opens a catalog, starting empty when the storage can't be loaded
    pub fn open(storage: S) -> Self {
        let books = match storage.load() {
            Ok(books) => {
                info!("loaded {} books", books.len());
                books
            }
            Err(e) => {
                warn!("catalog file is missing or corrupt ({e}); starting with an empty catalog");
                match storage.backup() {
                    Ok(Some(copy)) => warn!("kept the unreadable catalog at {}", copy.display()),
                    Ok(None) => {}
                    Err(e) => warn!("failed to back up the unreadable catalog: {e}"),
                }
                Vec::new()
            }
        };

        Self { storage, books }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the whole collection back to storage
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.books)?;
        info!("saved {} books", self.books.len());
        Ok(())
    }

    /// Adds a book with the next free id and `available` status
    pub fn add(&mut self, title: &str, author: &str, year: i32) -> Result<&Book> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyField("title"));
        }
        if author.is_empty() {
            return Err(CatalogError::EmptyField("author"));
        }

        let id = self
            .books
            .iter()
            .map(Book::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted)?;
        debug!("adding book {id}: {title}");

        self.books.push(Book::new(id, title, author, year));
        Ok(&self.books[self.books.len() - 1])
    }

    /// Removes the book with `id`, returning whether it existed
    pub fn remove(&mut self, id: u64) -> bool {
        match self.books.iter().position(|book| book.id() == id) {
            Some(index) => {
                let book = self.books.remove(index);
                debug!("removed book {id}: {}", book.title());
                true
            }
            None => false,
        }
    }

    /// Books whose `field` contains `query`, ignoring case, in catalog order
    pub fn search(&self, query: &str, field: SearchField) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.matches(query, field))
            .collect()
    }

    /// Sets the status of the book with `id`, returning whether it existed
    pub fn update_status(&mut self, id: u64, status: Status) -> bool {
        match self.books.iter_mut().find(|book| book.id() == id) {
            Some(book) => {
                book.set_status(status);
                debug!("book {id} is now {status}");
                true
            }
            None => false,
        }
    }

    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
