mod repl;
mod storage;

pub use repl::*;
pub use storage::{
    Book, Catalog, CatalogError, CatalogStorage, JsonFile, Result, SearchField, Status,
};
