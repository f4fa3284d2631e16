pub mod catalog;
pub mod error;
pub mod file;
pub mod record;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use file::{CatalogStorage, JsonFile};
pub use record::{Book, SearchField, Status};
