use std::{
    collections::HashSet,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

use super::{
    error::{CatalogError, Result},
    record::Book,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Durable backing store for a catalog
pub trait CatalogStorage {
    /// Reads every stored book, in storage order.
    ///
    /// Fails when the storage is missing, unreadable or does not hold a valid
    /// collection; callers decide how to recover.
    fn load(&self) -> Result<Vec<Book>>;

    /// Replaces the stored collection with `books`.
    ///
    /// Implementations must leave the previous contents intact when they fail.
    fn save(&self, books: &[Book]) -> Result<()>;

    /// Copies storage that failed to load somewhere it won't be overwritten.
    ///
    /// Returns where the copy went, or `None` when there was nothing to keep.
    fn backup(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Catalog stored as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStorage for JsonFile {
    fn load(&self) -> Result<Vec<Book>> {
        let bytes = fs::read(&self.path)?;
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let books: Vec<Book> = serde_json::from_slice(content)?;
        validate(&books)?;

        debug!("read {} books from {}", books.len(), self.path.display());
        Ok(books)
    }

    fn save(&self, books: &[Book]) -> Result<()> {
        write_atomic(&self.path, |out| {
            {
                let formatter = PrettyFormatter::with_indent(b"    ");
                let mut ser = Serializer::with_formatter(&mut *out, formatter);
                books.serialize(&mut ser)?;
            }
            out.write_all(b"\n")?;
            Ok(())
        })
    }

    fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        let copy = PathBuf::from(name);

        fs::copy(&self.path, &copy)?;
        Ok(Some(copy))
    }
}

/// Checks the invariants a loaded collection must hold
fn validate(books: &[Book]) -> Result<()> {
    let mut ids = HashSet::with_capacity(books.len());

    for book in books {
        if book.id() == 0 {
            return Err(CatalogError::Corrupt(format!(
                "book `{}` has id 0",
                book.title()
            )));
        }
        if !ids.insert(book.id()) {
            return Err(CatalogError::Corrupt(format!(
                "duplicate id {}",
                book.id()
            )));
        }
        if book.title().trim().is_empty() {
            return Err(CatalogError::Corrupt(format!(
                "book {} has an empty title",
                book.id()
            )));
        }
        if book.author().trim().is_empty() {
            return Err(CatalogError::Corrupt(format!(
                "book {} has an empty author",
                book.id()
            )));
        }
    }

    Ok(())
}

/// Writes a file through a temporary sibling and renames it into place.
///
/// `path` either keeps its old contents or receives everything `write`
/// produced. The temporary file is removed whenever a step fails.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    debug!("replacing {} with {}", path.display(), temp.path().display());
    temp.persist(path).map_err(|e| CatalogError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    // Not every platform can open or sync a directory handle
    match File::open(dir).and_then(|dir| dir.sync_all()) {
        Ok(()) => {}
        Err(e) => debug!("could not sync {}: {e}", dir.display()),
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::record::Status;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonFile) {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("books.json"));
        (dir, file)
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn save_then_load_roundtrip() {
        let (_dir, file) = setup();
        let books = vec![
            Book::new(4, "Война и мир", "Толстой", 1869).with_status(Status::CheckedOut),
            Book::new(2, "Dune", "Frank Herbert", 1965),
        ];

        file.save(&books).unwrap();

        assert_eq!(file.load().unwrap(), books);
    }

    #[test]
    fn writes_readable_json() {
        let (_dir, file) = setup();
        file.save(&[Book::new(1, "Идиот", "Достоевский", 1869)]).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("[\n    {\n        \"id\": 1,"));
        assert!(content.contains("\"title\": \"Идиот\""));
        assert!(content.contains("\"status\": \"в наличии\""));
    }

    #[test]
    fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("data").join("books.json"));

        file.save(&[Book::new(1, "A", "X", 2000)]).unwrap();

        assert_eq!(file.load().unwrap().len(), 1);
    }

    #[test]
    fn load_tolerates_bom() {
        let (_dir, file) = setup();
        let mut content = UTF8_BOM.to_vec();
        content.extend_from_slice(
            r#"[{"book_id": 1, "title": "A", "author": "X", "year": 2000, "status": "выдана"}]"#
                .as_bytes(),
        );
        fs::write(file.path(), content).unwrap();

        let books = file.load().unwrap();
        assert_eq!(
            books,
            vec![Book::new(1, "A", "X", 2000).with_status(Status::CheckedOut)]
        );
    }

    #[test]
    fn load_fails_on_missing_or_corrupt_file() {
        let (_dir, file) = setup();
        assert!(matches!(file.load(), Err(CatalogError::Io(_))));

        fs::write(file.path(), "[{\"id\": 1,").unwrap();
        assert!(matches!(file.load(), Err(CatalogError::Json(_))));

        fs::write(file.path(), "{\"id\": 1}").unwrap();
        assert!(matches!(file.load(), Err(CatalogError::Json(_))));
    }

    #[test]
    fn load_rejects_broken_invariants() {
        let (_dir, file) = setup();
        let cases = [
            r#"[{"id":1,"title":"A","author":"X","year":1,"status":"выдана"},
                {"id":1,"title":"B","author":"Y","year":2,"status":"выдана"}]"#,
            r#"[{"id":0,"title":"A","author":"X","year":1,"status":"выдана"}]"#,
            r#"[{"id":1,"title":" ","author":"X","year":1,"status":"выдана"}]"#,
            r#"[{"id":1,"title":"A","author":"","year":1,"status":"выдана"}]"#,
        ];

        for case in cases {
            fs::write(file.path(), case).unwrap();
            assert!(matches!(file.load(), Err(CatalogError::Corrupt(_))), "{case}");
        }
    }

    #[test]
    fn backup_copies_existing_file_only() {
        let (dir, file) = setup();
        assert_eq!(file.backup().unwrap(), None);

        fs::write(file.path(), "[{\"id\": 1,").unwrap();
        let copy = file.backup().unwrap().unwrap();

        assert_eq!(copy, dir.path().join("books.json.bak"));
        assert_eq!(fs::read_to_string(copy).unwrap(), "[{\"id\": 1,");
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "[{\"id\": 1,");
    }

    #[test]
    fn failed_write_keeps_original() {
        let (dir, file) = setup();
        file.save(&[Book::new(1, "A", "X", 2000)]).unwrap();
        let before = fs::read(file.path()).unwrap();

        let result = write_atomic(file.path(), |out| {
            out.write_all(b"[{\"id\": 2, \"ti")?;
            Err(std::io::Error::other("disk full").into())
        });

        assert!(matches!(result, Err(CatalogError::Io(_))));
        assert_eq!(fs::read(file.path()).unwrap(), before);
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("books.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "old").unwrap();

        let result = JsonFile::new(&target).save(&[Book::new(1, "A", "X", 2000)]);

        assert!(matches!(result, Err(CatalogError::Persist { .. })));
        assert_eq!(fs::read_to_string(target.join("keep")).unwrap(), "old");
        assert_eq!(entries(dir.path()), 1);
    }
}
