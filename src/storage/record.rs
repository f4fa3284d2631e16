use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Availability of a book in the catalog
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "в наличии", alias = "available")]
    Available,
    #[serde(rename = "выдана", alias = "checked-out")]
    CheckedOut,
}

impl Status {
    /// Tokens accepted when the status is chosen interactively
    pub const CHOICES: [&'static str; 2] = ["available", "checked-out"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut => "checked-out",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" | "в наличии" => Ok(Self::Available),
            "checked-out" | "выдана" => Ok(Self::CheckedOut),
            other => Err(format!("unknown status `{other}`.")),
        }
    }
}

/// Book fields a search can be run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Year,
}

impl SearchField {
    pub const CHOICES: [&'static str; 3] = ["title", "author", "year"];

    /// String form of this field for the given book
    pub fn value_of(&self, book: &Book) -> String {
        match self {
            Self::Title => book.title.clone(),
            Self::Author => book.author.clone(),
            Self::Year => book.year.to_string(),
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown search field `{other}`.")),
        }
    }
}

/// A single catalog entry.
///
/// Serializes to a flat object with exactly the keys `id`, `title`, `author`,
/// `year` and `status`. Objects with missing or unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Book {
    #[serde(alias = "book_id")]
    id: u64,
    title: String,
    author: String,
    year: i32,
    status: Status,
}

impl Book {
    pub fn new(id: u64, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: Status::default(),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Case-insensitive substring match of `query` against `field`
    pub fn matches(&self, query: &str, field: SearchField) -> bool {
        field
            .value_of(self)
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.title, self.author, self.year, self.status
        )
    }
}
