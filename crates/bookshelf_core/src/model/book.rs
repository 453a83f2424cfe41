//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record and its write inputs.
//! - Own the partial-update merge rule used by `updateBook`.
//!
//! # Invariants
//! - `id` is assigned by the catalog at creation time and never edited.
//! - A patch field replaces the stored value only when present and non-empty.

use serde::{Deserialize, Serialize};

/// Catalog identifier in its external string form (`"1"`, `"2"`, ...).
pub type BookId = String;

/// Canonical catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
        }
    }

    /// Applies `patch` in place and reports whether any field changed.
    pub fn apply(&mut self, patch: &BookPatch) -> bool {
        let mut changed = false;
        if let Some(title) = patch.effective_title() {
            changed |= self.title != title;
            self.title = title.to_string();
        }
        if let Some(author) = patch.effective_author() {
            changed |= self.author != author;
            self.author = author.to_string();
        }
        changed
    }
}

/// Input for `createBook`; both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
        }
    }
}

/// Input for `updateBook`.
///
/// Empty strings are treated exactly like omitted fields: the stored value
/// is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: None,
        }
    }

    pub fn author(author: impl Into<String>) -> Self {
        Self {
            title: None,
            author: Some(author.into()),
        }
    }

    pub fn effective_title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn effective_author(&self) -> Option<&str> {
        non_empty(self.author.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{Book, BookPatch};

    #[test]
    fn apply_replaces_only_supplied_fields() {
        let mut book = Book::new("1", "Book 1", "Author 1");

        assert!(book.apply(&BookPatch::title("Renamed")));
        assert_eq!(book, Book::new("1", "Renamed", "Author 1"));

        assert!(book.apply(&BookPatch::author("Someone")));
        assert_eq!(book, Book::new("1", "Renamed", "Someone"));
    }

    #[test]
    fn apply_treats_empty_strings_as_omitted() {
        let mut book = Book::new("1", "Book 1", "Author 1");
        let patch = BookPatch {
            title: Some(String::new()),
            author: Some(String::new()),
        };

        assert!(!book.apply(&patch));
        assert_eq!(book, Book::new("1", "Book 1", "Author 1"));
    }
}
