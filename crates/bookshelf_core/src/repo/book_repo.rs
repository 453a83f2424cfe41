//! Book repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Give the service layer exclusive, scoped access to the catalog.
//! - Define the semantic error surfaced by id-keyed mutations.
//!
//! # Invariants
//! - Every `write` closure runs under one lock acquisition, so a
//!   read-modify-write sequence is never interleaved with another writer.
//! - The lock is never exposed past the closure; callers receive clones.

use crate::model::book::{Book, BookId};
use crate::repo::catalog_store::CatalogStore;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, BookError>;

/// The only domain error of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    NotFound(BookId),
}

impl BookError {
    /// Stable machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
        }
    }
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(_) => write!(f, "Book not found"),
        }
    }
}

impl Error for BookError {}

/// Scoped access to the catalog.
pub trait BookRepository {
    fn read<T>(&self, f: impl FnOnce(&CatalogStore) -> T) -> T;
    fn write<T>(&self, f: impl FnOnce(&mut CatalogStore) -> T) -> T;
}

/// Process-memory catalog guarded by a single mutex.
///
/// Cloning shares the same catalog, which is how one instance is handed to
/// every connection task.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookRepository {
    catalog: Arc<Mutex<CatalogStore>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(CatalogStore::from_books(books))),
        }
    }

    /// Catalog preloaded with the two sample records served on startup.
    pub fn seeded() -> Self {
        Self::with_books(seed_books())
    }
}

impl BookRepository for InMemoryBookRepository {
    fn read<T>(&self, f: impl FnOnce(&CatalogStore) -> T) -> T {
        let catalog = self.catalog.lock();
        f(&catalog)
    }

    fn write<T>(&self, f: impl FnOnce(&mut CatalogStore) -> T) -> T {
        let mut catalog = self.catalog.lock();
        f(&mut catalog)
    }
}

/// Sample records loaded when the server starts with seeding enabled.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new("1", "Book 1", "Author 1"),
        Book::new("2", "Book 2", "Author 2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::{BookError, BookRepository, InMemoryBookRepository};
    use crate::model::book::Book;

    #[test]
    fn not_found_message_is_stable() {
        let err = BookError::NotFound("99".to_string());
        assert_eq!(err.to_string(), "Book not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn clones_share_one_catalog() {
        let repo = InMemoryBookRepository::seeded();
        let other = repo.clone();

        other.write(|store| store.append(Book::new("3", "Third", "Writer")));

        assert_eq!(repo.read(|store| store.len()), 3);
    }
}
