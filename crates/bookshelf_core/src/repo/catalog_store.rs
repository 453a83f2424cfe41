//! Ordered in-memory book collection.
//!
//! # Responsibility
//! - Hold catalog records in insertion order.
//! - Expose position-free primitives keyed by `BookId`.
//!
//! # Invariants
//! - Lookups are linear scans and resolve to the first match.
//! - `append` never assigns ids; callers own id assignment.
//! - `remove_by_id` shifts later records down by one position.

use crate::model::book::Book;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStore {
    books: Vec<Book>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Full sequence in insertion order.
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| book.id == id)
    }

    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Removes the first record with `id`; `None` when nothing matched.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Book> {
        let position = self.books.iter().position(|book| book.id == id)?;
        Some(self.books.remove(position))
    }
}
