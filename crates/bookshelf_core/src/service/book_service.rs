//! Book resolver service.
//!
//! # Responsibility
//! - Implement the five catalog operations on top of a repository.
//! - Assign ids for new records.
//!
//! # Invariants
//! - Each operation is one `read` or `write` scope on the repository.
//! - New ids are `count + 1` rendered as a string. After a delete this can
//!   repeat an id that is still in use; lookups then hit the older record.
//! - A failed operation leaves the catalog untouched.

use crate::model::book::{Book, BookPatch, NewBook};
use crate::repo::book_repo::{BookError, BookRepository, RepoResult};
use log::{debug, info, warn};

/// Use-case service mapping catalog operations onto repository scopes.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every record in insertion order.
    pub fn list_books(&self) -> Vec<Book> {
        let books = self.repo.read(|store| store.list().to_vec());
        debug!("event=books_list module=service status=ok count={}", books.len());
        books
    }

    /// Returns the record with `id`, or `None` when absent.
    pub fn get_book(&self, id: &str) -> Option<Book> {
        let book = self.repo.read(|store| store.find_by_id(id).cloned());
        debug!(
            "event=book_get module=service status=ok id={} found={}",
            id,
            book.is_some()
        );
        book
    }

    /// Appends a new record and returns it.
    pub fn create_book(&self, input: NewBook) -> Book {
        let book = self.repo.write(|store| {
            let id = (store.len() + 1).to_string();
            let book = input.into_book(id);
            store.append(book.clone());
            book
        });
        info!("event=book_create module=service status=ok id={}", book.id);
        book
    }

    /// Overwrites the supplied non-empty fields of record `id`.
    ///
    /// # Errors
    /// - `BookError::NotFound` when no record has `id`.
    pub fn update_book(&self, id: &str, patch: &BookPatch) -> RepoResult<Book> {
        let result = self.repo.write(|store| -> RepoResult<(Book, bool)> {
            let book = store
                .find_by_id_mut(id)
                .ok_or_else(|| BookError::NotFound(id.to_string()))?;
            let changed = book.apply(patch);
            Ok((book.clone(), changed))
        });

        match result {
            Ok((book, changed)) => {
                info!(
                    "event=book_update module=service status=ok id={} changed={}",
                    id, changed
                );
                Ok(book)
            }
            Err(err) => {
                warn!(
                    "event=book_update module=service status=error id={} error_code={}",
                    id,
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Removes record `id`.
    ///
    /// # Errors
    /// - `BookError::NotFound` when no record has `id`.
    pub fn delete_book(&self, id: &str) -> RepoResult<bool> {
        match self.repo.write(|store| store.remove_by_id(id)) {
            Some(_) => {
                info!("event=book_delete module=service status=ok id={}", id);
                Ok(true)
            }
            None => {
                warn!(
                    "event=book_delete module=service status=error id={} error_code=NOT_FOUND",
                    id
                );
                Err(BookError::NotFound(id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BookService;
    use crate::model::book::NewBook;
    use crate::repo::book_repo::InMemoryBookRepository;

    #[test]
    fn create_on_empty_catalog_starts_at_one() {
        let service = BookService::new(InMemoryBookRepository::new());
        let created = service.create_book(NewBook::new("First", "Writer"));
        assert_eq!(created.id, "1");
    }

    #[test]
    fn list_is_a_snapshot() {
        let service = BookService::new(InMemoryBookRepository::seeded());
        let before = service.list_books();
        service.create_book(NewBook::new("Later", "Writer"));
        assert_eq!(before.len(), 2);
        assert_eq!(service.list_books().len(), 3);
    }
}
