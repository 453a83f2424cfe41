//! Core domain logic for the Bookshelf catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{backend_for, DatabaseUrl, DbError, NoopBackend, PersistenceBackend, SqliteBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId, BookPatch, NewBook};
pub use repo::book_repo::{
    seed_books, BookError, BookRepository, InMemoryBookRepository, RepoResult,
};
pub use repo::catalog_store::CatalogStore;
pub use service::book_service::BookService;
