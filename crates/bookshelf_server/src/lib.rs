//! Operation server for the Bookshelf catalog.
//!
//! Exposes the catalog operations (`books`, `book`, `createBook`,
//! `updateBook`, `deleteBook`) over newline-delimited JSON on TCP.

pub mod config;
pub mod dispatch;
pub mod protocol;
pub mod schema;
pub mod transport;

pub use config::{ConfigError, ServerArgs, ServerConfig};
pub use dispatch::Dispatcher;
pub use protocol::{ErrorCode, OperationError, OperationRequest, OperationResponse};
pub use schema::{Operation, SCHEMA_SDL};
pub use transport::CatalogServer;
