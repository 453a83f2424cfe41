//! Persistence collaborator for the catalog.
//!
//! # Responsibility
//! - Open and configure SQLite connections with schema migrations applied.
//! - Expose a connect/disconnect backend seam that the server manages.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Catalog operations never go through a backend; the in-memory store is
//!   the only source of truth.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod backend;
pub mod migrations;
mod open;

pub use backend::{backend_for, DatabaseUrl, NoopBackend, PersistenceBackend, SqliteBackend};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    InvalidUrl(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidUrl(url) => write!(
                f,
                "unsupported database url `{url}`; expected sqlite://<path>|sqlite::memory:|none"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidUrl(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
