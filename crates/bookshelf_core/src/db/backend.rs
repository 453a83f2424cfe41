//! Persistence backend seam.
//!
//! # Responsibility
//! - Parse database urls into backend choices.
//! - Manage a connection lifecycle that the catalog itself never uses.
//!
//! # Invariants
//! - `connect` is idempotent while connected.
//! - `disconnect` on a disconnected backend is a no-op.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

const SQLITE_MEMORY_URL: &str = "sqlite::memory:";
const SQLITE_SCHEME: &str = "sqlite://";

/// Connection lifecycle managed by the server around the catalog.
pub trait PersistenceBackend: Send {
    fn connect(&mut self) -> DbResult<()>;
    fn disconnect(&mut self) -> DbResult<()>;
    fn is_connected(&self) -> bool;
    /// Human-readable target used in log lines.
    fn describe(&self) -> String;
}

/// Parsed `--database-url` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Sqlite(PathBuf),
    SqliteMemory,
    None,
}

impl FromStr for DatabaseUrl {
    type Err = DbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        if trimmed == SQLITE_MEMORY_URL {
            return Ok(Self::SqliteMemory);
        }
        match trimmed.strip_prefix(SQLITE_SCHEME) {
            Some(path) if !path.is_empty() => Ok(Self::Sqlite(PathBuf::from(path))),
            _ => Err(DbError::InvalidUrl(trimmed.to_string())),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(path) => write!(f, "{SQLITE_SCHEME}{}", path.display()),
            Self::SqliteMemory => f.write_str(SQLITE_MEMORY_URL),
            Self::None => f.write_str("none"),
        }
    }
}

/// Builds the backend selected by `url`.
pub fn backend_for(url: &DatabaseUrl) -> Box<dyn PersistenceBackend> {
    match url {
        DatabaseUrl::Sqlite(path) => Box::new(SqliteBackend::file(path.clone())),
        DatabaseUrl::SqliteMemory => Box::new(SqliteBackend::in_memory()),
        DatabaseUrl::None => Box::new(NoopBackend::default()),
    }
}

/// Backend that only tracks connection state.
#[derive(Debug, Default)]
pub struct NoopBackend {
    connected: bool,
}

impl PersistenceBackend for NoopBackend {
    fn connect(&mut self) -> DbResult<()> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> DbResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// SQLite connection opened at startup and held until shutdown.
pub struct SqliteBackend {
    target: DatabaseUrl,
    conn: Option<Connection>,
}

impl SqliteBackend {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: DatabaseUrl::Sqlite(path.into()),
            conn: None,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            target: DatabaseUrl::SqliteMemory,
            conn: None,
        }
    }

    /// Live connection, if any. Only diagnostics and tests read it.
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }
}

impl PersistenceBackend for SqliteBackend {
    fn connect(&mut self) -> DbResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = match &self.target {
            DatabaseUrl::Sqlite(path) => open_db(path)?,
            _ => open_db_in_memory()?,
        };
        self.conn = Some(conn);
        info!(
            "event=backend_connect module=db status=ok target={}",
            self.target
        );
        Ok(())
    }

    fn disconnect(&mut self) -> DbResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| DbError::Sqlite(err))?;
            info!(
                "event=backend_disconnect module=db status=ok target={}",
                self.target
            );
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn describe(&self) -> String {
        self.target.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{DatabaseUrl, NoopBackend, PersistenceBackend};
    use std::path::PathBuf;

    #[test]
    fn parses_supported_urls() {
        assert_eq!(
            "sqlite://data/books.db".parse::<DatabaseUrl>().unwrap(),
            DatabaseUrl::Sqlite(PathBuf::from("data/books.db"))
        );
        assert_eq!(
            " sqlite::memory: ".parse::<DatabaseUrl>().unwrap(),
            DatabaseUrl::SqliteMemory
        );
        assert_eq!("NONE".parse::<DatabaseUrl>().unwrap(), DatabaseUrl::None);
    }

    #[test]
    fn rejects_other_schemes() {
        let err = "mongodb://127.0.0.1/mydatabase"
            .parse::<DatabaseUrl>()
            .unwrap_err();
        assert!(err.to_string().contains("mongodb://127.0.0.1/mydatabase"));
        assert!("sqlite://".parse::<DatabaseUrl>().is_err());
    }

    #[test]
    fn noop_backend_tracks_state() {
        let mut backend = NoopBackend::default();
        assert!(!backend.is_connected());
        backend.connect().unwrap();
        assert!(backend.is_connected());
        backend.disconnect().unwrap();
        assert!(!backend.is_connected());
    }
}
