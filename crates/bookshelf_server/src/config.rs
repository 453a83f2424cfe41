//! Server configuration.
//!
//! Priority: CLI flag > environment variable > default. Clap resolves the
//! first two; `ServerConfig::from_args` validates and fills defaults.

use bookshelf_core::{default_log_level, DatabaseUrl, DbError};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://bookshelf.sqlite3";
/// Upper bound for one request line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "bookshelf-server", version, about = "Book catalog operation server")]
pub struct ServerArgs {
    /// Address to bind the TCP listener to.
    #[arg(long = "bind", env = "BOOKSHELF_BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// TCP port; 0 picks a free port.
    #[arg(long, env = "BOOKSHELF_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Persistence backend: sqlite://<path>, sqlite::memory: or none.
    #[arg(long, env = "BOOKSHELF_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, env = "BOOKSHELF_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Start with an empty catalog instead of the sample records.
    /// The env form accepts 1/0, true/false, yes/no and on/off.
    #[arg(
        long,
        env = "BOOKSHELF_NO_SEED",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub no_seed: bool,

    #[arg(long, env = "BOOKSHELF_MAX_LINE_BYTES", default_value_t = DEFAULT_MAX_LINE_BYTES)]
    pub max_line_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBindAddress(String),
    InvalidDatabaseUrl(DbError),
    InvalidMaxLineBytes,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddress(value) => write!(f, "invalid bind address `{value}`"),
            Self::InvalidDatabaseUrl(err) => write!(f, "{err}"),
            Self::InvalidMaxLineBytes => write!(f, "max line bytes must be greater than zero"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDatabaseUrl(err) => Some(err),
            _ => None,
        }
    }
}

/// Validated server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: DatabaseUrl,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub seed: bool,
    pub max_line_bytes: usize,
}

impl ServerConfig {
    pub fn from_args(args: ServerArgs) -> Result<Self, ConfigError> {
        let ip = args
            .bind_address
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(args.bind_address.clone()))?;
        let database_url = args
            .database_url
            .parse::<DatabaseUrl>()
            .map_err(ConfigError::InvalidDatabaseUrl)?;
        if args.max_line_bytes == 0 {
            return Err(ConfigError::InvalidMaxLineBytes);
        }

        Ok(Self {
            bind_addr: SocketAddr::new(ip, args.port),
            database_url,
            log_level: args
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: args.log_dir.filter(|dir| !dir.trim().is_empty()),
            seed: !args.no_seed,
            max_line_bytes: args.max_line_bytes,
        })
    }
}
