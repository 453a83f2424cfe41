//! Bookshelf operation server entry point.
//!
//! ```bash
//! bookshelf-server                          # 127.0.0.1:4000, seeded catalog
//! bookshelf-server --port 4100 --no-seed
//! BOOKSHELF_DATABASE_URL=none bookshelf-server
//! ```

use anyhow::{Context, Result};
use bookshelf_core::{
    backend_for, init_logging, BookService, InMemoryBookRepository, PersistenceBackend,
};
use bookshelf_server::{CatalogServer, Dispatcher, ServerArgs, ServerConfig};
use clap::Parser;
use log::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_args(ServerArgs::parse()).context("invalid configuration")?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let mut backend = backend_for(&config.database_url);
    connect_backend(backend.as_mut());

    let repo = if config.seed {
        InMemoryBookRepository::seeded()
    } else {
        InMemoryBookRepository::new()
    };
    let dispatcher = Dispatcher::new(BookService::new(repo));
    let server = CatalogServer::bind(config.bind_addr, dispatcher, config.max_line_bytes).await?;

    println!("Server ready at tcp://{}", server.local_addr()?);
    let served = server.serve_until(shutdown_signal()).await;

    if let Err(err) = backend.disconnect() {
        warn!(
            "event=backend_disconnect module=server status=error target={} error={}",
            backend.describe(),
            err
        );
    }
    served
}

/// Connection failures are logged and the server keeps running; the catalog
/// does not depend on the backend.
fn connect_backend(backend: &mut dyn PersistenceBackend) {
    match backend.connect() {
        Ok(()) => info!(
            "event=backend_connect module=server status=ok target={}",
            backend.describe()
        ),
        Err(err) => error!(
            "event=backend_connect module=server status=error target={} error={}",
            backend.describe(),
            err
        ),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal module=server status=error error={}", err);
        std::future::pending::<()>().await;
    }
}
