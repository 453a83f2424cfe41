//! Terminal client for the Bookshelf catalog server.

pub mod client;
pub mod view;

pub use client::{CatalogClient, ClientError, ClientResult};
pub use view::View;
