//! Repository layer: catalog storage and scoped access.
//!
//! # Responsibility
//! - Keep the ordered record collection behind one lock.
//! - Isolate storage details from the resolver service.
//!
//! # Invariants
//! - Id-keyed mutations report `BookError::NotFound` instead of no-oping.

pub mod book_repo;
pub mod catalog_store;
