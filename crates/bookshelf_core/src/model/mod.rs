//! Catalog domain model.
//!
//! # Responsibility
//! - Define the record shape shared by the store, service and wire layers.
//!
//! # Invariants
//! - Every record is identified by a catalog-assigned string `BookId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod book;
