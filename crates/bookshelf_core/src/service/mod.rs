//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository scopes into the catalog operations.
//! - Keep transport and client layers decoupled from storage details.

pub mod book_service;
