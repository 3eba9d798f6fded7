//! Persistence contracts and their SQLite implementations.
//!
//! # Invariants
//! - Repositories return semantic errors (`NotFound`, `AlreadyExists`) in
//!   addition to storage errors.

pub mod document_repo;
