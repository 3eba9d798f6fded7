//! Use-case services over the repositories.

pub mod document_service;
