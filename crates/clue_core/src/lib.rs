//! Core document and tile model for CLUE curriculum workspaces.
//! This crate owns tile validation, document mutation and local storage.

pub mod db;
pub mod document;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use document::codec::export_content_json;
pub use document::{
    AddTileOptions, Document, DocumentContent, DocumentError, DocumentEvent, DocumentResult,
    DocumentType, ObserverId, Visibility,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::registry::{TileError, TileRegistry, TileSchema};
pub use model::section::{
    describe, describe_str, section_type_from_path, SectionError, SectionInfo, SectionType,
};
pub use model::tile::{TileContent, TileFields, TileKind, TileRecord, TileValidationError};
pub use model::tile_model::{DisplayUserType, TileId, TileModel};
pub use repo::document_repo::{
    DocumentListQuery, DocumentRepository, DocumentSummary, RepoError, RepoResult,
    SqliteDocumentRepository,
};
pub use service::document_service::{
    CreateDocumentRequest, DocumentService, ServiceError, ServiceResult,
};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
