//! Document use-case service.
//!
//! # Responsibility
//! - Load, mutate and store documents in one call for core callers.
//! - Delegate persistence to a `DocumentRepository`.
//!
//! # Invariants
//! - Every mutation is applied to a freshly loaded document and stored
//!   only when it succeeded.
//! - The service never bypasses registry validation.

use crate::document::{AddTileOptions, Document, DocumentError, DocumentType};
use crate::model::registry::TileRegistry;
use crate::model::tile::TileFields;
use crate::model::tile_model::TileId;
use crate::repo::document_repo::{
    DocumentListQuery, DocumentRepository, DocumentSummary, RepoError,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    DocumentNotFound(String),
    Document(DocumentError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(key) => write!(f, "document not found: {key}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DocumentNotFound(_) => None,
            Self::Document(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DocumentError> for ServiceError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(key) => Self::DocumentNotFound(key),
            other => Self::Repo(other),
        }
    }
}

/// Input for `DocumentService::create_document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDocumentRequest {
    pub uid: String,
    pub kind: DocumentType,
    /// Generated when `None`.
    pub key: Option<String>,
    pub title: Option<String>,
}

pub struct DocumentService<R: DocumentRepository> {
    repo: R,
    registry: Arc<TileRegistry>,
}

impl<R: DocumentRepository> DocumentService<R> {
    pub fn new(repo: R, registry: Arc<TileRegistry>) -> Self {
        Self { repo, registry }
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Stores an empty document and returns its key.
    pub fn create_document(&self, request: &CreateDocumentRequest) -> ServiceResult<String> {
        if request.uid.trim().is_empty() {
            return Err(DocumentError::InvalidDocument("uid must not be empty".to_string()).into());
        }
        let key = match &request.key {
            Some(key) if key.trim().is_empty() => {
                return Err(
                    DocumentError::InvalidDocument("key must not be empty".to_string()).into(),
                );
            }
            Some(key) => key.clone(),
            None => Uuid::new_v4().to_string(),
        };

        let mut document = Document::new(request.uid.clone(), request.kind, key);
        if request.title.is_some() {
            document.set_title(request.title.clone());
        }
        let key = self.repo.create_document(&document)?;
        info!(
            "event=document_create module=service status=ok doc_type={}",
            request.kind.as_str()
        );
        Ok(key)
    }

    /// Decodes a saved document through the registry and stores it as new.
    pub fn import_document(&self, json: &str) -> ServiceResult<String> {
        let document = Document::from_json(json, &self.registry)?;
        let key = self.repo.create_document(&document)?;
        info!(
            "event=document_import module=service status=ok doc_type={} tiles={}",
            document.kind().as_str(),
            document.content().len()
        );
        Ok(key)
    }

    pub fn load_document(&self, key: &str) -> ServiceResult<Document> {
        self.repo
            .get_document(key, false)?
            .ok_or_else(|| ServiceError::DocumentNotFound(key.to_string()))
    }

    pub fn list_documents(&self, query: &DocumentListQuery) -> ServiceResult<Vec<DocumentSummary>> {
        Ok(self.repo.list_documents(query)?)
    }

    /// Builds a tile through the registry and appends or inserts it.
    pub fn add_tile(
        &self,
        key: &str,
        discriminator: &str,
        fields: &TileFields,
        options: AddTileOptions,
    ) -> ServiceResult<TileId> {
        self.mutate(key, |document, registry| {
            document.add_tile(registry, discriminator, fields, options)
        })
    }

    pub fn rename_tile(&self, key: &str, tile_id: &str, title: Option<String>) -> ServiceResult<()> {
        self.mutate(key, |document, _| document.set_tile_title(tile_id, title))
    }

    pub fn remove_tile(&self, key: &str, tile_id: &str) -> ServiceResult<()> {
        self.mutate(key, |document, _| document.remove_tile(tile_id).map(|_| ()))
    }

    pub fn delete_document(&self, key: &str) -> ServiceResult<()> {
        self.repo.soft_delete_document(key)?;
        info!("event=document_delete module=service status=ok");
        Ok(())
    }

    fn mutate<T>(
        &self,
        key: &str,
        apply: impl FnOnce(&mut Document, &TileRegistry) -> Result<T, DocumentError>,
    ) -> ServiceResult<T> {
        let mut document = self.load_document(key)?;
        let output = apply(&mut document, &self.registry)?;
        self.repo.update_document(&document)?;
        Ok(output)
    }
}
