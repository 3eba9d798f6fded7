//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole documents as JSON bodies keyed by document key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Stored bodies are produced by `Document::to_json`.
//! - Read paths decode through the registry and reject invalid rows instead
//!   of masking them.

use crate::db::DbError;
use crate::document::{Document, DocumentError, DocumentType};
use crate::model::registry::TileRegistry;
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const SUMMARY_SELECT_SQL: &str = "SELECT
    key,
    uid,
    type,
    title,
    tile_count,
    change_count,
    created_at,
    updated_at,
    is_deleted
FROM documents";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Document(DocumentError),
    Db(DbError),
    NotFound(String),
    AlreadyExists(String),
    /// A stored row could not be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "document not found: {key}"),
            Self::AlreadyExists(key) => write!(f, "document already exists: {key}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for RepoError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and pagination for `list_documents`.
#[derive(Debug, Clone, Default)]
pub struct DocumentListQuery {
    pub uid: Option<String>,
    pub kind: Option<DocumentType>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Row metadata returned by listings, without decoding the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub key: String,
    pub uid: String,
    pub kind: DocumentType,
    pub title: Option<String>,
    pub tile_count: u32,
    pub change_count: u64,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_deleted: bool,
}

pub trait DocumentRepository {
    fn create_document(&self, document: &Document) -> RepoResult<String>;
    fn update_document(&self, document: &Document) -> RepoResult<()>;
    fn get_document(&self, key: &str, include_deleted: bool) -> RepoResult<Option<Document>>;
    fn list_documents(&self, query: &DocumentListQuery) -> RepoResult<Vec<DocumentSummary>>;
    fn soft_delete_document(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
    registry: Arc<TileRegistry>,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn new(conn: &'conn Connection, registry: Arc<TileRegistry>) -> Self {
        Self { conn, registry }
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn create_document(&self, document: &Document) -> RepoResult<String> {
        let body = document.to_json()?;
        let inserted = self.conn.execute(
            "INSERT INTO documents (
                key,
                uid,
                type,
                title,
                tile_count,
                change_count,
                body,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                document.key(),
                document.uid(),
                document.kind().as_str(),
                document.title(),
                tile_count(document),
                change_count_to_db(document.change_count()),
                body,
                document.created_at(),
            ],
        );

        match inserted {
            Ok(_) => Ok(document.key().to_string()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::AlreadyExists(document.key().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_document(&self, document: &Document) -> RepoResult<()> {
        let body = document.to_json()?;
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                title = ?1,
                tile_count = ?2,
                change_count = ?3,
                body = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE key = ?5
               AND is_deleted = 0;",
            params![
                document.title(),
                tile_count(document),
                change_count_to_db(document.change_count()),
                body,
                document.key(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(document.key().to_string()));
        }
        Ok(())
    }

    fn get_document(&self, key: &str, include_deleted: bool) -> RepoResult<Option<Document>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM documents
             WHERE key = ?1
               AND (?2 = 1 OR is_deleted = 0);",
        )?;
        let mut rows = stmt.query(params![key, bool_to_int(include_deleted)])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let body: String = row.get("body")?;
        let document = Document::from_json(&body, &self.registry).map_err(|err| {
            warn!(
                "event=document_load module=repo status=error key={} error={}",
                key, err
            );
            RepoError::InvalidData(format!("documents.body for `{key}`: {err}"))
        })?;
        Ok(Some(document))
    }

    fn list_documents(&self, query: &DocumentListQuery) -> RepoResult<Vec<DocumentSummary>> {
        let mut sql = format!("{SUMMARY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if let Some(uid) = &query.uid {
            sql.push_str(" AND uid = ?");
            bind_values.push(Value::Text(uid.clone()));
        }
        if let Some(kind) = query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        sql.push_str(" ORDER BY updated_at DESC, key ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }
        Ok(summaries)
    }

    fn soft_delete_document(&self, key: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE key = ?1;",
            [key],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(key.to_string()));
        }
        Ok(())
    }
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<DocumentSummary> {
    let key: String = row.get("key")?;

    let type_text: String = row.get("type")?;
    let kind = DocumentType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid document type `{type_text}` in documents.type"))
    })?;

    let tile_count = u32::try_from(row.get::<_, i64>("tile_count")?).map_err(|_| {
        RepoError::InvalidData(format!("negative tile_count for `{key}`"))
    })?;
    let change_count = u64::try_from(row.get::<_, i64>("change_count")?).map_err(|_| {
        RepoError::InvalidData(format!("negative change_count for `{key}`"))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in documents.is_deleted"
            )));
        }
    };

    Ok(DocumentSummary {
        uid: row.get("uid")?,
        kind,
        title: row.get("title")?,
        tile_count,
        change_count,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_deleted,
        key,
    })
}

fn tile_count(document: &Document) -> i64 {
    i64::try_from(document.content().len()).unwrap_or(i64::MAX)
}

fn change_count_to_db(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
