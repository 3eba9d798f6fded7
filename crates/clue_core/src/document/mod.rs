//! Document container and codec.
//!
//! # Responsibility
//! - Own a document's tiles explicitly and notify observers on every change.
//! - Decode saved documents through the tile registry and encode them back.
//!
//! # Invariants
//! - All mutations go through `Document`; failed mutations change nothing
//!   and emit no event.
//! - Every decoded tile passed registry validation.

use crate::model::registry::TileError;
use crate::model::tile::TileKind;
use crate::model::tile_model::TileId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod content;
pub mod model;
pub mod observer;

pub use content::DocumentContent;
pub use model::{AddTileOptions, Document, DocumentType, Visibility};
pub use observer::{DocumentEvent, ObserverId};

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug)]
pub enum DocumentError {
    /// Tile construction or validation failed.
    Tile {
        tile_id: Option<TileId>,
        source: TileError,
    },
    TileNotFound(TileId),
    DuplicateTileId(TileId),
    InvalidTileId,
    KindChange {
        tile_id: TileId,
        from: TileKind,
        to: TileKind,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    /// Document-level field is missing or malformed.
    InvalidDocument(String),
    Json(serde_json::Error),
}

impl DocumentError {
    /// Stable identifier for log lines; never carries document content.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Tile {
                source: TileError::UnknownKind(_),
                ..
            } => "unknown_kind",
            Self::Tile {
                source: TileError::DuplicateKind(_),
                ..
            } => "duplicate_kind",
            Self::Tile {
                source: TileError::Validation(_),
                ..
            } => "tile_validation",
            Self::TileNotFound(_) => "tile_not_found",
            Self::DuplicateTileId(_) => "duplicate_tile_id",
            Self::InvalidTileId => "invalid_tile_id",
            Self::KindChange { .. } => "kind_change",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::InvalidDocument(_) => "invalid_document",
            Self::Json(_) => "json",
        }
    }
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tile {
                tile_id: Some(tile_id),
                source,
            } => write!(f, "tile `{tile_id}`: {source}"),
            Self::Tile {
                tile_id: None,
                source,
            } => write!(f, "{source}"),
            Self::TileNotFound(tile_id) => write!(f, "tile not found: {tile_id}"),
            Self::DuplicateTileId(tile_id) => write!(f, "tile id already in document: {tile_id}"),
            Self::InvalidTileId => write!(f, "tile id must not be empty"),
            Self::KindChange { tile_id, from, to } => write!(
                f,
                "tile `{tile_id}` cannot change kind from {from} to {to}"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "tile index {index} out of range for {len} tile(s)")
            }
            Self::InvalidDocument(message) => write!(f, "invalid document: {message}"),
            Self::Json(err) => write!(f, "document json error: {err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tile { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<TileError> for DocumentError {
    fn from(value: TileError) -> Self {
        Self::Tile {
            tile_id: None,
            source: value,
        }
    }
}
