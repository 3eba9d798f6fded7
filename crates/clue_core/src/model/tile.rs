//! Tile record contract.
//!
//! # Responsibility
//! - Define the closed set of tile kinds and their discriminator literals.
//! - Define the shared contract every concrete tile variant fulfills.
//! - Provide the tagged union used by document-level code (serialization,
//!   rendering dispatch, deletion) without knowing the concrete variant.
//!
//! # Invariants
//! - Every variant's `KIND` is a compile-time literal matching its registry key.
//! - No two variants share a discriminator.
//! - A record's kind is derived from its union case and cannot be changed.
//!
//! # See also
//! - `model::registry` for discriminator-driven construction.

use crate::model::dataflow::DataflowTile;
use crate::model::geometry::GeometryTile;
use crate::model::image::ImageTile;
use crate::model::numberline::NumberlineTile;
use crate::model::table::TableTile;
use crate::model::text::TextTile;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw initial field values supplied by the document boundary.
pub type TileFields = serde_json::Map<String, serde_json::Value>;

/// Wire field carrying the discriminator.
pub const TYPE_FIELD: &str = "type";

/// Closed set of tile kinds.
///
/// Serialized as the discriminator literal (`"Text"`, `"Image"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Text,
    Table,
    Geometry,
    Image,
    Dataflow,
    Numberline,
}

impl TileKind {
    /// Every kind, in toolbar order.
    pub const VALUES: [TileKind; 6] = [
        TileKind::Text,
        TileKind::Table,
        TileKind::Geometry,
        TileKind::Image,
        TileKind::Dataflow,
        TileKind::Numberline,
    ];

    /// Discriminator literal stored in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Table => "Table",
            Self::Geometry => "Geometry",
            Self::Image => "Image",
            Self::Dataflow => "Dataflow",
            Self::Numberline => "Numberline",
        }
    }

    /// Parses a discriminator literal. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
    }
}

impl Display for TileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared contract of every concrete tile variant.
pub trait TileRecord: Sized + Into<TileContent> {
    /// Discriminator literal of this variant.
    const KIND: TileKind;

    /// Builds the variant from raw fields, naming the first missing or
    /// invalid field on failure.
    ///
    /// A `type` entry in `fields`, when present, must equal `KIND`.
    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError>;

    /// Checks cross-field constraints on an already built value.
    fn validate(&self) -> Result<(), TileValidationError> {
        Ok(())
    }

    /// Read-only discriminator.
    fn kind(&self) -> TileKind {
        Self::KIND
    }
}

/// Tagged union over all tile variants.
///
/// Serialized with the discriminator in the `type` field. There is no
/// `Deserialize` impl: decoding goes through `TileRegistry::create` so that
/// every record is validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TileContent {
    Text(TextTile),
    Table(TableTile),
    Geometry(GeometryTile),
    Image(ImageTile),
    Dataflow(DataflowTile),
    Numberline(NumberlineTile),
}

impl TileContent {
    pub fn kind(&self) -> TileKind {
        match self {
            Self::Text(_) => TileKind::Text,
            Self::Table(_) => TileKind::Table,
            Self::Geometry(_) => TileKind::Geometry,
            Self::Image(_) => TileKind::Image,
            Self::Dataflow(_) => TileKind::Dataflow,
            Self::Numberline(_) => TileKind::Numberline,
        }
    }

    /// Title carried by the content itself, if the variant has one.
    pub fn content_title(&self) -> Option<&str> {
        match self {
            Self::Image(image) => image.title(),
            _ => None,
        }
    }

    /// Re-checks the variant constraints. Used when a caller hands in a
    /// replacement snapshot.
    pub fn validate(&self) -> Result<(), TileValidationError> {
        match self {
            Self::Text(tile) => tile.validate(),
            Self::Table(tile) => tile.validate(),
            Self::Geometry(tile) => tile.validate(),
            Self::Image(tile) => tile.validate(),
            Self::Dataflow(tile) => tile.validate(),
            Self::Numberline(tile) => tile.validate(),
        }
    }

    pub fn as_image(&self) -> Option<&ImageTile> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextTile> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_dataflow(&self) -> Option<&DataflowTile> {
        match self {
            Self::Dataflow(dataflow) => Some(dataflow),
            _ => None,
        }
    }

    /// Snapshot written to exports and tile copies. Dataflow programs lose
    /// their per-node `recentValues` samples.
    pub fn exported(&self) -> Self {
        match self {
            Self::Dataflow(dataflow) => Self::Dataflow(DataflowTile {
                program: dataflow.program_without_recent_values(),
                program_data_rate: dataflow.program_data_rate,
                program_recording_mode: dataflow.program_recording_mode,
                program_zoom: dataflow.program_zoom,
                formatted_time: dataflow.formatted_time.clone(),
            }),
            other => other.clone(),
        }
    }
}

impl From<TextTile> for TileContent {
    fn from(value: TextTile) -> Self {
        Self::Text(value)
    }
}

impl From<TableTile> for TileContent {
    fn from(value: TableTile) -> Self {
        Self::Table(value)
    }
}

impl From<GeometryTile> for TileContent {
    fn from(value: GeometryTile) -> Self {
        Self::Geometry(value)
    }
}

impl From<ImageTile> for TileContent {
    fn from(value: ImageTile) -> Self {
        Self::Image(value)
    }
}

impl From<DataflowTile> for TileContent {
    fn from(value: DataflowTile) -> Self {
        Self::Dataflow(value)
    }
}

impl From<NumberlineTile> for TileContent {
    fn from(value: NumberlineTile) -> Self {
        Self::Numberline(value)
    }
}

/// Field-level validation errors raised while constructing a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileValidationError {
    MissingField {
        kind: TileKind,
        field: &'static str,
    },
    InvalidField {
        kind: TileKind,
        field: &'static str,
        expected: &'static str,
    },
    TypeMismatch {
        expected: TileKind,
        found: String,
    },
    Constraint {
        kind: TileKind,
        field: &'static str,
        message: String,
    },
}

impl TileValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidField { field, .. }
            | Self::Constraint { field, .. } => field,
            Self::TypeMismatch { .. } => TYPE_FIELD,
        }
    }
}

impl Display for TileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { kind, field } => {
                write!(f, "{kind} tile is missing required field `{field}`")
            }
            Self::InvalidField {
                kind,
                field,
                expected,
            } => write!(f, "{kind} tile field `{field}` must be {expected}"),
            Self::TypeMismatch { expected, found } => write!(
                f,
                "tile type `{found}` does not match variant literal `{expected}`"
            ),
            Self::Constraint {
                kind,
                field,
                message,
            } => write!(f, "{kind} tile field `{field}` is invalid: {message}"),
        }
    }
}

impl Error for TileValidationError {}
