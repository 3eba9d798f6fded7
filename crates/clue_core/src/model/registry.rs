//! Tile type registry.
//!
//! # Responsibility
//! - Map a discriminator string to the builder of its concrete variant.
//! - Validate raw initial fields and produce a new tile record.
//!
//! # Invariants
//! - At most one schema per discriminator; a rejected registration leaves the
//!   existing entry untouched.
//! - A built record's kind always equals the discriminator it was created
//!   from; a schema whose builder yields another kind fails at construction.
//! - The registry is populated once at startup and then shared read-only
//!   (`Arc<TileRegistry>`) with the document layer.

use crate::model::dataflow::DataflowTile;
use crate::model::geometry::GeometryTile;
use crate::model::image::ImageTile;
use crate::model::numberline::NumberlineTile;
use crate::model::table::TableTile;
use crate::model::text::TextTile;
use crate::model::tile::{TileContent, TileFields, TileKind, TileRecord, TileValidationError};
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Builds one validated record from raw fields.
pub type TileBuilder = fn(&TileFields) -> Result<TileContent, TileValidationError>;

/// Registry errors surfaced to the document boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    UnknownKind(String),
    DuplicateKind(TileKind),
    Validation(TileValidationError),
}

impl Display for TileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(value) => write!(f, "unknown tile kind: `{value}`"),
            Self::DuplicateKind(kind) => write!(f, "tile kind already registered: {kind}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TileValidationError> for TileError {
    fn from(value: TileValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Registry entry: one discriminator plus its builder.
#[derive(Clone, Copy)]
pub struct TileSchema {
    kind: TileKind,
    build: TileBuilder,
}

impl TileSchema {
    /// Schema with a caller-supplied builder.
    pub fn new(kind: TileKind, build: TileBuilder) -> Self {
        Self { kind, build }
    }

    /// Schema derived from a `TileRecord` type; the key is `T::KIND`.
    pub fn of<T: TileRecord>() -> Self {
        Self::new(T::KIND, build_record::<T>)
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    fn build(&self, fields: &TileFields) -> Result<TileContent, TileValidationError> {
        let content = (self.build)(fields)?;
        if content.kind() != self.kind {
            return Err(TileValidationError::TypeMismatch {
                expected: self.kind,
                found: content.kind().as_str().to_string(),
            });
        }
        Ok(content)
    }
}

impl Debug for TileSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSchema")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn build_record<T: TileRecord>(fields: &TileFields) -> Result<TileContent, TileValidationError> {
    let record = T::from_fields(fields)?;
    record.validate()?;
    Ok(record.into())
}

/// Discriminator -> schema lookup.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    schemas: BTreeMap<TileKind, TileSchema>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tile kind.
    pub fn with_builtin_tiles() -> Self {
        let mut registry = Self::new();
        for schema in builtin_schemas() {
            registry.schemas.insert(schema.kind, schema);
        }
        registry
    }

    /// Adds one schema.
    ///
    /// # Errors
    /// - `DuplicateKind` when the discriminator is already registered.
    pub fn register(&mut self, schema: TileSchema) -> Result<(), TileError> {
        if self.schemas.contains_key(&schema.kind) {
            warn!(
                "event=tile_register module=registry status=error kind={} error_code=duplicate_kind",
                schema.kind
            );
            return Err(TileError::DuplicateKind(schema.kind));
        }
        self.schemas.insert(schema.kind, schema);
        Ok(())
    }

    /// Registers the schema derived from `T`.
    pub fn register_variant<T: TileRecord>(&mut self) -> Result<(), TileError> {
        self.register(TileSchema::of::<T>())
    }

    /// Validates `fields` against the schema registered for `discriminator`
    /// and returns a new record.
    ///
    /// # Errors
    /// - `UnknownKind` when the discriminator is not a known literal or has no
    ///   registered schema.
    /// - `Validation` naming the first missing or invalid field.
    pub fn create(&self, discriminator: &str, fields: &TileFields) -> Result<TileContent, TileError> {
        let schema = self.lookup(discriminator)?;
        schema.build(fields).map_err(|err| {
            warn!(
                "event=tile_create module=registry status=error kind={} error_code=validation field={}",
                schema.kind,
                err.field()
            );
            TileError::Validation(err)
        })
    }

    /// Builds the record for `discriminator` from no initial fields.
    ///
    /// Kinds with required fields (e.g. `Image`) fail with a validation error.
    pub fn create_default(&self, discriminator: &str) -> Result<TileContent, TileError> {
        self.create(discriminator, &TileFields::new())
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.schemas.contains_key(&kind)
    }

    pub fn get(&self, kind: TileKind) -> Option<&TileSchema> {
        self.schemas.get(&kind)
    }

    /// Registered kinds in discriminator order.
    pub fn kinds(&self) -> Vec<TileKind> {
        self.schemas.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn lookup(&self, discriminator: &str) -> Result<&TileSchema, TileError> {
        TileKind::parse(discriminator)
            .and_then(|kind| self.schemas.get(&kind))
            .ok_or_else(|| {
                warn!(
                    "event=tile_create module=registry status=error error_code=unknown_kind kind_len={}",
                    discriminator.len()
                );
                TileError::UnknownKind(discriminator.to_string())
            })
    }
}

fn builtin_schemas() -> [TileSchema; 6] {
    [
        TileSchema::of::<TextTile>(),
        TileSchema::of::<TableTile>(),
        TileSchema::of::<GeometryTile>(),
        TileSchema::of::<ImageTile>(),
        TileSchema::of::<DataflowTile>(),
        TileSchema::of::<NumberlineTile>(),
    ]
}
