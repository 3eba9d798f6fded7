//! Table tile record.
//!
//! Table state is kept as an ordered log of serialized change records; the
//! log is opaque at this layer.

use crate::model::fields::{constraint, FieldReader};
use crate::model::tile::{TileFields, TileKind, TileRecord, TileValidationError};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableTile {
    pub is_imported: bool,
    pub changes: Vec<String>,
    /// Column id -> width in pixels.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub column_widths: BTreeMap<String, f64>,
}

impl TileRecord for TableTile {
    const KIND: TileKind = TileKind::Table;

    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError> {
        let reader = FieldReader::new(Self::KIND, fields)?;
        Ok(Self {
            is_imported: reader.bool_or("isImported", false)?,
            changes: reader.string_list("changes")?,
            column_widths: reader
                .nested("columnWidths", "a map of column widths")?
                .unwrap_or_default(),
        })
    }

    fn validate(&self) -> Result<(), TileValidationError> {
        if let Some((column, _)) = self
            .column_widths
            .iter()
            .find(|(_, width)| !width.is_finite() || **width <= 0.0)
        {
            return Err(constraint(
                Self::KIND,
                "columnWidths",
                format!("width for column `{column}` must be positive"),
            ));
        }
        Ok(())
    }
}
