//! Geometry tile record.
//!
//! Board objects (points, polygons, ...) live in the change log; this layer
//! only owns the board axes and background image.

use crate::model::fields::{constraint, FieldReader};
use crate::model::tile::{TileFields, TileKind, TileRecord, TileValidationError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PIXELS_PER_UNIT: f64 = 18.3;

fn default_unit() -> f64 {
    DEFAULT_PIXELS_PER_UNIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub min: f64,
    /// Pixels per axis unit.
    #[serde(default = "default_unit")]
    pub unit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
}

impl AxisModel {
    pub fn with_min(min: f64) -> Self {
        Self {
            name: None,
            label: None,
            min,
            unit: DEFAULT_PIXELS_PER_UNIT,
            range: None,
        }
    }

    fn check(&self, axis: &str) -> Result<(), String> {
        if !self.min.is_finite() {
            return Err(format!("{axis} min must be finite"));
        }
        if !self.unit.is_finite() || self.unit <= 0.0 {
            return Err(format!("{axis} unit must be positive"));
        }
        if let Some(range) = self.range {
            if !range.is_finite() || range <= 0.0 {
                return Err(format!("{axis} range must be positive"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardModel {
    pub x_axis: AxisModel,
    pub y_axis: AxisModel,
}

impl Default for BoardModel {
    fn default() -> Self {
        Self {
            x_axis: AxisModel::with_min(-2.0),
            y_axis: AxisModel::with_min(-1.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryTile {
    pub board: BoardModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_image: Option<String>,
    pub changes: Vec<String>,
}

impl TileRecord for GeometryTile {
    const KIND: TileKind = TileKind::Geometry;

    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError> {
        let reader = FieldReader::new(Self::KIND, fields)?;
        Ok(Self {
            // saved boards without axes get the default board
            board: reader
                .nested("board", "a board with xAxis and yAxis")?
                .unwrap_or_default(),
            bg_image: reader.optional_str("bgImage")?,
            changes: reader.string_list("changes")?,
        })
    }

    fn validate(&self) -> Result<(), TileValidationError> {
        self.board
            .x_axis
            .check("x")
            .and_then(|()| self.board.y_axis.check("y"))
            .map_err(|message| constraint(Self::KIND, "board", message))
    }
}

#[cfg(test)]
mod tests {
    use super::{GeometryTile, DEFAULT_PIXELS_PER_UNIT};
    use crate::model::tile::TileRecord;
    use serde_json::json;

    #[test]
    fn axis_unit_defaults_when_omitted() {
        let fields = json!({
            "board": { "xAxis": { "min": -3 }, "yAxis": { "min": 0, "unit": 20 } }
        });
        let tile = GeometryTile::from_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(tile.board.x_axis.unit, DEFAULT_PIXELS_PER_UNIT);
        assert_eq!(tile.board.y_axis.unit, 20.0);
    }

    #[test]
    fn rejects_zero_unit() {
        let fields = json!({
            "board": { "xAxis": { "min": 0, "unit": 0 }, "yAxis": { "min": 0 } }
        });
        let tile = GeometryTile::from_fields(fields.as_object().unwrap()).unwrap();
        let err = tile.validate().unwrap_err();
        assert_eq!(err.field(), "board");
    }
}
