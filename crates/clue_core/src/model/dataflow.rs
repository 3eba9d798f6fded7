//! Dataflow tile record.

use crate::model::fields::{constraint, FieldReader};
use crate::model::tile::{TileFields, TileKind, TileRecord, TileValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling interval in milliseconds.
pub const DEFAULT_DATA_RATE: i64 = 1000;
pub const DEFAULT_FORMATTED_TIME: &str = "000:00";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgramZoom {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

impl Default for ProgramZoom {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataflowTile {
    /// Node graph snapshot; opaque at this layer.
    pub program: Value,
    pub program_data_rate: i64,
    pub program_recording_mode: i64,
    pub program_zoom: ProgramZoom,
    pub formatted_time: String,
}

impl Default for DataflowTile {
    fn default() -> Self {
        Self {
            program: Value::Object(TileFields::new()),
            program_data_rate: DEFAULT_DATA_RATE,
            program_recording_mode: 0,
            program_zoom: ProgramZoom::default(),
            formatted_time: DEFAULT_FORMATTED_TIME.to_string(),
        }
    }
}

impl DataflowTile {
    /// Program snapshot with per-node `recentValues` stripped, as stored for
    /// copies and exports.
    pub fn program_without_recent_values(&self) -> Value {
        let mut program = self.program.clone();
        if let Some(values) = program.get_mut("values").and_then(Value::as_object_mut) {
            for node in values.values_mut() {
                if let Some(node) = node.as_object_mut() {
                    node.remove("recentValues");
                }
            }
        }
        program
    }
}

impl TileRecord for DataflowTile {
    const KIND: TileKind = TileKind::Dataflow;

    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError> {
        let reader = FieldReader::new(Self::KIND, fields)?;
        Ok(Self {
            program: reader.object_or_empty("program")?,
            program_data_rate: reader.i64_or("programDataRate", DEFAULT_DATA_RATE)?,
            program_recording_mode: reader.i64_or("programRecordingMode", 0)?,
            program_zoom: reader
                .nested("programZoom", "an object with dx, dy and scale")?
                .unwrap_or_default(),
            formatted_time: reader.str_or("formattedTime", DEFAULT_FORMATTED_TIME)?,
        })
    }

    fn validate(&self) -> Result<(), TileValidationError> {
        if !self.program.is_object() {
            return Err(constraint(Self::KIND, "program", "must be an object"));
        }
        if self.program_data_rate <= 0 {
            return Err(constraint(
                Self::KIND,
                "programDataRate",
                "must be a positive number of milliseconds",
            ));
        }
        let zoom = self.program_zoom;
        if !zoom.scale.is_finite() || zoom.scale <= 0.0 || !zoom.dx.is_finite() || !zoom.dy.is_finite()
        {
            return Err(constraint(
                Self::KIND,
                "programZoom",
                "offsets must be finite and scale positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DataflowTile;
    use serde_json::json;

    #[test]
    fn strips_recent_values_from_program_nodes() {
        let tile = DataflowTile {
            program: json!({
                "values": {
                    "n1": { "name": "sensor", "recentValues": [1, 2, 3] },
                    "n2": { "name": "light" }
                }
            }),
            ..DataflowTile::default()
        };

        let stripped = tile.program_without_recent_values();
        assert!(stripped["values"]["n1"].get("recentValues").is_none());
        assert_eq!(stripped["values"]["n1"]["name"], "sensor");
        assert_eq!(stripped["values"]["n2"]["name"], "light");
        assert!(tile.program["values"]["n1"].get("recentValues").is_some());
    }
}
