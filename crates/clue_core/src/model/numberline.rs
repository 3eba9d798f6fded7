//! Number line tile record.
//!
//! # Invariants
//! - `min < max`.
//! - Point ids are unique and every `x_value` lies within `[min, max]`.

use crate::model::fields::{constraint, FieldReader};
use crate::model::tile::{TileFields, TileKind, TileRecord, TileValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub const DEFAULT_DOMAIN_MIN: f64 = -5.0;
pub const DEFAULT_DOMAIN_MAX: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberlinePoint {
    pub id: String,
    pub x_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberlineTile {
    pub min: f64,
    pub max: f64,
    pub points: Vec<NumberlinePoint>,
}

impl Default for NumberlineTile {
    fn default() -> Self {
        Self {
            min: DEFAULT_DOMAIN_MIN,
            max: DEFAULT_DOMAIN_MAX,
            points: Vec::new(),
        }
    }
}

impl NumberlineTile {
    /// Adds a point at `x_value` and returns its generated id.
    pub fn add_point(&mut self, x_value: f64) -> Result<String, TileValidationError> {
        if !x_value.is_finite() || x_value < self.min || x_value > self.max {
            return Err(constraint(
                Self::KIND,
                "points",
                format!("x value {x_value} is outside [{}, {}]", self.min, self.max),
            ));
        }
        let id = Uuid::new_v4().to_string();
        self.points.push(NumberlinePoint {
            id: id.clone(),
            x_value,
        });
        Ok(id)
    }

    /// Removes one point; returns whether it existed.
    pub fn remove_point(&mut self, point_id: &str) -> bool {
        let before = self.points.len();
        self.points.retain(|point| point.id != point_id);
        self.points.len() != before
    }

    pub fn point(&self, point_id: &str) -> Option<&NumberlinePoint> {
        self.points.iter().find(|point| point.id == point_id)
    }
}

impl TileRecord for NumberlineTile {
    const KIND: TileKind = TileKind::Numberline;

    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError> {
        let reader = FieldReader::new(Self::KIND, fields)?;
        Ok(Self {
            min: reader.f64_or("min", DEFAULT_DOMAIN_MIN)?,
            max: reader.f64_or("max", DEFAULT_DOMAIN_MAX)?,
            points: reader
                .nested("points", "a list of {id, xValue} points")?
                .unwrap_or_default(),
        })
    }

    fn validate(&self) -> Result<(), TileValidationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(constraint(
                Self::KIND,
                "max",
                format!("max {} must exceed min {}", self.max, self.min),
            ));
        }
        let mut seen = HashSet::new();
        for point in &self.points {
            if point.id.trim().is_empty() {
                return Err(constraint(Self::KIND, "points", "point id must not be empty"));
            }
            if !seen.insert(point.id.as_str()) {
                return Err(constraint(
                    Self::KIND,
                    "points",
                    format!("duplicate point id `{}`", point.id),
                ));
            }
            if !point.x_value.is_finite() || point.x_value < self.min || point.x_value > self.max {
                return Err(constraint(
                    Self::KIND,
                    "points",
                    format!("point `{}` lies outside the axis domain", point.id),
                ));
            }
        }
        Ok(())
    }
}
