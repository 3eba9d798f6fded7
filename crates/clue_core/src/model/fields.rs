//! Typed access to raw tile fields.
//!
//! `null` values are treated the same as absent ones, matching how saved
//! documents encode unset optional fields.

use crate::model::tile::{TileFields, TileKind, TileValidationError, TYPE_FIELD};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) struct FieldReader<'a> {
    kind: TileKind,
    fields: &'a TileFields,
}

impl<'a> FieldReader<'a> {
    /// Wraps `fields` for `kind`, rejecting a `type` entry that names a
    /// different variant.
    pub(crate) fn new(kind: TileKind, fields: &'a TileFields) -> Result<Self, TileValidationError> {
        match fields.get(TYPE_FIELD) {
            None | Some(Value::Null) => {}
            Some(Value::String(found)) if found == kind.as_str() => {}
            Some(Value::String(found)) => {
                return Err(TileValidationError::TypeMismatch {
                    expected: kind,
                    found: found.clone(),
                });
            }
            Some(_) => {
                return Err(TileValidationError::InvalidField {
                    kind,
                    field: TYPE_FIELD,
                    expected: "a string",
                });
            }
        }
        Ok(Self { kind, fields })
    }

    fn value(&self, name: &str) -> Option<&'a Value> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn missing(&self, field: &'static str) -> TileValidationError {
        TileValidationError::MissingField {
            kind: self.kind,
            field,
        }
    }

    pub(crate) fn invalid(&self, field: &'static str, expected: &'static str) -> TileValidationError {
        TileValidationError::InvalidField {
            kind: self.kind,
            field,
            expected,
        }
    }

    pub(crate) fn required_str(&self, field: &'static str) -> Result<String, TileValidationError> {
        self.optional_str(field)?.ok_or_else(|| self.missing(field))
    }

    pub(crate) fn optional_str(
        &self,
        field: &'static str,
    ) -> Result<Option<String>, TileValidationError> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(self.invalid(field, "a string")),
        }
    }

    pub(crate) fn str_or(
        &self,
        field: &'static str,
        default: &str,
    ) -> Result<String, TileValidationError> {
        Ok(self
            .optional_str(field)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub(crate) fn required_i64(&self, field: &'static str) -> Result<i64, TileValidationError> {
        self.optional_i64(field)?.ok_or_else(|| self.missing(field))
    }

    pub(crate) fn optional_i64(
        &self,
        field: &'static str,
    ) -> Result<Option<i64>, TileValidationError> {
        match self.value(field) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "an integer")),
        }
    }

    pub(crate) fn i64_or(&self, field: &'static str, default: i64) -> Result<i64, TileValidationError> {
        Ok(self.optional_i64(field)?.unwrap_or(default))
    }

    pub(crate) fn f64_or(&self, field: &'static str, default: f64) -> Result<f64, TileValidationError> {
        match self.value(field) {
            None => Ok(default),
            Some(value) => value
                .as_f64()
                .filter(|number| number.is_finite())
                .ok_or_else(|| self.invalid(field, "a finite number")),
        }
    }

    pub(crate) fn bool_or(
        &self,
        field: &'static str,
        default: bool,
    ) -> Result<bool, TileValidationError> {
        match self.value(field) {
            None => Ok(default),
            Some(Value::Bool(value)) => Ok(*value),
            Some(_) => Err(self.invalid(field, "a boolean")),
        }
    }

    pub(crate) fn string_list(
        &self,
        field: &'static str,
    ) -> Result<Vec<String>, TileValidationError> {
        match self.value(field) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(field, "a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.invalid(field, "a list of strings")),
        }
    }

    pub(crate) fn object_or_empty(
        &self,
        field: &'static str,
    ) -> Result<Value, TileValidationError> {
        match self.value(field) {
            None => Ok(Value::Object(TileFields::new())),
            Some(value @ Value::Object(_)) => Ok(value.clone()),
            Some(_) => Err(self.invalid(field, "an object")),
        }
    }

    /// Decodes a nested structured field with serde.
    pub(crate) fn nested<T: DeserializeOwned>(
        &self,
        field: &'static str,
        expected: &'static str,
    ) -> Result<Option<T>, TileValidationError> {
        match self.value(field) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|_| self.invalid(field, expected)),
        }
    }
}

/// Builds a cross-field constraint violation.
pub(crate) fn constraint(
    kind: TileKind,
    field: &'static str,
    message: impl Into<String>,
) -> TileValidationError {
    TileValidationError::Constraint {
        kind,
        field,
        message: message.into(),
    }
}
