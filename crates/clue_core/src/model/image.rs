//! Image tile record.
//!
//! # Responsibility
//! - Hold an uploaded or linked image together with its provenance.
//!
//! # Invariants
//! - `key` is non-empty and never changes after construction.
//! - `created_at` / `created_by` are set once at construction.
//! - Only `title` may change, and only by producing a new snapshot
//!   (`with_title`) that the owning document swaps in.

use crate::model::fields::{constraint, FieldReader};
use crate::model::tile::{TileFields, TileKind, TileRecord, TileValidationError};
use serde::Serialize;

/// Image record. Fields are private to keep identity and provenance fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTile {
    key: String,
    /// Embedded data URI or remote URL.
    image_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Where the image came from, e.g. the uploaded file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    original_source: Option<String>,
    /// Unix epoch milliseconds.
    created_at: i64,
    created_by: String,
}

impl ImageTile {
    /// Creates an image record with no title or provenance.
    ///
    /// # Errors
    /// - `Constraint` on `key` when `key` is blank.
    pub fn new(
        key: impl Into<String>,
        image_data: impl Into<String>,
        created_at: i64,
        created_by: impl Into<String>,
    ) -> Result<Self, TileValidationError> {
        let image = Self {
            key: key.into(),
            image_data: image_data.into(),
            title: None,
            original_source: None,
            created_at,
            created_by: created_by.into(),
        };
        image.validate()?;
        Ok(image)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn original_source(&self) -> Option<&str> {
        self.original_source.as_deref()
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Returns a snapshot with `title` replaced. Identity and provenance
    /// fields are carried over untouched.
    pub fn with_title(&self, title: Option<String>) -> Self {
        Self {
            title,
            ..self.clone()
        }
    }

    /// Sets provenance at build time.
    pub fn with_original_source(mut self, source: impl Into<String>) -> Self {
        self.original_source = Some(source.into());
        self
    }
}

impl TileRecord for ImageTile {
    const KIND: TileKind = TileKind::Image;

    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError> {
        let reader = FieldReader::new(Self::KIND, fields)?;
        Ok(Self {
            key: reader.required_str("key")?,
            image_data: reader.required_str("imageData")?,
            title: reader.optional_str("title")?,
            original_source: reader.optional_str("originalSource")?,
            created_at: reader.required_i64("createdAt")?,
            created_by: reader.required_str("createdBy")?,
        })
    }

    fn validate(&self) -> Result<(), TileValidationError> {
        if self.key.trim().is_empty() {
            return Err(constraint(Self::KIND, "key", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ImageTile;
    use crate::model::tile::{TileRecord, TileValidationError};
    use serde_json::json;

    #[test]
    fn with_title_keeps_identity_fields() {
        let image = ImageTile::new("img1", "data:image/png;base64,AA==", 1000, "u1")
            .unwrap()
            .with_original_source("photo.png");
        let renamed = image.with_title(Some("Sunset".to_string()));

        assert_eq!(renamed.title(), Some("Sunset"));
        assert_eq!(renamed.key(), "img1");
        assert_eq!(renamed.created_at(), 1000);
        assert_eq!(renamed.created_by(), "u1");
        assert_eq!(renamed.original_source(), Some("photo.png"));
        assert_eq!(image.title(), None);
    }

    #[test]
    fn new_rejects_blank_key() {
        let err = ImageTile::new("  ", "data", 1, "u1").unwrap_err();
        assert_eq!(err.field(), "key");
    }

    #[test]
    fn created_at_must_be_integer() {
        let fields = json!({
            "key": "img1",
            "imageData": "data",
            "createdAt": "yesterday",
            "createdBy": "u1"
        });
        let err = ImageTile::from_fields(fields.as_object().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            TileValidationError::InvalidField {
                field: "createdAt",
                ..
            }
        ));
    }

    #[test]
    fn serializes_camel_case_and_skips_unset_optionals() {
        let image = ImageTile::new("img1", "data", 1000, "u1").unwrap();
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["imageData"], "data");
        assert_eq!(json["createdAt"], 1000);
        assert!(json.get("title").is_none());
        assert!(json.get("originalSource").is_none());
    }
}
