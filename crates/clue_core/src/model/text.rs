//! Text tile record.

use crate::model::fields::FieldReader;
use crate::model::tile::{TileFields, TileKind, TileRecord, TileValidationError};
use serde::{Deserialize, Serialize};

/// Markup used by `TextTile::text`. Absent means plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Html,
    Markdown,
    Slate,
}

impl TextFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "html" => Some(Self::Html),
            "markdown" => Some(Self::Markdown),
            "slate" => Some(Self::Slate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextTile {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
}

impl TextTile {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl TileRecord for TextTile {
    const KIND: TileKind = TileKind::Text;

    fn from_fields(fields: &TileFields) -> Result<Self, TileValidationError> {
        let reader = FieldReader::new(Self::KIND, fields)?;
        let format = match reader.optional_str("format")? {
            Some(raw) => Some(
                TextFormat::parse(&raw)
                    .ok_or_else(|| reader.invalid("format", "one of html|markdown|slate"))?,
            ),
            None => None,
        };
        Ok(Self {
            text: reader.str_or("text", "")?,
            format,
        })
    }
}
