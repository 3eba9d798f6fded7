//! JSON encoding of documents.
//!
//! Wire shape (camelCase):
//! `{ uid, type, key, createdAt, title?, properties?, visibility?, groupId?,
//!    originDoc?, changeCount, content: { tiles: [ { id, title?, display?,
//!    content: { type, ... } } ] } }`
//!
//! Decoding never trusts the payload: every tile is rebuilt through
//! `TileRegistry::create`.

use crate::document::content::DocumentContent;
use crate::document::model::{Document, DocumentType, Visibility};
use crate::document::observer::ObserverSet;
use crate::document::{DocumentError, DocumentResult};
use crate::model::registry::TileRegistry;
use crate::model::tile::{TileFields, TYPE_FIELD};
use crate::model::tile_model::{generate_tile_id, DisplayUserType, TileModel};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentOut<'a> {
    uid: &'a str,
    #[serde(rename = "type")]
    kind: DocumentType,
    key: &'a str,
    created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "no_properties")]
    properties: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin_doc: Option<&'a str>,
    change_count: u64,
    content: ContentOut<'a>,
}

#[derive(Serialize)]
struct ContentOut<'a> {
    tiles: Vec<&'a TileModel>,
}

impl<'a> ContentOut<'a> {
    fn of(content: &'a DocumentContent) -> Self {
        Self {
            tiles: content.tiles().collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentIn {
    uid: String,
    #[serde(rename = "type")]
    kind: DocumentType,
    key: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    visibility: Option<Visibility>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    origin_doc: Option<String>,
    #[serde(default)]
    change_count: u64,
    #[serde(default)]
    content: Option<ContentIn>,
}

#[derive(Deserialize)]
struct ContentIn {
    #[serde(default)]
    tiles: Vec<TileIn>,
}

#[derive(Deserialize)]
struct TileIn {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    display: Option<DisplayUserType>,
    content: Value,
}

impl Document {
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string(&self.wire())?)
    }

    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(&self.wire())?)
    }

    pub fn to_value(&self) -> DocumentResult<Value> {
        Ok(serde_json::to_value(self.wire())?)
    }

    /// Decodes a saved document, rebuilding every tile through `registry`.
    ///
    /// # Errors
    /// - `Json` for malformed JSON or document-level fields.
    /// - `InvalidDocument` for blank uid/key or tile content without a
    ///   string `type`.
    /// - `Tile` naming the tile id for unknown kinds and invalid fields.
    /// - `DuplicateTileId` when two tiles share an id.
    pub fn from_json(text: &str, registry: &TileRegistry) -> DocumentResult<Self> {
        let raw: DocumentIn = serde_json::from_str(text)?;
        Self::from_wire(raw, registry)
    }

    pub fn from_value(value: Value, registry: &TileRegistry) -> DocumentResult<Self> {
        let raw: DocumentIn = serde_json::from_value(value)?;
        Self::from_wire(raw, registry)
    }

    fn wire(&self) -> DocumentOut<'_> {
        DocumentOut {
            uid: &self.uid,
            kind: self.kind,
            key: &self.key,
            created_at: self.created_at,
            title: self.title.as_deref(),
            properties: &self.properties,
            visibility: self.visibility,
            group_id: self.group_id.as_deref(),
            origin_doc: self.origin_doc.as_deref(),
            change_count: self.change_count,
            content: ContentOut::of(&self.content),
        }
    }

    fn from_wire(raw: DocumentIn, registry: &TileRegistry) -> DocumentResult<Self> {
        if raw.uid.trim().is_empty() {
            return Err(DocumentError::InvalidDocument("uid must not be empty".to_string()));
        }
        if raw.key.trim().is_empty() {
            return Err(DocumentError::InvalidDocument("key must not be empty".to_string()));
        }

        let tiles = raw.content.map(|content| content.tiles).unwrap_or_default();
        let content = decode_content(tiles, registry).map_err(|err| {
            warn!(
                "event=document_decode module=codec status=error doc_type={} error_code={}",
                raw.kind.as_str(),
                err.code()
            );
            err
        })?;
        debug!(
            "event=document_decode module=codec status=ok doc_type={} tiles={}",
            raw.kind.as_str(),
            content.len()
        );

        Ok(Self {
            uid: raw.uid,
            kind: raw.kind,
            key: raw.key,
            created_at: raw.created_at,
            title: raw.title,
            properties: raw.properties,
            visibility: raw.visibility,
            group_id: raw.group_id,
            origin_doc: raw.origin_doc,
            change_count: raw.change_count,
            content,
            observers: ObserverSet::default(),
        })
    }
}

fn no_properties(properties: &&BTreeMap<String, String>) -> bool {
    properties.is_empty()
}

/// Encodes only the tile content, `{ "tiles": [...] }`, with every tile in
/// its export form.
pub fn export_content_json(content: &DocumentContent) -> DocumentResult<String> {
    let tiles: Vec<TileModel> = content.tiles().map(TileModel::exported).collect();
    Ok(serde_json::to_string_pretty(&ContentOut {
        tiles: tiles.iter().collect(),
    })?)
}

fn decode_content(tiles: Vec<TileIn>, registry: &TileRegistry) -> DocumentResult<DocumentContent> {
    let mut content = DocumentContent::new();
    for raw in tiles {
        let tile_id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(generate_tile_id);

        let Value::Object(fields) = raw.content else {
            return Err(DocumentError::InvalidDocument(format!(
                "tile `{tile_id}` content must be an object"
            )));
        };
        let discriminator = discriminator_of(&fields).ok_or_else(|| {
            DocumentError::InvalidDocument(format!(
                "tile `{tile_id}` content is missing a string `{TYPE_FIELD}`"
            ))
        })?;

        let record = registry
            .create(discriminator, &fields)
            .map_err(|source| DocumentError::Tile {
                tile_id: Some(tile_id.clone()),
                source,
            })?;
        let tile = TileModel::with_id(tile_id, record)
            .titled(raw.title)
            .displayed_to(raw.display);
        content.insert_tile(tile, None)?;
    }
    Ok(content)
}

fn discriminator_of(fields: &TileFields) -> Option<&str> {
    fields.get(TYPE_FIELD).and_then(Value::as_str)
}
