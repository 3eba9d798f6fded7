//! Document record and its mutation API.
//!
//! # Invariants
//! - `uid`, `key` and `created_at` are fixed after construction.
//! - Each applied mutation bumps `change_count` by one and emits exactly one
//!   `DocumentEvent`.

use crate::document::content::DocumentContent;
use crate::document::observer::{DocumentEvent, ObserverId, ObserverSet};
use crate::document::{DocumentError, DocumentResult};
use crate::model::registry::TileRegistry;
use crate::model::tile::{TileContent, TileFields};
use crate::model::tile_model::{DisplayUserType, TileId, TileModel};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of document a user works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Problem,
    Planning,
    LearningLog,
    Personal,
    /// Published problem document.
    Publication,
    LearningLogPublication,
    PersonalPublication,
    SupportPublication,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Planning => "planning",
            Self::LearningLog => "learningLog",
            Self::Personal => "personal",
            Self::Publication => "publication",
            Self::LearningLogPublication => "learningLogPublication",
            Self::PersonalPublication => "personalPublication",
            Self::SupportPublication => "supportPublication",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "problem" => Some(Self::Problem),
            "planning" => Some(Self::Planning),
            "learningLog" => Some(Self::LearningLog),
            "personal" => Some(Self::Personal),
            "publication" => Some(Self::Publication),
            "learningLogPublication" => Some(Self::LearningLogPublication),
            "personalPublication" => Some(Self::PersonalPublication),
            "supportPublication" => Some(Self::SupportPublication),
            _ => None,
        }
    }

    pub fn is_publication(self) -> bool {
        matches!(
            self,
            Self::Publication
                | Self::LearningLogPublication
                | Self::PersonalPublication
                | Self::SupportPublication
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Placement and metadata for a newly added tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddTileOptions {
    pub title: Option<String>,
    /// Insert position; appends when `None`.
    pub index: Option<usize>,
    pub display: Option<DisplayUserType>,
}

/// A user document: metadata plus owned tile content.
#[derive(Debug)]
pub struct Document {
    pub(crate) uid: String,
    pub(crate) kind: DocumentType,
    pub(crate) key: String,
    pub(crate) created_at: i64,
    pub(crate) title: Option<String>,
    pub(crate) properties: BTreeMap<String, String>,
    pub(crate) visibility: Option<Visibility>,
    pub(crate) group_id: Option<String>,
    pub(crate) origin_doc: Option<String>,
    pub(crate) change_count: u64,
    pub(crate) content: DocumentContent,
    pub(crate) observers: ObserverSet,
}

impl Document {
    /// Creates an empty document stamped with the current time.
    pub fn new(uid: impl Into<String>, kind: DocumentType, key: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            kind,
            key: key.into(),
            created_at: now_epoch_ms(),
            title: None,
            properties: BTreeMap::new(),
            visibility: None,
            group_id: None,
            origin_doc: None,
            change_count: 0,
            content: DocumentContent::new(),
            observers: ObserverSet::default(),
        }
    }

    /// Overrides the creation timestamp at build time.
    pub fn created_at_ms(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn kind(&self) -> DocumentType {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn origin_doc(&self) -> Option<&str> {
        self.origin_doc.as_deref()
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    pub fn is_publication(&self) -> bool {
        self.kind.is_publication()
    }

    /// Owners may edit their own documents; publications are read-only.
    pub fn is_editable_by(&self, uid: &str) -> bool {
        self.uid == uid && !self.is_publication()
    }

    /// Registers a callback run after every applied mutation.
    pub fn subscribe(&mut self, callback: impl Fn(&DocumentEvent) + 'static) -> ObserverId {
        self.observers.subscribe(Box::new(callback))
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Builds a tile through `registry` and adds it to the document.
    ///
    /// # Errors
    /// - `Tile` when the registry rejects the discriminator or the fields.
    /// - `IndexOutOfRange` when `options.index` is past the end.
    pub fn add_tile(
        &mut self,
        registry: &TileRegistry,
        discriminator: &str,
        fields: &TileFields,
        options: AddTileOptions,
    ) -> DocumentResult<TileId> {
        let content = registry.create(discriminator, fields)?;
        let tile = TileModel::new(content)
            .titled(options.title)
            .displayed_to(options.display);
        let tile_id = tile.id().to_string();
        self.insert_tile(tile, options.index)?;
        Ok(tile_id)
    }

    /// Adds an already built tile.
    pub fn insert_tile(&mut self, tile: TileModel, index: Option<usize>) -> DocumentResult<()> {
        let tile_id = tile.id().to_string();
        let kind = tile.kind();
        let index = self.content.insert_tile(tile, index)?;
        debug!(
            "event=tile_add module=document status=ok kind={} index={}",
            kind, index
        );
        self.emit(DocumentEvent::TileAdded {
            tile_id,
            kind,
            index,
        });
        Ok(())
    }

    pub fn remove_tile(&mut self, tile_id: &str) -> DocumentResult<TileModel> {
        let tile = self.content.remove_tile(tile_id)?;
        self.emit(DocumentEvent::TileRemoved {
            tile_id: tile_id.to_string(),
            kind: tile.kind(),
        });
        Ok(tile)
    }

    /// Replaces a tile's record with a new snapshot of the same kind.
    pub fn replace_tile_content(
        &mut self,
        tile_id: &str,
        content: TileContent,
    ) -> DocumentResult<()> {
        let kind = self.content.replace_tile_content(tile_id, content)?;
        self.emit(DocumentEvent::TileReplaced {
            tile_id: tile_id.to_string(),
            kind,
        });
        Ok(())
    }

    pub fn set_tile_title(&mut self, tile_id: &str, title: Option<String>) -> DocumentResult<()> {
        self.content.set_tile_title(tile_id, title.clone())?;
        self.emit(DocumentEvent::TileTitleChanged {
            tile_id: tile_id.to_string(),
            title,
        });
        Ok(())
    }

    pub fn move_tile(&mut self, tile_id: &str, to: usize) -> DocumentResult<()> {
        let from = self.content.move_tile(tile_id, to)?;
        if from != to {
            self.emit(DocumentEvent::TileMoved {
                tile_id: tile_id.to_string(),
                from,
                to,
            });
        }
        Ok(())
    }

    /// Duplicates a tile in its export form under a fresh id, right after
    /// the original.
    pub fn copy_tile(&mut self, tile_id: &str) -> DocumentResult<TileId> {
        let (copy, index) = match (self.content.get_tile(tile_id), self.content.index_of(tile_id)) {
            (Some(tile), Some(index)) => (tile.exported_copy(), index),
            _ => return Err(DocumentError::TileNotFound(tile_id.to_string())),
        };
        let copy_id = copy.id().to_string();
        self.insert_tile(copy, Some(index + 1))?;
        Ok(copy_id)
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title.clone();
        self.emit(DocumentEvent::TitleChanged { title });
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.properties.insert(key.clone(), value.clone());
        self.emit(DocumentEvent::PropertyChanged {
            key,
            value: Some(value),
        });
    }

    pub fn remove_property(&mut self, key: &str) -> Option<String> {
        let removed = self.properties.remove(key)?;
        self.emit(DocumentEvent::PropertyChanged {
            key: key.to_string(),
            value: None,
        });
        Some(removed)
    }

    pub fn set_visibility(&mut self, visibility: Option<Visibility>) {
        self.visibility = visibility;
        self.emit(DocumentEvent::VisibilityChanged { visibility });
    }

    pub fn set_group_id(&mut self, group_id: Option<String>) {
        self.group_id = group_id.clone();
        self.emit(DocumentEvent::GroupChanged { group_id });
    }

    fn emit(&mut self, event: DocumentEvent) {
        self.change_count += 1;
        self.observers.notify(&event);
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentType};

    #[test]
    fn publications_are_read_only_even_for_owner() {
        let personal = Document::new("u1", DocumentType::Personal, "doc-1");
        assert!(personal.is_editable_by("u1"));
        assert!(!personal.is_editable_by("u2"));

        let published = Document::new("u1", DocumentType::PersonalPublication, "doc-2");
        assert!(!published.is_editable_by("u1"));
    }

    #[test]
    fn document_type_identifiers_round_trip() {
        for raw in [
            "problem",
            "planning",
            "learningLog",
            "personal",
            "publication",
            "learningLogPublication",
            "personalPublication",
            "supportPublication",
        ] {
            let kind = DocumentType::parse(raw).expect("known document type");
            assert_eq!(kind.as_str(), raw);
            assert_eq!(serde_json::to_value(kind).unwrap(), raw);
        }
    }
}
