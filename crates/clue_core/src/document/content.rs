//! Ordered tile container.
//!
//! # Invariants
//! - `order` and `tiles` always hold the same id set.
//! - Tile ids are non-empty and unique within the content.
//! - A tile's kind never changes in place; replacement content must keep it.

use crate::document::{DocumentError, DocumentResult};
use crate::model::registry::TileError;
use crate::model::tile::{TileContent, TileKind};
use crate::model::tile_model::{TileId, TileModel};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentContent {
    order: Vec<TileId>,
    tiles: HashMap<TileId, TileModel>,
}

impl DocumentContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get_tile(&self, tile_id: &str) -> Option<&TileModel> {
        self.tiles.get(tile_id)
    }

    pub fn contains_tile(&self, tile_id: &str) -> bool {
        self.tiles.contains_key(tile_id)
    }

    /// Tile ids in display order.
    pub fn tile_ids(&self) -> &[TileId] {
        &self.order
    }

    /// Tiles in display order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileModel> + '_ {
        self.order.iter().filter_map(|id| self.tiles.get(id))
    }

    pub fn tiles_of_kind(&self, kind: TileKind) -> Vec<&TileModel> {
        self.tiles().filter(|tile| tile.kind() == kind).collect()
    }

    pub fn index_of(&self, tile_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == tile_id)
    }

    /// Inserts `tile` at `index` (appends when `None`) and returns the index
    /// it landed at.
    pub(crate) fn insert_tile(
        &mut self,
        tile: TileModel,
        index: Option<usize>,
    ) -> DocumentResult<usize> {
        if tile.id().trim().is_empty() {
            return Err(DocumentError::InvalidTileId);
        }
        if self.tiles.contains_key(tile.id()) {
            return Err(DocumentError::DuplicateTileId(tile.id().to_string()));
        }
        let index = index.unwrap_or(self.order.len());
        if index > self.order.len() {
            return Err(DocumentError::IndexOutOfRange {
                index,
                len: self.order.len(),
            });
        }
        tile.content()
            .validate()
            .map_err(|err| DocumentError::Tile {
                tile_id: Some(tile.id().to_string()),
                source: TileError::Validation(err),
            })?;

        self.order.insert(index, tile.id().to_string());
        self.tiles.insert(tile.id().to_string(), tile);
        Ok(index)
    }

    pub(crate) fn remove_tile(&mut self, tile_id: &str) -> DocumentResult<TileModel> {
        let tile = self
            .tiles
            .remove(tile_id)
            .ok_or_else(|| DocumentError::TileNotFound(tile_id.to_string()))?;
        self.order.retain(|id| id != tile_id);
        Ok(tile)
    }

    /// Swaps in a new content snapshot for an existing tile.
    pub(crate) fn replace_tile_content(
        &mut self,
        tile_id: &str,
        content: TileContent,
    ) -> DocumentResult<TileKind> {
        let tile = self
            .tiles
            .get_mut(tile_id)
            .ok_or_else(|| DocumentError::TileNotFound(tile_id.to_string()))?;
        if tile.kind() != content.kind() {
            return Err(DocumentError::KindChange {
                tile_id: tile_id.to_string(),
                from: tile.kind(),
                to: content.kind(),
            });
        }
        content.validate().map_err(|err| DocumentError::Tile {
            tile_id: Some(tile_id.to_string()),
            source: TileError::Validation(err),
        })?;
        tile.set_content(content);
        Ok(tile.kind())
    }

    pub(crate) fn set_tile_title(
        &mut self,
        tile_id: &str,
        title: Option<String>,
    ) -> DocumentResult<()> {
        let tile = self
            .tiles
            .get_mut(tile_id)
            .ok_or_else(|| DocumentError::TileNotFound(tile_id.to_string()))?;
        tile.set_title(title);
        Ok(())
    }

    /// Moves a tile to position `to` and returns its previous index.
    pub(crate) fn move_tile(&mut self, tile_id: &str, to: usize) -> DocumentResult<usize> {
        let from = self
            .index_of(tile_id)
            .ok_or_else(|| DocumentError::TileNotFound(tile_id.to_string()))?;
        if to >= self.order.len() {
            return Err(DocumentError::IndexOutOfRange {
                index: to,
                len: self.order.len(),
            });
        }
        let id = self.order.remove(from);
        self.order.insert(to, id);
        Ok(from)
    }
}
