//! Tile wrapper owned by a document.
//!
//! A `TileModel` pairs a record with document-level metadata: its id within
//! the document, an optional explicit title and a display restriction.

use crate::model::tile::{TileContent, TileKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tile identifier, unique within its document.
pub type TileId = String;

/// Restricts tile visibility to one user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUserType {
    Student,
    Teacher,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileModel {
    id: TileId,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<DisplayUserType>,
    content: TileContent,
}

/// Generates a fresh tile id.
pub fn generate_tile_id() -> TileId {
    Uuid::new_v4().to_string()
}

impl TileModel {
    /// Wraps `content` under a generated id.
    pub fn new(content: TileContent) -> Self {
        Self::with_id(generate_tile_id(), content)
    }

    /// Wraps `content` under a caller-provided id, used by import paths.
    pub fn with_id(id: impl Into<TileId>, content: TileContent) -> Self {
        Self {
            id: id.into(),
            title: None,
            display: None,
            content,
        }
    }

    pub fn titled(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn displayed_to(mut self, display: Option<DisplayUserType>) -> Self {
        self.display = display;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TileKind {
        self.content.kind()
    }

    /// Explicit title, else the content's own title, else empty.
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .or_else(|| self.content.content_title())
            .unwrap_or("")
    }

    pub fn explicit_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn display(&self) -> Option<DisplayUserType> {
        self.display
    }

    pub fn content(&self) -> &TileContent {
        &self.content
    }

    /// Export form of this tile under a fresh id, used when duplicating.
    pub fn exported_copy(&self) -> Self {
        Self {
            id: generate_tile_id(),
            title: self.title.clone(),
            display: self.display,
            content: self.content.exported(),
        }
    }

    /// Export form of this tile, keeping its id.
    pub(crate) fn exported(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            display: self.display,
            content: self.content.exported(),
        }
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub(crate) fn set_content(&mut self, content: TileContent) {
        self.content = content;
    }
}

#[cfg(test)]
mod tests {
    use super::TileModel;
    use crate::model::dataflow::DataflowTile;
    use crate::model::image::ImageTile;
    use crate::model::text::TextTile;
    use crate::model::tile::TileContent;
    use serde_json::json;

    #[test]
    fn title_falls_back_to_content_title() {
        let image = ImageTile::new("img1", "data", 1, "u1")
            .unwrap()
            .with_title(Some("Leaf".to_string()));
        let tile = TileModel::new(TileContent::Image(image));
        assert_eq!(tile.title(), "Leaf");

        let tile = tile.titled(Some("Fig. 1".to_string()));
        assert_eq!(tile.title(), "Fig. 1");
        assert_eq!(tile.explicit_title(), Some("Fig. 1"));
    }

    #[test]
    fn untitled_text_tile_has_empty_title() {
        let tile = TileModel::new(TextTile::plain("hi").into());
        assert_eq!(tile.title(), "");
    }

    #[test]
    fn exported_copy_keeps_everything_but_id() {
        let tile = TileModel::with_id("t1", TextTile::plain("hi").into())
            .titled(Some("Notes".to_string()));
        let copy = tile.exported_copy();
        assert_ne!(copy.id(), tile.id());
        assert_eq!(copy.content(), tile.content());
        assert_eq!(copy.explicit_title(), Some("Notes"));
    }

    #[test]
    fn exported_copy_drops_dataflow_samples() {
        let dataflow = DataflowTile {
            program: json!({ "values": { "n1": { "name": "sensor", "recentValues": [4, 5] } } }),
            ..DataflowTile::default()
        };
        let tile = TileModel::with_id("t1", TileContent::Dataflow(dataflow))
            .titled(Some("Sensors".to_string()));

        let copy = tile.exported_copy();
        assert_ne!(copy.id(), tile.id());
        assert_eq!(copy.explicit_title(), Some("Sensors"));
        let program = &copy.content().as_dataflow().unwrap().program;
        assert!(program["values"]["n1"].get("recentValues").is_none());
        assert_eq!(program["values"]["n1"]["name"], "sensor");
    }
}
