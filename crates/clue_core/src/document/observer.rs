//! Change notification for document mutations.
//!
//! Observers are plain callbacks run synchronously, in subscription order,
//! after the mutation has been applied.

use crate::document::model::Visibility;
use crate::model::tile::TileKind;
use crate::model::tile_model::TileId;
use std::fmt::{Debug, Formatter};

/// One applied document mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    TileAdded {
        tile_id: TileId,
        kind: TileKind,
        index: usize,
    },
    TileRemoved {
        tile_id: TileId,
        kind: TileKind,
    },
    TileReplaced {
        tile_id: TileId,
        kind: TileKind,
    },
    TileTitleChanged {
        tile_id: TileId,
        title: Option<String>,
    },
    TileMoved {
        tile_id: TileId,
        from: usize,
        to: usize,
    },
    TitleChanged {
        title: Option<String>,
    },
    PropertyChanged {
        key: String,
        value: Option<String>,
    },
    VisibilityChanged {
        visibility: Option<Visibility>,
    },
    GroupChanged {
        group_id: Option<String>,
    },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn Fn(&DocumentEvent)>;

#[derive(Default)]
pub(crate) struct ObserverSet {
    next_id: u64,
    observers: Vec<(ObserverId, Callback)>,
}

impl ObserverSet {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&self, event: &DocumentEvent) {
        for (_, callback) in &self.observers {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl Debug for ObserverSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}
